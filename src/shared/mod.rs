pub mod error;
pub mod result;

pub use error::GraphError;
pub use result::Result;
