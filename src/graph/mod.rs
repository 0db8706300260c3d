pub mod component;
pub mod cyclonedx;
pub mod dependency_graph;

pub use component::{Component, ComponentKind};
pub use cyclonedx::Bom;
pub use dependency_graph::{DependencyEntry, DependencyGraph};
