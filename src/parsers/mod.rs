pub mod dot_graph;
pub mod edge_list;
pub mod gradle;
pub mod json_tree;
pub mod tree_text;

pub use dot_graph::DotGraphParser;
pub use edge_list::EdgeListGraphBuilder;
pub use json_tree::{JsonTreeParser, PackageNode};
pub use tree_text::TreeTextParser;
