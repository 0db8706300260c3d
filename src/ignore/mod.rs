//! Ignore handling: extraction of ignore annotations from manifests and
//! removal of the designated packages from a populated graph.

pub mod closure;
pub mod markers;

pub use closure::{IgnoreClosureFilter, MatchMode};
pub use markers::{IgnoreAnnotationExtractor, IGNORE_MARKER};
