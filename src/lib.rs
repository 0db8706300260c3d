//! deptree-sbom - dependency graph construction and CycloneDX SBOM
//! serialization for package-manager output.
//!
//! The crate turns the textual dependency reports of Maven, Gradle, Go, npm
//! and pip into a normalized in-memory graph, applies developer-declared
//! ignore annotations, and serializes the result as a CycloneDX 1.4 JSON BOM.
//!
//! # Architecture
//!
//! - **Coordinates** (`coordinate`, `ecosystem`, `normalizer`): package
//!   identity, purl rendering and per-ecosystem line normalization
//! - **Graph** (`graph`): the deduplicated component/dependency model and its
//!   CycloneDX wire representation
//! - **Parsers** (`parsers`): front ends for indented tree text, edge lists,
//!   dot digraphs and nested JSON trees
//! - **Ignore** (`ignore`): manifest annotation extraction and reachable-set
//!   filtering
//! - **Shared** (`shared`): common error and result types
//!
//! # Example
//!
//! ```
//! use deptree_sbom::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let root = "com.example:app:jar:1.0.0".to_string();
//! let lines = vec![
//!     "+- org.apache.commons:commons-lang3:jar:3.12.0:compile".to_string(),
//!     "\\- junit:junit:jar:4.13.2:test".to_string(),
//! ];
//!
//! let normalizer = Normalizer::new(Ecosystem::Maven);
//! let parser = TreeTextParser::new(&normalizer, Ecosystem::Maven.scope_edge_policy());
//! let mut graph = DependencyGraph::new();
//! parser.parse(&root, &lines, &mut graph)?;
//!
//! let pom = r#"<project><dependencies><dependency>
//!     <groupId>junit</groupId><artifactId>junit</artifactId>
//!     <version>4.13.2</version><!--scaignore-->
//! </dependency></dependencies></project>"#;
//! let ignored = IgnoreAnnotationExtractor::new(Ecosystem::Maven).extract(pom)?;
//! IgnoreClosureFilter::new(MatchMode::ByCoordinate).filter(&mut graph, &ignored);
//!
//! println!("{}", graph.to_json_string()?);
//! # Ok(())
//! # }
//! ```

pub mod coordinate;
pub mod ecosystem;
pub mod graph;
pub mod ignore;
pub mod normalizer;
pub mod parsers;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coordinate::{Coordinate, WILDCARD_VERSION};
    pub use crate::ecosystem::{Ecosystem, ScopeEdgePolicy};
    pub use crate::graph::{Bom, Component, ComponentKind, DependencyGraph};
    pub use crate::ignore::{IgnoreAnnotationExtractor, IgnoreClosureFilter, MatchMode};
    pub use crate::normalizer::Normalizer;
    pub use crate::parsers::{
        DotGraphParser, EdgeListGraphBuilder, JsonTreeParser, TreeTextParser,
    };
    pub use crate::shared::{GraphError, Result};
}
