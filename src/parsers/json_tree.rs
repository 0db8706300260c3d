use serde::Deserialize;
use tracing::warn;

use crate::coordinate::Coordinate;
use crate::ecosystem::Ecosystem;
use crate::graph::DependencyGraph;
use crate::shared::{GraphError, Result};

/// Nesting bound for hostile or pathological inputs; real dependency trees
/// sit far below this.
const MAX_TREE_DEPTH: usize = 100;

/// One node of a nested dependency-tree JSON document (the shape printed by
/// pipdeptree-style resolvers): name, resolved version, nested dependencies.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageNode {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub dependencies: Vec<PackageNode>,
}

/// Parser for nested JSON dependency trees. The manifest has no real root
/// element, so a synthetic root is inserted; callers remove it with
/// `DependencyGraph::remove_root_component` before serialization.
pub struct JsonTreeParser {
    ecosystem: Ecosystem,
}

impl JsonTreeParser {
    pub fn new(ecosystem: Ecosystem) -> Self {
        Self { ecosystem }
    }

    pub fn parse(&self, text: &str, graph: &mut DependencyGraph) -> Result<()> {
        let nodes: Vec<PackageNode> =
            serde_json::from_str(text).map_err(|e| GraphError::manifest(e.to_string()))?;
        let root = Coordinate::synthetic_root(self.ecosystem);
        graph.add_root(root.clone());
        for node in &nodes {
            self.add_all(&root, node, graph, 0);
        }
        Ok(())
    }

    fn add_all(
        &self,
        source: &Coordinate,
        node: &PackageNode,
        graph: &mut DependencyGraph,
        depth: usize,
    ) {
        if depth >= MAX_TREE_DEPTH {
            warn!(package = %node.name, "maximum tree depth reached, chain truncated");
            return;
        }
        let target = Coordinate::new(self.ecosystem, None, &node.name, &node.version);
        graph.add_dependency(source, &target);
        for dependency in &node.dependencies {
            self.add_all(&target, dependency, graph, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_tree() {
        let text = r#"[
            {
                "name": "requests",
                "version": "2.31.0",
                "dependencies": [
                    { "name": "urllib3", "version": "1.26.18" },
                    { "name": "idna", "version": "3.4" }
                ]
            },
            { "name": "flask", "version": "2.3.0" }
        ]"#;
        let parser = JsonTreeParser::new(Ecosystem::Python);
        let mut graph = DependencyGraph::new();
        parser.parse(text, &mut graph).unwrap();

        assert_eq!(graph.component_count(), 5);
        assert_eq!(graph.direct_dependencies_of("pkg:pypi/root").len(), 2);
        assert_eq!(
            graph
                .direct_dependencies_of("pkg:pypi/requests@2.31.0")
                .len(),
            2
        );
    }

    #[test]
    fn test_synthetic_root_is_removable() {
        let text = r#"[ { "name": "flask", "version": "2.3.0" } ]"#;
        let parser = JsonTreeParser::new(Ecosystem::Python);
        let mut graph = DependencyGraph::new();
        parser.parse(text, &mut graph).unwrap();
        graph.remove_root_component();

        assert!(!graph.contains("pkg:pypi/root"));
        assert!(graph.contains("pkg:pypi/flask@2.3.0"));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let parser = JsonTreeParser::new(Ecosystem::Python);
        let mut graph = DependencyGraph::new();
        assert!(matches!(
            parser.parse("{ not json", &mut graph),
            Err(GraphError::ManifestParse { .. })
        ));
    }

    #[test]
    fn test_repeated_package_via_different_paths_is_one_node() {
        let text = r#"[
            {
                "name": "a", "version": "1",
                "dependencies": [ { "name": "c", "version": "3" } ]
            },
            {
                "name": "b", "version": "2",
                "dependencies": [ { "name": "c", "version": "3" } ]
            }
        ]"#;
        let parser = JsonTreeParser::new(Ecosystem::Python);
        let mut graph = DependencyGraph::new();
        parser.parse(text, &mut graph).unwrap();

        // root + a + b + one shared c
        assert_eq!(graph.component_count(), 4);
        assert_eq!(
            graph.direct_dependencies_of("pkg:pypi/a@1").to_vec(),
            vec!["pkg:pypi/c@3".to_string()]
        );
        assert_eq!(
            graph.direct_dependencies_of("pkg:pypi/b@2").to_vec(),
            vec!["pkg:pypi/c@3".to_string()]
        );
    }
}
