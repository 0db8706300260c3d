use std::collections::HashMap;

use tracing::debug;

use crate::coordinate::Coordinate;
use crate::graph::DependencyGraph;
use crate::normalizer::Normalizer;
use crate::shared::{GraphError, Result};

/// Graph constructor for `go mod graph`-style edge lists: one
/// `"<source> <target>"` pair per line, root = source of the first line.
///
/// With `include_transitive` the full reachable graph is materialized;
/// without it only the root's direct edges are emitted. Edges touching an
/// ignored coordinate (wildcard-aware equality, not name-only) are dropped at
/// construction time; the closure filter still runs afterwards because
/// manifests may mark either a root-adjacent or a transitively-discovered
/// dependency.
pub struct EdgeListGraphBuilder<'a> {
    normalizer: &'a Normalizer,
    include_transitive: bool,
    ignored: Vec<Coordinate>,
}

impl<'a> EdgeListGraphBuilder<'a> {
    pub fn new(normalizer: &'a Normalizer, include_transitive: bool) -> Self {
        Self {
            normalizer,
            include_transitive,
            ignored: Vec::new(),
        }
    }

    pub fn with_ignored(mut self, ignored: Vec<Coordinate>) -> Self {
        self.ignored = ignored;
        self
    }

    pub fn build(&self, text: &str, graph: &mut DependencyGraph) -> Result<()> {
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.is_empty() {
            return Err(GraphError::malformed(text, "edge list is empty"));
        }

        // One left-to-right pass groups every line under its source token,
        // keeping first-seen order; each line is visited exactly once.
        let mut order: Vec<String> = Vec::new();
        let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
        for line in &lines {
            let (source, target) = split_edge(line)?;
            adjacency
                .entry(source.clone())
                .or_insert_with(|| {
                    order.push(source.clone());
                    Vec::new()
                })
                .push(target);
        }

        let root_token = split_edge(lines[0])?.0;
        let root = self.normalizer.normalize(&root_token)?;
        graph.add_root(root.clone());

        if self.include_transitive {
            for source_token in &order {
                let source = self.normalizer.normalize(source_token)?;
                for target_token in &adjacency[source_token] {
                    let target = self.normalizer.normalize(target_token)?;
                    self.add_edge(&source, &target, graph);
                }
            }
        } else {
            for target_token in adjacency.get(&root_token).map(Vec::as_slice).unwrap_or(&[]) {
                let target = self.normalizer.normalize(target_token)?;
                self.add_edge(&root, &target, graph);
            }
        }
        Ok(())
    }

    fn add_edge(&self, source: &Coordinate, target: &Coordinate, graph: &mut DependencyGraph) {
        if self.is_ignored(source) || self.is_ignored(target) {
            debug!(source = %source, target = %target, "edge dropped by ignore set");
            return;
        }
        graph.add_dependency(source, target);
    }

    fn is_ignored(&self, coordinate: &Coordinate) -> bool {
        self.ignored.iter().any(|i| i.matches(coordinate))
    }
}

fn split_edge(line: &str) -> Result<(String, String)> {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(source), Some(target)) => Ok((source.to_string(), target.to_string())),
        _ => Err(GraphError::malformed(
            line,
            "expected \"<source> <target>\" edge pair",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecosystem::Ecosystem;

    fn build(text: &str, include_transitive: bool) -> DependencyGraph {
        let normalizer = Normalizer::new(Ecosystem::Golang);
        let builder = EdgeListGraphBuilder::new(&normalizer, include_transitive);
        let mut graph = DependencyGraph::new();
        builder.build(text, &mut graph).unwrap();
        graph
    }

    #[test]
    fn test_direct_only_mode() {
        let graph = build("root@v0 dep1@v1\ndep1@v1 dep2@v1\n", false);
        assert_eq!(
            graph
                .direct_dependencies_of("pkg:golang/root@v0?type=module")
                .to_vec(),
            vec!["pkg:golang/dep1@v1?type=module".to_string()]
        );
        assert!(!graph.contains("pkg:golang/dep2@v1?type=module"));
    }

    #[test]
    fn test_transitive_mode_materializes_full_graph() {
        let graph = build("root@v0 dep1@v1\ndep1@v1 dep2@v1\n", true);
        assert_eq!(graph.component_count(), 3);
        assert_eq!(
            graph
                .direct_dependencies_of("pkg:golang/dep1@v1?type=module")
                .to_vec(),
            vec!["pkg:golang/dep2@v1?type=module".to_string()]
        );
    }

    #[test]
    fn test_cycle_terminates_with_both_edges() {
        let graph = build("a@v1 b@v1\nb@v1 a@v1\n", true);
        assert_eq!(graph.component_count(), 2);
        assert_eq!(
            graph
                .direct_dependencies_of("pkg:golang/a@v1?type=module")
                .to_vec(),
            vec!["pkg:golang/b@v1?type=module".to_string()]
        );
        assert_eq!(
            graph
                .direct_dependencies_of("pkg:golang/b@v1?type=module")
                .to_vec(),
            vec!["pkg:golang/a@v1?type=module".to_string()]
        );
    }

    #[test]
    fn test_root_without_version_takes_context_version() {
        let normalizer = Normalizer::new(Ecosystem::Golang).with_context_version("v1.0.0");
        let builder = EdgeListGraphBuilder::new(&normalizer, true);
        let mut graph = DependencyGraph::new();
        builder
            .build("github.com/acme/app github.com/gorilla/mux@v1.8.0\n", &mut graph)
            .unwrap();
        assert_eq!(
            graph.root().unwrap().to_string(),
            "pkg:golang/github.com/acme/app@v1.0.0?type=module"
        );
    }

    #[test]
    fn test_ignored_coordinate_drops_edges_at_construction() {
        let normalizer = Normalizer::new(Ecosystem::Golang);
        let ignored = vec![Coordinate::new(
            Ecosystem::Golang,
            None,
            "dep1",
            "v1",
        )];
        let builder = EdgeListGraphBuilder::new(&normalizer, true).with_ignored(ignored);
        let mut graph = DependencyGraph::new();
        builder
            .build("root@v0 dep1@v1\nroot@v0 dep3@v1\ndep1@v1 dep2@v1\n", &mut graph)
            .unwrap();
        assert!(!graph.contains("pkg:golang/dep1@v1?type=module"));
        assert!(!graph.contains("pkg:golang/dep2@v1?type=module"));
        assert!(graph.contains("pkg:golang/dep3@v1?type=module"));
    }

    #[test]
    fn test_malformed_edge_line_is_rejected() {
        let normalizer = Normalizer::new(Ecosystem::Golang);
        let builder = EdgeListGraphBuilder::new(&normalizer, true);
        let mut graph = DependencyGraph::new();
        assert!(builder.build("loneentry\n", &mut graph).is_err());
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let normalizer = Normalizer::new(Ecosystem::Golang);
        let builder = EdgeListGraphBuilder::new(&normalizer, false);
        let mut graph = DependencyGraph::new();
        assert!(builder.build("\n  \n", &mut graph).is_err());
    }
}
