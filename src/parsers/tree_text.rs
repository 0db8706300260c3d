use tracing::trace;

use crate::coordinate::Coordinate;
use crate::ecosystem::ScopeEdgePolicy;
use crate::graph::DependencyGraph;
use crate::normalizer::{line_depth, Normalizer};
use crate::shared::{GraphError, Result};

/// Recursive, indentation-depth-driven parser for Maven/Gradle-style
/// dependency tree text.
///
/// Each call to `parse_subtree` owns one parent and consumes lines until it
/// meets a sibling or uncle (depth <= parent depth); a depth gap of more than
/// one recurses into the most recent line as the new parent. The recursion
/// returns how many lines it consumed, so the caller's cursor moves past the
/// whole subtree.
pub struct TreeTextParser<'a> {
    normalizer: &'a Normalizer,
    policy: ScopeEdgePolicy,
}

impl<'a> TreeTextParser<'a> {
    pub fn new(normalizer: &'a Normalizer, policy: ScopeEdgePolicy) -> Self {
        Self { normalizer, policy }
    }

    /// Parse a designated root line plus its nested lines into `graph`.
    pub fn parse(
        &self,
        root_line: &str,
        lines: &[String],
        graph: &mut DependencyGraph,
    ) -> Result<()> {
        let root = self.normalizer.normalize(root_line)?;
        graph.add_root(root);
        let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        self.parse_subtree(root_line, 0, &line_refs, graph)?;
        Ok(())
    }

    /// Returns the number of lines consumed by the subtree under
    /// `parent_line`.
    fn parse_subtree(
        &self,
        parent_line: &str,
        parent_depth: i32,
        lines: &[&str],
        graph: &mut DependencyGraph,
    ) -> Result<usize> {
        let parent = self.normalizer.normalize(parent_line)?;
        let source = parent.clone().without_qualifier("scope");
        let mut i = 0usize;
        while i < lines.len() {
            let target_line = lines[i];
            let target_depth = line_depth(target_line);
            // sibling or uncle encountered (or blank sentinel): subtree closed
            if target_depth <= parent_depth {
                return Ok(i);
            }
            if target_depth == parent_depth + 1 {
                let target = self.normalizer.normalize(target_line)?;
                let admitted = self.edge_admitted(&parent, &target);
                // scope never belongs in the bom-ref, only in the admission
                // decision
                let target = target.without_qualifier("scope");
                if admitted {
                    trace!(source = %source, target = %target, "tree edge");
                    graph.add_dependency(&source, &target);
                } else {
                    graph.add_component(&target);
                }
                i += 1;
            } else {
                // gap of more than one level: descend into the most recent
                // line, which must exist for well-formed tool output
                if i == 0 {
                    return Err(GraphError::malformed(
                        target_line,
                        format!(
                            "line at depth {} directly under depth {}",
                            target_depth, parent_depth
                        ),
                    ));
                }
                let anchor = lines[i - 1];
                let consumed =
                    self.parse_subtree(anchor, line_depth(anchor), &lines[i..], graph)?;
                i += consumed;
            }
        }
        Ok(i)
    }

    fn edge_admitted(&self, source: &Coordinate, target: &Coordinate) -> bool {
        match self.policy {
            ScopeEdgePolicy::IncludeAll => true,
            ScopeEdgePolicy::ExcludeTest => !is_test_scoped(source) && !is_test_scoped(target),
        }
    }
}

fn is_test_scoped(coordinate: &Coordinate) -> bool {
    coordinate.qualifier("scope") == Some("test")
}
