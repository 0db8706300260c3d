use std::collections::HashSet;

use tracing::debug;

use crate::coordinate::Coordinate;
use crate::graph::DependencyGraph;

/// How ignore patterns are matched against graph components.
///
/// `ByCoordinate` compares full coordinates (wildcard version permitted);
/// `ByNameOnly` compares package names alone, for ecosystems whose ignore
/// markers carry no reliable version (pip requirement lines, npm names).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    ByCoordinate,
    ByNameOnly,
}

/// Removes ignored packages from a populated graph.
///
/// `filter` removes each matched component together with everything reachable
/// from it, whether or not those transitive packages are reachable through
/// some other surviving path. `filter_matched_only` removes just the matched
/// components and splices their children onto nothing, leaving the rest of
/// the graph intact.
pub struct IgnoreClosureFilter {
    mode: MatchMode,
}

impl IgnoreClosureFilter {
    pub fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    /// Remove every matched component and its full reachable subtree.
    /// Patterns that match nothing are silently skipped.
    pub fn filter(&self, graph: &mut DependencyGraph, ignored: &[Coordinate]) {
        let seeds = self.matched_refs(graph, ignored);
        if seeds.is_empty() {
            return;
        }
        let closure = self.reachable_from(graph, seeds);
        debug!(count = closure.len(), "ignore closure computed");
        graph.remove_refs(&closure);
    }

    /// Remove only the matched components themselves; their dependencies
    /// stay in the graph when reachable elsewhere.
    pub fn filter_matched_only(&self, graph: &mut DependencyGraph, ignored: &[Coordinate]) {
        let seeds = self.matched_refs(graph, ignored);
        if seeds.is_empty() {
            return;
        }
        let refs: HashSet<String> = seeds.into_iter().collect();
        graph.remove_refs(&refs);
    }

    fn matched_refs(&self, graph: &DependencyGraph, ignored: &[Coordinate]) -> Vec<String> {
        graph
            .components()
            .iter()
            .filter(|component| {
                ignored
                    .iter()
                    .any(|pattern| self.matches(pattern, component.coordinate()))
            })
            .map(|component| component.bom_ref())
            .collect()
    }

    fn matches(&self, pattern: &Coordinate, candidate: &Coordinate) -> bool {
        match self.mode {
            MatchMode::ByCoordinate => pattern.matches(candidate),
            MatchMode::ByNameOnly => pattern.name() == candidate.name(),
        }
    }

    /// Work-set reachability over direct dependencies. The visited-set check
    /// happens on insert, so cycles terminate.
    fn reachable_from(&self, graph: &DependencyGraph, seeds: Vec<String>) -> HashSet<String> {
        let mut visited: HashSet<String> = seeds.iter().cloned().collect();
        let mut pending = seeds;
        while let Some(reference) = pending.pop() {
            for child in graph.direct_dependencies_of(&reference) {
                if visited.insert(child.clone()) {
                    pending.push(child.clone());
                }
            }
        }
        visited
    }
}
