use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::coordinate::Coordinate;
use crate::graph::component::{Component, ComponentKind};
use crate::graph::cyclonedx::Bom;
use crate::shared::Result;

/// One entry of the "depends on" relation: a source bom-ref and the ordered
/// refs it directly depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyEntry {
    pub reference: String,
    pub depends_on: Vec<String>,
}

/// The canonical in-memory SBOM: a root component, a deduplicated component
/// set keyed by bom-ref and a direct-dependency adjacency relation.
///
/// Components and dependency entries keep insertion order for stable
/// serialization; ref→index maps make lookups cheap. Cycles are a legal graph
/// shape and every consuming algorithm must tolerate them. Created once per
/// manifest analysis, populated by exactly one parser, then filtered,
/// serialized and discarded.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    root: Option<Coordinate>,
    components: Vec<Component>,
    component_index: HashMap<String, usize>,
    dependencies: Vec<DependencyEntry>,
    dependency_index: HashMap<String, usize>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root component and seed its (initially empty) dependency
    /// entry. The root also appears in the component list, with ROOT kind.
    pub fn add_root(&mut self, coordinate: Coordinate) {
        let reference = coordinate.to_string();
        self.root = Some(coordinate.clone());
        if !self.component_index.contains_key(&reference) {
            self.component_index
                .insert(reference.clone(), self.components.len());
            self.components.push(Component::root(coordinate));
        }
        self.ensure_dependency_entry(&reference);
    }

    pub fn root(&self) -> Option<&Coordinate> {
        self.root.as_ref()
    }

    /// Record that `source` directly depends on `target`. Idempotent: the
    /// same pair twice leaves the graph unchanged, and existing components
    /// and entries are reused rather than duplicated. Both endpoints end up
    /// in the component set with their own dependency entry so every
    /// referenced node stays traversable.
    pub fn add_dependency(&mut self, source: &Coordinate, target: &Coordinate) {
        let source_ref = self.ensure_component(source);
        let target_ref = self.ensure_component(target);
        self.ensure_dependency_entry(&target_ref);
        let idx = self.ensure_dependency_entry(&source_ref);
        let depends_on = &mut self.dependencies[idx].depends_on;
        if !depends_on.contains(&target_ref) {
            depends_on.push(target_ref);
        }
    }

    /// Insert a coordinate as a node without recording any edge. Used for
    /// dependencies whose edges are excluded by scope policy but which still
    /// belong in the component list.
    pub fn add_component(&mut self, coordinate: &Coordinate) {
        let reference = self.ensure_component(coordinate);
        self.ensure_dependency_entry(&reference);
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn dependencies(&self) -> &[DependencyEntry] {
        &self.dependencies
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.component_index.contains_key(reference)
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// The refs `reference` directly depends on, empty when unknown.
    pub fn direct_dependencies_of(&self, reference: &str) -> &[String] {
        self.dependency_index
            .get(reference)
            .map(|&idx| self.dependencies[idx].depends_on.as_slice())
            .unwrap_or(&[])
    }

    /// Drop the synthetic root inserted for ecosystems whose manifest has no
    /// real root element, together with its dependency entry. Called after
    /// population, before serialization.
    pub fn remove_root_component(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };
        let mut removed = HashSet::with_capacity(1);
        removed.insert(root.to_string());
        self.components.retain(|c| !removed.contains(&c.bom_ref()));
        self.dependencies.retain(|d| !removed.contains(&d.reference));
        self.rebuild_indices();
    }

    /// Remove every component whose ref is in `refs`, every dependency entry
    /// they own, and every nested occurrence in remaining `dependsOn` lists.
    pub(crate) fn remove_refs(&mut self, refs: &HashSet<String>) {
        if refs.is_empty() {
            return;
        }
        debug!(count = refs.len(), "removing ignored refs from graph");
        self.components.retain(|c| !refs.contains(&c.bom_ref()));
        self.dependencies.retain(|d| !refs.contains(&d.reference));
        for entry in &mut self.dependencies {
            entry.depends_on.retain(|r| !refs.contains(r));
        }
        if let Some(root) = &self.root {
            if refs.contains(&root.to_string()) {
                self.root = None;
            }
        }
        self.rebuild_indices();
    }

    /// Render the graph as a CycloneDX BOM value.
    pub fn to_bom(&self) -> Bom {
        Bom::from_graph(self)
    }

    /// Serialize to the CycloneDX JSON wire format.
    pub fn to_json_string(&self) -> Result<String> {
        self.to_bom().to_json_string()
    }

    pub(crate) fn root_ref(&self) -> Option<String> {
        self.root.as_ref().map(Coordinate::to_string)
    }

    pub(crate) fn component_for(&self, reference: &str) -> Option<&Component> {
        self.component_index
            .get(reference)
            .map(|&idx| &self.components[idx])
    }

    fn ensure_component(&mut self, coordinate: &Coordinate) -> String {
        let reference = coordinate.to_string();
        if !self.component_index.contains_key(&reference) {
            let kind = match &self.root {
                Some(root) if root.to_string() == reference => ComponentKind::Root,
                _ => ComponentKind::Library,
            };
            let component = match kind {
                ComponentKind::Root => Component::root(coordinate.clone()),
                ComponentKind::Library => Component::library(coordinate.clone()),
            };
            self.component_index
                .insert(reference.clone(), self.components.len());
            self.components.push(component);
        }
        reference
    }

    fn ensure_dependency_entry(&mut self, reference: &str) -> usize {
        if let Some(&idx) = self.dependency_index.get(reference) {
            return idx;
        }
        let idx = self.dependencies.len();
        self.dependency_index.insert(reference.to_string(), idx);
        self.dependencies.push(DependencyEntry {
            reference: reference.to_string(),
            depends_on: Vec::new(),
        });
        idx
    }

    fn rebuild_indices(&mut self) {
        self.component_index = self
            .components
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.bom_ref(), idx))
            .collect();
        self.dependency_index = self
            .dependencies
            .iter()
            .enumerate()
            .map(|(idx, d)| (d.reference.clone(), idx))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecosystem::Ecosystem;

    fn coord(name: &str, version: &str) -> Coordinate {
        Coordinate::new(Ecosystem::Maven, Some("g".to_string()), name, version)
    }

    #[test]
    fn test_add_root_seeds_empty_entry() {
        let mut graph = DependencyGraph::new();
        graph.add_root(coord("app", "1.0"));

        assert_eq!(graph.component_count(), 1);
        assert_eq!(graph.components()[0].kind(), ComponentKind::Root);
        assert_eq!(graph.dependencies().len(), 1);
        assert!(graph.dependencies()[0].depends_on.is_empty());
    }

    #[test]
    fn test_add_dependency_is_idempotent() {
        let mut graph = DependencyGraph::new();
        let a = coord("a", "1.0");
        let b = coord("b", "2.0");
        graph.add_root(a.clone());
        graph.add_dependency(&a, &b);
        graph.add_dependency(&a, &b);

        assert_eq!(graph.component_count(), 2);
        assert_eq!(
            graph.direct_dependencies_of(&a.to_string()).to_vec(),
            vec![b.to_string()]
        );
        // target entry exists and is traversable even without outgoing edges
        assert!(graph.contains(&b.to_string()));
        assert!(graph.direct_dependencies_of(&b.to_string()).is_empty());
    }

    #[test]
    fn test_add_dependency_reuses_existing_source() {
        let mut graph = DependencyGraph::new();
        let a = coord("a", "1.0");
        graph.add_root(a.clone());
        graph.add_dependency(&a, &coord("b", "1.0"));
        graph.add_dependency(&a, &coord("c", "1.0"));

        assert_eq!(graph.dependencies().len(), 3);
        assert_eq!(graph.direct_dependencies_of(&a.to_string()).len(), 2);
    }

    #[test]
    fn test_root_reappearing_as_source_keeps_root_kind() {
        let mut graph = DependencyGraph::new();
        let a = coord("a", "1.0");
        graph.add_root(a.clone());
        graph.add_dependency(&a, &coord("b", "1.0"));

        let root = graph.component_for(&a.to_string()).unwrap();
        assert_eq!(root.kind(), ComponentKind::Root);
    }

    #[test]
    fn test_cycle_is_representable() {
        let mut graph = DependencyGraph::new();
        let a = coord("a", "1.0");
        let b = coord("b", "1.0");
        graph.add_root(a.clone());
        graph.add_dependency(&a, &b);
        graph.add_dependency(&b, &a);

        assert_eq!(graph.component_count(), 2);
        assert_eq!(
            graph.direct_dependencies_of(&b.to_string()).to_vec(),
            vec![a.to_string()]
        );
    }

    #[test]
    fn test_add_component_records_no_edge() {
        let mut graph = DependencyGraph::new();
        let a = coord("a", "1.0");
        graph.add_root(a.clone());
        graph.add_component(&coord("test-only", "1.0"));

        assert_eq!(graph.component_count(), 2);
        assert!(graph.direct_dependencies_of(&a.to_string()).is_empty());
    }

    #[test]
    fn test_remove_root_component() {
        let mut graph = DependencyGraph::new();
        let root = Coordinate::synthetic_root(Ecosystem::Python);
        let dep = Coordinate::new(Ecosystem::Python, None, "requests", "2.31.0");
        graph.add_root(root.clone());
        graph.add_dependency(&root, &dep);
        graph.remove_root_component();

        assert!(graph.root().is_none());
        assert!(!graph.contains(&root.to_string()));
        assert!(graph.contains(&dep.to_string()));
    }

    #[test]
    fn test_remove_refs_clears_nested_occurrences() {
        let mut graph = DependencyGraph::new();
        let a = coord("a", "1.0");
        let b = coord("b", "1.0");
        let c = coord("c", "1.0");
        graph.add_root(a.clone());
        graph.add_dependency(&a, &b);
        graph.add_dependency(&a, &c);

        let mut refs = HashSet::new();
        refs.insert(b.to_string());
        graph.remove_refs(&refs);

        assert!(!graph.contains(&b.to_string()));
        assert_eq!(
            graph.direct_dependencies_of(&a.to_string()).to_vec(),
            vec![c.to_string()]
        );
    }
}
