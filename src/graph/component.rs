use crate::coordinate::Coordinate;

/// Whether a node is the analyzed project itself or one of its dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Root,
    Library,
}

impl ComponentKind {
    /// CycloneDX component `type` string.
    pub fn as_cyclonedx(self) -> &'static str {
        match self {
            ComponentKind::Root => "application",
            ComponentKind::Library => "library",
        }
    }
}

/// A deduplicated node of the dependency graph: a coordinate plus its kind.
/// The bom-ref is the canonical coordinate string, so two components with the
/// same coordinate are the same node.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    coordinate: Coordinate,
    kind: ComponentKind,
}

impl Component {
    pub fn root(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            kind: ComponentKind::Root,
        }
    }

    pub fn library(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            kind: ComponentKind::Library,
        }
    }

    pub fn bom_ref(&self) -> String {
        self.coordinate.to_string()
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        self.coordinate.name()
    }

    pub fn group(&self) -> Option<&str> {
        self.coordinate.namespace()
    }

    pub fn version(&self) -> &str {
        self.coordinate.version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecosystem::Ecosystem;

    #[test]
    fn test_kind_serialization_strings() {
        assert_eq!(ComponentKind::Root.as_cyclonedx(), "application");
        assert_eq!(ComponentKind::Library.as_cyclonedx(), "library");
    }

    #[test]
    fn test_bom_ref_is_coordinate_string() {
        let coordinate =
            Coordinate::new(Ecosystem::Maven, Some("com.example".to_string()), "app", "1.0");
        let component = Component::root(coordinate);
        assert_eq!(component.bom_ref(), "pkg:maven/com.example/app@1.0");
        assert_eq!(component.name(), "app");
        assert_eq!(component.group(), Some("com.example"));
        assert_eq!(component.version(), "1.0");
    }
}
