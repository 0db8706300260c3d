use std::fmt;

use crate::shared::{GraphError, Result};

/// Package ecosystems with a registered dependency parser.
///
/// Gradle projects share the `maven` purl type because their artifacts live
/// in Maven repositories; everything else maps one-to-one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ecosystem {
    Maven,
    Gradle,
    Npm,
    Golang,
    Python,
}

impl Ecosystem {
    /// The purl `type` component used in canonical coordinate strings.
    pub fn purl_type(self) -> &'static str {
        match self {
            Ecosystem::Maven | Ecosystem::Gradle => "maven",
            Ecosystem::Npm => "npm",
            Ecosystem::Golang => "golang",
            Ecosystem::Python => "pypi",
        }
    }

    /// Resolve an ecosystem from a manifest file name.
    pub fn from_manifest(file_name: &str) -> Result<Self> {
        match file_name {
            "pom.xml" => Ok(Ecosystem::Maven),
            "build.gradle" | "build.gradle.kts" => Ok(Ecosystem::Gradle),
            "package.json" => Ok(Ecosystem::Npm),
            "go.mod" => Ok(Ecosystem::Golang),
            "requirements.txt" => Ok(Ecosystem::Python),
            other => Err(GraphError::UnsupportedEcosystem {
                name: other.to_string(),
            }),
        }
    }

    /// The edge-admission policy the tree parser applies for this ecosystem.
    ///
    /// Maven tree output carries scope qualifiers and edges touching a
    /// test-scoped endpoint are dropped; Gradle output is pre-filtered by
    /// configuration so everything is kept.
    pub fn scope_edge_policy(self) -> ScopeEdgePolicy {
        match self {
            Ecosystem::Maven => ScopeEdgePolicy::ExcludeTest,
            _ => ScopeEdgePolicy::IncludeAll,
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ecosystem::Maven => "maven",
            Ecosystem::Gradle => "gradle",
            Ecosystem::Npm => "npm",
            Ecosystem::Golang => "golang",
            Ecosystem::Python => "python",
        };
        write!(f, "{}", name)
    }
}

/// Per-ecosystem scope filtering applied when the tree parser emits edges.
///
/// An explicit configuration value rather than conditionals scattered per
/// ecosystem; the component set is unaffected either way, only the emitted
/// dependency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeEdgePolicy {
    /// Drop edges where either endpoint carries `scope=test`.
    ExcludeTest,
    /// Keep every parsed edge.
    IncludeAll,
}
