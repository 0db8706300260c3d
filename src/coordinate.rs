use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::ecosystem::Ecosystem;

/// Sentinel version meaning "any concrete version of this package".
pub const WILDCARD_VERSION: &str = "*";

/// Canonical identifier of a dependency: ecosystem, optional namespace,
/// name, version and an ordered qualifier map.
///
/// Equality and hashing cover ecosystem (by purl type), namespace, name and
/// version only; qualifiers such as `scope=test` never split identity.
#[derive(Debug, Clone)]
pub struct Coordinate {
    ecosystem: Ecosystem,
    namespace: Option<String>,
    name: String,
    version: String,
    qualifiers: BTreeMap<String, String>,
}

impl Coordinate {
    pub fn new(
        ecosystem: Ecosystem,
        namespace: Option<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            ecosystem,
            namespace: namespace.filter(|ns| !ns.is_empty()),
            name: name.into(),
            version: version.into(),
            qualifiers: BTreeMap::new(),
        }
    }

    /// A placeholder root for ecosystems whose manifest has no real root
    /// element (pip requirements.txt). Carries no version and is removed
    /// from the graph before serialization.
    pub fn synthetic_root(ecosystem: Ecosystem) -> Self {
        Self::new(ecosystem, None, "root", "")
    }

    pub fn with_qualifier(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.qualifiers.insert(key.into(), value.into());
        self
    }

    /// Drop one qualifier. Parsers carry transient qualifiers (Maven scope)
    /// through normalization and strip them before the coordinate becomes a
    /// graph node, so bom-refs stay scope-free.
    pub fn without_qualifier(mut self, key: &str) -> Self {
        self.qualifiers.remove(key);
        self
    }

    pub fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn qualifier(&self, key: &str) -> Option<&str> {
        self.qualifiers.get(key).map(String::as_str)
    }

    pub fn is_wildcard_version(&self) -> bool {
        self.version == WILDCARD_VERSION
    }

    /// Wildcard-aware match used by ignore filtering: identical to equality
    /// except that a `*` version on either side matches any concrete version
    /// of the same package.
    pub fn matches(&self, other: &Coordinate) -> bool {
        self.ecosystem.purl_type() == other.ecosystem.purl_type()
            && self.namespace == other.namespace
            && self.name == other.name
            && (self.version == other.version
                || self.version == WILDCARD_VERSION
                || other.version == WILDCARD_VERSION)
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.ecosystem.purl_type() == other.ecosystem.purl_type()
            && self.namespace == other.namespace
            && self.name == other.name
            && self.version == other.version
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ecosystem.purl_type().hash(state);
        self.namespace.hash(state);
        self.name.hash(state);
        self.version.hash(state);
    }
}

impl fmt::Display for Coordinate {
    /// Canonical coordinate string:
    /// `pkg:<type>/<namespace>/<name>@<version>?<k=v&...>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pkg:{}", self.ecosystem.purl_type())?;
        if let Some(namespace) = &self.namespace {
            write!(f, "/{}", namespace)?;
        }
        write!(f, "/{}", self.name)?;
        if !self.version.is_empty() {
            write!(f, "@{}", self.version)?;
        }
        if !self.qualifiers.is_empty() {
            let rendered: Vec<String> = self
                .qualifiers
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, "?{}", rendered.join("&"))?;
        }
        Ok(())
    }
}
