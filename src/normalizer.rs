use std::collections::BTreeMap;

use crate::coordinate::{Coordinate, WILDCARD_VERSION};
use crate::ecosystem::Ecosystem;
use crate::shared::{GraphError, Result};

/// Free-form text restated by the Maven tree tool when a printed artifact
/// lost conflict resolution; the version after the phrase is the one that won.
const CONFLICT_MARKER: &str = "omitted for conflict with";

/// Turns ecosystem-specific dependency tokens into canonical coordinates.
///
/// All context is instance-local so that concurrent analyses never share
/// state: the resolved main-module version for Go roots and any extra
/// qualifiers (e.g. `goos`/`goarch` from the environment collaborator) live
/// on the normalizer, not in globals.
#[derive(Debug, Clone)]
pub struct Normalizer {
    ecosystem: Ecosystem,
    context_version: String,
    qualifiers: BTreeMap<String, String>,
}

impl Normalizer {
    pub fn new(ecosystem: Ecosystem) -> Self {
        let mut qualifiers = BTreeMap::new();
        if ecosystem == Ecosystem::Golang {
            qualifiers.insert("type".to_string(), "module".to_string());
        }
        Self {
            ecosystem,
            context_version: "v0.0.0".to_string(),
            qualifiers,
        }
    }

    /// Set the opaque version string supplied by the version-inference
    /// collaborator, substituted when a root token carries no version.
    pub fn with_context_version(mut self, version: impl Into<String>) -> Self {
        self.context_version = version.into();
        self
    }

    pub fn with_qualifier(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.qualifiers.insert(key.into(), value.into());
        self
    }

    pub fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    pub fn normalize(&self, raw: &str) -> Result<Coordinate> {
        match self.ecosystem {
            Ecosystem::Maven | Ecosystem::Gradle => self.maven_tree_line(raw),
            Ecosystem::Golang => self.golang_token(raw),
            Ecosystem::Npm => self.npm_token(raw),
            Ecosystem::Python => self.pypi_requirement(raw),
        }
    }

    /// Parse one line of Maven/Gradle "dependency tree" output.
    ///
    /// Root lines (starting with a word character) are plain
    /// `group:artifact:packaging:version` splits. Nested lines are stripped of
    /// their tree marker, scope-coerced (`runtime`/`provided` mean "resolved,
    /// not test" and become `compile`), truncated after the scope token and
    /// split on `:`. Six segments mean a classifier is present and folds into
    /// the version. The conflict marker overrides the printed version with the
    /// conflict-resolved one so a single resolved artifact never yields two
    /// near-identical nodes.
    fn maven_tree_line(&self, raw: &str) -> Result<Coordinate> {
        if starts_with_word_char(raw) {
            let parts: Vec<&str> = raw.trim().split(':').collect();
            if parts.len() < 4 {
                return Err(GraphError::malformed(
                    raw,
                    "root line must have group:artifact:packaging:version segments",
                ));
            }
            return Ok(self.apply_context_qualifiers(Coordinate::new(
                self.ecosystem,
                Some(parts[0].to_string()),
                parts[1],
                parts[3],
            )));
        }

        let dash = raw
            .find('-')
            .ok_or_else(|| GraphError::malformed(raw, "missing tree-drawing marker"))?;
        let mut dependency = raw[dash + 1..].trim();
        if let Some(stripped) = dependency.strip_prefix('(') {
            dependency = stripped;
        }
        let dependency = dependency
            .replace(":runtime", ":compile")
            .replace(":provided", ":compile");

        let compile_idx = dependency.find(":compile");
        let test_idx = dependency.find(":test");
        let end = match (compile_idx, test_idx) {
            (Some(c), Some(t)) => c.max(t),
            (Some(c), None) => c,
            (None, Some(t)) => t,
            (None, None) => {
                return Err(GraphError::malformed(raw, "missing scope token"));
            }
        };
        let scope_len = if compile_idx.is_some() {
            ":compile".len()
        } else {
            ":test".len()
        };
        let dependency = &dependency[..(end + scope_len).min(dependency.len())];

        let parts: Vec<&str> = dependency.split(':').collect();
        let (group, artifact, mut version) = match parts.len() {
            // group:artifact:packaging:version:scope
            5 => (parts[0], parts[1], parts[3].to_string()),
            // group:artifact:packaging:classifier:version:scope, the
            // classifier folds into the version
            6 => (parts[0], parts[1], format!("{}-{}", parts[4], parts[3])),
            n => {
                return Err(GraphError::malformed(
                    raw,
                    format!("expected 5 or 6 colon-separated segments, found {}", n),
                ));
            }
        };

        if let Some(idx) = raw.find(CONFLICT_MARKER) {
            version = raw[idx + CONFLICT_MARKER.len()..]
                .replace(')', "")
                .trim()
                .to_string();
        }

        let scope = parts[parts.len() - 1];
        let mut coordinate =
            Coordinate::new(self.ecosystem, Some(group.to_string()), artifact, version);
        if scope != "*" {
            coordinate = coordinate.with_qualifier("scope", scope);
        }
        Ok(self.apply_context_qualifiers(coordinate))
    }

    /// Parse a Go `module@version` token. The path portion before the final
    /// `/` is the namespace; a token without a version (the main module in a
    /// `go mod graph` edge list) gets the context version.
    fn golang_token(&self, raw: &str) -> Result<Coordinate> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(GraphError::malformed(raw, "empty module token"));
        }
        let (namespace, rest) = match token.rfind('/') {
            Some(idx) => (Some(token[..idx].to_string()), &token[idx + 1..]),
            None => (None, token),
        };
        let (name, version) = match rest.split_once('@') {
            Some((name, version)) if !version.is_empty() => (name, version.to_string()),
            Some((name, _)) => (name, self.context_version.clone()),
            None => (rest, self.context_version.clone()),
        };
        if name.is_empty() {
            return Err(GraphError::malformed(raw, "module token has no name"));
        }
        Ok(self.apply_context_qualifiers(Coordinate::new(
            self.ecosystem,
            namespace,
            name,
            version,
        )))
    }

    /// Parse an npm `name@version` token; scoped names keep the prefix before
    /// the last `/` as namespace.
    fn npm_token(&self, raw: &str) -> Result<Coordinate> {
        let token = raw.trim();
        let at = token
            .rfind('@')
            .filter(|&idx| idx > 0)
            .ok_or_else(|| GraphError::malformed(raw, "expected name@version"))?;
        let (name_part, version) = (&token[..at], &token[at + 1..]);
        if version.is_empty() {
            return Err(GraphError::malformed(raw, "expected name@version"));
        }
        let (namespace, name) = match name_part.rfind('/') {
            Some(idx) => (
                Some(name_part[..idx].to_string()),
                &name_part[idx + 1..],
            ),
            None => (None, name_part),
        };
        Ok(self.apply_context_qualifiers(Coordinate::new(
            self.ecosystem,
            namespace,
            name,
            version,
        )))
    }

    /// Parse a pip requirement entry. The name is everything before the first
    /// version operator; an unpinned requirement gets the wildcard version.
    fn pypi_requirement(&self, raw: &str) -> Result<Coordinate> {
        const OPERATORS: [&str; 6] = ["==", ">=", "<=", "<", ">", "="];
        let token = raw.trim();
        if token.is_empty() {
            return Err(GraphError::malformed(raw, "empty requirement"));
        }
        let mut split = None;
        'scan: for (idx, _) in token.char_indices() {
            for op in OPERATORS {
                if token[idx..].starts_with(op) {
                    split = Some((idx, op.len()));
                    break 'scan;
                }
            }
        }
        let (name, version) = match split {
            Some((idx, op_len)) => (
                token[..idx].trim(),
                token[idx + op_len..].trim().to_string(),
            ),
            None => (token, WILDCARD_VERSION.to_string()),
        };
        if name.is_empty() {
            return Err(GraphError::malformed(raw, "requirement has no name"));
        }
        Ok(self.apply_context_qualifiers(Coordinate::new(
            self.ecosystem,
            None,
            name,
            version,
        )))
    }

    fn apply_context_qualifiers(&self, mut coordinate: Coordinate) -> Coordinate {
        for (key, value) in &self.qualifiers {
            coordinate = coordinate.with_qualifier(key.clone(), value.clone());
        }
        coordinate
    }
}

/// Indentation depth of a Maven/Gradle tree line: a blank line is the
/// "no more nodes" sentinel, a root-looking line is depth 0, anything else is
/// derived from the position of the first tree-drawing `-`.
pub fn line_depth(line: &str) -> i32 {
    if line.trim().is_empty() {
        return -1;
    }
    if starts_with_word_char(line) {
        return 0;
    }
    let dash = line
        .chars()
        .position(|c| c == '-')
        .map(|idx| idx as i32)
        .unwrap_or(-1);
    (dash - 1) / 3 + 1
}

fn starts_with_word_char(line: &str) -> bool {
    line.chars()
        .next()
        .map(|c| c.is_alphanumeric() || c == '_')
        .unwrap_or(false)
}
