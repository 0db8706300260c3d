use std::sync::OnceLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use tracing::debug;

use crate::coordinate::{Coordinate, WILDCARD_VERSION};
use crate::ecosystem::Ecosystem;
use crate::shared::{GraphError, Result};

/// Annotation developers attach to a dependency declaration to exclude the
/// package from analysis. The syntax carrying it differs per manifest format:
/// an XML comment in pom.xml, a line comment elsewhere, a JSON array in
/// package.json.
pub const IGNORE_MARKER: &str = "scaignore";

/// Scans a manifest for ignore annotations and returns the coordinates they
/// designate. Patterns without a resolvable version get the `*` wildcard.
pub struct IgnoreAnnotationExtractor {
    ecosystem: Ecosystem,
}

impl IgnoreAnnotationExtractor {
    pub fn new(ecosystem: Ecosystem) -> Self {
        Self { ecosystem }
    }

    pub fn extract(&self, manifest: &str) -> Result<Vec<Coordinate>> {
        self.extract_with_catalog(manifest, None)
    }

    /// Like `extract`, with an optional Gradle version catalog
    /// (libs.versions.toml) used to resolve `libs.alias` references.
    pub fn extract_with_catalog(
        &self,
        manifest: &str,
        catalog: Option<&str>,
    ) -> Result<Vec<Coordinate>> {
        let found = match self.ecosystem {
            Ecosystem::Maven => self.from_pom(manifest)?,
            Ecosystem::Gradle => self.from_gradle(manifest, catalog)?,
            Ecosystem::Npm => self.from_package_json(manifest)?,
            Ecosystem::Golang => self.from_go_mod(manifest),
            Ecosystem::Python => self.from_requirements(manifest),
        };
        debug!(ecosystem = %self.ecosystem, count = found.len(), "ignore markers extracted");
        Ok(found)
    }

    /// A `<dependency>` element is ignored when it contains an XML comment
    /// whose trimmed text equals the marker. Missing versions and unresolved
    /// `${...}` property references become wildcards.
    fn from_pom(&self, manifest: &str) -> Result<Vec<Coordinate>> {
        let mut reader = Reader::from_str(manifest);
        reader.config_mut().trim_text(true);

        let mut found = Vec::new();
        let mut buf = Vec::new();

        let mut in_dependency = false;
        let mut marked = false;
        let mut current_tag = String::new();
        let mut group_id = String::new();
        let mut artifact_id = String::new();
        let mut version = String::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let name = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                    if name == "dependency" {
                        in_dependency = true;
                        marked = false;
                        group_id.clear();
                        artifact_id.clear();
                        version.clear();
                    }
                    current_tag = name;
                }
                Ok(Event::End(ref e)) => {
                    let name = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                    if name == "dependency" && in_dependency {
                        if marked && !artifact_id.is_empty() {
                            found.push(self.maven_coordinate(&group_id, &artifact_id, &version));
                        }
                        in_dependency = false;
                    }
                    current_tag.clear();
                }
                Ok(Event::Text(ref e)) => {
                    if in_dependency {
                        let text = e.unescape().unwrap_or_default();
                        match current_tag.as_str() {
                            "groupId" => group_id = text.to_string(),
                            "artifactId" => artifact_id = text.to_string(),
                            "version" => version = text.to_string(),
                            _ => {}
                        }
                    }
                }
                Ok(Event::Comment(ref e)) => {
                    if in_dependency {
                        let text = e.unescape().unwrap_or_default();
                        if text.trim() == IGNORE_MARKER {
                            marked = true;
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(GraphError::manifest(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(found)
    }

    fn maven_coordinate(&self, group: &str, artifact: &str, version: &str) -> Coordinate {
        let version = if version.is_empty() || version.starts_with("${") {
            WILDCARD_VERSION
        } else {
            version
        };
        Coordinate::new(self.ecosystem, Some(group.to_string()), artifact, version)
    }

    /// Build-script lines carrying the marker in a `//` or `/* */` comment.
    /// Three declaration shapes are recognized: quoted `group:artifact:version`
    /// shorthand, `group:/name:/version:` map notation, and `libs.alias`
    /// version-catalog references (resolved against the catalog when given).
    fn from_gradle(&self, manifest: &str, catalog: Option<&str>) -> Result<Vec<Coordinate>> {
        static SHORTHAND: OnceLock<Regex> = OnceLock::new();
        static MAP_PART: OnceLock<Regex> = OnceLock::new();
        static CATALOG_REF: OnceLock<Regex> = OnceLock::new();
        let shorthand = SHORTHAND
            .get_or_init(|| Regex::new(r#"['"]([^'":]+):([^'":]+):([^'"]+)['"]"#).expect("static pattern"));
        let map_part = MAP_PART
            .get_or_init(|| Regex::new(r#"(group|name|version):\s*['"]([^'"]*)['"]"#).expect("static pattern"));
        let catalog_ref =
            CATALOG_REF.get_or_init(|| Regex::new(r"libs\.([A-Za-z0-9_.-]+)").expect("static pattern"));

        let mut found = Vec::new();
        for line in manifest.lines() {
            if !line.contains(IGNORE_MARKER) {
                continue;
            }
            let declaration = line
                .split("//")
                .next()
                .unwrap_or("")
                .split("/*")
                .next()
                .unwrap_or("")
                .trim();

            if let Some(caps) = shorthand.captures(declaration) {
                found.push(Coordinate::new(
                    self.ecosystem,
                    Some(caps[1].to_string()),
                    &caps[2],
                    &caps[3],
                ));
                continue;
            }

            let mut group = None;
            let mut name = None;
            let mut version = None;
            for caps in map_part.captures_iter(declaration) {
                match &caps[1] {
                    "group" => group = Some(caps[2].to_string()),
                    "name" => name = Some(caps[2].to_string()),
                    "version" => version = Some(caps[2].to_string()),
                    _ => {}
                }
            }
            if let Some(name) = name {
                found.push(Coordinate::new(
                    self.ecosystem,
                    group,
                    name,
                    version.unwrap_or_else(|| WILDCARD_VERSION.to_string()),
                ));
                continue;
            }

            if let (Some(caps), Some(catalog)) = (catalog_ref.captures(declaration), catalog) {
                if let Some(coordinate) = self.resolve_catalog_alias(&caps[1], catalog)? {
                    found.push(coordinate);
                }
            }
        }
        Ok(found)
    }

    /// Resolve a `libs.foo.bar` reference against a libs.versions.toml
    /// catalog. Gradle normalizes dotted accessors to dashed alias keys.
    fn resolve_catalog_alias(&self, accessor: &str, catalog: &str) -> Result<Option<Coordinate>> {
        let value: toml::Value =
            toml::from_str(catalog).map_err(|e| GraphError::manifest(e.to_string()))?;
        let alias = accessor.replace('.', "-");
        let Some(entry) = value.get("libraries").and_then(|libs| libs.get(&alias)) else {
            return Ok(None);
        };

        // alias = "group:artifact:version" shorthand
        if let Some(gav) = entry.as_str() {
            let parts: Vec<&str> = gav.split(':').collect();
            if parts.len() == 3 {
                return Ok(Some(Coordinate::new(
                    self.ecosystem,
                    Some(parts[0].to_string()),
                    parts[1],
                    parts[2],
                )));
            }
            return Ok(None);
        }

        let Some(module) = entry.get("module").and_then(toml::Value::as_str) else {
            return Ok(None);
        };
        let Some((group, artifact)) = module.split_once(':') else {
            return Ok(None);
        };
        let version = entry
            .get("version")
            .and_then(|v| match v {
                toml::Value::String(s) => Some(s.clone()),
                table => table
                    .get("ref")
                    .and_then(toml::Value::as_str)
                    .and_then(|r| {
                        value
                            .get("versions")
                            .and_then(|versions| versions.get(r))
                            .and_then(toml::Value::as_str)
                            .map(str::to_string)
                    }),
            })
            .unwrap_or_else(|| WILDCARD_VERSION.to_string());

        Ok(Some(Coordinate::new(
            self.ecosystem,
            Some(group.to_string()),
            artifact,
            version,
        )))
    }

    /// package.json carries ignored names as a top-level array under the
    /// marker key. Names only, so every pattern is a wildcard version.
    fn from_package_json(&self, manifest: &str) -> Result<Vec<Coordinate>> {
        let value: serde_json::Value =
            serde_json::from_str(manifest).map_err(|e| GraphError::manifest(e.to_string()))?;
        let Some(names) = value.get(IGNORE_MARKER).and_then(|v| v.as_array()) else {
            return Ok(Vec::new());
        };
        Ok(names
            .iter()
            .filter_map(|v| v.as_str())
            .map(|raw| {
                let (namespace, name) = match raw.rsplit_once('/') {
                    Some((scope, name)) => (Some(scope.to_string()), name),
                    None => (None, raw),
                };
                Coordinate::new(self.ecosystem, namespace, name, WILDCARD_VERSION)
            })
            .collect())
    }

    /// go.mod require lines annotated with `// scaignore`. The module path
    /// and version come straight from the line.
    fn from_go_mod(&self, manifest: &str) -> Vec<Coordinate> {
        let mut found = Vec::new();
        for line in manifest.lines() {
            let Some((declaration, comment)) = line.split_once("//") else {
                continue;
            };
            if comment.trim() != IGNORE_MARKER {
                continue;
            }
            let declaration = declaration.trim();
            let declaration = declaration.strip_prefix("require").unwrap_or(declaration);
            let mut tokens = declaration.split_whitespace();
            let (Some(path), Some(version)) = (tokens.next(), tokens.next()) else {
                continue;
            };
            let (namespace, name) = match path.rsplit_once('/') {
                Some((ns, name)) => (Some(ns.to_string()), name),
                None => (None, path),
            };
            found.push(Coordinate::new(self.ecosystem, namespace, name, version));
        }
        found
    }

    /// requirements.txt lines whose trailing comment is the marker. A pinned
    /// `name==version` requirement yields an exact pattern, anything looser
    /// matches any version.
    fn from_requirements(&self, manifest: &str) -> Vec<Coordinate> {
        static PINNED: OnceLock<Regex> = OnceLock::new();
        static NAME: OnceLock<Regex> = OnceLock::new();
        let pinned =
            PINNED.get_or_init(|| Regex::new(r"^([A-Za-z0-9_.-]+)\s*==\s*(\S+)$").expect("static pattern"));
        let name_only = NAME.get_or_init(|| Regex::new(r"^([A-Za-z0-9_.-]+)").expect("static pattern"));

        let mut found = Vec::new();
        for line in manifest.lines() {
            let Some((requirement, comment)) = line.split_once('#') else {
                continue;
            };
            if comment.trim() != IGNORE_MARKER {
                continue;
            }
            let requirement = requirement.trim();
            if let Some(caps) = pinned.captures(requirement) {
                found.push(Coordinate::new(self.ecosystem, None, &caps[1], &caps[2]));
            } else if let Some(caps) = name_only.captures(requirement) {
                found.push(Coordinate::new(
                    self.ecosystem,
                    None,
                    &caps[1],
                    WILDCARD_VERSION,
                ));
            }
        }
        found
    }
}
