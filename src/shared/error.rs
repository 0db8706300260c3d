use thiserror::Error;

/// Errors raised while building or serializing a dependency graph.
///
/// Uses thiserror to derive Display and Error traits automatically.
/// All variants are local to one manifest analysis; none of them leave
/// a partially constructed graph behind.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A dependency line or token could not be decomposed into a coordinate.
    /// Graph construction is aborted, partial graphs are never returned.
    #[error("cannot parse dependency into a coordinate from \"{line}\": {details}")]
    MalformedCoordinate { line: String, details: String },

    /// The requested ecosystem has no registered parser.
    #[error("no dependency parser registered for ecosystem \"{name}\"")]
    UnsupportedEcosystem { name: String },

    /// A manifest scanned for ignore markers could not be read as XML/JSON/TOML.
    #[error("failed to scan manifest for ignore markers: {details}")]
    ManifestParse { details: String },

    /// The in-memory graph could not be rendered as CycloneDX JSON.
    #[error("failed to serialize SBOM: {details}")]
    Serialization { details: String },
}

impl GraphError {
    pub fn malformed(line: impl Into<String>, details: impl Into<String>) -> Self {
        GraphError::MalformedCoordinate {
            line: line.into(),
            details: details.into(),
        }
    }

    pub fn manifest(details: impl Into<String>) -> Self {
        GraphError::ManifestParse {
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_coordinate_display() {
        let error = GraphError::malformed(" - junk line", "unexpected token count");
        let display = format!("{}", error);
        assert!(display.contains(" - junk line"));
        assert!(display.contains("unexpected token count"));
    }

    #[test]
    fn test_unsupported_ecosystem_display() {
        let error = GraphError::UnsupportedEcosystem {
            name: "conan".to_string(),
        };
        assert!(format!("{}", error).contains("conan"));
    }

    #[test]
    fn test_manifest_parse_display() {
        let error = GraphError::manifest("invalid XML at byte 42");
        assert!(format!("{}", error).contains("invalid XML at byte 42"));
    }
}
