//! Canonicalization of `gradle dependencies` output into the Maven-style
//! tree-line shape the shared tree parser understands.

use std::sync::OnceLock;

use regex::Regex;

/// Rewrites applied to every line of one configuration section, in order:
/// collapse the 4-wide tree markers to the Maven 2-wide shape, pin resolved
/// versions (`g:a:1.0 -> 2.0` keeps `2.0`), insert the `jar` packaging
/// segment, drop the `(n)` not-resolved marker and append a `:compile` scope.
pub fn canonicalize_tree_lines(lines: &[String]) -> Vec<String> {
    static RESOLVED: OnceLock<Regex> = OnceLock::new();
    static PACKAGING: OnceLock<Regex> = OnceLock::new();
    static NOT_RESOLVED: OnceLock<Regex> = OnceLock::new();
    let resolved = RESOLVED.get_or_init(|| Regex::new(r":(.*):(.*) -> (.*)$").expect("static pattern"));
    let packaging =
        PACKAGING.get_or_init(|| Regex::new(r"(.*):(.*):(.*)$").expect("static pattern"));
    let not_resolved =
        NOT_RESOLVED.get_or_init(|| Regex::new(r" \(n\)$").expect("static pattern"));

    lines
        .iter()
        .map(|line| {
            let line = line.replace("---", "-").replace("    ", "  ");
            let line = resolved.replace(&line, ":$1:$3").into_owned();
            let line = packaging.replace(&line, "$1:$2:jar:$3").into_owned();
            let line = not_resolved.replace(&line, "").into_owned();
            format!("{}:compile", line)
        })
        .collect()
}

/// Extract the lines of one configuration section (`runtimeClasspath`,
/// `api`, ...): everything after the line starting with the marker, up to the
/// first blank line.
pub fn extract_configuration_lines(output: &str, start_marker: &str) -> Vec<String> {
    let mut extracted = Vec::new();
    let mut started = false;
    for line in output.lines() {
        if !started {
            if line.starts_with(start_marker) {
                started = true;
            }
            continue;
        }
        if line.trim().is_empty() {
            break;
        }
        extracted.push(line.to_string());
    }
    extracted
}

/// The project name announced by `Root project '<name>'` in gradle output.
pub fn extract_root_project_name(output: &str) -> Option<String> {
    static ROOT_PROJECT: OnceLock<Regex> = OnceLock::new();
    let pattern = ROOT_PROJECT
        .get_or_init(|| Regex::new(r"Root project '(.+)'").expect("static pattern"));
    output
        .lines()
        .find_map(|line| pattern.captures(line))
        .map(|caps| caps[1].to_string())
}

/// Assemble the root tree line from the project properties
/// (`group`/`version`) and the announced project name.
pub fn root_line(group: &str, name: &str, version: &str) -> String {
    format!("{}:{}:jar:{}", group, name, version)
}

/// Parse `gradle properties` output into key/value pairs (`group: com.acme`).
pub fn extract_properties(output: &str) -> std::collections::HashMap<String, String> {
    let mut properties = std::collections::HashMap::new();
    for line in output.lines() {
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            let value = value.trim();
            if !key.is_empty() && !value.is_empty() {
                properties.insert(key.to_string(), value.to_string());
            }
        }
    }
    properties
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_plain_line() {
        let lines = vec!["+--- org.apache.commons:commons-lang3:3.12.0".to_string()];
        assert_eq!(
            canonicalize_tree_lines(&lines),
            vec!["+- org.apache.commons:commons-lang3:jar:3.12.0:compile".to_string()]
        );
    }

    #[test]
    fn test_canonicalize_resolved_version_rewrite() {
        let lines = vec!["+--- com.google.guava:guava:30.1-jre -> 31.1-jre".to_string()];
        assert_eq!(
            canonicalize_tree_lines(&lines),
            vec!["+- com.google.guava:guava:jar:31.1-jre:compile".to_string()]
        );
    }

    #[test]
    fn test_canonicalize_drops_not_resolved_marker() {
        let lines = vec!["+--- org.slf4j:slf4j-api:2.0.9 (n)".to_string()];
        assert_eq!(
            canonicalize_tree_lines(&lines),
            vec!["+- org.slf4j:slf4j-api:jar:2.0.9:compile".to_string()]
        );
    }

    #[test]
    fn test_canonicalize_narrows_nested_indentation() {
        let lines = vec!["|    +--- g:a:1.0".to_string()];
        assert_eq!(
            canonicalize_tree_lines(&lines),
            vec!["|  +- g:a:jar:1.0:compile".to_string()]
        );
    }

    #[test]
    fn test_extract_configuration_lines_stops_at_blank() {
        let output = "\
runtimeClasspath - Runtime classpath of source set 'main'.
+--- g:a:1.0
|    \\--- g:b:1.0

testRuntimeClasspath - ...
+--- junit:junit:4.13.2
";
        let lines = extract_configuration_lines(output, "runtimeClasspath");
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("g:a:1.0"));
    }

    #[test]
    fn test_extract_configuration_lines_missing_marker() {
        assert!(extract_configuration_lines("nothing here", "runtimeClasspath").is_empty());
    }

    #[test]
    fn test_extract_root_project_name() {
        let output = "Root project 'my-service'\n------------------------------------------------------------\n";
        assert_eq!(extract_root_project_name(output).as_deref(), Some("my-service"));
        assert_eq!(extract_root_project_name("no project line"), None);
    }

    #[test]
    fn test_extract_properties() {
        let output = "group: com.acme\nversion: 1.2.3\nbuildDir: /tmp/build\n";
        let properties = extract_properties(output);
        assert_eq!(properties["group"], "com.acme");
        assert_eq!(properties["version"], "1.2.3");
    }

    #[test]
    fn test_root_line_shape() {
        assert_eq!(root_line("com.acme", "svc", "1.0"), "com.acme:svc:jar:1.0");
    }
}
