use crate::coordinate::Coordinate;
use crate::ecosystem::Ecosystem;
use crate::graph::DependencyGraph;
use crate::shared::{GraphError, Result};

/// Parser for Maven dependency trees rendered as dot digraphs
/// (`-DoutputType=dot`): a `digraph "g:a:t:v" {` header naming the root and
/// edge lines of the form `"g:a:t:v" -> "g:b:t:v" ;`.
pub struct DotGraphParser {
    ecosystem: Ecosystem,
}

impl DotGraphParser {
    pub fn new(ecosystem: Ecosystem) -> Self {
        Self { ecosystem }
    }

    pub fn parse(&self, text: &str, graph: &mut DependencyGraph) -> Result<()> {
        for line in text.lines() {
            if let Some(header) = line.trim_start().strip_prefix("digraph") {
                let root_token = header.replace('{', "");
                graph.add_root(self.dot_token(&root_token)?);
            } else if line.trim().ends_with('}') || line.trim().is_empty() {
                // closing brace / padding
            } else {
                let cleaned = line.replace(';', "");
                let parts: Vec<&str> = cleaned.split("->").collect();
                if parts.len() == 2 {
                    let source = self.dot_token(parts[0])?;
                    let target = self.dot_token(parts[1])?;
                    graph.add_dependency(&source, &target);
                }
            }
        }
        Ok(())
    }

    fn dot_token(&self, token: &str) -> Result<Coordinate> {
        let cleaned = token.replace('"', "");
        let parts: Vec<&str> = cleaned.trim().split(':').collect();
        if parts.len() < 4 {
            return Err(GraphError::malformed(token, "invalid dot package format"));
        }
        Ok(Coordinate::new(
            self.ecosystem,
            Some(parts[0].to_string()),
            parts[1],
            parts[3],
        ))
    }
}
