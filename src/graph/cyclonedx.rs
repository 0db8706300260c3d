use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::graph::component::Component;
use crate::graph::dependency_graph::DependencyGraph;
use crate::shared::{GraphError, Result};

const BOM_FORMAT: &str = "CycloneDX";
const SPEC_VERSION: &str = "1.4";

/// CycloneDX 1.4 BOM wire model. Derives Deserialize as well so a serialized
/// graph's `dependencies` section can be read back into an adjacency relation.
#[derive(Debug, Serialize, Deserialize)]
pub struct Bom {
    #[serde(rename = "bomFormat")]
    pub bom_format: String,
    #[serde(rename = "specVersion")]
    pub spec_version: String,
    pub version: u32,
    #[serde(rename = "serialNumber", skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    pub metadata: Metadata,
    pub components: Vec<BomComponent>,
    pub dependencies: Vec<BomDependency>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Metadata {
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<BomComponent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomComponent {
    #[serde(rename = "bom-ref")]
    pub bom_ref: String,
    #[serde(rename = "type")]
    pub component_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub purl: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomDependency {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(rename = "dependsOn", default)]
    pub depends_on: Vec<String>,
}

impl Bom {
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let root_ref = graph.root_ref();
        let metadata_component = root_ref
            .as_deref()
            .and_then(|reference| graph.component_for(reference))
            .map(component_to_bom);
        Bom {
            bom_format: BOM_FORMAT.to_string(),
            spec_version: SPEC_VERSION.to_string(),
            version: 1,
            serial_number: Some(format!("urn:uuid:{}", Uuid::new_v4())),
            metadata: Metadata {
                timestamp: Utc::now().to_rfc3339(),
                component: metadata_component,
            },
            components: graph.components().iter().map(component_to_bom).collect(),
            dependencies: graph
                .dependencies()
                .iter()
                .map(|entry| BomDependency {
                    reference: entry.reference.clone(),
                    depends_on: entry.depends_on.clone(),
                })
                .collect(),
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| GraphError::Serialization {
            details: e.to_string(),
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GraphError::Serialization {
            details: e.to_string(),
        })
    }

    /// The adjacency relation encoded by the `dependencies` section.
    pub fn adjacency(&self) -> HashMap<String, Vec<String>> {
        self.dependencies
            .iter()
            .map(|d| (d.reference.clone(), d.depends_on.clone()))
            .collect()
    }
}

fn component_to_bom(component: &Component) -> BomComponent {
    let reference = component.bom_ref();
    BomComponent {
        bom_ref: reference.clone(),
        component_type: component.kind().as_cyclonedx().to_string(),
        name: component.name().to_string(),
        group: component.group().map(str::to_string),
        version: match component.version() {
            "" => None,
            version => Some(version.to_string()),
        },
        purl: reference,
    }
}
