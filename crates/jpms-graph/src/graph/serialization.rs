//! DOT and JSON export of the readability graph.

use serde::{Deserialize, Serialize};

use super::ModuleGraph;
use crate::declaration::ModuleOrigin;
use crate::descriptor::ModuleKind;
use crate::error::{GraphError, Result};
use crate::name::{ModuleName, PackageName};
use crate::readability::EdgeOrigin;

fn escape_label(label: &str) -> String {
    label.replace('"', "\\\"")
}

/// Serializable view of a graph: direct edges plus each module's full
/// readable set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub modules: Vec<ModuleSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSnapshot {
    pub name: ModuleName,
    pub kind: ModuleKind,
    pub origin: ModuleOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub open: bool,
    pub packages: Vec<PackageName>,
    pub reads: Vec<ModuleName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub from: ModuleName,
    pub to: ModuleName,
    pub origin: EdgeOrigin,
    pub transitive: bool,
}

impl ModuleGraph {
    pub fn snapshot(&self) -> GraphSnapshot {
        let modules = self
            .universe
            .iter()
            .map(|(id, d)| ModuleSnapshot {
                name: d.name.clone(),
                kind: d.kind,
                origin: d.origin,
                version: d.version.as_ref().map(ToString::to_string),
                open: d.open,
                packages: d.packages.keys().cloned().collect(),
                reads: self
                    .readable(id)
                    .filter(|m| *m != id)
                    .map(|m| self.name(m).clone())
                    .collect(),
            })
            .collect();

        let edges = self
            .universe
            .ids()
            .flat_map(|id| {
                self.direct_reads(id).iter().map(move |(target, edge)| EdgeSnapshot {
                    from: self.name(id).clone(),
                    to: self.name(*target).clone(),
                    origin: edge.origin,
                    transitive: edge.transitive,
                })
            })
            .collect();

        GraphSnapshot { modules, edges }
    }

    /// Graphviz rendering of the direct read edges. Automatic modules are
    /// dashed, `requires transitive` edges are bold and `--add-reads`
    /// edges dotted.
    pub fn to_dot_format(&self) -> String {
        let mut output = String::from("digraph ModuleGraph {\n");

        for (_, descriptor) in self.universe.iter() {
            output.push_str("    \"");
            output.push_str(&escape_label(descriptor.name.as_str()));
            output.push('"');
            match descriptor.kind {
                ModuleKind::Automatic => output.push_str(" [style=dashed]"),
                ModuleKind::Unnamed => output.push_str(" [shape=box]"),
                ModuleKind::Explicit => {}
            }
            output.push_str(";\n");
        }

        for edge in self.snapshot().edges {
            output.push_str("    \"");
            output.push_str(&escape_label(edge.from.as_str()));
            output.push_str("\" -> \"");
            output.push_str(&escape_label(edge.to.as_str()));
            output.push('"');
            let style = match edge.origin {
                EdgeOrigin::AddReads => Some("style=dotted"),
                EdgeOrigin::Mandated => Some("color=gray"),
                _ if edge.transitive => Some("style=bold"),
                _ => None,
            };
            if let Some(style) = style {
                output.push_str(" [");
                output.push_str(style);
                output.push(']');
            }
            output.push_str(";\n");
        }

        output.push_str("}\n");
        output
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| GraphError::Serialization(e.to_string()))
    }
}
