//! JSON export implementation.
//!
//! Exports the explored graph in JSON format for machine-readable output.

use super::{ExportData, Exporter};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable dependency edge for JSON output.
#[derive(Serialize)]
struct JsonDependency {
    coordinate: String,
    version: String,
}

/// Serializable graph node for JSON output.
#[derive(Serialize)]
struct JsonNode {
    coordinate: String,
    dependencies: Vec<JsonDependency>,
}

/// Serializable cycle info for JSON output.
#[derive(Serialize)]
struct JsonCycle {
    packages: Vec<String>,
    path: String,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    nodes: usize,
    edges: usize,
    circular_dependencies: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport {
    root: String,
    max_depth: usize,
    summary: JsonSummary,
    nodes: Vec<JsonNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    circular_dependencies: Vec<JsonCycle>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()> {
        let nodes: Vec<JsonNode> = data
            .graph
            .nodes()
            .map(|node| JsonNode {
                coordinate: node.coordinate.to_string(),
                dependencies: node
                    .edges
                    .iter()
                    .map(|edge| JsonDependency {
                        coordinate: edge.to.to_string(),
                        version: edge.version.clone(),
                    })
                    .collect(),
            })
            .collect();

        let circular_dependencies: Vec<JsonCycle> = data
            .graph
            .detect_cycles()
            .iter()
            .map(|c| JsonCycle {
                packages: c.nodes.iter().map(ToString::to_string).collect(),
                path: c.cycle_path(),
            })
            .collect();

        let export = JsonExport {
            root: data.root.to_string(),
            max_depth: data.max_depth,
            summary: JsonSummary {
                nodes: data.graph.node_count(),
                edges: data.graph.edge_count(),
                circular_dependencies: circular_dependencies.len(),
            },
            nodes,
            circular_dependencies,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyGraph;
    use crate::parser::{Dependency, PackageCoordinate};

    fn export_value(root: &PackageCoordinate, graph: &DependencyGraph) -> serde_json::Value {
        let mut output = Vec::new();
        JsonExporter
            .export(&ExportData::new(root, graph, 3), &mut output)
            .unwrap();
        serde_json::from_slice(&output).unwrap()
    }

    #[test]
    fn test_json_export_basic() {
        let root = PackageCoordinate::new("com.example", "my-app");
        let mut graph = DependencyGraph::new();
        graph.insert_dependencies(
            root.clone(),
            &[
                Dependency::new("junit", "junit", "4.13.2"),
                Dependency::new("org.slf4j", "slf4j-api", "1.7.36"),
            ],
        );
        graph.insert(PackageCoordinate::new("junit", "junit"), Vec::new());

        let parsed = export_value(&root, &graph);

        assert_eq!(parsed["root"], "com.example:my-app");
        assert_eq!(parsed["max_depth"], 3);
        assert_eq!(parsed["summary"]["nodes"], 2);
        assert_eq!(parsed["summary"]["edges"], 2);
        assert_eq!(parsed["nodes"][0]["dependencies"][1]["coordinate"], "org.slf4j:slf4j-api");
        assert_eq!(parsed["nodes"][0]["dependencies"][1]["version"], "1.7.36");
        assert!(parsed.get("circular_dependencies").is_none());
    }

    #[test]
    fn test_json_export_with_cycles() {
        let x = PackageCoordinate::new("x", "x");
        let mut graph = DependencyGraph::new();
        graph.insert_dependencies(x.clone(), &[Dependency::new("y", "y", "1.0")]);
        graph.insert_dependencies(
            PackageCoordinate::new("y", "y"),
            &[Dependency::new("x", "x", "1.0")],
        );

        let parsed = export_value(&x, &graph);

        assert_eq!(parsed["summary"]["circular_dependencies"], 1);
        assert_eq!(parsed["circular_dependencies"][0]["path"], "x:x -> y:y -> x:x");
    }
}
