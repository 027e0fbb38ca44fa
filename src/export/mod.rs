//! Renderings of a completed dependency graph.
//!
//! This module provides exporters for the formats the tool can produce:
//! a flat list of direct dependencies, an ASCII tree, a D2 diagram and JSON.
//! Exporters only read the graph; it is never modified after the build.

pub mod d2;
pub mod json;
pub mod list;
pub mod tree;

use crate::graph::DependencyGraph;
use crate::parser::PackageCoordinate;
use std::io::{self, Write};

pub use d2::{serialize_diagram, DiagramSerializer, RenderOutcome};
pub use tree::{render_tree, TreeNode, TreeNodeKind, TreeRenderer};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Numbered list of the root's direct dependencies
    List,
    /// Cycle-safe ASCII tree
    Tree,
    /// D2 node/edge diagram
    D2,
    /// JSON format - machine-readable, full data
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "list" => Ok(ExportFormat::List),
            "tree" => Ok(ExportFormat::Tree),
            "d2" | "diagram" => Ok(ExportFormat::D2),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: list, tree, d2, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::List => write!(f, "list"),
            ExportFormat::Tree => write!(f, "tree"),
            ExportFormat::D2 => write!(f, "d2"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// Data container for export operations.
#[derive(Debug, Clone, Copy)]
pub struct ExportData<'g> {
    /// Package the traversal started from
    pub root: &'g PackageCoordinate,
    /// The completed graph
    pub graph: &'g DependencyGraph,
    /// Depth the graph was built with
    pub max_depth: usize,
}

impl<'g> ExportData<'g> {
    /// Bundles a graph with the settings it was built from.
    pub fn new(root: &'g PackageCoordinate, graph: &'g DependencyGraph, max_depth: usize) -> Self {
        Self {
            root,
            graph,
            max_depth,
        }
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    data: &ExportData<'_>,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::List => list::ListExporter.export(data, writer),
        ExportFormat::Tree => tree::TreeExporter.export(data, writer),
        ExportFormat::D2 => d2::D2Exporter.export(data, writer),
        ExportFormat::Json => json::JsonExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ExportData<'_>) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Dependency;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("list".parse::<ExportFormat>().unwrap(), ExportFormat::List);
        assert_eq!("TREE".parse::<ExportFormat>().unwrap(), ExportFormat::Tree);
        assert_eq!("d2".parse::<ExportFormat>().unwrap(), ExportFormat::D2);
        assert_eq!("diagram".parse::<ExportFormat>().unwrap(), ExportFormat::D2);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("csv".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(format!("{}", ExportFormat::List), "list");
        assert_eq!(format!("{}", ExportFormat::Tree), "tree");
        assert_eq!(format!("{}", ExportFormat::D2), "d2");
        assert_eq!(format!("{}", ExportFormat::Json), "json");
    }

    #[test]
    fn test_export_to_string_every_format() {
        let root = PackageCoordinate::new("a", "a");
        let mut graph = DependencyGraph::new();
        graph.insert_dependencies(root.clone(), &[Dependency::new("b", "b", "1.0")]);
        let data = ExportData::new(&root, &graph, 2);

        for format in [
            ExportFormat::List,
            ExportFormat::Tree,
            ExportFormat::D2,
            ExportFormat::Json,
        ] {
            let output = export_to_string(format, &data).unwrap();
            assert!(output.contains("b:b"), "{format} output: {output}");
        }
    }
}
