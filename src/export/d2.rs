//! D2 diagram output.
//!
//! Nodes are declared first, in graph insertion order, followed by one edge
//! statement per stored edge. Duplicate edges into the same target are kept.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::{ExportData, Exporter};
use crate::graph::DependencyGraph;
use crate::parser::PackageCoordinate;

/// Executable used to turn `.d2` files into images.
pub const D2_PROGRAM: &str = "d2";

/// Serializes graphs into D2 source.
///
/// # Example
///
/// ```
/// use depscope::export::DiagramSerializer;
/// use depscope::graph::DependencyGraph;
/// use depscope::parser::{Dependency, PackageCoordinate};
///
/// let mut graph = DependencyGraph::new();
/// graph.insert_dependencies(PackageCoordinate::new("a", "a"), &[Dependency::new("b", "b", "1.0")]);
///
/// let text = DiagramSerializer::new().serialize(&graph);
/// assert!(text.contains("\"a:a\" -> \"b:b\"\n"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiagramSerializer {
    direction: Option<&'static str>,
}

impl DiagramSerializer {
    /// Creates a serializer with a left-to-right layout.
    pub fn new() -> Self {
        Self {
            direction: Some("right"),
        }
    }

    /// Writes the diagram into `writer`.
    pub fn write<W: Write>(&self, graph: &DependencyGraph, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.serialize(graph).as_bytes())
    }

    /// Returns the diagram as a string.
    pub fn serialize(&self, graph: &DependencyGraph) -> String {
        let mut lines = Vec::new();
        if let Some(direction) = self.direction {
            lines.push(format!("direction: {}", direction));
            lines.push(String::new());
        }

        lines.extend(graph.nodes().map(|node| quote(&node.coordinate)));
        lines.extend(
            graph
                .edges()
                .map(|edge| format!("{} -> {}", quote(&edge.from), quote(&edge.to))),
        );

        let mut text = lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        text
    }
}

fn quote(coordinate: &PackageCoordinate) -> String {
    let escaped = coordinate
        .to_string()
        .replace('\\', "\\\\")
        .replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

/// Serializes `graph` with the default layout.
pub fn serialize_diagram(graph: &DependencyGraph) -> String {
    DiagramSerializer::new().serialize(graph)
}

/// File name used for a root's diagram, e.g. `dependency_graph_junit_junit.d2`.
pub fn diagram_file_name(root: &PackageCoordinate) -> String {
    format!("dependency_graph_{}.d2", root.file_stem())
}

/// Writes the diagram for `root` into `dir` and returns its path.
pub fn write_diagram(
    graph: &DependencyGraph,
    root: &PackageCoordinate,
    dir: &Path,
) -> io::Result<PathBuf> {
    let path = dir.join(diagram_file_name(root));
    fs::write(&path, serialize_diagram(graph))?;
    info!(path = %path.display(), "diagram written");
    Ok(path)
}

/// Result of asking the external renderer for an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The image was produced at this path
    Rendered(PathBuf),
    /// The renderer is not installed
    RendererMissing,
    /// The renderer ran but failed
    Failed(String),
}

/// Renders `diagram` to a PNG next to it using `d2`, if available.
pub fn render_image(diagram: &Path) -> RenderOutcome {
    render_image_with(D2_PROGRAM, diagram)
}

/// Renders `diagram` with the given renderer executable.
pub fn render_image_with(program: &str, diagram: &Path) -> RenderOutcome {
    let Ok(executable) = which::which(program) else {
        debug!(program, "renderer not found on PATH");
        return RenderOutcome::RendererMissing;
    };

    let image = diagram.with_extension("png");
    match Command::new(executable).arg(diagram).arg(&image).output() {
        Ok(output) if output.status.success() => RenderOutcome::Rendered(image),
        Ok(output) => {
            RenderOutcome::Failed(String::from_utf8_lossy(&output.stderr).trim().to_string())
        }
        Err(err) => RenderOutcome::Failed(err.to_string()),
    }
}

/// D2 exporter implementation.
pub struct D2Exporter;

impl Exporter for D2Exporter {
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()> {
        DiagramSerializer::new().write(data.graph, writer)
    }
}
