//! Flat listing of the root's direct dependencies.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// Message printed when the root has nothing to list.
pub const NO_DEPENDENCIES: &str = "No direct dependencies found";

/// Numbered `"{index}. {group}:{artifact}:{version}"` lines.
pub struct ListExporter;

impl Exporter for ListExporter {
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()> {
        let edges = data.graph.dependencies(data.root).unwrap_or_default();
        if edges.is_empty() {
            return writeln!(writer, "{}", NO_DEPENDENCIES);
        }

        for (index, edge) in edges.iter().enumerate() {
            writeln!(writer, "{}. {}", index + 1, edge.target_label())?;
        }
        Ok(())
    }
}
