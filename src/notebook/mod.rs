//! Notebook module - percent-format notebook reading

mod cells;
mod header;
mod script;

pub use cells::{Cell, CellKind};
pub use header::NotebookMetadata;
pub use script::{extract_chart, has_bar_calls, ScriptError};

use crate::charts::StackedBarChart;
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotebookError {
    #[error("Failed to read notebook: {0}")]
    Io(#[from] std::io::Error),
    #[error("Header starts with `# ---` but is never closed")]
    UnterminatedHeader,
    #[error("Header line {line}: {message}")]
    Header { line: usize, message: String },
    #[error("Invalid header metadata: {0}")]
    Yaml(#[source] serde_yaml_ng::Error),
}

/// A parsed percent-format notebook.
#[derive(Debug, Clone, Serialize)]
pub struct Notebook {
    pub metadata: NotebookMetadata,
    pub cells: Vec<Cell>,
}

impl Notebook {
    pub fn parse(text: &str) -> Result<Self, NotebookError> {
        let lines: Vec<&str> = text.lines().collect();
        let (header_lines, body_start) = header::split_header(&lines)?;
        let header_text = header_lines
            .iter()
            .map(|(_, text)| *text)
            .collect::<Vec<_>>()
            .join("\n");
        let metadata = NotebookMetadata::from_yaml(&header_text)?;
        let cells = cells::parse_cells(&lines[body_start..], body_start);

        tracing::debug!(
            "Parsed notebook: {} header lines, {} cells",
            header_lines.len(),
            cells.len()
        );
        Ok(Self { metadata, cells })
    }

    pub fn from_path(path: &Path) -> Result<Self, NotebookError> {
        let text = fs::read_to_string(path)?;
        let notebook = Self::parse(&text)?;
        tracing::info!(
            "Loaded notebook {} ({} cells)",
            path.display(),
            notebook.cells.len()
        );
        Ok(notebook)
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.title.as_deref()
    }

    /// Code cells that draw bar charts, with their extracted figures.
    pub fn charts(&self) -> Vec<(usize, Result<StackedBarChart, ScriptError>)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_code() && has_bar_calls(&cell.source))
            .map(|(idx, cell)| (idx, extract_chart(&cell.source)))
            .collect()
    }

    /// The first chart in the notebook.
    pub fn first_chart(&self) -> Result<StackedBarChart, ScriptError> {
        self.charts()
            .into_iter()
            .next()
            .map(|(_, chart)| chart)
            .unwrap_or(Err(ScriptError::NoBarCalls))
    }
}
