//! Percent-format cells: `# %% [markdown] title key=value` markers.

use crate::notebook::header::uncomment;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// `key=value` options on a marker line; values are usually JSON.
static CELL_OPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w-]*)=(\[[^\]]*\]|\{[^}]*\}|"[^"]*"|\S+)"#).unwrap()
});

const HIDE_CODE_TAGS: [&str; 3] = ["hide-code", "hide-input", "remove-input"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Code,
    Markdown,
    Raw,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub kind: CellKind,
    pub title: Option<String>,
    pub metadata: Map<String, Value>,
    pub source: String,
    /// 1-based line of the marker (or of the first line for an implicit cell)
    pub line: usize,
}

impl Cell {
    pub fn tags(&self) -> Vec<&str> {
        self.metadata
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn hides_code(&self) -> bool {
        self.tags().iter().any(|t| HIDE_CODE_TAGS.contains(t))
    }

    pub fn is_code(&self) -> bool {
        self.kind == CellKind::Code
    }
}

struct Marker {
    kind: CellKind,
    title: Option<String>,
    metadata: Map<String, Value>,
}

fn parse_marker(line: &str) -> Option<Marker> {
    let rest = line
        .strip_prefix("# %%")
        .or_else(|| line.strip_prefix("#%%"))?;
    // `# %%%` and friends are not cell markers
    if rest.starts_with('%') {
        return None;
    }
    let mut rest = rest.trim();

    let mut kind = CellKind::Code;
    if let Some(inner) = rest.strip_prefix('[') {
        if let Some(end) = inner.find(']') {
            kind = match inner[..end].trim() {
                "markdown" | "md" => CellKind::Markdown,
                "raw" => CellKind::Raw,
                _ => CellKind::Code,
            };
            rest = inner[end + 1..].trim();
        }
    }

    let mut metadata = Map::new();
    for cap in CELL_OPTION.captures_iter(rest) {
        let raw = &cap[2];
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        metadata.insert(cap[1].to_string(), value);
    }
    let title = CELL_OPTION
        .replace_all(rest, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    Some(Marker {
        kind,
        title: (!title.is_empty()).then_some(title),
        metadata,
    })
}

fn finish_cell(kind: CellKind, lines: &[&str]) -> String {
    let body: Vec<&str> = lines
        .iter()
        .map(|&line| match kind {
            CellKind::Code => line,
            CellKind::Markdown | CellKind::Raw => uncomment(line).unwrap_or(line),
        })
        .collect();
    let start = body.iter().position(|l| !l.trim().is_empty());
    let end = body.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(s), Some(e)) => body[s..=e].join("\n"),
        _ => String::new(),
    }
}

fn flush_cell(
    current: Option<(Marker, usize)>,
    buffer: &mut Vec<&str>,
    cells: &mut Vec<Cell>,
    first_line: usize,
) {
    match current {
        Some((marker, line)) => cells.push(Cell {
            kind: marker.kind,
            title: marker.title,
            metadata: marker.metadata,
            source: finish_cell(marker.kind, buffer),
            line,
        }),
        // code before the first marker
        None => {
            let source = finish_cell(CellKind::Code, buffer);
            if !source.is_empty() {
                let offset = buffer.iter().position(|l| !l.trim().is_empty()).unwrap_or(0);
                cells.push(Cell {
                    kind: CellKind::Code,
                    title: None,
                    metadata: Map::new(),
                    source,
                    line: first_line + offset + 1,
                });
            }
        }
    }
    buffer.clear();
}

/// Split notebook body lines into cells. `first_line` is the 0-based index of
/// `lines[0]` in the whole file.
pub fn parse_cells(lines: &[&str], first_line: usize) -> Vec<Cell> {
    let mut cells = Vec::new();
    let mut current: Option<(Marker, usize)> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for (idx, &line) in lines.iter().enumerate() {
        if let Some(marker) = parse_marker(line) {
            flush_cell(current.take(), &mut buffer, &mut cells, first_line);
            current = Some((marker, first_line + idx + 1));
        } else {
            buffer.push(line);
        }
    }
    flush_cell(current, &mut buffer, &mut cells, first_line);
    cells
}
