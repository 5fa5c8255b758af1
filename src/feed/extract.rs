use crate::markdown::{Node, NodeKind};

/// Cell values of one table row, in column order.
pub type ExtractedRow = Vec<String>;

/// The rows of one markdown table, header row included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTable {
    /// Id of the heading that most recently precedes the table, if any.
    pub section: Option<String>,
    pub rows: Vec<ExtractedRow>,
}

/// Collects every table in the tree, in document order.
///
/// `source` must be the text `root` was parsed from; cell text is sliced
/// out of it rather than copied into the tree.
pub fn extract_tables(root: &Node, source: &str) -> Vec<ExtractedTable> {
    let mut tables = Vec::new();
    let mut section: Option<&str> = None;

    for node in root.descendants() {
        match node.kind() {
            NodeKind::Heading { id, .. } => section = Some(id.as_str()),
            NodeKind::Table => {
                let rows: Vec<ExtractedRow> = node
                    .children()
                    .iter()
                    .filter(|child| *child.kind() == NodeKind::TableRow)
                    .map(|row| extract_row(row, source))
                    .collect();
                tracing::debug!(
                    section = section.unwrap_or("-"),
                    rows = rows.len(),
                    "Found table"
                );
                tables.push(ExtractedTable {
                    section: section.map(str::to_string),
                    rows,
                });
            }
            _ => {}
        }
    }

    tables
}

fn extract_row(row: &Node, source: &str) -> ExtractedRow {
    row.children()
        .iter()
        .filter(|child| *child.kind() == NodeKind::TableCell)
        .map(|cell| cell_value(cell, source))
        .collect()
}

/// Resolves a cell to its string value.
///
/// A cell that starts with a link yields the link destination, ignoring the
/// visible text. Any other cell yields its source markup as written, trimmed:
/// emphasis markers, inline HTML and entities are kept verbatim.
pub fn cell_value(cell: &Node, source: &str) -> String {
    if let Some(destination) = cell.children().first().and_then(Node::destination) {
        return destination.to_string();
    }
    match source.get(cell.span()) {
        Some(raw) => trim_cell(raw).to_string(),
        None => cell.text(source).trim().to_string(),
    }
}

/// Strips surrounding whitespace and any column pipe left on the cell edges.
/// An escaped trailing pipe (`\|`) is cell content and stays.
fn trim_cell(raw: &str) -> &str {
    let mut cell = raw.trim();
    if let Some(rest) = cell.strip_prefix('|') {
        cell = rest.trim_start();
    }
    if let Some(rest) = cell.strip_suffix('|') {
        if !rest.ends_with('\\') {
            cell = rest.trim_end();
        }
    }
    cell
}
