use super::extract::{ExtractedRow, ExtractedTable};

/// Outline type written for every record.
pub const OUTLINE_TYPE: &str = "rss";

/// A feed entry destined for one OPML `<outline>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRecord {
    /// Display name, taken verbatim from the first column.
    pub name: String,
    /// Outline type. Always [`OUTLINE_TYPE`].
    pub kind: &'static str,
    /// Feed URL, taken verbatim from the second column. Not validated.
    pub url: String,
}

impl FeedRecord {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: OUTLINE_TYPE,
            url: url.into(),
        }
    }
}

/// The first row of every table is its header and never becomes a record.
pub fn is_header_row(index: usize) -> bool {
    index == 0
}

/// A row can become a record only if both the name and URL columns are
/// present and non-empty. Extra columns are ignored.
pub fn has_feed_columns(row: &[String]) -> bool {
    matches!(row, [name, url, ..] if !name.is_empty() && !url.is_empty())
}

/// Maps a data row to a record, or `None` if it lacks feed columns.
pub fn map_row(row: &ExtractedRow) -> Option<FeedRecord> {
    if !has_feed_columns(row) {
        return None;
    }
    Some(FeedRecord::new(row[0].clone(), row[1].clone()))
}

/// Maps the data rows of every table into one flat list, in source order.
pub fn map_tables(tables: &[ExtractedTable]) -> Vec<FeedRecord> {
    let mut records = Vec::new();

    for table in tables {
        for (index, row) in table.rows.iter().enumerate() {
            if is_header_row(index) {
                continue;
            }
            match map_row(row) {
                Some(record) => records.push(record),
                None => {
                    tracing::debug!(
                        section = table.section.as_deref().unwrap_or("-"),
                        row = index,
                        columns = row.len(),
                        "Skipping row without name and URL columns"
                    );
                }
            }
        }
    }

    records
}
