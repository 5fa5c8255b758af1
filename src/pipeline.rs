//! End-to-end conversion: read markdown, extract feeds, write OPML.
//!
//! [`convert`] is the pure core; [`run`] and [`render`] add the file edges.
//! Each stage aborts the whole run on its first error.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::feed::{self, FeedRecord, OpmlError, OutlineDocument};
use crate::markdown;

/// Errors from the conversion pipeline, one variant per failing stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input document could not be read.
    #[error("Error reading file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input document is not valid markdown text.
    #[error("Error parsing markdown: {0}")]
    Parse(String),

    /// The OPML document could not be produced or written.
    #[error("Error writing {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: OpmlError,
    },
}

/// Paths and title for one conversion run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub title: String,
}

/// Outcome of a successful [`run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub records: usize,
}

/// Reads the whole input document into memory.
pub fn load_document(path: &Path) -> Result<Vec<u8>, PipelineError> {
    std::fs::read(path).map_err(|source| PipelineError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Converts markdown bytes into feed records, in source order.
pub fn convert(source: &[u8]) -> Result<Vec<FeedRecord>, PipelineError> {
    let text = std::str::from_utf8(source)
        .map_err(|e| PipelineError::Parse(format!("input is not valid UTF-8: {e}")))?;

    let root = markdown::parse(text);
    let tables = feed::extract_tables(&root, text);
    let records = feed::map_tables(&tables);

    tracing::debug!(
        tables = tables.len(),
        feeds = records.len(),
        "Extracted feeds"
    );
    Ok(records)
}

/// Reads `options.input` and writes the OPML document to `options.output`.
///
/// A read or parse failure returns before the output path is touched.
pub fn run(options: &RunOptions) -> Result<RunSummary, PipelineError> {
    let source = load_document(&options.input)?;
    let records = convert(&source)?;
    let count = records.len();

    let doc = OutlineDocument::new(options.title.clone(), records);
    feed::write_opml(&doc, &options.output).map_err(|source| PipelineError::Write {
        path: options.output.clone(),
        source,
    })?;

    Ok(RunSummary {
        output: options.output.clone(),
        records: count,
    })
}

/// Reads `options.input` and returns the OPML document as a string.
/// `options.output` is ignored.
pub fn render(options: &RunOptions) -> Result<String, PipelineError> {
    let source = load_document(&options.input)?;
    let records = convert(&source)?;

    let doc = OutlineDocument::new(options.title.clone(), records);
    feed::render_opml(&doc).map_err(|source| PipelineError::Write {
        path: PathBuf::from("-"),
        source,
    })
}
