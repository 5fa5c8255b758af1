//! Feed extraction from markdown tables and OPML output.
//!
//! - [`extract`] - walk the markdown tree and pull cell values out of tables
//! - [`record`] - header/column filters and the row-to-record mapping
//! - [`opml`] - OPML 2.0 rendering and file output
//!
//! # Example
//!
//! ```
//! use md2opml::feed::{extract_tables, map_tables, render_opml, OutlineDocument};
//! use md2opml::markdown::parse;
//!
//! let source = "| Name | URL |\n|---|---|\n| A | http://a |\n";
//! let records = map_tables(&extract_tables(&parse(source), source));
//! let opml = render_opml(&OutlineDocument::new("RSS Feeds", records)).unwrap();
//! assert!(opml.contains(r#"<outline text="A" type="rss" xmlUrl="http://a"/>"#));
//! ```

mod extract;
mod opml;
mod record;

pub use extract::{cell_value, extract_tables, ExtractedRow, ExtractedTable};
pub use opml::{
    render_opml, write_opml, OpmlError, OutlineDocument, DEFAULT_TITLE, OPML_VERSION,
};
pub use record::{
    has_feed_columns, is_header_row, map_row, map_tables, FeedRecord, OUTLINE_TYPE,
};
