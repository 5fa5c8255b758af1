//! Convert markdown tables of feed sources into an OPML subscription list.
//!
//! A document such as
//!
//! ```markdown
//! | Name | URL |
//! |------|-----|
//! | Example Blog | https://example.com/feed.xml |
//! ```
//!
//! becomes one `<outline type="rss">` per data row. The first column is the
//! display name, the second the feed URL; a cell that starts with a link
//! contributes the link destination.

pub mod config;
pub mod feed;
pub mod markdown;
pub mod pipeline;

pub use config::{Config, ConfigError};
pub use pipeline::{convert, run, PipelineError, RunOptions, RunSummary};
