//! Markdown parsing into an owned, traversable node tree.
//!
//! `pulldown-cmark` produces a flat event stream; this module folds it into a
//! [`Node`] tree so table rows and cells can be walked structurally.
//!
//! - [`tree`] - node types and the event-to-tree builder
//! - [`heading`] - automatic heading identifiers
//!
//! # Example
//!
//! ```
//! use md2opml::markdown::{parse, NodeKind};
//!
//! let root = parse("| Name | URL |\n|---|---|\n| A | http://a |\n");
//! let tables = root
//!     .descendants()
//!     .filter(|n| *n.kind() == NodeKind::Table)
//!     .count();
//! assert_eq!(tables, 1);
//! ```

mod heading;
mod tree;

pub use heading::slugify;
pub use tree::{parse, parser_options, Descendants, Node, NodeKind};
