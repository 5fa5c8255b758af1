use std::io::{Cursor, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use super::record::FeedRecord;

/// OPML version declared on the root element.
pub const OPML_VERSION: &str = "2.0";

/// Title used when none is configured.
pub const DEFAULT_TITLE: &str = "RSS Feeds";

/// Errors that can occur while producing an OPML file.
#[derive(Debug, Error)]
pub enum OpmlError {
    /// The XML writer rejected an event.
    #[error("XML encoding error: {0}")]
    Xml(String),

    /// File I/O error.
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl OpmlError {
    fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// An OPML document: a titled head and a flat body of feed outlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineDocument {
    pub version: &'static str,
    pub title: String,
    pub records: Vec<FeedRecord>,
}

impl OutlineDocument {
    pub fn new(title: impl Into<String>, records: Vec<FeedRecord>) -> Self {
        Self {
            version: OPML_VERSION,
            title: title.into(),
            records,
        }
    }
}

/// Renders the document as indented OPML XML.
///
/// Every record becomes a self-closing `<outline>` carrying `text`, `type`
/// and `xmlUrl` attributes, in that order. Attribute values are escaped.
pub fn render_opml(doc: &OutlineDocument) -> Result<String, OpmlError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        "XML declaration",
    )?;

    let mut opml = BytesStart::new("opml");
    opml.push_attribute(("version", doc.version));
    write(&mut writer, Event::Start(opml), "opml element")?;

    // <head><title>...</title></head>
    write(&mut writer, Event::Start(BytesStart::new("head")), "head element")?;
    write(&mut writer, Event::Start(BytesStart::new("title")), "title element")?;
    write(&mut writer, Event::Text(BytesText::new(&doc.title)), "title text")?;
    write(&mut writer, Event::End(BytesEnd::new("title")), "title end")?;
    write(&mut writer, Event::End(BytesEnd::new("head")), "head end")?;

    write(&mut writer, Event::Start(BytesStart::new("body")), "body element")?;
    for record in &doc.records {
        let mut outline = BytesStart::new("outline");
        outline.push_attribute(("text", record.name.as_str()));
        outline.push_attribute(("type", record.kind));
        outline.push_attribute(("xmlUrl", record.url.as_str()));
        write(&mut writer, Event::Empty(outline), "outline element")?;
    }
    write(&mut writer, Event::End(BytesEnd::new("body")), "body end")?;

    write(&mut writer, Event::End(BytesEnd::new("opml")), "opml end")?;

    let mut bytes = writer.into_inner().into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes)
        .map_err(|e| OpmlError::Xml(format!("generated OPML is not UTF-8: {e}")))
}

fn write(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    event: Event<'_>,
    what: &str,
) -> Result<(), OpmlError> {
    writer
        .write_event(event)
        .map_err(|e| OpmlError::Xml(format!("failed to write {what}: {e}")))
}

/// Writes the document to `path`, replacing any existing file.
///
/// The content goes to a temporary sibling first and is renamed into place
/// after an fsync, so a failed write never leaves a truncated OPML behind.
pub fn write_opml(doc: &OutlineDocument, path: &Path) -> Result<(), OpmlError> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let content = render_opml(doc)?;

    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("tmp.{:016x}", random_suffix));

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(|e| {
            OpmlError::io(
                format!("failed to create temporary file '{}'", temp_path.display()),
                e,
            )
        })?;

    let written = file
        .write_all(content.as_bytes())
        .and_then(|()| file.sync_all());
    drop(file);
    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(OpmlError::io(
            format!("failed to write '{}'", temp_path.display()),
            e,
        ));
    }

    // Windows refuses to rename over an existing file.
    #[cfg(windows)]
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(OpmlError::io(
                format!("failed to replace '{}'", path.display()),
                e,
            ));
        }
    }

    std::fs::rename(&temp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        OpmlError::io(
            format!(
                "failed to rename '{}' to '{}'",
                temp_path.display(),
                path.display()
            ),
            e,
        )
    })?;

    tracing::info!(
        path = %path.display(),
        feeds = doc.records.len(),
        "Wrote OPML file"
    );
    Ok(())
}
