//! File level operations: read, write and the three conversion directions

use std::path::Path;

use time::OffsetDateTime;
use tracing::{debug, info, instrument};

use crate::convert::{json_to_xml_with_config, xml_to_json_with_config, Config};
use crate::error::{Error, Result};
use crate::export;
use crate::json;
use crate::value::Value;
use crate::xml::{self, Document, Element, WriteOptions};

/// Name of the synthetic parent used for JSON to XML
pub const SYNTHETIC_ROOT: &str = "root";

/// Options shared by the file conversions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub config: Config,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Options {
    pub const fn new(config: Config, pretty: bool) -> Self {
        Self { config, pretty }
    }
}

fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|err| Error::read(path, &err))
}

fn write_string(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|err| Error::write(path, &err))
}

/// Read a JSON file; an empty file yields [`Value::Null`]
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_json(path: impl AsRef<Path>) -> Result<Value> {
    let contents = read_to_string(path.as_ref())?;
    json::from_str(&contents)
}

/// Read an XML file, rejecting nesting deeper than `config.max_depth`.
///
/// The bytes are decoded by the XML reader, so a file that is not UTF-8 is an
/// XML load failure with a position rather than a read failure.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_xml(path: impl AsRef<Path>, config: &Config) -> Result<Document> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|err| Error::read(path, &err))?;
    xml::from_bytes_with_config(&bytes, config)
}

/// Write `value` as JSON text without a trailing newline
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn write_json(path: impl AsRef<Path>, value: &Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        json::to_string_pretty(value)?
    } else {
        json::to_string(value)?
    };
    write_string(path.as_ref(), &text)
}

/// Write the children of `root` as a standalone document with a declaration
/// and a generation comment
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn write_xml(
    path: impl AsRef<Path>,
    root: &Element,
    generated_at: OffsetDateTime,
) -> Result<()> {
    let text = xml_document_string(root, generated_at)?;
    write_string(path.as_ref(), &text)
}

/// The full document [`write_xml`] would write, as a string
pub fn xml_document_string(root: &Element, generated_at: OffsetDateTime) -> Result<String> {
    let doc = export::document(root, generated_at);
    xml::to_string(&doc, &WriteOptions::compact())
}

/// The children of `root` as indented XML, no declaration or comment
pub fn xml_string(root: &Element) -> Result<String> {
    let doc = export::fragment(root);
    xml::to_string(&doc, &WriteOptions::indented(4))
}

/// Convert a parsed JSON value under a fresh synthetic root
pub fn json_to_root(value: &Value, config: &Config) -> Result<Element> {
    let mut root = Element::new(SYNTHETIC_ROOT);
    json_to_xml_with_config(value, &mut root, config)?;
    Ok(root)
}

/// XML file to JSON file
#[instrument(skip_all, fields(input = %input.as_ref().display(), output = %output.as_ref().display()))]
pub fn xml_file_to_json_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &Options,
) -> Result<()> {
    let doc = read_xml(input, &options.config)?;
    let value = xml_to_json_with_config(&doc, &options.config)?;
    info!("generating json output");
    write_json(output, &value, options.pretty)
}

/// JSON file to XML file
#[instrument(skip_all, fields(input = %input.as_ref().display(), output = %output.as_ref().display()))]
pub fn json_file_to_xml_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &Options,
) -> Result<()> {
    let value = read_json(input)?;
    let root = json_to_root(&value, &options.config)?;
    info!("generating xml output");
    write_xml(output, &root, export::now())
}

/// JSON file to an XML string holding only the converted elements
#[instrument(skip_all, fields(input = %input.as_ref().display()))]
pub fn json_file_to_xml_string(input: impl AsRef<Path>, options: &Options) -> Result<String> {
    let value = read_json(input)?;
    let root = json_to_root(&value, &options.config)?;
    let text = xml_string(&root)?;
    debug!(bytes = text.len(), "rendered xml string");
    Ok(text)
}
