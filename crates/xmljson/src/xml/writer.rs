//! Serialize a [`Document`] to text using the quick-xml writer

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, ErrorKind, Result};
use crate::xml::model::{Content, Document, Element};

/// Output layout for [`to_string`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per nesting level, `None` for compact output
    pub indent: Option<usize>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self::compact()
    }
}

impl WriteOptions {
    /// No indentation; top-level nodes are still separated by newlines
    pub const fn compact() -> Self {
        Self { indent: None }
    }

    pub const fn indented(width: usize) -> Self {
        Self {
            indent: Some(width),
        }
    }
}

/// Render a whole document: declaration, then every top-level node in order
pub fn to_string(doc: &Document, options: &WriteOptions) -> Result<String> {
    let mut writer = match options.indent {
        Some(width) => Writer::new_with_indent(Vec::new(), b' ', width),
        None => Writer::new(Vec::new()),
    };

    let mut first = true;
    if let Some(decl) = &doc.declaration {
        let decl = BytesDecl::new(
            &decl.version,
            decl.encoding.as_deref(),
            decl.standalone.as_deref(),
        );
        write(&mut writer, Event::Decl(decl))?;
        first = false;
    }

    for child in &doc.children {
        // indented writers break lines on their own before elements
        let needs_break = !first
            && (options.indent.is_none() || !matches!(child, Content::Element(_)));
        if needs_break {
            write(&mut writer, Event::Text(BytesText::from_escaped("\n")))?;
        }
        write_content(&mut writer, child)?;
        first = false;
    }

    String::from_utf8(writer.into_inner())
        .map_err(|err| Error::with_message(ErrorKind::Serialize, err.to_string()))
}

/// Render a single element and its subtree
pub fn element_to_string(element: &Element, options: &WriteOptions) -> Result<String> {
    let doc = Document {
        declaration: None,
        children: vec![Content::Element(element.clone())],
    };
    to_string(&doc, options)
}

fn write_content(writer: &mut Writer<Vec<u8>>, content: &Content) -> Result<()> {
    match content {
        Content::Element(element) => write_element(writer, element),
        Content::Text(text) => write(writer, Event::Text(BytesText::new(text))),
        Content::Comment(comment) => {
            write(writer, Event::Comment(BytesText::from_escaped(comment.as_str())))
        }
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    if element.children.is_empty() {
        return write(writer, Event::Empty(BytesStart::new(element.name.as_str())));
    }

    write(writer, Event::Start(BytesStart::new(element.name.as_str())))?;
    for child in &element.children {
        write_content(writer, child)?;
    }
    write(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|err| Error::with_message(ErrorKind::Serialize, err.to_string()))
}
