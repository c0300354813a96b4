//! Build a [`Document`] from XML text using quick-xml events

use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::Reader;
use tracing::trace;

use crate::convert::Config;
use crate::error::{Error, ErrorKind, Pos, Result};
use crate::xml::model::{Declaration, Document, Element};

/// Parse an XML document from a string, accepting any nesting depth.
///
/// Attributes, comments, processing instructions and DOCTYPE are dropped.
/// Whitespace-only text is ignored and CDATA sections become plain text.
pub fn from_str(input: &str) -> Result<Document> {
    from_str_with_config(input, &Config::unlimited())
}

/// Parse an XML document from a string, failing with
/// [`ErrorKind::MaxDepthExceeded`] once elements nest deeper than
/// `config.max_depth`
pub fn from_str_with_config(input: &str, config: &Config) -> Result<Document> {
    let mut reader = Reader::from_str(input);
    reader.trim_text(true);

    let mut builder = TreeBuilder::new(config.max_depth);
    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => return Err(load_error(input, reader.buffer_position(), err.to_string())),
        };
        let step = match event {
            Event::Decl(decl) => read_declaration(&decl).map(|decl| {
                builder.document.declaration = Some(decl);
            }),
            Event::Start(start) => element_name(&start).and_then(|name| builder.open(name)),
            Event::End(_) => builder.close(),
            Event::Empty(start) => {
                element_name(&start).and_then(|name| builder.attach_empty(name))
            }
            Event::Text(text) => match text.unescape() {
                Ok(text) => builder.text(text.into_owned()),
                Err(err) => Err(malformed(err.to_string())),
            },
            Event::CData(data) => match std::str::from_utf8(&data) {
                Ok(text) => builder.text(text.to_string()),
                Err(err) => Err(malformed(err.to_string())),
            },
            Event::Comment(_) | Event::PI(_) | Event::DocType(_) => Ok(()),
            Event::Eof => break,
        };
        if let Err(err) = step {
            return Err(err.at(Pos::from_offset(input.as_bytes(), reader.buffer_position())));
        }
    }

    builder
        .finish()
        .map_err(|err| err.at(Pos::from_offset(input.as_bytes(), input.len())))
}

/// Parse an XML document from bytes, which must be UTF-8
pub fn from_bytes(bytes: &[u8]) -> Result<Document> {
    from_bytes_with_config(bytes, &Config::unlimited())
}

/// [`from_bytes`] with the nesting limit of [`from_str_with_config`]
pub fn from_bytes_with_config(bytes: &[u8], config: &Config) -> Result<Document> {
    match std::str::from_utf8(bytes) {
        Ok(input) => from_str_with_config(input, config),
        Err(err) => Err(Error::with_message(ErrorKind::XmlLoad, "invalid utf-8")
            .at(Pos::from_offset(bytes, err.valid_up_to()))),
    }
}

fn load_error(input: &str, offset: usize, message: String) -> Error {
    malformed(message).at(Pos::from_offset(input.as_bytes(), offset))
}

fn malformed(message: impl Into<String>) -> Error {
    Error::with_message(ErrorKind::XmlLoad, message)
}

fn element_name(start: &BytesStart<'_>) -> Result<String> {
    decode(start.name().as_ref())
}

fn read_declaration(decl: &BytesDecl<'_>) -> Result<Declaration> {
    let version = decl.version().map_err(|err| malformed(err.to_string()))?;
    let encoding = match decl.encoding() {
        Some(Ok(raw)) => Some(decode(raw.as_ref())?),
        Some(Err(err)) => return Err(malformed(err.to_string())),
        None => None,
    };
    let standalone = match decl.standalone() {
        Some(Ok(raw)) => Some(decode(raw.as_ref())?),
        Some(Err(err)) => return Err(malformed(err.to_string())),
        None => None,
    };

    Ok(Declaration {
        version: decode(version.as_ref())?,
        encoding,
        standalone,
    })
}

fn decode(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|err| malformed(err.to_string()))
}

/// Stack of open elements; closed ones move into their parent by value
#[derive(Debug, Default)]
struct TreeBuilder {
    document: Document,
    open: Vec<Element>,
    /// 0 means unlimited
    max_depth: u16,
}

impl TreeBuilder {
    fn new(max_depth: u16) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    /// Depth a new element would get, root elements being at depth 1
    fn check_depth(&self) -> Result<()> {
        let depth = self.open.len().saturating_add(1);
        if self.max_depth != 0 && depth > usize::from(self.max_depth) {
            return Err(Error::new(ErrorKind::MaxDepthExceeded {
                max: self.max_depth,
            }));
        }
        Ok(())
    }

    fn open(&mut self, name: String) -> Result<()> {
        self.check_depth()?;
        trace!(depth = self.open.len(), %name, "open element");
        self.open.push(Element::new(name));
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        match self.open.pop() {
            Some(element) => {
                self.attach(element);
                Ok(())
            }
            None => Err(malformed("unexpected closing tag")),
        }
    }

    fn attach_empty(&mut self, name: String) -> Result<()> {
        self.check_depth()?;
        self.attach(Element::new(name));
        Ok(())
    }

    fn attach(&mut self, element: Element) {
        match self.open.last_mut() {
            Some(parent) => parent.push_child(element),
            None => self.document.push_child(element),
        }
    }

    fn text(&mut self, text: String) -> Result<()> {
        match self.open.last_mut() {
            Some(parent) => {
                parent.push_text(text);
                Ok(())
            }
            None => Err(malformed("text outside of root element")),
        }
    }

    fn finish(self) -> Result<Document> {
        if let Some(element) = self.open.last() {
            return Err(malformed(format!("unclosed element <{}>", element.name)));
        }
        if self.document.root().is_none() {
            return Err(malformed("document has no root element"));
        }
        Ok(self.document)
    }
}
