//! xmljson - schema-less conversion between XML element trees and JSON values
//!
//! Sibling elements with distinct tags become a JSON object; when the first
//! two siblings share a tag the level becomes an array of single-entry
//! objects. The reverse direction emits one element per object entry or
//! array element.
//!
//! # Quick Start
//!
//! ```
//! use xmljson::{json_to_xml, xml_to_json, Element};
//! # fn main() -> Result<(), xmljson::Error> {
//! let doc = xmljson::xml::from_str("<root><item>1</item><item>2</item></root>")?;
//! let value = xml_to_json(&doc)?;
//! assert_eq!(xmljson::json::to_string(&value)?, r#"{"root":[{"item":"1"},{"item":"2"}]}"#);
//!
//! let value = xmljson::json::from_str(r#"{"a":"1","b":"2"}"#)?;
//! let mut root = Element::new("root");
//! json_to_xml(&value, &mut root)?;
//! assert_eq!(xmljson::fs::xml_string(&root)?, "<a>1</a>\n<b>2</b>");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result};

pub mod value;
pub use value::{Array, Object, Value};

pub mod xml;
pub use xml::{Content, Document, Element, Parent};

pub mod convert;
pub use convert::{
    classify, json_to_xml, json_to_xml_with_config, xml_to_json, xml_to_json_with_config, Config,
    Mode, ScalarPolicy,
};

pub mod export;
pub mod fs;
pub mod json;

pub use fs::{json_file_to_xml_file, json_file_to_xml_string, xml_file_to_json_file, Options};
