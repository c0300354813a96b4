//! XML element tree with quick-xml backed reading and writing

pub mod model;
pub mod reader;
pub mod writer;

pub use model::{ChildElements, Content, Declaration, Document, Element, Parent};
pub use reader::{from_bytes, from_bytes_with_config, from_str, from_str_with_config};
pub use writer::{element_to_string, to_string, WriteOptions};
