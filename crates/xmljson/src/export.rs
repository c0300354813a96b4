//! Assemble output documents from a synthetic parent element
//!
//! The parent passed in here is only a container: it is never serialized,
//! each of its child elements becomes an independent top-level element.

use time::macros::format_description;
use time::OffsetDateTime;

use crate::xml::model::{Declaration, Document, Element, Parent};

/// Standalone document: declaration, generation comment, then a deep copy of
/// every child element of `root` in order
pub fn document(root: &Element, generated_at: OffsetDateTime) -> Document {
    let mut doc = Document::with_declaration(Declaration::default());
    doc.push_comment(format!("Generated at {}", timestamp(generated_at)));
    for child in root.child_elements() {
        doc.push_child(child.clone());
    }
    doc
}

/// The child elements of `root` only, without declaration or comment
pub fn fragment(root: &Element) -> Document {
    let mut doc = Document::new();
    for child in root.child_elements() {
        doc.push_child(child.clone());
    }
    doc
}

/// Current local time, or UTC when the local offset cannot be determined
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Human-readable stamp such as `Sat Oct 17 14:03:22 2026`
pub fn timestamp(at: OffsetDateTime) -> String {
    let format = format_description!(
        "[weekday repr:short] [month repr:short] [day padding:none] [hour]:[minute]:[second] [year]"
    );
    at.format(&format).unwrap_or_else(|_| at.to_string())
}
