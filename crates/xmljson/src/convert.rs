//! Conversion between XML element trees and JSON values
//!
//! XML to JSON decides, per nesting level, whether the children form an
//! object (distinct tags) or an array of single-entry objects (repeated
//! tags). Only the first two child elements are compared; later siblings do
//! not change the decision. JSON to XML emits one element per object entry or
//! array element and never re-checks that an array's tags agree.

use tracing::{debug, trace, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::value::{integral, Array, Object, Value};
use crate::xml::model::{Content, Element, Parent};

/// What to do with a nested null, boolean or number during JSON to XML
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScalarPolicy {
    /// Fail with `InvalidShape`, only strings are valid leaves
    #[default]
    Reject,
    /// Write the scalar as element text; null becomes an empty element
    Text,
}

/// Configuration for both conversion directions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum nesting depth (0 means unlimited)
    pub max_depth: u16,
    pub scalars: ScalarPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            scalars: ScalarPolicy::Reject,
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            scalars: ScalarPolicy::Reject,
        }
    }

    pub const fn new(max_depth: u16, scalars: ScalarPolicy) -> Self {
        Self { max_depth, scalars }
    }

    pub const fn with_scalars(mut self, scalars: ScalarPolicy) -> Self {
        self.scalars = scalars;
        self
    }
}

/// How the children of one XML element are accumulated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Object,
    Array,
}

/// Pick the accumulation mode from the first two child elements.
///
/// A shared, non-empty tag on those two means `Array`; anything else,
/// including a lone child, means `Object`.
pub fn classify<P: Parent + ?Sized>(parent: &P) -> Mode {
    let mut children = parent.child_elements();
    match (children.next(), children.next()) {
        (Some(first), Some(second)) if !first.name.is_empty() && first.name == second.name => {
            Mode::Array
        }
        _ => Mode::Object,
    }
}

/// Whether `name` can be written as an XML element name
pub fn is_valid_tag(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == ':')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
}

/// Convert the child elements of `parent` with the default [`Config`]
pub fn xml_to_json<P: Parent + ?Sized>(parent: &P) -> Result<Value> {
    xml_to_json_with_config(parent, &Config::default())
}

/// Convert the child elements of `parent` into an object or an array of
/// single-entry objects. Children with an empty tag are skipped.
pub fn xml_to_json_with_config<P: Parent + ?Sized>(parent: &P, config: &Config) -> Result<Value> {
    children_to_value(parent, config, 1)
}

fn children_to_value<P: Parent + ?Sized>(parent: &P, config: &Config, depth: u16) -> Result<Value> {
    check_depth(config, depth)?;

    let mode = classify(parent);
    let mut object = Object::new();
    let mut array = Array::new();

    for child in parent.child_elements() {
        if child.name.is_empty() {
            trace!(depth, "skipping element with empty tag");
            continue;
        }

        let value = if child.has_child_elements() {
            children_to_value(child, config, depth.saturating_add(1))?
        } else {
            Value::String(child.text().unwrap_or_default())
        };

        match mode {
            Mode::Object => {
                if object.insert(child.name.as_str(), value).is_some() {
                    trace!(tag = %child.name, "duplicate tag overwrote earlier value");
                }
            }
            Mode::Array => array.push(Object::single(child.name.as_str(), value)),
        }
    }

    Ok(match mode {
        Mode::Object => Value::Object(object),
        Mode::Array => Value::Array(array),
    })
}

/// Append elements for `value` to `parent` with the default [`Config`]
pub fn json_to_xml(value: &Value, parent: &mut Element) -> Result<()> {
    json_to_xml_with_config(value, parent, &Config::default())
}

/// Append one element per object entry (or per array element) to `parent`.
///
/// `value` must be an object or an array. Nothing is appended unless the whole
/// value converts.
pub fn json_to_xml_with_config(value: &Value, parent: &mut Element, config: &Config) -> Result<()> {
    let children = value_to_elements(value, config, 1)?;
    debug!(parent = %parent.name, count = children.len(), "appending converted elements");
    parent
        .children
        .extend(children.into_iter().map(Content::Element));
    Ok(())
}

fn value_to_elements(value: &Value, config: &Config, depth: u16) -> Result<Vec<Element>> {
    check_depth(config, depth)?;

    match value {
        Value::Object(obj) => {
            let mut elements = Vec::with_capacity(obj.len());
            for (key, value) in obj {
                if let Some(element) = entry_to_element(key, value, config, depth)? {
                    elements.push(element);
                }
            }
            Ok(elements)
        }
        Value::Array(arr) => {
            let mut elements = Vec::with_capacity(arr.len());
            for item in arr {
                let Value::Object(wrapper) = item else {
                    return Err(shape_error(item));
                };
                let Some((key, value)) = wrapper.first() else {
                    trace!(depth, "skipping empty array element");
                    continue;
                };
                if wrapper.len() > 1 {
                    debug!(key = %key, dropped = wrapper.len() - 1, "array element has extra entries");
                }
                if let Some(element) = entry_to_element(key, value, config, depth)? {
                    elements.push(element);
                }
            }
            Ok(elements)
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            Err(shape_error(value))
        }
    }
}

fn entry_to_element(
    key: &str,
    value: &Value,
    config: &Config,
    depth: u16,
) -> Result<Option<Element>> {
    if !is_valid_tag(key) {
        warn!(key, "skipping entry whose key is not a valid element name");
        return Ok(None);
    }

    let mut element = Element::new(key);
    match value {
        Value::String(text) => element.push_text(text.as_str()),
        Value::Object(_) | Value::Array(_) => {
            element.children = value_to_elements(value, config, depth.saturating_add(1))?
                .into_iter()
                .map(Content::Element)
                .collect();
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => match config.scalars {
            ScalarPolicy::Reject => return Err(shape_error(value)),
            ScalarPolicy::Text => {
                if let Some(text) = scalar_text(value) {
                    element.push_text(text);
                }
            }
        },
    }
    Ok(Some(element))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(match integral(*n) {
            Some(i) => i.to_string(),
            None => n.to_string(),
        }),
        Value::String(s) => Some(s.clone()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn shape_error(value: &Value) -> Error {
    Error::new(ErrorKind::InvalidShape {
        found: value.kind_name(),
    })
}

fn check_depth(config: &Config, depth: u16) -> Result<()> {
    if config.max_depth != 0 && depth > config.max_depth {
        return Err(Error::new(ErrorKind::MaxDepthExceeded {
            max: config.max_depth,
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::model::Document;

    fn parent_of(tags: &[&str]) -> Element {
        let mut parent = Element::new("root");
        for (i, tag) in tags.iter().enumerate() {
            parent.push_child(Element::with_text(*tag, i.to_string()));
        }
        parent
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_depth, 128);
        assert_eq!(config.scalars, ScalarPolicy::Reject);
        assert_eq!(Config::unlimited().max_depth, 0);
        assert_eq!(
            Config::new(128, ScalarPolicy::Text),
            Config::default().with_scalars(ScalarPolicy::Text)
        );
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&parent_of(&[])), Mode::Object);
        assert_eq!(classify(&parent_of(&["a"])), Mode::Object);
        assert_eq!(classify(&parent_of(&["a", "b"])), Mode::Object);
        assert_eq!(classify(&parent_of(&["a", "a"])), Mode::Array);
        assert_eq!(classify(&parent_of(&["a", "a", "b"])), Mode::Array);
        assert_eq!(classify(&parent_of(&["a", "b", "b"])), Mode::Object);
        assert_eq!(classify(&parent_of(&["", ""])), Mode::Object);
    }

    #[test]
    fn test_classify_ignores_text_nodes() {
        let mut parent = Element::new("root");
        parent.push_child(Element::new("a"));
        parent.push_text("between");
        parent.push_child(Element::new("a"));
        assert_eq!(classify(&parent), Mode::Array);
    }

    #[test]
    fn test_is_valid_tag() {
        assert!(is_valid_tag("item"));
        assert!(is_valid_tag("_x-1.y:z"));
        assert!(is_valid_tag("名前"));
        assert!(!is_valid_tag(""));
        assert!(!is_valid_tag("1abc"));
        assert!(!is_valid_tag("first name"));
        assert!(!is_valid_tag("a<b"));
    }

    #[test]
    fn test_no_children_is_empty_object() -> Result<()> {
        assert_eq!(xml_to_json(&Element::new("root"))?, Value::Object(Object::new()));
        Ok(())
    }

    #[test]
    fn test_array_mode_keeps_mismatched_later_tags() -> Result<()> {
        let value = xml_to_json(&parent_of(&["a", "a", "b"]))?;
        let expected = Value::from(vec![
            Value::Object(Object::single("a", "0")),
            Value::Object(Object::single("a", "1")),
            Value::Object(Object::single("b", "2")),
        ]);
        assert_eq!(value, expected);
        Ok(())
    }

    #[test]
    fn test_object_mode_last_duplicate_wins() -> Result<()> {
        let value = xml_to_json(&parent_of(&["a", "b", "a"]))?;
        let obj = value.as_object().cloned().unwrap_or_default();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.get("a"), Some(&Value::from("2")));
        Ok(())
    }

    #[test]
    fn test_empty_first_tag_still_classifies() -> Result<()> {
        // "" and "a" differ, so object mode; the empty tag is then skipped
        let value = xml_to_json(&parent_of(&["", "a", "a"]))?;
        let obj = value.as_object().cloned().unwrap_or_default();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj.get("a"), Some(&Value::from("2")));
        Ok(())
    }

    #[test]
    fn test_empty_tag_skipped_in_array_mode() -> Result<()> {
        let parent = parent_of(&["a", "a", "", "a"]);
        assert_eq!(classify(&parent), Mode::Array);
        let expected = Value::from(vec![
            Value::Object(Object::single("a", "0")),
            Value::Object(Object::single("a", "1")),
            Value::Object(Object::single("a", "3")),
        ]);
        assert_eq!(xml_to_json(&parent)?, expected);
        Ok(())
    }

    #[test]
    fn test_only_empty_tags() -> Result<()> {
        assert_eq!(xml_to_json(&parent_of(&["", ""]))?, Value::Object(Object::new()));
        Ok(())
    }

    #[test]
    fn test_leaf_without_text_is_empty_string() -> Result<()> {
        let mut parent = Element::new("root");
        parent.push_child(Element::new("empty"));
        let value = xml_to_json(&parent)?;
        assert_eq!(
            value.as_object().and_then(|o| o.get("empty")),
            Some(&Value::from(""))
        );
        Ok(())
    }

    #[test]
    fn test_document_wraps_root() -> Result<()> {
        let mut doc = Document::new();
        doc.push_child(parent_of(&["item", "item"]));
        let value = xml_to_json(&doc)?;
        let mut expected = Object::new();
        expected.insert(
            "root",
            Value::from(vec![
                Value::Object(Object::single("item", "0")),
                Value::Object(Object::single("item", "1")),
            ]),
        );
        assert_eq!(value, Value::Object(expected));
        Ok(())
    }

    #[test]
    fn test_xml_depth_limit() {
        let mut nested = Element::with_text("leaf", "x");
        for _ in 0..4 {
            let mut outer = Element::new("n");
            outer.push_child(nested);
            nested = outer;
        }
        let config = Config::new(3, ScalarPolicy::Reject);
        let err = xml_to_json_with_config(&nested, &config).err();
        assert_eq!(
            err.as_ref().map(Error::kind),
            Some(&ErrorKind::MaxDepthExceeded { max: 3 })
        );
        assert!(xml_to_json_with_config(&nested, &Config::unlimited()).is_ok());
    }

    #[test]
    fn test_json_object_to_xml() -> Result<()> {
        let mut obj = Object::new();
        obj.insert("a", "1");
        let mut inner = Object::new();
        inner.insert("c", "2");
        obj.insert("b", inner);

        let mut root = Element::new("root");
        json_to_xml(&Value::Object(obj), &mut root)?;

        let mut b = Element::new("b");
        b.push_child(Element::with_text("c", "2"));
        assert_eq!(
            root.children,
            vec![
                Content::Element(Element::with_text("a", "1")),
                Content::Element(b)
            ]
        );
        Ok(())
    }

    #[test]
    fn test_json_array_uses_first_entry_only() -> Result<()> {
        let mut two = Object::single("x", "1");
        two.insert("y", "2");
        let value = Value::from(vec![
            Value::Object(two),
            Value::Object(Object::new()),
            Value::Object(Object::single("x", "3")),
        ]);

        let mut root = Element::new("root");
        json_to_xml(&value, &mut root)?;
        assert_eq!(
            root.children,
            vec![
                Content::Element(Element::with_text("x", "1")),
                Content::Element(Element::with_text("x", "3")),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_json_top_level_scalar_rejected() {
        for value in [
            Value::from("text"),
            Value::Number(1.0),
            Value::Bool(true),
            Value::Null,
        ] {
            let mut root = Element::new("root");
            let err = json_to_xml(&value, &mut root).err();
            assert!(matches!(
                err.as_ref().map(Error::kind),
                Some(ErrorKind::InvalidShape { .. })
            ));
            assert!(root.children.is_empty());
        }
    }

    #[test]
    fn test_json_failure_leaves_parent_untouched() {
        let mut obj = Object::new();
        obj.insert("ok", "1");
        obj.insert("bad", 5i32);

        let mut root = Element::new("root");
        let err = json_to_xml(&Value::Object(obj), &mut root).err();
        assert_eq!(
            err.as_ref().map(Error::kind),
            Some(&ErrorKind::InvalidShape { found: "number" })
        );
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_json_array_of_non_objects_rejected() {
        let value = Value::from(vec![Value::from("loose")]);
        let mut root = Element::new("root");
        assert!(json_to_xml(&value, &mut root).is_err());
    }

    #[test]
    fn test_json_scalars_as_text() -> Result<()> {
        let mut obj = Object::new();
        obj.insert("n", 42i32);
        obj.insert("f", 1.5);
        obj.insert("b", false);
        obj.insert("z", Value::Null);

        let config = Config::default().with_scalars(ScalarPolicy::Text);
        let mut root = Element::new("root");
        json_to_xml_with_config(&Value::Object(obj), &mut root, &config)?;

        let texts: Vec<_> = root.child_elements().map(Element::text).collect();
        assert_eq!(
            texts,
            vec![
                Some("42".to_string()),
                Some("1.5".to_string()),
                Some("false".to_string()),
                None
            ]
        );
        Ok(())
    }

    #[test]
    fn test_json_invalid_keys_skipped() -> Result<()> {
        let mut obj = Object::new();
        obj.insert("", "empty");
        obj.insert("has space", "x");
        obj.insert("good", "y");

        let mut root = Element::new("root");
        json_to_xml(&Value::Object(obj), &mut root)?;
        assert_eq!(
            root.children,
            vec![Content::Element(Element::with_text("good", "y"))]
        );
        Ok(())
    }

    #[test]
    fn test_json_depth_limit() {
        let mut value = Value::from("leaf");
        for _ in 0..5 {
            value = Value::Object(Object::single("n", value));
        }
        let mut root = Element::new("root");
        let config = Config::new(2, ScalarPolicy::Reject);
        let err = json_to_xml_with_config(&value, &mut root, &config).err();
        assert_eq!(
            err.as_ref().map(Error::kind),
            Some(&ErrorKind::MaxDepthExceeded { max: 2 })
        );
        assert!(root.children.is_empty());
    }
}
