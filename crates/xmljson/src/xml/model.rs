//! XML data model
//!
//! The tree is exclusively owned: a parent holds its children by value, there
//! are no back-links, and `Clone` is a deep copy of the whole subtree.
//! Dropping is iterative, so a tree of any depth can be released.

/// XML declaration (`<?xml version="1.0" ...?>`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

impl Default for Declaration {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: None,
            standalone: None,
        }
    }
}

/// XML document: an optional declaration followed by top-level nodes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub declaration: Option<Declaration>,
    pub children: Vec<Content>,
}

/// XML element
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub children: Vec<Content>,
}

impl Drop for Element {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(content) = pending.pop() {
            if let Content::Element(mut element) = content {
                pending.append(&mut element.children);
            }
        }
    }
}

/// XML content node
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Element whose only content is `text`
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.push_text(text);
        element
    }

    /// Link `child` as the new last child
    pub fn push_child(&mut self, child: Self) {
        self.children.push(Content::Element(child));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Content::Text(text.into()));
    }

    /// Concatenated text nodes, `None` when the element holds no text
    pub fn text(&self) -> Option<String> {
        let mut text: Option<String> = None;
        for child in &self.children {
            if let Content::Text(value) = child {
                text.get_or_insert_with(String::new).push_str(value);
            }
        }
        text
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_declaration(declaration: Declaration) -> Self {
        Self {
            declaration: Some(declaration),
            children: Vec::new(),
        }
    }

    /// First top-level element
    pub fn root(&self) -> Option<&Element> {
        self.first_child_element()
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(Content::Element(child));
    }

    pub fn push_comment(&mut self, comment: impl Into<String>) {
        self.children.push(Content::Comment(comment.into()));
    }
}

/// Anything that owns an ordered list of content nodes
pub trait Parent {
    fn children(&self) -> &[Content];

    /// Child elements in document order, skipping text and comments
    fn child_elements(&self) -> ChildElements<'_> {
        ChildElements {
            inner: self.children().iter(),
        }
    }

    fn first_child_element(&self) -> Option<&Element> {
        self.child_elements().next()
    }

    fn has_child_elements(&self) -> bool {
        self.first_child_element().is_some()
    }
}

impl Parent for Element {
    fn children(&self) -> &[Content] {
        &self.children
    }
}

impl Parent for Document {
    fn children(&self) -> &[Content] {
        &self.children
    }
}

/// Iterator over the element children of a [`Parent`]
#[derive(Clone, Debug)]
pub struct ChildElements<'a> {
    inner: std::slice::Iter<'a, Content>,
}

impl<'a> Iterator for ChildElements<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find_map(|content| match content {
            Content::Element(element) => Some(element),
            Content::Text(_) | Content::Comment(_) => None,
        })
    }
}
