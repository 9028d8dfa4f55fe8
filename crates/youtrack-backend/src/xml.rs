//! Minimal element tree over `quick-xml` for the legacy REST endpoints.
//!
//! The legacy API answers with small documents where the interesting data sits
//! in attributes or in the text of leaf elements, so a tree with
//! descendant lookups is all the client needs.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Result, YouTrackError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
    text: String,
}

impl Element {
    /// Parse a document and return its root element
    pub fn parse(xml: &str) -> Result<Element> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => stack.push(Element::from_start(&e)?),
                Event::Empty(e) => {
                    let element = Element::from_start(&e)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    if let Some(element) = stack.pop() {
                        attach(&mut stack, &mut root, element);
                    }
                }
                Event::Text(t) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&t.unescape()?);
                    }
                }
                Event::CData(c) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        root.ok_or_else(|| YouTrackError::MissingElement("document root".to_string()))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Element> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).to_string();
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).to_string();
            let value = attr.unescape_value()?.to_string();
            attrs.push((key, value));
        }
        Ok(Element {
            name,
            attrs,
            children: Vec::new(),
            text: String::new(),
        })
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute that must be present
    pub fn required_attr(&self, name: &str) -> Result<&str> {
        self.attr(name).ok_or_else(|| {
            YouTrackError::MissingElement(format!("{}@{}", self.name, name))
        })
    }

    /// Text of this element and all its descendants, in document order
    pub fn text(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text());
        }
        out
    }

    /// First element named `name`, this element included, depth first
    pub fn find(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Like [`Element::find`] but errors when missing
    pub fn require(&self, name: &str) -> Result<&Element> {
        self.find(name)
            .ok_or_else(|| YouTrackError::MissingElement(name.to_string()))
    }

    /// Every descendant named `name`, in document order
    pub fn find_all<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        for child in &self.children {
            child.collect(name, &mut found);
        }
        found
    }

    fn collect<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        if self.name == name {
            found.push(self);
        }
        for child in &self.children {
            child.collect(name, found);
        }
    }

    /// Direct child whose `name` attribute equals `value`
    pub fn child_with_attr(&self, tag: &str, attr: &str, value: &str) -> Option<&Element> {
        self.children
            .iter()
            .find(|child| child.name == tag && child.attr(attr) == Some(value))
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}
