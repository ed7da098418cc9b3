//! Owned element tree for the game's XML save documents.
//!
//! Save documents are small (a few hundred kilobytes at most), so they are
//! read fully into memory and walked as a tree instead of being streamed.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed XML: {0}")]
    Malformed(String),

    #[error("No root element found in XML")]
    NoRoot,

    #[error("<{element}> is missing attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    #[error("<{element}> is missing child element <{child}>")]
    MissingChild { element: String, child: String },

    #[error("<{element}> attribute '{attribute}' has invalid value '{value}'")]
    InvalidValue {
        element: String,
        attribute: String,
        value: String,
    },
}

/// A parsed XML element with its attributes, children and text content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Read and parse an XML document from disk, returning its root element
    pub fn read_file(path: &Path) -> Result<Self, XmlError> {
        let text = fs::read_to_string(path).map_err(|source| XmlError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse XML text, returning the root element
    pub fn parse(xml: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    stack.push(element_from_start(&e)?);
                }
                Ok(Event::Empty(e)) => {
                    let node = element_from_start(&e)?;
                    attach(&mut stack, &mut root, node)?;
                }
                Ok(Event::End(_)) => {
                    if let Some(node) = stack.pop() {
                        attach(&mut stack, &mut root, node)?;
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(node) = stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| XmlError::Malformed(e.to_string()))?;
                        node.text.push_str(text.trim());
                    }
                }
                Ok(Event::Eof) => break,
                // Declarations, comments, processing instructions
                Ok(_) => {}
                Err(e) => return Err(XmlError::Malformed(e.to_string())),
            }
        }

        if let Some(open) = stack.last() {
            return Err(XmlError::Malformed(format!(
                "unexpected end of document inside <{}>",
                open.name
            )));
        }

        root.ok_or(XmlError::NoRoot)
    }

    /// Iterate over direct children with the given tag name
    pub fn children<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == tag)
    }

    /// First direct child with the given tag name
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == tag)
    }

    pub fn required_child(&self, tag: &str) -> Result<&Element, XmlError> {
        self.child(tag).ok_or_else(|| XmlError::MissingChild {
            element: self.name.clone(),
            child: tag.to_string(),
        })
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn required_attr(&self, name: &str) -> Result<&str, XmlError> {
        self.attr(name).ok_or_else(|| XmlError::MissingAttribute {
            element: self.name.clone(),
            attribute: name.to_string(),
        })
    }

    /// Parse a required attribute with `FromStr`
    pub fn parse_attr<T: FromStr>(&self, name: &str) -> Result<T, XmlError> {
        let raw = self.required_attr(name)?;
        raw.trim().parse().map_err(|_| self.invalid(name, raw))
    }

    /// Parse a required attribute holding an amount: finite and not negative
    pub fn parse_quantity(&self, name: &str) -> Result<f64, XmlError> {
        let value: f64 = self.parse_attr(name)?;
        if !value.is_finite() || value < 0.0 {
            return Err(self.invalid(name, self.required_attr(name)?));
        }
        Ok(value)
    }

    fn invalid(&self, attribute: &str, value: &str) -> XmlError {
        XmlError::InvalidValue {
            element: self.name.clone(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text content of a required child element, e.g. `<mapId>FarmMap01</mapId>`
    pub fn child_text(&self, tag: &str) -> Result<&str, XmlError> {
        Ok(self.required_child(tag)?.text())
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, XmlError> {
    let mut node = Element::new(String::from_utf8_lossy(start.name().as_ref()));

    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::Malformed(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| XmlError::Malformed(e.to_string()))?
            .into_owned();
        node.attributes.push((key, value));
    }

    Ok(node)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    node: Element,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if root.is_some() {
        return Err(XmlError::Malformed(format!(
            "second root element <{}>",
            node.name
        )));
    } else {
        *root = Some(node);
    }
    Ok(())
}
