//! Minimal HTML tag handling shared by the element codecs
//!
//! Tags are tokenized with quick-xml in HTML attribute mode, so boolean
//! attributes without a value (`data-void`) are accepted. Attribute values
//! are decoded with the full HTML entity table.

use std::borrow::Cow;
use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::CodecError;

/// An opening tag with decoded attributes; valueless attributes map to `""`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HtmlElement {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
}

impl HtmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Decode a quick-xml start tag
    pub fn from_start(start: &BytesStart) -> Result<Self, CodecError> {
        let tag = String::from_utf8_lossy(start.name().as_ref()).to_ascii_lowercase();
        let mut attributes = BTreeMap::new();

        for attr in start.html_attributes() {
            let attr = attr.map_err(|e| CodecError::Attribute(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
            let raw = std::str::from_utf8(&attr.value)
                .map_err(|e| CodecError::Attribute(format!("{}: {}", key, e)))?;
            let value = htmlize::unescape_attribute(raw).into_owned();
            attributes.insert(key, value);
        }

        Ok(Self { tag, attributes })
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

/// `tag[attr="value"]`: an exact attribute match on a given tag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selector {
    pub tag: &'static str,
    pub attr: &'static str,
    pub value: &'static str,
}

impl Selector {
    pub fn matches(&self, element: &HtmlElement) -> bool {
        element.tag == self.tag && element.attr(self.attr) == Some(self.value)
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}=\"{}\"]", self.tag, self.attr, self.value)
    }
}

/// Escape a value for a double-quoted attribute (`<`, `>`, `&`, `'`, `"`)
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(value)
}

/// Escape text content (`<`, `>`, `&`)
pub fn escape_text(value: &str) -> Cow<'_, str> {
    quick_xml::escape::partial_escape(value)
}

/// Read the first element tag of a fragment, skipping leading text.
///
/// Returns `Ok(None)` for a fragment that holds no element at all.
pub fn first_element(fragment: &str) -> Result<Option<HtmlElement>, CodecError> {
    let mut reader = Reader::from_str(fragment);
    // a lone opening tag is a valid fragment
    reader.check_end_names(false);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                return HtmlElement::from_start(e).map(Some);
            }
            Ok(Event::Eof) => return Ok(None),
            Ok(_) => {}
            Err(e) => {
                return Err(CodecError::Xml(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
    }
}
