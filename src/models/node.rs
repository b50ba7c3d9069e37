//! Document tree nodes
//!
//! The document is a tree of elements and text leaves, shaped the way the
//! host editor stores it: every element has a `type`, an open set of
//! properties, and a non-empty `children` array.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Node type discriminator for formula elements
pub const FORMULA_TYPE: &str = "formula";

/// Identity of an element inside one editor instance.
///
/// Zero means "not yet attached to a document".
pub type NodeKey = u64;

/// A text leaf
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Text {
    pub text: String,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The placeholder leaf carried by void elements
    pub fn empty() -> Self {
        Self::default()
    }
}

/// A typed element with arbitrary extra properties
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Element {
    #[serde(rename = "type")]
    pub node_type: String,

    /// Assigned by the editor on insertion; not persisted
    #[serde(skip)]
    pub key: NodeKey,

    /// Type-specific fields (`value` for formulas, `url` for links, ...)
    #[serde(flatten)]
    pub props: Map<String, Value>,

    #[serde(default)]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(node_type: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            node_type: node_type.into(),
            key: 0,
            props: Map::new(),
            children,
        }
    }

    /// Build an element whose only child is an empty text leaf
    pub fn with_placeholder(node_type: impl Into<String>) -> Self {
        Self::new(node_type, vec![Node::Text(Text::empty())])
    }

    pub fn is_type(&self, node_type: &str) -> bool {
        self.node_type == node_type
    }

    /// Read a string property, `None` when absent or not a string
    pub fn prop_str(&self, name: &str) -> Option<&str> {
        self.props.get(name).and_then(Value::as_str)
    }

    pub fn set_prop(&mut self, name: &str, value: impl Into<Value>) {
        self.props.insert(name.to_string(), value.into());
    }
}

/// Either kind of tree node
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Node {
    Element(Element),
    Text(Text),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(Text::new(text))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(t) => Some(t),
            Node::Element(_) => None,
        }
    }

    /// Host-level type name; text leaves report `"text"`
    pub fn node_type(&self) -> &str {
        match self {
            Node::Element(e) => &e.node_type,
            Node::Text(_) => "text",
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(e) => &e.children,
            Node::Text(_) => &[],
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

/// Typed view of a formula element.
///
/// The raw `value` is kept exactly as authored; normalization only happens
/// when the card renders it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct FormulaElement {
    pub value: String,
}

impl FormulaElement {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }

    /// View an element as a formula. A missing `value` reads as empty.
    pub fn from_element(element: &Element) -> Option<Self> {
        if !element.is_type(FORMULA_TYPE) {
            return None;
        }
        Some(Self::new(element.prop_str("value").unwrap_or_default()))
    }

    pub fn from_node(node: &Node) -> Option<Self> {
        node.as_element().and_then(Self::from_element)
    }

    /// Build the canonical element: the value plus one empty text child
    pub fn into_element(self) -> Element {
        let mut element = Element::with_placeholder(FORMULA_TYPE);
        element.set_prop("value", self.value);
        element
    }

    pub fn into_node(self) -> Node {
        Node::Element(self.into_element())
    }
}

/// Check the single-empty-child shape every void element must keep
pub fn has_canonical_children(element: &Element) -> bool {
    matches!(element.children.as_slice(), [Node::Text(t)] if t.text.is_empty())
}
