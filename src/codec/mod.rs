//! Persisted HTML form of plugin elements

pub mod formula;
pub mod html;

pub use formula::{elem_to_html, formula_to_html, parse_elem_html, parse_formula_html, FORMULA_SELECTOR};
pub use html::{HtmlElement, Selector};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("html parse error: {0}")]
    Xml(String),
    #[error("invalid attribute: {0}")]
    Attribute(String),
    #[error("not a formula fragment: <{0}>")]
    NotAFormula(String),
    #[error("fragment contains no element")]
    Empty,
}
