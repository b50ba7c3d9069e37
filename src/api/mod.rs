//! Formula plugin WASM API
//!
//! # Module Structure
//!
//! - `helpers`: console logging, serde conversion and error helpers
//! - `katex`: typesetter bindings
//! - `formula`: stateless normalize/classify/codec/render calls
//! - `card`: the handle behind the page's custom element
//! - `session`: a WASM-owned editor with the formula menus

pub mod helpers;
pub mod katex;
pub mod formula;
pub mod card;
pub mod session;

pub use card::FormulaCardHandle;
pub use formula::{formula_to_html, needs_block_layout, normalize_formula, parse_formula_html, render_formula_vnode};
pub use katex::{JsRenderer, KatexRenderer, PageRenderer};
pub use session::*;
