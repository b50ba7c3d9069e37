//! Formula Plugin WASM Module
//!
//! Inline LaTeX formulas for a rich-text editor: the formula node, source
//! normalization, display-mode classification, the HTML codec, the render
//! adapter, the formula card element and the Insert/Edit menus.

pub mod models;
pub mod formula;
pub mod codec;
pub mod render;
pub mod element;
pub mod menu;
pub mod editor;
pub mod plugin;
pub mod api;

// Re-export commonly used types
pub use models::{Element, FormulaElement, Node, Text, FORMULA_TYPE};
pub use formula::{needs_block_layout, normalize, DisplayMode, FormulaConfig};
pub use plugin::formula_module;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    init_logger();

    log::info!("Formula plugin WASM module initialized");
}

#[cfg(feature = "console_log")]
fn init_logger() {
    if console_log::init_with_level(log::Level::Debug).is_err() {
        wasm_warn!("logger already initialized");
    }
}

#[cfg(not(feature = "console_log"))]
fn init_logger() {}
