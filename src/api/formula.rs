//! Stateless formula operations for JavaScript

use wasm_bindgen::prelude::*;

use super::helpers::{config_from_js, deserialize, js_error, serialize};
use crate::codec;
use crate::formula;
use crate::models::{Element, FormulaElement};
use crate::render;

/// Strip delimiters, decode entities and star numbered environments
#[wasm_bindgen(js_name = normalizeFormula)]
pub fn normalize_formula(raw: &str) -> String {
    formula::normalize(raw)
}

/// Whether normalized source must be typeset in display mode
#[wasm_bindgen(js_name = needsBlockLayout)]
pub fn needs_block_layout(normalized: &str) -> bool {
    formula::needs_block_layout(normalized)
}

/// Formula value → canonical HTML fragment
#[wasm_bindgen(js_name = formulaToHtml)]
pub fn formula_to_html(value: &str) -> String {
    codec::formula_to_html(&FormulaElement::new(value))
}

/// HTML fragment → formula value
#[wasm_bindgen(js_name = parseFormulaHtml)]
pub fn parse_formula_html(fragment: &str) -> Result<String, JsValue> {
    codec::parse_formula_html(fragment)
        .map(|formula| formula.value)
        .map_err(|e| js_error("Failed to parse formula HTML", e))
}

/// Visual tree for one formula element
#[wasm_bindgen(js_name = renderFormulaVNode)]
pub fn render_formula_vnode(element: JsValue, selected: bool, config: JsValue) -> Result<JsValue, JsValue> {
    let element: Element = deserialize(element, "Failed to deserialize formula element")?;
    let config = config_from_js(config)?;
    let vnode = render::render_formula(&element, selected, &config);
    serialize(&vnode, "Failed to serialize formula vnode")
}
