//! Typesetter bindings
//!
//! `KatexRenderer` calls the page-global `katex.renderToString`. A page can
//! also hand in any `(source, options) => string` function instead.

use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::element::{MathRenderer, RenderError, RenderOptions};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = katex, js_name = renderToString, catch)]
    fn katex_render_to_string(source: &str, options: &JsValue) -> Result<String, JsValue>;
}

fn options_to_js(options: &RenderOptions) -> Result<JsValue, RenderError> {
    serde_wasm_bindgen::to_value(options).map_err(|e| RenderError::new(e.to_string()))
}

/// Message of a thrown JavaScript value
fn thrown_message(thrown: JsValue) -> RenderError {
    if let Some(error) = thrown.dyn_ref::<js_sys::Error>() {
        return RenderError::new(String::from(error.message()));
    }
    RenderError::new(thrown.as_string().unwrap_or_else(|| format!("{:?}", thrown)))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct KatexRenderer;

impl MathRenderer for KatexRenderer {
    fn render(&self, source: &str, options: &RenderOptions) -> Result<String, RenderError> {
        let js_options = options_to_js(options)?;
        katex_render_to_string(source, &js_options).map_err(thrown_message)
    }
}

/// Renderer backed by a JavaScript callback
#[derive(Clone, Debug)]
pub struct JsRenderer {
    callback: Function,
}

impl JsRenderer {
    pub fn new(callback: Function) -> Self {
        Self { callback }
    }
}

impl MathRenderer for JsRenderer {
    fn render(&self, source: &str, options: &RenderOptions) -> Result<String, RenderError> {
        let js_options = options_to_js(options)?;
        let result = self
            .callback
            .call2(&JsValue::NULL, &JsValue::from_str(source), &js_options)
            .map_err(thrown_message)?;
        result
            .as_string()
            .ok_or_else(|| RenderError::new("renderer returned a non-string value"))
    }
}

/// Either binding, chosen when a card is created
#[derive(Clone, Debug)]
pub enum PageRenderer {
    Katex(KatexRenderer),
    Js(JsRenderer),
}

impl MathRenderer for PageRenderer {
    fn render(&self, source: &str, options: &RenderOptions) -> Result<String, RenderError> {
        match self {
            PageRenderer::Katex(katex) => katex.render(source, options),
            PageRenderer::Js(js) => js.render(source, options),
        }
    }
}
