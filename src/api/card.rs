//! JavaScript handle for one formula card
//!
//! The page-side custom element class owns a handle and forwards its
//! lifecycle callbacks; after each call it reads back `shadowHtml` (or
//! `innerHtml`) and patches its isolated root. The bounded stylesheet wait
//! is scheduled here; when it fires the `setOnRender` callback tells the
//! page to read the markup again.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Array, Function};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::helpers::{config_from_js, serialize};
use super::katex::{JsRenderer, KatexRenderer, PageRenderer};
use crate::element::{AttemptTicket, FormulaCard, OBSERVED_ATTRIBUTES};
use crate::{wasm_log, wasm_warn};

#[wasm_bindgen]
pub struct FormulaCardHandle {
    card: Rc<RefCell<FormulaCard>>,
    renderer: Rc<PageRenderer>,
    on_render: Rc<RefCell<Option<Function>>>,
}

impl FormulaCardHandle {
    fn build(card: FormulaCard, renderer: PageRenderer) -> Self {
        Self {
            card: Rc::new(RefCell::new(card)),
            renderer: Rc::new(renderer),
            on_render: Rc::new(RefCell::new(None)),
        }
    }

    /// Schedule the wait for the current attempt unless one already runs
    fn arm_timeout(&self) {
        let Some((ticket, delay_ms)) = self.card.borrow_mut().take_timeout_request() else {
            return;
        };
        let card = Rc::downgrade(&self.card);
        let renderer = Rc::downgrade(&self.renderer);
        let on_render = Rc::downgrade(&self.on_render);
        let callback = Closure::once_into_js(move || timeout_elapsed(card, renderer, on_render, ticket));

        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        let scheduled = web_sys::window()
            .ok_or_else(|| JsValue::from_str("No window"))
            .and_then(|window| {
                window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
            });
        if let Err(e) = scheduled {
            wasm_warn!("stylesheet timeout not scheduled: {:?}", e);
        }
    }
}

/// The wait for `ticket` is over; a dropped handle or a settled sheet
/// makes this a no-op
fn timeout_elapsed(
    card: Weak<RefCell<FormulaCard>>,
    renderer: Weak<PageRenderer>,
    on_render: Weak<RefCell<Option<Function>>>,
    ticket: AttemptTicket,
) {
    let (Some(card), Some(renderer)) = (card.upgrade(), renderer.upgrade()) else {
        return;
    };
    let changed = {
        let mut card = card.borrow_mut();
        let before = card.stylesheet().state();
        card.stylesheet_timed_out(ticket, &*renderer);
        card.stylesheet().state() != before
    };
    if !changed {
        return;
    }
    wasm_log!("stylesheet attempt {} timed out", ticket);

    let Some(slot) = on_render.upgrade() else {
        return;
    };
    let callback = slot.borrow().clone();
    if let Some(callback) = callback {
        if let Err(e) = callback.call0(&JsValue::NULL) {
            wasm_warn!("onRender callback failed: {:?}", e);
        }
    }
}

#[wasm_bindgen]
impl FormulaCardHandle {
    /// Card typeset with the page-global `katex`
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<FormulaCardHandle, JsValue> {
        let config = config_from_js(config)?;
        Ok(Self::build(FormulaCard::new(&config), PageRenderer::Katex(KatexRenderer)))
    }

    /// Card typeset by `render(source, options) => string`
    #[wasm_bindgen(js_name = withRenderer)]
    pub fn with_renderer(config: JsValue, render: Function) -> Result<FormulaCardHandle, JsValue> {
        let config = config_from_js(config)?;
        Ok(Self::build(
            FormulaCard::new(&config),
            PageRenderer::Js(JsRenderer::new(render)),
        ))
    }

    #[wasm_bindgen(js_name = observedAttributes)]
    pub fn observed_attributes() -> Array {
        OBSERVED_ATTRIBUTES.iter().map(|a| JsValue::from_str(a)).collect()
    }

    /// Called with no arguments after a timeout changed the markup
    #[wasm_bindgen(js_name = setOnRender)]
    pub fn set_on_render(&self, callback: Option<Function>) {
        *self.on_render.borrow_mut() = callback;
    }

    pub fn connected(&mut self) {
        self.card.borrow_mut().connected(&*self.renderer);
        self.arm_timeout();
    }

    pub fn disconnected(&mut self) {
        self.card.borrow_mut().disconnected();
    }

    #[wasm_bindgen(js_name = attributeChanged)]
    pub fn attribute_changed(&mut self, name: &str, old_value: Option<String>, new_value: Option<String>) {
        self.card.borrow_mut().attribute_changed(
            name,
            old_value.as_deref(),
            new_value.as_deref(),
            &*self.renderer,
        );
    }

    #[wasm_bindgen(getter)]
    pub fn value(&self) -> String {
        self.card.borrow().value().to_string()
    }

    #[wasm_bindgen(js_name = stylesheetHref)]
    pub fn stylesheet_href(&self) -> String {
        self.card.borrow().stylesheet().href().to_string()
    }

    /// Ticket to pass back with the load/error/timeout event of the current `<link>`
    #[wasm_bindgen(js_name = stylesheetAttempt)]
    pub fn stylesheet_attempt(&self) -> u32 {
        self.card.borrow().stylesheet_attempt()
    }

    #[wasm_bindgen(js_name = stylesheetTimeoutMs)]
    pub fn stylesheet_timeout_ms(&self) -> u32 {
        self.card.borrow().stylesheet_timeout_ms()
    }

    #[wasm_bindgen(js_name = stylesheetLoaded)]
    pub fn stylesheet_loaded(&mut self, ticket: u32) {
        self.card.borrow_mut().stylesheet_loaded(ticket, &*self.renderer);
    }

    /// Returns the href to retry with, if any
    #[wasm_bindgen(js_name = stylesheetFailed)]
    pub fn stylesheet_failed(&mut self, ticket: u32) -> Option<String> {
        let retry = self.card.borrow_mut().stylesheet_failed(ticket, &*self.renderer);
        if retry.is_some() {
            self.arm_timeout();
        }
        retry
    }

    #[wasm_bindgen(js_name = stylesheetTimedOut)]
    pub fn stylesheet_timed_out(&mut self, ticket: u32) {
        self.card.borrow_mut().stylesheet_timed_out(ticket, &*self.renderer);
    }

    #[wasm_bindgen(js_name = stylesheetState)]
    pub fn stylesheet_state(&self) -> Result<JsValue, JsValue> {
        serialize(&self.card.borrow().stylesheet().state(), "Failed to serialize stylesheet state")
    }

    pub fn output(&self) -> Result<JsValue, JsValue> {
        serialize(self.card.borrow().output(), "Failed to serialize card output")
    }

    #[wasm_bindgen(js_name = innerHtml)]
    pub fn inner_html(&self) -> String {
        self.card.borrow().inner_html()
    }

    #[wasm_bindgen(js_name = shadowHtml)]
    pub fn shadow_html(&self) -> String {
        self.card.borrow().shadow_html()
    }
}
