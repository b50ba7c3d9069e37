//! The formula card: a style-isolated element that typesets one formula
//!
//! The card owns its rendered markup as derived state. Every real change of
//! `data-value` re-runs normalize → display mode → typesetter; a bad formula
//! turns into an inline error inside the card and never reaches the host.

use serde::Serialize;

use super::renderer::{MathRenderer, RenderOptions};
use super::stylesheet::{AttemptTicket, SheetTransition, StylesheetLoader};
use crate::codec::html::{escape_attr, escape_text};
use crate::formula::{normalize, DisplayMode, FormulaConfig};

pub const VALUE_ATTRIBUTE: &str = "data-value";

/// Attributes the card reacts to
pub const OBSERVED_ATTRIBUTES: [&str; 1] = [VALUE_ATTRIBUTE];

/// What the card currently shows
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum CardOutput {
    Empty,
    Rendered(String),
    Error(String),
}

#[derive(Debug)]
pub struct FormulaCard {
    value: String,
    connected: bool,
    /// A render is owed once the stylesheet settles
    pending: bool,
    sheet: StylesheetLoader,
    output: CardOutput,
    /// Last source handed to the typesetter, with its display mode
    last_render: Option<(String, DisplayMode)>,
    error_color: String,
    error_prefix: String,
    timeout_ms: u32,
    /// Attempt whose bounded wait has already been scheduled
    armed: Option<AttemptTicket>,
}

impl FormulaCard {
    pub fn new(config: &FormulaConfig) -> Self {
        Self {
            value: String::new(),
            connected: false,
            pending: false,
            sheet: StylesheetLoader::new(
                config.stylesheet_url.as_str(),
                config.fallback_stylesheet_url.as_str(),
            ),
            output: CardOutput::Empty,
            last_render: None,
            error_color: config.error_color.clone(),
            error_prefix: config.error_prefix.clone(),
            timeout_ms: config.stylesheet_timeout_ms,
            armed: None,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn output(&self) -> &CardOutput {
        &self.output
    }

    pub fn stylesheet(&self) -> &StylesheetLoader {
        &self.sheet
    }

    pub fn last_render(&self) -> Option<&(String, DisplayMode)> {
        self.last_render.as_ref()
    }

    /// First attachment (or re-attachment) to the visual tree
    pub fn connected(&mut self, renderer: &dyn MathRenderer) {
        self.connected = true;
        if self.value.is_empty() {
            self.output = CardOutput::Empty;
            return;
        }
        self.request_render(renderer);
    }

    pub fn disconnected(&mut self) {
        self.connected = false;
        self.pending = false;
    }

    /// Attribute change notification. Same-value updates are a no-op.
    pub fn attribute_changed(
        &mut self,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
        renderer: &dyn MathRenderer,
    ) {
        if name != VALUE_ATTRIBUTE || old_value == new_value {
            return;
        }
        let next = new_value.unwrap_or_default();
        if next == self.value {
            return;
        }
        self.value = next.to_string();
        if self.connected {
            self.request_render(renderer);
        }
    }

    /// Set `data-value` the way the DOM would, firing the change callback
    pub fn set_value(&mut self, value: &str, renderer: &dyn MathRenderer) {
        let old = self.value.clone();
        self.attribute_changed(VALUE_ATTRIBUTE, Some(&old), Some(value), renderer);
    }

    pub fn stylesheet_attempt(&self) -> AttemptTicket {
        self.sheet.attempt()
    }

    pub fn stylesheet_timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// The wait to schedule for the current load attempt. Yields each
    /// attempt once, and nothing after the sheet settles.
    pub fn take_timeout_request(&mut self) -> Option<(AttemptTicket, u32)> {
        let attempt = self.sheet.attempt();
        if self.sheet.is_settled() || self.armed == Some(attempt) {
            return None;
        }
        self.armed = Some(attempt);
        Some((attempt, self.timeout_ms))
    }

    pub fn stylesheet_loaded(&mut self, ticket: AttemptTicket, renderer: &dyn MathRenderer) {
        let transition = self.sheet.on_load(ticket);
        self.after_sheet_event(transition, renderer);
    }

    /// Returns the fallback href when the page should retry with it
    pub fn stylesheet_failed(
        &mut self,
        ticket: AttemptTicket,
        renderer: &dyn MathRenderer,
    ) -> Option<String> {
        match self.sheet.on_error(ticket) {
            SheetTransition::Retry(href) => Some(href),
            transition => {
                self.after_sheet_event(transition, renderer);
                None
            }
        }
    }

    pub fn stylesheet_timed_out(&mut self, ticket: AttemptTicket, renderer: &dyn MathRenderer) {
        let transition = self.sheet.on_timeout(ticket);
        self.after_sheet_event(transition, renderer);
    }

    fn after_sheet_event(&mut self, transition: SheetTransition, renderer: &dyn MathRenderer) {
        if transition == SheetTransition::Settled && self.pending && self.connected {
            self.pending = false;
            self.render(renderer);
        }
    }

    fn request_render(&mut self, renderer: &dyn MathRenderer) {
        if self.sheet.is_settled() {
            self.pending = false;
            self.render(renderer);
        } else {
            self.pending = true;
        }
    }

    fn render(&mut self, renderer: &dyn MathRenderer) {
        let source = normalize(&self.value);
        if source.is_empty() {
            self.output = CardOutput::Empty;
            self.last_render = None;
            return;
        }

        let mode = DisplayMode::for_source(&source);
        log::debug!("rendering formula {:?} ({:?})", source, mode);

        self.output = match renderer.render(&source, &RenderOptions::new(mode.is_block())) {
            Ok(markup) => CardOutput::Rendered(markup),
            Err(e) => {
                log::warn!("formula render failed: {}", e);
                CardOutput::Error(e.message)
            }
        };
        self.last_render = Some((source, mode));
    }

    /// Markup for the card's content span
    pub fn inner_html(&self) -> String {
        match &self.output {
            CardOutput::Empty => String::new(),
            CardOutput::Rendered(markup) => markup.clone(),
            CardOutput::Error(message) => format!(
                r#"<span style="color: {};">{}{}</span>"#,
                escape_attr(&self.error_color),
                escape_text(&self.error_prefix),
                escape_text(message)
            ),
        }
    }

    /// Full isolated-root content: stylesheet link plus content span
    pub fn shadow_html(&self) -> String {
        format!(
            r#"<link rel="stylesheet" href="{}"><span style="display: inline-block">{}</span>"#,
            escape_attr(self.sheet.href()),
            self.inner_html()
        )
    }
}
