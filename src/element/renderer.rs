//! External math typesetter seam

use serde::Serialize;
use thiserror::Error;

/// Options passed to the typesetter for one render
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    pub display_mode: bool,
    /// `false`: report problems as a diagnostic instead of throwing
    pub throw_on_error: bool,
    pub output: &'static str,
}

impl RenderOptions {
    pub fn new(display_mode: bool) -> Self {
        Self {
            display_mode,
            throw_on_error: false,
            output: "html",
        }
    }
}

/// Diagnostic reported by the typesetter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Turns normalized formula source into visual markup
pub trait MathRenderer {
    fn render(&self, source: &str, options: &RenderOptions) -> Result<String, RenderError>;
}

impl<F> MathRenderer for F
where
    F: Fn(&str, &RenderOptions) -> Result<String, RenderError>,
{
    fn render(&self, source: &str, options: &RenderOptions) -> Result<String, RenderError> {
        self(source, options)
    }
}
