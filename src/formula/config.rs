//! Plugin configuration
//!
//! Everything user-visible or environment-specific lives here so the host
//! page can override it from JavaScript (camelCase keys).

use serde::{Deserialize, Serialize};

/// Configuration shared by the card, the render adapter and the menus
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FormulaConfig {
    /// Tag name of the custom visual element
    pub card_tag: String,

    /// Stylesheet loaded into each card first
    pub stylesheet_url: String,

    /// Stylesheet tried once when the primary fails to load
    pub fallback_stylesheet_url: String,

    /// Upper bound on how long a card waits for a stylesheet (milliseconds)
    pub stylesheet_timeout_ms: u32,

    /// CSS colour of the border drawn around a selected formula
    pub selected_border_color: String,

    /// CSS colour of inline render errors
    pub error_color: String,

    /// Text placed before the renderer diagnostic
    pub error_prefix: String,

    /// Modal width in pixels
    pub modal_width: u32,

    pub textarea_label: String,
    pub textarea_placeholder: String,
    pub confirm_label: String,
    pub insert_title: String,
    pub edit_title: String,
}

impl Default for FormulaConfig {
    fn default() -> Self {
        Self {
            card_tag: "formula-card".to_string(),
            stylesheet_url: "https://cdn.jsdelivr.net/npm/katex@0.16.0/dist/katex.min.css".to_string(),
            fallback_stylesheet_url: "/node_modules/katex/dist/katex.min.css".to_string(),
            stylesheet_timeout_ms: 3000,
            selected_border_color: "var(--w-e-textarea-selected-border-color)".to_string(),
            error_color: "#cc0000".to_string(),
            error_prefix: "Formula error: ".to_string(),
            modal_width: 300,
            textarea_label: "Formula".to_string(),
            textarea_placeholder: "Enter a LaTeX formula (no $ needed)".to_string(),
            confirm_label: "OK".to_string(),
            insert_title: "Insert formula".to_string(),
            edit_title: "Edit formula".to_string(),
        }
    }
}

impl FormulaConfig {
    /// Parse a partial JSON override; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
