//! Formula render adapter
//!
//! Produces the visual node for a formula element. Glyph rendering is done
//! by the card element; this only wires the raw value into it.

use super::vnode::VNode;
use crate::formula::FormulaConfig;
use crate::models::{Element, FormulaElement};

pub const CONTAINER_CLASS: &str = "w-e-textarea-formula-container";

/// Outer non-editable wrapper around one card.
///
/// Pure: the same element, flag and config always give the same tree.
pub fn render_formula(element: &Element, selected: bool, config: &FormulaConfig) -> VNode {
    let formula = FormulaElement::from_element(element).unwrap_or_default();

    let card = VNode::new(config.card_tag.as_str()).data("value", &formula.value);

    let border_color = if selected {
        config.selected_border_color.as_str()
    } else {
        "transparent"
    };

    VNode::new("div")
        .class(CONTAINER_CLASS)
        .prop("contentEditable", "false")
        .style("display", "inline-block")
        .style("marginLeft", "3px")
        .style("marginRight", "3px")
        .style("border", &format!("2px solid {}", border_color))
        .style("borderRadius", "3px")
        .style("padding", "3px 3px")
        .child(card)
}
