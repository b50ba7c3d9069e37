//! Formula element ⇄ HTML fragment
//!
//! ```text
//! <span data-formula-type="formula" data-void data-inline data-value="RAW"></span>
//! ```
//!
//! The value is written verbatim (attribute-escaped, never normalized) so an
//! export/import cycle preserves exactly what the author typed.

use super::html::{escape_attr, first_element, HtmlElement, Selector};
use super::CodecError;
use crate::models::{Element, FormulaElement, FORMULA_TYPE};

pub const TYPE_ATTR: &str = "data-formula-type";
pub const VALUE_ATTR: &str = "data-value";
pub const VOID_ATTR: &str = "data-void";
pub const INLINE_ATTR: &str = "data-inline";

/// Parser selector for formula fragments
pub const FORMULA_SELECTOR: Selector = Selector {
    tag: "span",
    attr: TYPE_ATTR,
    value: FORMULA_TYPE,
};

/// Serialize a formula; no children are emitted
pub fn formula_to_html(formula: &FormulaElement) -> String {
    format!(
        r#"<span {}="{}" {} {} {}="{}"></span>"#,
        TYPE_ATTR,
        FORMULA_TYPE,
        VOID_ATTR,
        INLINE_ATTR,
        VALUE_ATTR,
        escape_attr(&formula.value)
    )
}

/// Serializer entry point registered with the host, keyed by node type
pub fn elem_to_html(element: &Element, _children_html: &str) -> String {
    let formula = FormulaElement::from_element(element).unwrap_or_default();
    formula_to_html(&formula)
}

/// Parser entry point registered with the host for [`FORMULA_SELECTOR`].
///
/// An absent `data-value` decodes to an empty formula.
pub fn parse_elem_html(html: &HtmlElement) -> Element {
    let value = html.attr(VALUE_ATTR).unwrap_or_default();
    FormulaElement::new(value).into_element()
}

/// Parse a standalone fragment
pub fn parse_formula_html(fragment: &str) -> Result<FormulaElement, CodecError> {
    let html = first_element(fragment)?.ok_or(CodecError::Empty)?;
    if !FORMULA_SELECTOR.matches(&html) {
        return Err(CodecError::NotAFormula(html.tag));
    }
    Ok(FormulaElement::new(html.attr(VALUE_ATTR).unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::has_canonical_children;

    fn roundtrip(value: &str) -> String {
        let html = formula_to_html(&FormulaElement::new(value));
        parse_formula_html(&html).unwrap().value
    }

    #[test]
    fn test_serialized_shape() {
        let html = formula_to_html(&FormulaElement::new("x^2"));
        assert_eq!(
            html,
            r#"<span data-formula-type="formula" data-void data-inline data-value="x^2"></span>"#
        );
    }

    #[test]
    fn test_value_is_not_normalized_on_export() {
        let html = formula_to_html(&FormulaElement::new("  $$\\begin{align}a\\end{align}$$ "));
        assert!(html.contains(r#"data-value="  $$\begin{align}a\end{align}$$ ""#));
    }

    #[test]
    fn test_roundtrip_preserves_awkward_values() {
        for value in [
            "",
            "x^2",
            r#"\text{"quoted"}"#,
            "a < b > c",
            "a &amp; b & c",
            r"\frac{1}{2}\\ \left( x \right)",
            "it's",
            "line one\nline two",
        ] {
            assert_eq!(roundtrip(value), value);
        }
    }

    #[test]
    fn test_missing_value_attribute_is_empty() {
        let formula = parse_formula_html(r#"<span data-formula-type="formula"></span>"#).unwrap();
        assert_eq!(formula.value, "");
    }

    #[test]
    fn test_self_closing_fragment_is_accepted() {
        let formula =
            parse_formula_html(r#"<span data-formula-type="formula" data-value="y" />"#).unwrap();
        assert_eq!(formula.value, "y");
    }

    #[test]
    fn test_other_fragments_rejected() {
        assert!(matches!(
            parse_formula_html(r#"<span data-formula-type="image" data-value="x"></span>"#),
            Err(CodecError::NotAFormula(_))
        ));
        assert!(matches!(
            parse_formula_html(r#"<div data-formula-type="formula"></div>"#),
            Err(CodecError::NotAFormula(_))
        ));
        assert!(matches!(parse_formula_html(""), Err(CodecError::Empty)));
    }

    #[test]
    fn test_parse_elem_builds_canonical_node() {
        let html = HtmlElement::new("span")
            .with_attr(TYPE_ATTR, FORMULA_TYPE)
            .with_attr(VALUE_ATTR, "z");
        let element = parse_elem_html(&html);

        assert_eq!(element.prop_str("value"), Some("z"));
        assert!(has_canonical_children(&element));
    }
}
