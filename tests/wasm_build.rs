//! WASM build test
//!
//! Exercises the JavaScript-facing functions that need no typesetter.

use formula_plugin_wasm::api::*;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_normalize_formula() {
    assert_eq!(normalize_formula(" $$\\begin{equation}x\\end{equation}$$ "), "\\begin{equation*}x\\end{equation*}");
    assert!(needs_block_layout("\\begin{gather*}a\\end{gather*}"));
    assert!(!needs_block_layout("x^2"));
}

#[wasm_bindgen_test]
fn test_formula_html_roundtrip() {
    let html = formula_to_html("a < b");
    assert_eq!(parse_formula_html(&html).unwrap(), "a < b");
    assert!(parse_formula_html("<p></p>").is_err());
}

#[wasm_bindgen_test]
fn test_session_insert_flow() {
    create_editor(JsValue::UNDEFINED).unwrap();
    set_html("<p>ab</p>").unwrap();
    set_caret(serde_wasm_bindgen::to_value(&vec![0usize, 0]).unwrap(), 1).unwrap();

    open_menu("insertFormula").unwrap();
    menu_input("insertFormula", "x^2").unwrap();
    assert_eq!(commit_menu("insertFormula").unwrap(), "committed");
    assert_eq!(
        get_html().unwrap(),
        r#"<p>a<span data-formula-type="formula" data-void data-inline data-value="x^2"></span>b</p>"#
    );
}
