//! Insert/Edit menus driven the way a toolbar and hover bar drive them

use std::sync::Arc;

use formula_plugin_wasm::editor::memory::paragraph;
use formula_plugin_wasm::editor::{EditorHost, MemoryEditor, PluginRegistry};
use formula_plugin_wasm::menu::edit::EDIT_FORMULA_KEY;
use formula_plugin_wasm::menu::insert::INSERT_FORMULA_KEY;
use formula_plugin_wasm::menu::{CommitOutcome, ModalMenu};
use formula_plugin_wasm::models::has_canonical_children;
use formula_plugin_wasm::render::VNode;
use formula_plugin_wasm::{formula_module, FormulaConfig, FormulaElement, Node, FORMULA_TYPE};

fn setup() -> (MemoryEditor, Box<dyn ModalMenu>, Box<dyn ModalMenu>) {
    let config = FormulaConfig::default();
    let mut plugins = PluginRegistry::default();
    plugins.register_module(formula_module(&config)).unwrap();
    let insert = plugins.create_menu(INSERT_FORMULA_KEY, &config).unwrap();
    let edit = plugins.create_menu(EDIT_FORMULA_KEY, &config).unwrap();
    let editor = MemoryEditor::new(Arc::new(plugins), config);
    (editor, insert, edit)
}

fn card_of(vnode: &VNode) -> &VNode {
    &vnode.children[0]
}

#[test]
fn test_insert_then_edit_through_hoverbar() {
    let (mut editor, mut insert, mut edit) = setup();
    editor.set_children(vec![paragraph(vec![Node::text("area = ")])]);
    editor.set_caret(vec![0, 0], 7);

    assert!(!insert.is_disabled(&editor));
    assert!(edit.is_disabled(&editor));
    insert.open(&editor).unwrap();
    editor.blur();
    insert.input("\\pi r^2");
    assert_eq!(insert.commit(&mut editor), Ok(CommitOutcome::Committed));

    // caret on the new formula: the hover bar offers edit
    let (path, element) = editor.elements_of_type(FORMULA_TYPE).remove(0);
    assert_eq!(editor.plugins().hoverbar_menu_keys(&element.node_type), vec![EDIT_FORMULA_KEY]);
    let mut leaf = path.clone();
    leaf.push(0);
    editor.set_caret(leaf, 0);
    assert!(insert.is_disabled(&editor));
    assert!(!edit.is_disabled(&editor));
    assert_eq!(edit.get_value(&editor), "\\pi r^2");

    edit.open(&editor).unwrap();
    editor.blur();
    edit.input("\\pi d^2 / 4");
    assert_eq!(edit.commit(&mut editor), Ok(CommitOutcome::Committed));

    let (_, edited) = editor.elements_of_type(FORMULA_TYPE).remove(0);
    assert_eq!(edited.key, element.key);
    assert_eq!(FormulaElement::from_element(&edited).unwrap().value, "\\pi d^2 / 4");
}

#[test]
fn test_void_classification_comes_from_the_overlay() {
    let (editor, _, _) = setup();
    let formula = FormulaElement::new("x").into_element();
    assert!(editor.is_inline(&formula));
    assert!(editor.is_void(&formula));

    let paragraph = paragraph(vec![Node::text("p")]);
    let paragraph = paragraph.as_element().unwrap();
    assert!(!editor.is_inline(paragraph));
    assert!(!editor.is_void(paragraph));
}

#[test]
fn test_rendered_formula_reflects_selection() {
    let (mut editor, _, _) = setup();
    editor.set_children(vec![paragraph(vec![
        Node::text("a"),
        FormulaElement::new("x^2").into_node(),
        Node::text("b"),
    ])]);

    let unselected = editor.render();
    let container = &unselected[0].children[1];
    assert_eq!(container.props.get("contentEditable").map(String::as_str), Some("false"));
    assert_eq!(container.style_value("border"), Some("2px solid transparent"));
    assert_eq!(card_of(container).dataset.get("value").map(String::as_str), Some("x^2"));

    editor.set_caret(vec![0, 1, 0], 0);
    let selected = editor.render();
    assert_eq!(
        selected[0].children[1].style_value("border"),
        Some("2px solid var(--w-e-textarea-selected-border-color)")
    );
}

#[test]
fn test_cancelled_dialog_leaves_document_alone() {
    let (mut editor, mut insert, _) = setup();
    editor.set_children(vec![paragraph(vec![Node::text("x")])]);
    editor.set_caret(vec![0, 0], 1);
    let before = editor.to_html();

    insert.open(&editor).unwrap();
    insert.input("y");
    assert!(insert.handle_key("Escape"));
    assert_eq!(insert.commit(&mut editor), Ok(CommitOutcome::NotOpen));
    assert_eq!(editor.to_html(), before);
}

#[test]
fn test_inserted_source_is_stored_as_typed() {
    let (mut editor, mut insert, _) = setup();
    editor.set_children(vec![paragraph(vec![Node::text("see ")])]);
    editor.set_caret(vec![0, 0], 4);

    insert.open(&editor).unwrap();
    editor.blur();
    insert.input("$$\\begin{align}a\\end{align}$$");
    assert_eq!(insert.commit(&mut editor), Ok(CommitOutcome::Committed));

    // delimiters and the unstarred environment only go away at render time
    let (_, element) = editor.elements_of_type(FORMULA_TYPE).remove(0);
    assert_eq!(
        FormulaElement::from_element(&element).unwrap().value,
        "$$\\begin{align}a\\end{align}$$"
    );
    assert!(has_canonical_children(&element));
}
