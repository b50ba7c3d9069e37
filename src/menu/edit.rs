//! Edit formula command
//!
//! The dialog is bound to the formula selected when it opened. Commit looks
//! that node up again by identity and only rewrites its `value`.

use serde_json::{Map, Value};

use super::{FormulaCommand, ModalMode};
use crate::editor::{EditorError, EditorHost};
use crate::formula::FormulaConfig;
use crate::models::{Element, FormulaElement, NodeKey, Path, FORMULA_TYPE};

pub const EDIT_FORMULA_KEY: &str = "editFormula";

pub const PENCIL_SVG: &str = r#"<svg viewBox="0 0 1024 1024"><path d="M736 96l192 192-544 544H192V640zM192 896h640v64H192z"></path></svg>"#;

pub struct EditFormulaCommand {
    title: String,
}

impl EditFormulaCommand {
    pub fn new(config: &FormulaConfig) -> Self {
        Self {
            title: config.edit_title.clone(),
        }
    }

    fn selected_formula(&self, host: &dyn EditorHost) -> Option<(Path, Element)> {
        host.selected_node_by_type(FORMULA_TYPE)
    }
}

impl FormulaCommand for EditFormulaCommand {
    fn key(&self) -> &'static str {
        EDIT_FORMULA_KEY
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn icon_svg(&self) -> &'static str {
        PENCIL_SVG
    }

    fn mode(&self) -> ModalMode {
        ModalMode::Edit
    }

    fn is_disabled(&self, host: &dyn EditorHost) -> bool {
        match host.selection() {
            None => true,
            Some(selection) if selection.is_expanded() => true,
            Some(_) => self.selected_formula(host).is_none(),
        }
    }

    fn get_value(&self, host: &dyn EditorHost) -> String {
        self.selected_formula(host)
            .and_then(|(_, element)| FormulaElement::from_element(&element))
            .map(|formula| formula.value)
            .unwrap_or_default()
    }

    fn modal_position_node(&self, host: &dyn EditorHost) -> Option<(Path, Element)> {
        self.selected_formula(host)
    }

    fn commit(
        &self,
        host: &mut dyn EditorHost,
        value: &str,
        target: Option<NodeKey>,
    ) -> Result<bool, EditorError> {
        let Some(key) = target else {
            return Ok(false);
        };
        let still_selected = self
            .selected_formula(&*host)
            .is_some_and(|(_, element)| element.key == key);
        if !still_selected {
            return Ok(false);
        }
        let Some(path) = host.find_path(key) else {
            return Ok(false);
        };

        let mut props = Map::new();
        props.insert("value".to_string(), Value::String(value.to_string()));
        host.set_node_props(&path, props)?;
        log::info!("formula at {:?} updated", path);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::editor::memory::paragraph;
    use crate::editor::{MemoryEditor, PluginRegistry};
    use crate::models::Node;
    use crate::plugin::formula_module;

    fn editor() -> MemoryEditor {
        let config = FormulaConfig::default();
        let mut plugins = PluginRegistry::default();
        plugins.register_module(formula_module(&config)).unwrap();
        let mut editor = MemoryEditor::new(Arc::new(plugins), config);
        editor.set_children(vec![paragraph(vec![
            Node::text("a"),
            FormulaElement::new("e^{i\\pi}").into_node(),
            Node::text("b"),
        ])]);
        editor
    }

    #[test]
    fn test_enabled_only_on_formula() {
        let command = EditFormulaCommand::new(&FormulaConfig::default());
        let mut editor = editor();
        assert!(command.is_disabled(&editor));

        editor.set_caret(vec![0, 0], 1);
        assert!(command.is_disabled(&editor));
        assert_eq!(command.get_value(&editor), "");

        editor.set_caret(vec![0, 1, 0], 0);
        assert!(!command.is_disabled(&editor));
        assert_eq!(command.get_value(&editor), "e^{i\\pi}");
    }

    #[test]
    fn test_commit_without_target_is_a_no_op() {
        let command = EditFormulaCommand::new(&FormulaConfig::default());
        let mut editor = editor();
        editor.set_caret(vec![0, 1, 0], 0);
        assert_eq!(command.commit(&mut editor, "x", None), Ok(false));
    }
}
