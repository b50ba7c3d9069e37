//! Insert formula command

use super::{FormulaCommand, ModalMode};
use crate::editor::{EditorError, EditorHost};
use crate::formula::FormulaConfig;
use crate::models::{Element, FormulaElement, NodeKey, Path};

pub const INSERT_FORMULA_KEY: &str = "insertFormula";

pub const SIGMA_SVG: &str = r#"<svg viewBox="0 0 1024 1024"><path d="M160 128h704v192h-64l-32-96H346l262 288-262 288h422l32-96h64v192H160v-64l320-320-320-320z"></path></svg>"#;

pub struct InsertFormulaCommand {
    title: String,
}

impl InsertFormulaCommand {
    pub fn new(config: &FormulaConfig) -> Self {
        Self {
            title: config.insert_title.clone(),
        }
    }
}

impl FormulaCommand for InsertFormulaCommand {
    fn key(&self) -> &'static str {
        INSERT_FORMULA_KEY
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn icon_svg(&self) -> &'static str {
        SIGMA_SVG
    }

    fn mode(&self) -> ModalMode {
        ModalMode::Insert
    }

    fn is_disabled(&self, host: &dyn EditorHost) -> bool {
        let Some(selection) = host.selection() else {
            return true;
        };
        if selection.is_expanded() {
            return true;
        }

        // no formulas inside voids or code blocks
        host.selected_elements()
            .iter()
            .any(|(_, element)| host.is_void(element) || element.is_type("pre"))
    }

    fn get_value(&self, _host: &dyn EditorHost) -> String {
        String::new()
    }

    fn modal_position_node(&self, _host: &dyn EditorHost) -> Option<(Path, Element)> {
        None
    }

    fn commit(
        &self,
        host: &mut dyn EditorHost,
        value: &str,
        _target: Option<NodeKey>,
    ) -> Result<bool, EditorError> {
        let path = host.insert_node(FormulaElement::new(value).into_node())?;
        log::info!("formula inserted at {:?}", path);
        Ok(true)
    }
}
