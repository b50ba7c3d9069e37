//! The formula plugin module
//!
//! Everything the formula feature contributes to a host, bundled as one
//! [`ModuleConf`] for [`PluginRegistry::register_module`].
//!
//! [`PluginRegistry::register_module`]: crate::editor::PluginRegistry::register_module

use crate::codec::{elem_to_html, parse_elem_html, FORMULA_SELECTOR};
use crate::editor::module::{
    ElemToHtmlConf, HoverbarConf, MenuConf, ParseElemHtmlConf, RenderElemConf,
};
use crate::editor::{ModuleConf, RenderContext};
use crate::element::{ElementDefinition, OBSERVED_ATTRIBUTES};
use crate::formula::FormulaConfig;
use crate::menu::edit::EDIT_FORMULA_KEY;
use crate::menu::insert::INSERT_FORMULA_KEY;
use crate::menu::{EditFormulaCommand, InsertFormulaCommand, MenuController, ModalMenu};
use crate::models::{ClassifierOverlay, Element, FormulaOverlay, FORMULA_TYPE};
use crate::render::{render_formula, VNode};

pub const MODULE_NAME: &str = "formula";

fn formula_overlay() -> Box<dyn ClassifierOverlay> {
    Box::new(FormulaOverlay)
}

fn render_formula_elem(element: &Element, ctx: &RenderContext) -> VNode {
    render_formula(element, ctx.selected, ctx.config)
}

fn insert_menu(config: &FormulaConfig) -> Box<dyn ModalMenu> {
    Box::new(MenuController::new(InsertFormulaCommand::new(config), config.clone()))
}

fn edit_menu(config: &FormulaConfig) -> Box<dyn ModalMenu> {
    Box::new(MenuController::new(EditFormulaCommand::new(config), config.clone()))
}

pub fn formula_module(config: &FormulaConfig) -> ModuleConf {
    ModuleConf {
        name: MODULE_NAME,
        editor_plugin: vec![formula_overlay],
        render_elems: vec![RenderElemConf {
            node_type: FORMULA_TYPE,
            render: render_formula_elem,
        }],
        elems_to_html: vec![ElemToHtmlConf {
            node_type: FORMULA_TYPE,
            to_html: elem_to_html,
        }],
        parse_elems_html: vec![ParseElemHtmlConf {
            selector: FORMULA_SELECTOR,
            parse: parse_elem_html,
        }],
        menus: vec![
            MenuConf {
                key: INSERT_FORMULA_KEY,
                factory: insert_menu,
            },
            MenuConf {
                key: EDIT_FORMULA_KEY,
                factory: edit_menu,
            },
        ],
        custom_elements: vec![ElementDefinition::new(&config.card_tag, &OBSERVED_ATTRIBUTES)],
        hoverbar_keys: vec![HoverbarConf {
            node_type: FORMULA_TYPE,
            menu_keys: vec![EDIT_FORMULA_KEY],
        }],
        toolbar_insert_keys: vec![INSERT_FORMULA_KEY],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{Activation, PluginRegistry, RegistryError};
    use crate::element::registry::global_definition;
    use crate::models::HostDefaults;

    #[test]
    fn test_activation_is_idempotent() {
        let config = FormulaConfig::default();
        let mut plugins = PluginRegistry::new(HostDefaults::default());

        assert_eq!(plugins.register_module(formula_module(&config)), Ok(Activation::Activated));
        assert_eq!(plugins.register_module(formula_module(&config)), Ok(Activation::AlreadyActive));

        assert_eq!(plugins.classifiers().len(), 1);
        assert_eq!(plugins.menu_keys(), vec![INSERT_FORMULA_KEY, EDIT_FORMULA_KEY]);
        assert_eq!(plugins.toolbar_insert_keys(), &[INSERT_FORMULA_KEY]);
    }

    #[test]
    fn test_colliding_module_installs_nothing() {
        let config = FormulaConfig::default();
        let mut plugins = PluginRegistry::new(HostDefaults::default());
        plugins.register_module(formula_module(&config)).unwrap();

        let rival = ModuleConf {
            name: "rival",
            toolbar_insert_keys: vec!["rivalInsert"],
            menus: vec![MenuConf {
                key: INSERT_FORMULA_KEY,
                factory: insert_menu,
            }],
            ..Default::default()
        };
        assert_eq!(
            plugins.register_module(rival),
            Err(RegistryError::DuplicateMenu(INSERT_FORMULA_KEY.to_string()))
        );
        assert!(!plugins.is_active("rival"));
        assert_eq!(plugins.toolbar_insert_keys(), &[INSERT_FORMULA_KEY]);
    }

    #[test]
    fn test_hoverbar_and_custom_element() {
        let config = FormulaConfig::default();
        let mut plugins = PluginRegistry::new(HostDefaults::default());
        plugins.register_module(formula_module(&config)).unwrap();

        assert_eq!(plugins.hoverbar_menu_keys(FORMULA_TYPE), vec![EDIT_FORMULA_KEY]);
        assert!(plugins.hoverbar_menu_keys("paragraph").is_empty());

        let definition = global_definition(&config.card_tag).unwrap();
        assert_eq!(definition.observed_attributes, vec!["data-value".to_string()]);
    }

    #[test]
    fn test_menus_are_fresh_instances() {
        let config = FormulaConfig::default();
        let mut plugins = PluginRegistry::new(HostDefaults::default());
        plugins.register_module(formula_module(&config)).unwrap();

        let menu = plugins.create_menu(EDIT_FORMULA_KEY, &config).unwrap();
        assert_eq!(menu.key(), EDIT_FORMULA_KEY);
        assert_eq!(menu.tag(), "button");
        assert_eq!(menu.modal_width(), 300);
        assert!(!menu.is_open());
        assert!(plugins.create_menu("nope", &config).is_none());
    }
}
