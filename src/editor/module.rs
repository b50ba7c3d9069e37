//! Plugin modules and their registration
//!
//! A module bundles everything one plugin contributes: classifier overlays,
//! renderers, serializers, parsers, menus and custom elements. Modules are
//! activated before any editor is created; activating the same module twice
//! is a logged no-op, while a key that collides with another module is an
//! error and nothing from that module is installed.

use std::collections::BTreeSet;

use super::RegistryError;
use crate::codec::{HtmlElement, Selector};
use crate::element::registry::{define_global, ElementDefinition};
use crate::formula::FormulaConfig;
use crate::menu::ModalMenu;
use crate::models::{ClassifierChain, ClassifierOverlay, Element, HostDefaults};
use crate::render::VNode;

/// Per-render inputs from the host
pub struct RenderContext<'a> {
    pub selected: bool,
    pub config: &'a FormulaConfig,
}

pub type RenderElemFn = fn(&Element, &RenderContext) -> VNode;
pub type ElemToHtmlFn = fn(&Element, &str) -> String;
pub type ParseElemHtmlFn = fn(&HtmlElement) -> Element;
pub type MenuFactory = fn(&FormulaConfig) -> Box<dyn ModalMenu>;
pub type OverlayFactory = fn() -> Box<dyn ClassifierOverlay>;

#[derive(Clone, Copy)]
pub struct RenderElemConf {
    pub node_type: &'static str,
    pub render: RenderElemFn,
}

#[derive(Clone, Copy)]
pub struct ElemToHtmlConf {
    pub node_type: &'static str,
    pub to_html: ElemToHtmlFn,
}

#[derive(Clone, Copy)]
pub struct ParseElemHtmlConf {
    pub selector: Selector,
    pub parse: ParseElemHtmlFn,
}

#[derive(Clone, Copy)]
pub struct MenuConf {
    pub key: &'static str,
    pub factory: MenuFactory,
}

/// Menus shown in the hover bar when the caret sits on a node type
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverbarConf {
    pub node_type: &'static str,
    pub menu_keys: Vec<&'static str>,
}

#[derive(Default)]
pub struct ModuleConf {
    pub name: &'static str,
    pub editor_plugin: Vec<OverlayFactory>,
    pub render_elems: Vec<RenderElemConf>,
    pub elems_to_html: Vec<ElemToHtmlConf>,
    pub parse_elems_html: Vec<ParseElemHtmlConf>,
    pub menus: Vec<MenuConf>,
    pub custom_elements: Vec<ElementDefinition>,
    pub hoverbar_keys: Vec<HoverbarConf>,
    pub toolbar_insert_keys: Vec<&'static str>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Activated,
    AlreadyActive,
}

#[derive(Default)]
pub struct PluginRegistry {
    modules: BTreeSet<&'static str>,
    classifiers: ClassifierChain,
    renderers: Vec<RenderElemConf>,
    serializers: Vec<ElemToHtmlConf>,
    parsers: Vec<ParseElemHtmlConf>,
    menus: Vec<MenuConf>,
    hoverbar: Vec<HoverbarConf>,
    toolbar_insert_keys: Vec<&'static str>,
}

impl PluginRegistry {
    pub fn new(defaults: HostDefaults) -> Self {
        Self {
            classifiers: ClassifierChain::new(defaults),
            ..Default::default()
        }
    }

    pub fn register_module(&mut self, module: ModuleConf) -> Result<Activation, RegistryError> {
        if self.modules.contains(module.name) {
            log::warn!("module {} is already active; ignoring", module.name);
            return Ok(Activation::AlreadyActive);
        }

        let overlays: Vec<Box<dyn ClassifierOverlay>> =
            module.editor_plugin.iter().map(|factory| factory()).collect();
        self.check_collisions(&module, &overlays)?;

        for overlay in overlays {
            self.classifiers.push(overlay);
        }
        for definition in module.custom_elements {
            define_global(definition);
        }
        self.renderers.extend(module.render_elems);
        self.serializers.extend(module.elems_to_html);
        self.parsers.extend(module.parse_elems_html);
        self.menus.extend(module.menus);
        self.hoverbar.extend(module.hoverbar_keys);
        self.toolbar_insert_keys.extend(module.toolbar_insert_keys);
        self.modules.insert(module.name);

        log::info!("module {} activated", module.name);
        Ok(Activation::Activated)
    }

    fn check_collisions(
        &self,
        module: &ModuleConf,
        overlays: &[Box<dyn ClassifierOverlay>],
    ) -> Result<(), RegistryError> {
        if let Some(overlay) = overlays.iter().find(|o| self.classifiers.contains(o.name())) {
            return Err(RegistryError::DuplicateOverlay(overlay.name().to_string()));
        }
        if let Some(conf) = module.render_elems.iter().find(|c| self.renderer_for(c.node_type).is_some()) {
            return Err(RegistryError::DuplicateRenderer(conf.node_type.to_string()));
        }
        if let Some(conf) = module.elems_to_html.iter().find(|c| self.serializer_for(c.node_type).is_some()) {
            return Err(RegistryError::DuplicateSerializer(conf.node_type.to_string()));
        }
        if let Some(conf) = module
            .parse_elems_html
            .iter()
            .find(|c| self.parsers.iter().any(|p| p.selector == c.selector))
        {
            return Err(RegistryError::DuplicateParser(conf.selector.to_string()));
        }
        if let Some(conf) = module.menus.iter().find(|c| self.menu_conf(c.key).is_some()) {
            return Err(RegistryError::DuplicateMenu(conf.key.to_string()));
        }
        Ok(())
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.modules.contains(name)
    }

    pub fn classifiers(&self) -> &ClassifierChain {
        &self.classifiers
    }

    pub fn renderer_for(&self, node_type: &str) -> Option<RenderElemFn> {
        self.renderers
            .iter()
            .find(|c| c.node_type == node_type)
            .map(|c| c.render)
    }

    pub fn serializer_for(&self, node_type: &str) -> Option<ElemToHtmlFn> {
        self.serializers
            .iter()
            .find(|c| c.node_type == node_type)
            .map(|c| c.to_html)
    }

    pub fn parser_for(&self, html: &HtmlElement) -> Option<ParseElemHtmlFn> {
        self.parsers
            .iter()
            .find(|c| c.selector.matches(html))
            .map(|c| c.parse)
    }

    fn menu_conf(&self, key: &str) -> Option<&MenuConf> {
        self.menus.iter().find(|c| c.key == key)
    }

    pub fn menu_keys(&self) -> Vec<&'static str> {
        self.menus.iter().map(|c| c.key).collect()
    }

    /// Build a fresh menu instance; each toolbar/hover bar owns its own
    pub fn create_menu(&self, key: &str, config: &FormulaConfig) -> Option<Box<dyn ModalMenu>> {
        self.menu_conf(key).map(|c| (c.factory)(config))
    }

    pub fn hoverbar_menu_keys(&self, node_type: &str) -> Vec<&'static str> {
        self.hoverbar
            .iter()
            .filter(|h| h.node_type == node_type)
            .flat_map(|h| h.menu_keys.iter().copied())
            .collect()
    }

    pub fn toolbar_insert_keys(&self) -> &[&'static str] {
        &self.toolbar_insert_keys
    }
}
