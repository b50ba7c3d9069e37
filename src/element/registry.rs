//! Custom element definitions
//!
//! Element tags are global per page, so definitions are looked up or
//! installed exactly once by tag name.

use std::collections::BTreeMap;
use std::sync::Mutex;

use lazy_static::lazy_static;
use serde::Serialize;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ElementDefinition {
    pub tag: String,
    pub observed_attributes: Vec<String>,
}

impl ElementDefinition {
    pub fn new(tag: &str, observed: &[&str]) -> Self {
        Self {
            tag: tag.to_string(),
            observed_attributes: observed.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[derive(Default, Debug)]
pub struct ElementRegistry {
    definitions: BTreeMap<String, ElementDefinition>,
}

impl ElementRegistry {
    pub fn get(&self, tag: &str) -> Option<&ElementDefinition> {
        self.definitions.get(tag)
    }

    /// Install unless a definition with the same tag exists. Returns `true`
    /// when this call installed it.
    pub fn define_if_absent(&mut self, definition: ElementDefinition) -> bool {
        if self.definitions.contains_key(&definition.tag) {
            return false;
        }
        log::info!("custom element registered: <{}>", definition.tag);
        self.definitions.insert(definition.tag.clone(), definition);
        true
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

lazy_static! {
    static ref CUSTOM_ELEMENTS: Mutex<ElementRegistry> = Mutex::new(ElementRegistry::default());
}

/// Page-wide lookup-or-install
pub fn define_global(definition: ElementDefinition) -> bool {
    match CUSTOM_ELEMENTS.lock() {
        Ok(mut registry) => registry.define_if_absent(definition),
        Err(poisoned) => poisoned.into_inner().define_if_absent(definition),
    }
}

pub fn global_definition(tag: &str) -> Option<ElementDefinition> {
    match CUSTOM_ELEMENTS.lock() {
        Ok(registry) => registry.get(tag).cloned(),
        Err(poisoned) => poisoned.into_inner().get(tag).cloned(),
    }
}
