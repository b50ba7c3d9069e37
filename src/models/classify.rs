//! Node classification overlays
//!
//! The host decides whether an element flows inline and whether it is void
//! (opaque, not editable). Plugins contribute overlays to that decision
//! instead of replacing the host's answer: each overlay may claim a flag or
//! leave it to the next one, and the host default answers last.

use super::node::{Element, FORMULA_TYPE};

/// Answer from one overlay; `None` defers to the next overlay
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    pub inline: Option<bool>,
    pub void: Option<bool>,
}

impl Classification {
    pub const DEFER: Classification = Classification { inline: None, void: None };

    /// Inline and void together: an atomic unit inside a line of text
    pub const ATOMIC_INLINE: Classification = Classification {
        inline: Some(true),
        void: Some(true),
    };
}

/// A classification capability contributed by a plugin
pub trait ClassifierOverlay: Send + Sync {
    /// Name used in logs and for duplicate detection
    fn name(&self) -> &str;

    fn classify(&self, element: &Element) -> Classification;
}

/// Formula elements are always inline and void, never one without the other
#[derive(Clone, Copy, Debug, Default)]
pub struct FormulaOverlay;

impl ClassifierOverlay for FormulaOverlay {
    fn name(&self) -> &str {
        FORMULA_TYPE
    }

    fn classify(&self, element: &Element) -> Classification {
        if element.is_type(FORMULA_TYPE) {
            Classification::ATOMIC_INLINE
        } else {
            Classification::DEFER
        }
    }
}

/// The host's own answers for the built-in node types
#[derive(Clone, Debug)]
pub struct HostDefaults {
    pub inline_types: Vec<String>,
    pub void_types: Vec<String>,
}

impl Default for HostDefaults {
    fn default() -> Self {
        Self {
            inline_types: vec!["link".to_string(), "image".to_string()],
            void_types: vec!["image".to_string(), "divider".to_string(), "video".to_string()],
        }
    }
}

/// Ordered overlay list composed with the host defaults.
///
/// Per flag, the first overlay returning `Some` wins; overlays registered
/// earlier take precedence over later ones.
#[derive(Default)]
pub struct ClassifierChain {
    overlays: Vec<Box<dyn ClassifierOverlay>>,
    defaults: HostDefaults,
}

impl ClassifierChain {
    pub fn new(defaults: HostDefaults) -> Self {
        Self {
            overlays: Vec::new(),
            defaults,
        }
    }

    /// Append an overlay. Returns `false` when one with the same name is
    /// already present.
    pub fn push(&mut self, overlay: Box<dyn ClassifierOverlay>) -> bool {
        if self.contains(overlay.name()) {
            return false;
        }
        log::info!("classifier overlay registered: {}", overlay.name());
        self.overlays.push(overlay);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.overlays.iter().any(|o| o.name() == name)
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn is_inline(&self, element: &Element) -> bool {
        self.overlays
            .iter()
            .find_map(|o| o.classify(element).inline)
            .unwrap_or_else(|| self.defaults.inline_types.contains(&element.node_type))
    }

    pub fn is_void(&self, element: &Element) -> bool {
        self.overlays
            .iter()
            .find_map(|o| o.classify(element).void)
            .unwrap_or_else(|| self.defaults.void_types.contains(&element.node_type))
    }
}
