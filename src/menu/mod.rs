//! Formula menus
//!
//! Insert and Edit are two commands behind one [`FormulaCommand`] trait. A
//! [`MenuController`] wraps a command with the modal lifecycle
//! (`Idle → open → committed | cancelled → Idle`) and is what the host
//! toolbar and hover bar hold, through the object-safe [`ModalMenu`].

pub mod edit;
pub mod insert;
pub mod modal;

pub use edit::EditFormulaCommand;
pub use insert::InsertFormulaCommand;
pub use modal::{FocusRequest, MenuController, ModalContent, ModalMode, ModalSession};

use thiserror::Error;

use crate::editor::{EditorError, EditorHost};
use crate::models::{Element, NodeKey, Path};
use crate::render::VNode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    #[error("menu {0} is disabled for the current selection")]
    Disabled(&'static str),
    #[error(transparent)]
    Editor(#[from] EditorError),
}

/// Result of a confirm click
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The document was changed and the dialog closed
    Committed,
    /// Nothing to submit; the dialog stays open
    EmptyInput,
    /// Selection or target went away while the dialog was open; closed
    /// without touching the document
    Stale,
    /// No dialog was open
    NotOpen,
}

/// One formula command: metadata, enablement and the document change
pub trait FormulaCommand: Send {
    fn key(&self) -> &'static str;

    fn title(&self) -> &str;

    fn icon_svg(&self) -> &'static str;

    fn mode(&self) -> ModalMode;

    fn is_disabled(&self, host: &dyn EditorHost) -> bool;

    /// Initial dialog value
    fn get_value(&self, host: &dyn EditorHost) -> String;

    /// Node the dialog is anchored to, if any
    fn modal_position_node(&self, host: &dyn EditorHost) -> Option<(Path, Element)>;

    /// Apply the submitted value. `Ok(false)` means the command found
    /// nothing to act on and changed nothing.
    fn commit(
        &self,
        host: &mut dyn EditorHost,
        value: &str,
        target: Option<NodeKey>,
    ) -> Result<bool, EditorError>;
}

/// Object-safe menu interface held by the host
pub trait ModalMenu: Send {
    fn key(&self) -> &'static str;
    fn title(&self) -> &str;
    fn icon_svg(&self) -> &'static str;

    fn tag(&self) -> &'static str {
        "button"
    }

    fn show_modal(&self) -> bool {
        true
    }

    fn modal_width(&self) -> u32;

    fn is_active(&self, _host: &dyn EditorHost) -> bool {
        false
    }

    fn is_disabled(&self, host: &dyn EditorHost) -> bool;
    fn get_value(&self, host: &dyn EditorHost) -> String;
    fn modal_position_node(&self, host: &dyn EditorHost) -> Option<Path>;

    fn open(&mut self, host: &dyn EditorHost) -> Result<FocusRequest, MenuError>;
    fn input(&mut self, value: &str);
    fn commit(&mut self, host: &mut dyn EditorHost) -> Result<CommitOutcome, MenuError>;
    fn cancel(&mut self);
    /// Click outside the dialog
    fn dismiss(&mut self);
    /// Keyboard event routed from the page; returns whether it was handled
    fn handle_key(&mut self, key: &str) -> bool;

    /// The element to focus, if the scheduled focus is still current
    fn focus_due(&self, ticket: u64) -> Option<&str>;

    fn is_open(&self) -> bool;
    fn content(&self) -> Option<VNode>;
}
