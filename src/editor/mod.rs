//! Host editor surface
//!
//! - `host`: the capability trait plugins consume
//! - `memory`: an in-memory host used by the WASM facade and the tests
//! - `html`: document ⇄ HTML through the registered codecs
//! - `module`: plugin module descriptors and their activation

pub mod host;
pub mod html;
pub mod memory;
pub mod module;

pub use host::EditorHost;
pub use memory::MemoryEditor;
pub use module::{Activation, ModuleConf, PluginRegistry, RenderContext};

use thiserror::Error;

use crate::models::Path;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("no node at path {0:?}")]
    PathNotFound(Path),
    #[error("node at path {0:?} is not an element")]
    NotAnElement(Path),
    #[error("point {0:?} does not address a text leaf")]
    InvalidPoint(Path),
    #[error("editor has no selection")]
    NoSelection,
    #[error("selection is expanded")]
    ExpandedSelection,
    #[error("cannot insert inside a void element")]
    InsideVoid,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("menu key already registered: {0}")]
    DuplicateMenu(String),
    #[error("renderer already registered for type: {0}")]
    DuplicateRenderer(String),
    #[error("serializer already registered for type: {0}")]
    DuplicateSerializer(String),
    #[error("parser already registered for selector: {0}")]
    DuplicateParser(String),
    #[error("classifier overlay already registered: {0}")]
    DuplicateOverlay(String),
}
