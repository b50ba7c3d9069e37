//! Models module for the formula plugin
//!
//! This module contains the document tree shapes, the classification
//! overlays and the selection positions used by the rest of the crate.

pub mod node;
pub mod classify;
pub mod selection;

// Re-export commonly used types
pub use node::*;
pub use classify::{Classification, ClassifierChain, ClassifierOverlay, FormulaOverlay, HostDefaults};
pub use selection::{Path, Point, Range};
