//! Capabilities a plugin consumes from the host editor
//!
//! Plugins never touch the tree directly; every mutation goes through these
//! entry points so the host can record it.

use serde_json::{Map, Value};

use super::EditorError;
use crate::models::{Element, Node, NodeKey, Path, Range};

pub trait EditorHost {
    /// Current selection, `None` when the editor has no focus/selection
    fn selection(&self) -> Option<&Range>;

    /// Put back the selection saved when the editor last lost focus
    fn restore_selection(&mut self);

    fn is_inline(&self, element: &Element) -> bool;

    fn is_void(&self, element: &Element) -> bool;

    fn node(&self, path: &[usize]) -> Option<&Node>;

    /// Every element touching the selection, in document order
    fn selected_elements(&self) -> Vec<(Path, Element)>;

    /// First element of `node_type` touching the selection
    fn selected_node_by_type(&self, node_type: &str) -> Option<(Path, Element)> {
        self.selected_elements()
            .into_iter()
            .find(|(_, element)| element.is_type(node_type))
    }

    /// Locate an element by identity
    fn find_path(&self, key: NodeKey) -> Option<Path>;

    /// Insert at the caret; returns the new node's path
    fn insert_node(&mut self, node: Node) -> Result<Path, EditorError>;

    /// Merge `props` into the element at `path`, keeping its identity and
    /// children
    fn set_node_props(&mut self, path: &[usize], props: Map<String, Value>) -> Result<(), EditorError>;

    /// Whether the selection covers the node at `path`
    fn is_node_selected(&self, path: &[usize]) -> bool;
}
