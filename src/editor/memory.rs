//! In-memory editor host
//!
//! A small Slate-shaped editor: the root holds blocks, blocks hold text
//! leaves and inline elements, and every inline element is surrounded by
//! text leaves so a caret can always sit on either side of it. The editor
//! owns the document, the selection, and the selection saved when focus
//! moves to a dialog.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::host::EditorHost;
use super::html;
use super::module::{PluginRegistry, RenderContext};
use super::EditorError;
use crate::codec::CodecError;
use crate::formula::FormulaConfig;
use crate::models::selection::{ancestors, is_ancestor};
use crate::models::{Element, Node, NodeKey, Path, Point, Range, Text};
use crate::render::VNode;

pub struct MemoryEditor {
    children: Vec<Node>,
    selection: Option<Range>,
    /// Selection at the moment focus left the editor
    saved_selection: Option<Range>,
    next_key: NodeKey,
    plugins: Arc<PluginRegistry>,
    config: FormulaConfig,
}

impl MemoryEditor {
    /// An editor with one empty paragraph
    pub fn new(plugins: Arc<PluginRegistry>, config: FormulaConfig) -> Self {
        let mut editor = Self {
            children: Vec::new(),
            selection: None,
            saved_selection: None,
            next_key: 1,
            plugins,
            config,
        };
        editor.set_children(vec![paragraph(vec![Node::text("")])]);
        editor
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    pub fn config(&self) -> &FormulaConfig {
        &self.config
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Replace the whole document. Keys are assigned, inline runs are
    /// normalized, and the selection is cleared.
    pub fn set_children(&mut self, children: Vec<Node>) {
        let mut children = children;
        for node in children.iter_mut() {
            self.prepare(node);
        }
        if children.is_empty() {
            children.push(paragraph(vec![Node::text("")]));
        }
        self.children = children;
        self.selection = None;
        self.saved_selection = None;
    }

    /// Export through the registered serializers
    pub fn to_html(&self) -> String {
        html::nodes_to_html(&self.children, &self.plugins)
    }

    /// Replace the document with parsed HTML
    pub fn set_html(&mut self, source: &str) -> Result<(), CodecError> {
        let nodes = html::html_to_nodes(source, &self.plugins)?;
        self.set_children(nodes);
        Ok(())
    }

    pub fn select(&mut self, range: Range) {
        self.selection = Some(range);
    }

    pub fn set_caret(&mut self, path: Path, offset: usize) {
        self.selection = Some(Range::collapsed(Point::new(path, offset)));
    }

    pub fn deselect(&mut self) {
        self.selection = None;
    }

    /// Focus moved elsewhere (e.g. into a modal); the selection is saved
    pub fn blur(&mut self) {
        if let Some(selection) = self.selection.take() {
            self.saved_selection = Some(selection);
        }
    }

    /// All formula-like elements of a type, in document order
    pub fn elements_of_type(&self, node_type: &str) -> Vec<(Path, Element)> {
        self.element_paths()
            .into_iter()
            .filter_map(|path| {
                self.element(&path)
                    .filter(|e| e.is_type(node_type))
                    .map(|e| (path.clone(), e.clone()))
            })
            .collect()
    }

    /// Visual tree for the whole document
    pub fn render(&self) -> Vec<VNode> {
        self.children
            .iter()
            .enumerate()
            .map(|(i, node)| self.render_node(node, vec![i]))
            .collect()
    }

    fn render_node(&self, node: &Node, path: Path) -> VNode {
        match node {
            Node::Text(text) => VNode {
                tag: "span".to_string(),
                text: Some(text.text.clone()),
                ..Default::default()
            },
            Node::Element(element) => {
                if let Some(render) = self.plugins.renderer_for(&element.node_type) {
                    let context = RenderContext {
                        selected: self.is_node_selected(&path),
                        config: &self.config,
                    };
                    return render(element, &context);
                }
                let tag = match element.node_type.as_str() {
                    "paragraph" => "p",
                    "pre" => "pre",
                    _ => "div",
                };
                let mut vnode = VNode::new(tag);
                for (i, child) in element.children.iter().enumerate() {
                    let mut child_path = path.clone();
                    child_path.push(i);
                    vnode.children.push(self.render_node(child, child_path));
                }
                vnode
            }
        }
    }

    /// Assign keys and normalize inline runs below `node`
    fn prepare(&mut self, node: &mut Node) {
        if let Node::Element(element) = node {
            if element.key == 0 {
                element.key = self.next_key;
                self.next_key += 1;
            }
            for child in element.children.iter_mut() {
                self.prepare(child);
            }
            if !self.plugins.classifiers().is_void(element) {
                let children = std::mem::take(&mut element.children);
                element.children = normalize_inline_run(children);
            }
        }
    }

    fn element(&self, path: &[usize]) -> Option<&Element> {
        self.node(path).and_then(Node::as_element)
    }

    fn children_at_mut(&mut self, parent: &[usize]) -> Option<&mut Vec<Node>> {
        let mut children = &mut self.children;
        for &index in parent {
            children = match children.get_mut(index)? {
                Node::Element(element) => &mut element.children,
                Node::Text(_) => return None,
            };
        }
        Some(children)
    }

    /// Paths of every element, depth first, document order
    fn element_paths(&self) -> Vec<Path> {
        fn walk(nodes: &[Node], prefix: &mut Path, out: &mut Vec<Path>) {
            for (i, node) in nodes.iter().enumerate() {
                if let Node::Element(element) = node {
                    prefix.push(i);
                    out.push(prefix.clone());
                    walk(&element.children, prefix, out);
                    prefix.pop();
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.children, &mut Vec::new(), &mut out);
        out
    }

    fn first_leaf(&self, path: &[usize]) -> Path {
        let mut path = path.to_vec();
        while let Some(Node::Element(element)) = self.node(&path) {
            if element.children.is_empty() {
                break;
            }
            path.push(0);
        }
        path
    }

    fn last_leaf(&self, path: &[usize]) -> Path {
        let mut path = path.to_vec();
        while let Some(Node::Element(element)) = self.node(&path) {
            match element.children.len() {
                0 => break,
                n => path.push(n - 1),
            }
        }
        path
    }

    fn text_at(&self, path: &[usize]) -> Result<&Text, EditorError> {
        self.node(path)
            .and_then(Node::as_text)
            .ok_or_else(|| EditorError::InvalidPoint(path.to_vec()))
    }

    fn inside_void(&self, path: &[usize]) -> bool {
        ancestors(path).any(|p| self.element(p).is_some_and(|e| self.is_void(e)))
    }

    fn insert_inline(&mut self, point: &Point, node: Node) -> Result<Path, EditorError> {
        let text = self.text_at(&point.path)?.text.clone();
        let split = byte_offset(&text, point.offset).ok_or_else(|| EditorError::InvalidPoint(point.path.clone()))?;
        let (before, after) = text.split_at(split);
        let (before, after) = (before.to_string(), after.to_string());

        let (index, parent) = point
            .path
            .split_last()
            .ok_or_else(|| EditorError::InvalidPoint(point.path.clone()))?;
        let index = *index;
        let parent = parent.to_vec();

        let siblings = self
            .children_at_mut(&parent)
            .ok_or_else(|| EditorError::PathNotFound(parent.clone()))?;
        siblings.splice(
            index..=index,
            [Node::text(before), node, Node::text(after)],
        );

        let mut inserted = parent.clone();
        inserted.push(index + 1);
        let mut caret = parent;
        caret.push(index + 2);
        self.selection = Some(Range::collapsed(Point::new(caret, 0)));
        Ok(inserted)
    }

    fn insert_block(&mut self, point: &Point, node: Node) -> Result<Path, EditorError> {
        let block = *point
            .path
            .first()
            .ok_or_else(|| EditorError::InvalidPoint(point.path.clone()))?;
        self.children.insert(block + 1, node);

        let inserted = vec![block + 1];
        let caret = self.first_leaf(&inserted);
        self.selection = Some(Range::collapsed(Point::new(caret, 0)));
        Ok(inserted)
    }
}

impl EditorHost for MemoryEditor {
    fn selection(&self) -> Option<&Range> {
        self.selection.as_ref()
    }

    fn restore_selection(&mut self) {
        if self.selection.is_none() {
            self.selection = self.saved_selection.take();
        }
    }

    fn is_inline(&self, element: &Element) -> bool {
        self.plugins.classifiers().is_inline(element)
    }

    fn is_void(&self, element: &Element) -> bool {
        self.plugins.classifiers().is_void(element)
    }

    fn node(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.children.get(*first)?;
        for &index in rest {
            node = node.children().get(index)?;
        }
        Some(node)
    }

    fn selected_elements(&self) -> Vec<(Path, Element)> {
        let Some(range) = &self.selection else {
            return Vec::new();
        };
        let (start, end) = (&range.start().path, &range.end().path);

        self.element_paths()
            .into_iter()
            .filter(|path| {
                is_ancestor(path, start)
                    || is_ancestor(path, end)
                    || (path.as_slice() > start.as_slice() && path.as_slice() < end.as_slice())
            })
            .filter_map(|path| self.element(&path).map(|e| (path.clone(), e.clone())))
            .collect()
    }

    fn find_path(&self, key: NodeKey) -> Option<Path> {
        self.element_paths()
            .into_iter()
            .find(|path| self.element(path).is_some_and(|e| e.key == key))
    }

    fn insert_node(&mut self, node: Node) -> Result<Path, EditorError> {
        let range = self.selection.clone().ok_or(EditorError::NoSelection)?;
        if range.is_expanded() {
            return Err(EditorError::ExpandedSelection);
        }
        let point = range.anchor;
        if self.inside_void(&point.path) {
            return Err(EditorError::InsideVoid);
        }

        let mut node = node;
        self.prepare(&mut node);
        let inline = match &node {
            Node::Element(element) => self.is_inline(element),
            Node::Text(_) => true,
        };

        let path = if inline {
            self.insert_inline(&point, node)?
        } else {
            self.insert_block(&point, node)?
        };
        log::debug!("inserted node at {:?}", path);
        Ok(path)
    }

    fn set_node_props(&mut self, path: &[usize], props: Map<String, Value>) -> Result<(), EditorError> {
        let (index, parent) = path
            .split_last()
            .ok_or_else(|| EditorError::PathNotFound(path.to_vec()))?;
        let siblings = self
            .children_at_mut(parent)
            .ok_or_else(|| EditorError::PathNotFound(path.to_vec()))?;
        let element = siblings
            .get_mut(*index)
            .ok_or_else(|| EditorError::PathNotFound(path.to_vec()))?
            .as_element_mut()
            .ok_or_else(|| EditorError::NotAnElement(path.to_vec()))?;

        for (name, value) in props {
            // identity fields are not settable
            if name == "type" || name == "children" {
                continue;
            }
            element.props.insert(name, value);
        }
        Ok(())
    }

    fn is_node_selected(&self, path: &[usize]) -> bool {
        let Some(range) = &self.selection else {
            return false;
        };
        if self.node(path).is_none() {
            return false;
        }
        let (first, last) = (self.first_leaf(path), self.last_leaf(path));
        range.start().path <= last && range.end().path >= first
    }
}

pub fn paragraph(children: Vec<Node>) -> Node {
    Node::Element(Element::new("paragraph", children))
}

/// Merge adjacent text leaves and make sure every inline element has a
/// text leaf on each side; never leaves the run empty
pub fn normalize_inline_run(children: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(children.len() + 2);
    let has_elements = children.iter().any(|c| matches!(c, Node::Element(_)));
    let blocks_only = has_elements
        && children
            .iter()
            .all(|c| matches!(c, Node::Element(e) if is_block_type(&e.node_type)));
    if blocks_only {
        return children;
    }

    for child in children {
        match child {
            Node::Text(text) => match out.last_mut() {
                Some(Node::Text(last)) => last.text.push_str(&text.text),
                _ => out.push(Node::Text(text)),
            },
            Node::Element(element) => {
                if !matches!(out.last(), Some(Node::Text(_))) {
                    out.push(Node::text(""));
                }
                out.push(Node::Element(element));
            }
        }
    }
    if !matches!(out.last(), Some(Node::Text(_))) {
        out.push(Node::text(""));
    }
    out
}

fn is_block_type(node_type: &str) -> bool {
    matches!(node_type, "paragraph" | "pre" | "code" | "blockquote")
}

/// Character offset → byte offset, `None` past the end
fn byte_offset(text: &str, offset: usize) -> Option<usize> {
    if offset == text.chars().count() {
        return Some(text.len());
    }
    text.char_indices().nth(offset).map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassifierOverlay, FormulaElement, FormulaOverlay};

    fn formula_overlay() -> Box<dyn ClassifierOverlay> {
        Box::new(FormulaOverlay)
    }

    fn registry() -> Arc<PluginRegistry> {
        let mut plugins = PluginRegistry::default();
        plugins
            .register_module(crate::editor::ModuleConf {
                name: "test",
                editor_plugin: vec![formula_overlay],
                ..Default::default()
            })
            .unwrap();
        Arc::new(plugins)
    }

    fn editor_with(text: &str) -> MemoryEditor {
        let mut editor = MemoryEditor::new(registry(), FormulaConfig::default());
        editor.set_children(vec![paragraph(vec![Node::text(text)])]);
        editor
    }

    #[test]
    fn test_insert_inline_splits_text() {
        let mut editor = editor_with("ab");
        editor.set_caret(vec![0, 0], 1);

        let path = editor.insert_node(FormulaElement::new("x").into_node()).unwrap();
        assert_eq!(path, vec![0, 1]);

        let block = editor.children()[0].children();
        assert_eq!(block.len(), 3);
        assert_eq!(block[0].as_text().unwrap().text, "a");
        assert_eq!(FormulaElement::from_node(&block[1]).unwrap().value, "x");
        assert_eq!(block[2].as_text().unwrap().text, "b");
        assert_eq!(editor.selection().unwrap().anchor, Point::new(vec![0, 2], 0));
    }

    #[test]
    fn test_insert_assigns_identity() {
        let mut editor = editor_with("");
        editor.set_caret(vec![0, 0], 0);
        let path = editor.insert_node(FormulaElement::new("x").into_node()).unwrap();

        let key = editor.element(&path).unwrap().key;
        assert_ne!(key, 0);
        assert_eq!(editor.find_path(key), Some(path));
    }

    #[test]
    fn test_insert_respects_multibyte_offsets() {
        let mut editor = editor_with("αβ");
        editor.set_caret(vec![0, 0], 1);
        editor.insert_node(FormulaElement::new("x").into_node()).unwrap();

        let block = editor.children()[0].children();
        assert_eq!(block[0].as_text().unwrap().text, "α");
        assert_eq!(block[2].as_text().unwrap().text, "β");
    }

    #[test]
    fn test_insert_rejects_bad_points() {
        let mut editor = editor_with("ab");
        assert_eq!(editor.insert_node(Node::text("x")), Err(EditorError::NoSelection));

        editor.set_caret(vec![0, 0], 9);
        assert!(matches!(
            editor.insert_node(FormulaElement::new("x").into_node()),
            Err(EditorError::InvalidPoint(_))
        ));

        editor.select(Range::new(Point::new(vec![0, 0], 0), Point::new(vec![0, 0], 2)));
        assert_eq!(
            editor.insert_node(FormulaElement::new("x").into_node()),
            Err(EditorError::ExpandedSelection)
        );
    }

    #[test]
    fn test_insert_inside_void_rejected() {
        let mut editor = editor_with("");
        editor.set_children(vec![paragraph(vec![FormulaElement::new("a").into_node()])]);
        editor.set_caret(vec![0, 1, 0], 0);

        assert_eq!(
            editor.insert_node(FormulaElement::new("b").into_node()),
            Err(EditorError::InsideVoid)
        );
    }

    #[test]
    fn test_set_children_normalizes_inline_runs() {
        let mut editor = editor_with("");
        editor.set_children(vec![paragraph(vec![
            FormulaElement::new("a").into_node(),
            Node::text("x"),
            Node::text("y"),
        ])]);

        let block = editor.children()[0].children();
        assert_eq!(block.len(), 3);
        assert_eq!(block[0].as_text().unwrap().text, "");
        assert_eq!(block[2].as_text().unwrap().text, "xy");
    }

    #[test]
    fn test_set_props_keeps_identity_and_children() {
        let mut editor = editor_with("");
        editor.set_children(vec![paragraph(vec![FormulaElement::new("a").into_node()])]);
        let before = editor.element(&[0, 1]).unwrap().clone();

        let mut props = Map::new();
        props.insert("value".to_string(), Value::from("b"));
        props.insert("type".to_string(), Value::from("image"));
        editor.set_node_props(&[0, 1], props).unwrap();

        let after = editor.element(&[0, 1]).unwrap();
        assert_eq!(after.key, before.key);
        assert_eq!(after.node_type, "formula");
        assert_eq!(after.children, before.children);
        assert_eq!(after.prop_str("value"), Some("b"));
    }

    #[test]
    fn test_selected_elements_for_caret_in_formula() {
        let mut editor = editor_with("");
        editor.set_children(vec![paragraph(vec![FormulaElement::new("a").into_node()])]);
        editor.set_caret(vec![0, 1, 0], 0);

        let types: Vec<String> = editor
            .selected_elements()
            .into_iter()
            .map(|(_, e)| e.node_type)
            .collect();
        assert_eq!(types, vec!["paragraph".to_string(), "formula".to_string()]);
        assert!(editor.is_node_selected(&[0, 1]));
    }

    #[test]
    fn test_selected_elements_span_blocks() {
        let mut editor = editor_with("");
        editor.set_children(vec![
            paragraph(vec![Node::text("one")]),
            paragraph(vec![Node::text("two")]),
            paragraph(vec![Node::text("three")]),
        ]);
        editor.select(Range::new(Point::new(vec![2, 0], 1), Point::new(vec![0, 0], 1)));

        let paths: Vec<Path> = editor.selected_elements().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_blur_and_restore_selection() {
        let mut editor = editor_with("ab");
        editor.set_caret(vec![0, 0], 2);
        editor.blur();
        assert!(editor.selection().is_none());

        editor.restore_selection();
        assert_eq!(editor.selection().unwrap().anchor, Point::new(vec![0, 0], 2));
    }

    #[test]
    fn test_block_insert_goes_after_current_block() {
        let mut editor = editor_with("ab");
        editor.set_caret(vec![0, 0], 1);
        let path = editor
            .insert_node(Node::Element(Element::new("pre", vec![Node::text("code")])))
            .unwrap();

        assert_eq!(path, vec![1]);
        assert_eq!(editor.children().len(), 2);
        assert_eq!(editor.selection().unwrap().anchor, Point::new(vec![1, 0], 0));
    }
}
