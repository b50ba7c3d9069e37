//! Document ⇄ HTML
//!
//! Export walks the tree and hands registered element types to their
//! serializer. Import understands paragraphs, `pre` blocks and plain text,
//! and hands any tag matching a registered selector to its parser; the
//! contents of a parsed element are skipped, since registered elements
//! carry everything in their attributes.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::module::PluginRegistry;
use crate::codec::html::{escape_text, HtmlElement};
use crate::codec::CodecError;
use crate::models::{Element, Node};

pub fn nodes_to_html(nodes: &[Node], plugins: &PluginRegistry) -> String {
    nodes.iter().map(|node| node_to_html(node, plugins)).collect()
}

fn node_to_html(node: &Node, plugins: &PluginRegistry) -> String {
    match node {
        Node::Text(text) => escape_text(&text.text).into_owned(),
        Node::Element(element) => {
            let children_html = nodes_to_html(&element.children, plugins);
            if let Some(to_html) = plugins.serializer_for(&element.node_type) {
                return to_html(element, &children_html);
            }
            match element.node_type.as_str() {
                "paragraph" => format!("<p>{}</p>", children_html),
                "pre" => format!("<pre><code>{}</code></pre>", children_html),
                _ => children_html,
            }
        }
    }
}

/// Container being filled while parsing
struct Frame {
    tag: String,
    element: Element,
}

pub fn html_to_nodes(html: &str, plugins: &PluginRegistry) -> Result<Vec<Node>, CodecError> {
    let mut reader = Reader::from_str(html);
    reader.check_end_names(false);

    let mut blocks: Vec<Node> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    // depth inside a parsed element whose content is ignored
    let mut skip_depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| CodecError::Xml(format!("at position {}: {}", reader.buffer_position(), e)))?;

        match event {
            Event::Start(ref e) => {
                if skip_depth > 0 {
                    skip_depth += 1;
                    continue;
                }
                let tag = HtmlElement::from_start(e)?;
                if let Some(parse) = plugins.parser_for(&tag) {
                    push_inline(&mut stack, &mut blocks, Node::Element(parse(&tag)));
                    skip_depth = 1;
                } else if let Some(block_type) = block_type_for(&tag.tag) {
                    close_open_blocks(&mut stack, &mut blocks);
                    stack.push(Frame {
                        tag: tag.tag,
                        element: Element::new(block_type, Vec::new()),
                    });
                }
            }
            Event::Empty(ref e) => {
                if skip_depth > 0 {
                    continue;
                }
                let tag = HtmlElement::from_start(e)?;
                if let Some(parse) = plugins.parser_for(&tag) {
                    push_inline(&mut stack, &mut blocks, Node::Element(parse(&tag)));
                } else if tag.tag == "br" {
                    push_inline(&mut stack, &mut blocks, Node::text("\n"));
                }
            }
            Event::Text(ref t) => {
                if skip_depth > 0 {
                    continue;
                }
                let raw = String::from_utf8_lossy(t);
                let text = htmlize::unescape(&*raw).into_owned();
                if stack.is_empty() && text.trim().is_empty() {
                    continue;
                }
                push_inline(&mut stack, &mut blocks, Node::text(text));
            }
            Event::End(ref e) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                    continue;
                }
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                if stack.last().is_some_and(|frame| frame.tag == name) {
                    if let Some(frame) = stack.pop() {
                        blocks.push(Node::Element(frame.element));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    close_open_blocks(&mut stack, &mut blocks);
    Ok(blocks)
}

fn block_type_for(tag: &str) -> Option<&'static str> {
    match tag {
        "p" | "div" => Some("paragraph"),
        "pre" => Some("pre"),
        _ => None,
    }
}

/// Inline content goes into the open block, or into an implicit paragraph
fn push_inline(stack: &mut Vec<Frame>, blocks: &mut Vec<Node>, node: Node) {
    if let Some(frame) = stack.last_mut() {
        frame.element.children.push(node);
        return;
    }
    match blocks.last_mut() {
        Some(Node::Element(block)) if block.node_type == "paragraph" && block.key == IMPLICIT => {
            block.children.push(node);
        }
        _ => {
            let mut block = Element::new("paragraph", vec![node]);
            block.key = IMPLICIT;
            blocks.push(Node::Element(block));
        }
    }
}

/// Marks paragraphs created for loose inline content until keys are assigned
const IMPLICIT: u64 = u64::MAX;

fn close_open_blocks(stack: &mut Vec<Frame>, blocks: &mut Vec<Node>) {
    // blocks do not nest here; an unclosed block ends where the next begins
    for frame in stack.drain(..) {
        blocks.push(Node::Element(frame.element));
    }
    for block in blocks.iter_mut() {
        if let Node::Element(element) = block {
            if element.key == IMPLICIT {
                element.key = 0;
            }
        }
    }
}
