//! Lightweight visual tree
//!
//! A declarative description handed to the JavaScript patcher. Maps are
//! ordered so identical input always produces identical output, which lets
//! the patcher skip unchanged nodes.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::codec::html::{escape_attr, escape_text};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VNode {
    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// DOM properties (`contentEditable`, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: BTreeMap<String, String>,

    /// `data-*` attributes keyed without the prefix
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dataset: BTreeMap<String, String>,

    /// Inline style in insertion order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub style: Vec<(String, String)>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<VNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl VNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn class(mut self, class_name: &str) -> Self {
        self.class_name = Some(class_name.to_string());
        self
    }

    pub fn prop(mut self, name: &str, value: &str) -> Self {
        self.props.insert(name.to_string(), value.to_string());
        self
    }

    pub fn data(mut self, name: &str, value: &str) -> Self {
        self.dataset.insert(name.to_string(), value.to_string());
        self
    }

    pub fn style(mut self, name: &str, value: &str) -> Self {
        self.style.push((name.to_string(), value.to_string()));
        self
    }

    pub fn child(mut self, child: VNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn style_value(&self, name: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Render as static HTML (export previews, tests)
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if let Some(class_name) = &self.class_name {
            let _ = write!(out, " class=\"{}\"", escape_attr(class_name));
        }
        for (name, value) in &self.props {
            let _ = write!(out, " {}=\"{}\"", name.to_ascii_lowercase(), escape_attr(value));
        }
        for (name, value) in &self.dataset {
            let _ = write!(out, " data-{}=\"{}\"", name, escape_attr(value));
        }
        if !self.style.is_empty() {
            let css: Vec<String> = self
                .style
                .iter()
                .map(|(k, v)| format!("{}: {}", kebab_case(k), v))
                .collect();
            let _ = write!(out, " style=\"{}\"", escape_attr(&css.join("; ")));
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape_text(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// `marginLeft` → `margin-left`
fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
