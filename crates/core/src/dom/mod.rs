//! Detached DOM fragments and the environments that parse them.

mod environment;

pub use environment::{current, install, is_available, with_environment, EnvironmentGuard};

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{local_name, ns, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use serde::Serialize;

use crate::error::ParseError;

/// Something that can turn markup into a detached [`Fragment`].
///
/// Implementations must not execute scripts and must not attach the
/// result to any live document.
pub trait DomEnvironment: Send + Sync {
    fn parse_fragment(&self, html: &str) -> Result<Fragment, ParseError>;
}

/// A detached list of nodes, the content of a `<template>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Fragment {
    pub children: Vec<DomNode>,
}

impl Fragment {
    pub fn child_nodes(&self) -> &[DomNode] {
        &self.children
    }

    /// Element children only, skipping text and comments.
    pub fn element_children(&self) -> impl Iterator<Item = &DomNode> {
        self.children
            .iter()
            .filter(|c| c.node_type == NodeType::Element)
    }

    pub fn first_element_child(&self) -> Option<&DomNode> {
        self.element_children().next()
    }

    pub fn child_element_count(&self) -> usize {
        self.element_children().count()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// Serialize the fragment back to markup.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_html(&mut out, false);
        }
        out
    }
}

/// A node in a fragment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomNode {
    pub tag: String,
    /// Attributes in source order.
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<DomNode>,
    pub node_type: NodeType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeType {
    Element,
    Text,
    Comment,
}

/// Elements that never have children or an end tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose text children are serialized without escaping.
const RAW_TEXT_TAGS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

impl DomNode {
    pub fn new_element(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            node_type: NodeType::Element,
        }
    }

    pub fn new_text(text: &str) -> Self {
        Self {
            tag: String::new(),
            attributes: Vec::new(),
            text: text.to_string(),
            children: Vec::new(),
            node_type: NodeType::Text,
        }
    }

    pub fn new_comment(text: &str) -> Self {
        Self {
            node_type: NodeType::Comment,
            ..Self::new_text(text)
        }
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }

    pub fn element_children(&self) -> impl Iterator<Item = &DomNode> {
        self.children.iter().filter(|c| c.is_element())
    }

    /// DOM `textContent`: text of all descendant text nodes, untrimmed.
    /// Comments contribute nothing unless this node is itself a comment.
    pub fn text_content(&self) -> String {
        match self.node_type {
            NodeType::Text | NodeType::Comment => self.text.clone(),
            NodeType::Element => {
                let mut out = String::new();
                self.collect_text(&mut out);
                out
            }
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => out.push_str(&self.text),
            NodeType::Comment => {}
            NodeType::Element => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }

    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out, false);
        out
    }

    fn write_html(&self, out: &mut String, raw_text: bool) {
        match self.node_type {
            NodeType::Text if raw_text => out.push_str(&self.text),
            NodeType::Text => escape_into(out, &self.text, false),
            NodeType::Comment => {
                out.push_str("<!--");
                out.push_str(&self.text);
                out.push_str("-->");
            }
            NodeType::Element => {
                out.push('<');
                out.push_str(&self.tag);
                for (name, value) in &self.attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(out, value, true);
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(&self.tag.as_str()) {
                    return;
                }
                let raw = RAW_TEXT_TAGS.contains(&self.tag.as_str());
                for child in &self.children {
                    child.write_html(out, raw);
                }
                out.push_str("</");
                out.push_str(&self.tag);
                out.push('>');
            }
        }
    }
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// Options for [`Html5everDom`].
#[derive(Debug, Clone, Default)]
pub struct DomParseOptions {
    /// Leave comment nodes out of the fragment.
    pub drop_comments: bool,
}

/// A simulated DOM backed by html5ever.
///
/// Markup is parsed as the content of a `<template>` element with
/// scripting disabled, so nothing runs and nothing touches a live document.
#[derive(Debug, Clone, Default)]
pub struct Html5everDom {
    options: DomParseOptions,
}

impl Html5everDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DomParseOptions) -> Self {
        Self { options }
    }
}

impl DomEnvironment for Html5everDom {
    fn parse_fragment(&self, html: &str) -> Result<Fragment, ParseError> {
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                drop_doctype: true,
                scripting_enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };

        // Fragment parsing with a <template> context, as template.innerHTML does.
        // The nodes land under a synthetic <html> root.
        let context = QualName::new(None, ns!(html), local_name!("template"));
        let dom = html5ever::parse_fragment(RcDom::default(), opts, context, Vec::new(), false)
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .map_err(|e| ParseError::Io(e.to_string()))?;

        let root = first_element(&dom.document, "html").ok_or(ParseError::MissingContent)?;

        let mut fragment = Fragment::default();
        for child in root.children.borrow().iter() {
            if let Some(node) = self.convert_node(child) {
                fragment.children.push(node);
            }
        }
        tracing::trace!(nodes = fragment.children.len(), "parsed template content");
        Ok(fragment)
    }
}

impl Html5everDom {
    fn convert_node(&self, handle: &Handle) -> Option<DomNode> {
        match &handle.data {
            NodeData::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                let tag = name.local.to_string();
                let mut node = DomNode::new_element(&tag);
                for attr in attrs.borrow().iter() {
                    node.attributes
                        .push((attr.name.local.to_string(), attr.value.to_string()));
                }

                // A nested <template> keeps its children in a separate content fragment.
                let children = match &*template_contents.borrow() {
                    Some(content) => content.children.borrow().clone(),
                    None => handle.children.borrow().clone(),
                };
                for child in children.iter() {
                    if let Some(child_node) = self.convert_node(child) {
                        node.children.push(child_node);
                    }
                }
                Some(node)
            }
            NodeData::Text { contents } => Some(DomNode::new_text(&contents.borrow())),
            NodeData::Comment { contents } if !self.options.drop_comments => {
                Some(DomNode::new_comment(contents))
            }
            _ => None, // Doctypes, PIs, dropped comments
        }
    }
}

fn first_element(parent: &Handle, tag: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| match &child.data {
            NodeData::Element { name, .. } => &*name.local == tag,
            _ => false,
        })
        .cloned()
}
