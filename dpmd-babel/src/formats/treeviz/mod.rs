//! Treeviz formatter for component trees
//!
//! A visual rendering of the component tree, one node per line, meant for
//! inspecting what a page was classified into before converting it.
//!
//! The format is:
//! <prefix><connector> <icon> <label> (labels truncated to 30 characters)
//!
//! Example:
//!
//! ```text
//! ⧉ Document (1 items)
//! └─ ▣ Wrapper
//!   ├─ ⊤ Module 1: Intro
//!   ├─ ▭ Progress
//!   └─ ➔ Content block b1
//!     ├─ § h3 Overview [fas fa-book]
//!     └─ ☰ 2 items
//!       ├─ • first
//!       └─ • second
//! ```
//!
//! With the `ast-full` parameter, inline spans (text, bold, italic, links,
//! tokens) are shown below headings, paragraphs and list items.

use super::icons::get_icon;
use crate::common::inlines::plain_text;
use crate::error::FormatError;
use crate::format::{bool_option, Format};
use crate::ir::nodes::{Component, Document, InlineContent, List, ListItem, PanelGroup};
use std::collections::HashMap;

const LABEL_WIDTH: usize = 30;

/// Borrowed view over everything that can appear as a line of the tree.
#[derive(Clone, Copy)]
enum Node<'a> {
    Component(&'a Component),
    List(&'a List),
    Item(&'a ListItem),
    Panel(&'a PanelGroup),
    Inline(&'a InlineContent),
}

impl<'a> Node<'a> {
    fn node_type(&self) -> &'static str {
        match self {
            Node::Component(c) => c.kind_name(),
            Node::List(_) => "List",
            Node::Item(_) => "ListItem",
            Node::Panel(_) => "PanelGroup",
            Node::Inline(InlineContent::Text(_)) => "Text",
            Node::Inline(InlineContent::Bold(_)) => "Bold",
            Node::Inline(InlineContent::Italic(_)) => "Italic",
            Node::Inline(InlineContent::Link { .. }) => "Link",
            Node::Inline(InlineContent::Token(_)) => "Token",
        }
    }

    fn label(&self) -> String {
        let label = match self {
            Node::Component(Component::Wrapper(_)) => "Wrapper".to_string(),
            Node::Component(Component::Header(h)) => {
                let prefix = h.prefix();
                if prefix.is_empty() {
                    h.title.clone()
                } else {
                    format!("{prefix}: {}", h.title)
                }
            }
            Node::Component(Component::ProgressPlaceholder) => "Progress".to_string(),
            Node::Component(Component::ContentBlock(b)) => match &b.id {
                Some(id) => format!("Content block {id}"),
                None => "Content block".to_string(),
            },
            Node::Component(Component::Heading(h)) => {
                let text = format!("h{} {}", h.level, plain_text(&h.content));
                match &h.icon {
                    Some(icon) => format!("{text} [{icon}]"),
                    None => text,
                }
            }
            Node::Component(Component::Paragraph(p)) => plain_text(&p.content),
            Node::Component(Component::List(l)) => list_label(l),
            Node::Component(Component::Embed(e)) => match &e.title {
                Some(title) => format!("{title} ({})", e.src),
                None => e.src.clone(),
            },
            Node::Component(Component::Link(l)) => format!("{} -> {}", l.text, l.href),
            Node::Component(Component::Accordion(a)) => format!("{} panels", a.panels.len()),
            Node::List(l) => list_label(l),
            Node::Item(item) => plain_text(&item.content),
            Node::Panel(p) => p.heading.clone(),
            Node::Inline(InlineContent::Text(text)) => text.clone(),
            Node::Inline(InlineContent::Bold(_)) => "bold".to_string(),
            Node::Inline(InlineContent::Italic(_)) => "italic".to_string(),
            Node::Inline(InlineContent::Link { href, text }) => format!("{text} -> {href}"),
            Node::Inline(InlineContent::Token(name)) => format!("{{{{{name}}}}}"),
        };
        truncate(&label)
    }

    fn children(&self, include_all: bool) -> Vec<Node<'a>> {
        let inlines = |content: &'a [InlineContent]| -> Vec<Node<'a>> {
            if include_all {
                content.iter().map(Node::Inline).collect()
            } else {
                Vec::new()
            }
        };
        match *self {
            Node::Component(Component::Wrapper(w)) => {
                w.children.iter().map(Node::Component).collect()
            }
            Node::Component(Component::ContentBlock(b)) => {
                b.children.iter().map(Node::Component).collect()
            }
            Node::Component(Component::Heading(h)) => inlines(&h.content),
            Node::Component(Component::Paragraph(p)) => inlines(&p.content),
            Node::Component(Component::List(l)) | Node::List(l) => {
                l.items.iter().map(Node::Item).collect()
            }
            Node::Component(Component::Accordion(a)) => a.panels.iter().map(Node::Panel).collect(),
            Node::Item(item) => {
                let mut children = inlines(&item.content);
                children.extend(item.children.iter().map(Node::List));
                children
            }
            Node::Panel(p) => p.content.iter().map(Node::Component).collect(),
            Node::Inline(InlineContent::Bold(inner) | InlineContent::Italic(inner)) => {
                inner.iter().map(Node::Inline).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn list_label(list: &List) -> String {
    let kind = if list.ordered { "ordered, " } else { "" };
    format!("{kind}{} items", list.items.len())
}

fn truncate(label: &str) -> String {
    let label = label.replace('\n', " ");
    if label.chars().count() > LABEL_WIDTH {
        let cut: String = label.chars().take(LABEL_WIDTH - 1).collect();
        format!("{cut}…")
    } else {
        label
    }
}

/// Format a single node and its subtree
fn format_node(
    node: Node<'_>,
    prefix: &str,
    child_index: usize,
    child_count: usize,
    include_all: bool,
) -> String {
    let is_last = child_index == child_count - 1;
    let connector = if is_last { "└─" } else { "├─" };
    let icon = get_icon(node.node_type());

    let mut output = format!("{prefix}{connector} {icon} {}\n", node.label());

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    output.push_str(&format_children(
        &node.children(include_all),
        &child_prefix,
        include_all,
    ));
    output
}

fn format_children(children: &[Node<'_>], prefix: &str, include_all: bool) -> String {
    let mut output = String::new();
    let child_count = children.len();
    for (i, child) in children.iter().enumerate() {
        output.push_str(&format_node(*child, prefix, i, child_count, include_all));
    }
    output
}

pub fn to_treeviz_str(doc: &Document) -> String {
    render(doc, false)
}

/// Convert a document to treeviz string with optional parameters
///
/// # Parameters
///
/// - `"ast-full"`: also show the inline spans of headings, paragraphs and
///   list items.
pub fn to_treeviz_str_with_params(
    doc: &Document,
    params: &HashMap<String, String>,
) -> Result<String, FormatError> {
    let include_all = bool_option(params, "ast-full")?.unwrap_or(false);
    Ok(render(doc, include_all))
}

fn render(doc: &Document, include_all: bool) -> String {
    let icon = get_icon("Document");
    let output = format!("{} Document ({} items)\n", icon, doc.children.len());
    let children: Vec<Node<'_>> = doc.children.iter().map(Node::Component).collect();
    output + &format_children(&children, "", include_all)
}

/// Format implementation for treeviz format
pub struct TreevizFormat;

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Visual tree representation with indentation and Unicode icons"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tree", "treeviz"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(to_treeviz_str(doc))
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        to_treeviz_str_with_params(doc, options)
    }
}
