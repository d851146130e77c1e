//! HTML rendering (component tree → DesignPlus page HTML)
//!
//! Pipeline: component tree → RcDom nodes → HTML string. Markup follows
//! what the DesignPlus tool itself writes, so the editor recognises the
//! result as its own components.

use super::ingest::{
    ACCORDION_CLASSES, CONTENT_BLOCK_CLASS, HEADER_CLASS, HEADER_PRE1_CLASS, HEADER_PRE2_CLASS,
    HEADER_TITLE_CLASS, ICON_CONTENT_CLASS, PANEL_CONTENT_CLASS, PANEL_GROUP_CLASS,
    PANEL_HEADING_CLASS, TOKEN_CLASS, WRAPPER_CLASS,
};
use super::HtmlOptions;
use crate::common::inlines::is_blank;
use crate::error::FormatError;
use crate::formats::tagged::grammar::token;
use crate::ir::nodes::{Component, Document, Header, Heading, InlineContent, List};
use html5ever::{
    ns, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute, LocalName,
    QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::default::Default;
use std::rc::Rc;

/// Classes the DesignPlus tool puts on its wrapper.
const WRAPPER_CLASSES: &str = "dp-wrapper kl_uon";
const PROGRESS_PLACEHOLDER_CLASSES: &str = "dp-progress-placeholder dp-module-progress-completion";
const PROGRESS_PLACEHOLDER_TEXT: &str = "Module Item Completion (browser only)";
const HIDDEN_STYLE: &str = "display: none;";
const NBSP: &str = "\u{a0}";

/// Render a component tree as a page fragment.
pub fn serialize_to_html(doc: &Document, options: &HtmlOptions) -> Result<String, FormatError> {
    let renderer = Renderer { options };
    let mut parts = Vec::new();
    for component in &doc.children {
        for node in renderer.component(component) {
            parts.push(serialize_node(&node)?);
        }
    }
    Ok(parts.join("\n"))
}

struct Renderer<'a> {
    options: &'a HtmlOptions,
}

impl Renderer<'_> {
    fn component(&self, component: &Component) -> Vec<Handle> {
        match component {
            Component::Wrapper(wrapper) => {
                let div = create_element(
                    "div",
                    vec![
                        ("id", WRAPPER_CLASS),
                        ("class", WRAPPER_CLASSES),
                        ("data-img-url", &self.options.banner_image_url),
                    ],
                );
                self.append_all(&div, &wrapper.children);
                if self.options.trailing_spacer {
                    let spacer = create_element("p", vec![]);
                    append(&spacer, create_text(NBSP));
                    append(&div, spacer);
                }
                vec![div]
            }
            Component::Header(header) => vec![header_node(header)],
            Component::ProgressPlaceholder => {
                let div = create_element(
                    "div",
                    vec![
                        ("class", PROGRESS_PLACEHOLDER_CLASSES),
                        ("style", HIDDEN_STYLE),
                    ],
                );
                append(&div, create_text(PROGRESS_PLACEHOLDER_TEXT));
                vec![div]
            }
            Component::ContentBlock(block) => {
                let mut attrs = vec![("class", CONTENT_BLOCK_CLASS)];
                if let Some(id) = &block.id {
                    attrs.push(("data-id", id.as_str()));
                }
                let div = create_element("div", attrs);
                self.append_all(&div, &block.children);
                vec![div]
            }
            Component::Heading(heading) => vec![heading_node(heading)],
            Component::Paragraph(paragraph) => {
                if is_blank(&paragraph.content) {
                    return Vec::new();
                }
                let p = create_element("p", vec![]);
                add_inlines(&p, &paragraph.content);
                vec![p]
            }
            Component::List(list) => vec![list_node(list)],
            Component::Embed(embed) => {
                let mut attrs = vec![("src", embed.src.as_str())];
                if let Some(title) = &embed.title {
                    attrs.push(("title", title.as_str()));
                }
                let p = create_element("p", vec![]);
                append(&p, create_element("iframe", attrs));
                vec![p]
            }
            Component::Link(link) => {
                let p = create_element("p", vec![]);
                let a = create_element("a", vec![("href", &link.href)]);
                append(&a, create_text(&link.text));
                append(&p, a);
                vec![p]
            }
            Component::Accordion(accordion) => {
                let class = ACCORDION_CLASSES.join(" ");
                let wrapper = create_element("div", vec![("class", &class)]);
                for panel in &accordion.panels {
                    let group = create_element("div", vec![("class", PANEL_GROUP_CLASS)]);
                    let heading = create_element("h4", vec![("class", PANEL_HEADING_CLASS)]);
                    append(&heading, create_text(&panel.heading));
                    append(&group, heading);
                    let content = create_element("div", vec![("class", PANEL_CONTENT_CLASS)]);
                    self.append_all(&content, &panel.content);
                    append(&group, content);
                    append(&wrapper, group);
                }
                vec![wrapper]
            }
        }
    }

    fn append_all(&self, parent: &Handle, children: &[Component]) {
        for child in children {
            for node in self.component(child) {
                append(parent, node);
            }
        }
    }
}

fn header_node(header: &Header) -> Handle {
    let outer = create_element("header", vec![("class", HEADER_CLASS)]);
    let h2 = create_element("h2", vec![("class", "dp-heading")]);
    let pre = create_element("span", vec![("class", "dp-header-pre")]);
    let pre1 = create_element("span", vec![("class", HEADER_PRE1_CLASS)]);
    append(&pre1, create_text(&header.pre1));
    let pre2 = create_element("span", vec![("class", HEADER_PRE2_CLASS)]);
    append(&pre2, create_text(&header.pre2));
    append(&pre, pre1);
    append(&pre, create_text(" "));
    append(&pre, pre2);
    let title = create_element("span", vec![("class", HEADER_TITLE_CLASS)]);
    append(&title, create_text(&header.title));
    append(&h2, pre);
    append(&h2, create_text(" "));
    append(&h2, title);
    append(&outer, h2);
    outer
}

fn heading_node(heading: &Heading) -> Handle {
    let tag = format!("h{}", heading.level.clamp(1, 6));
    let node = match &heading.icon {
        Some(icon) => {
            let h = create_element(&tag, vec![("class", "dp-has-icon")]);
            let i = create_element("i", vec![("class", icon)]);
            let hidden = create_element(
                "span",
                vec![("class", ICON_CONTENT_CLASS), ("style", HIDDEN_STYLE)],
            );
            append(&hidden, create_text(NBSP));
            append(&i, hidden);
            append(&h, i);
            h
        }
        None => create_element(&tag, vec![]),
    };
    add_inlines(&node, &heading.content);
    node
}

fn list_node(list: &List) -> Handle {
    let node = create_element(if list.ordered { "ol" } else { "ul" }, vec![]);
    for item in &list.items {
        let li = create_element("li", vec![]);
        add_inlines(&li, &item.content);
        for child in &item.children {
            append(&li, list_node(child));
        }
        append(&node, li);
    }
    node
}

fn add_inlines(parent: &Handle, content: &[InlineContent]) {
    for inline in content {
        add_inline_to_node(parent, inline);
    }
}

fn add_inline_to_node(parent: &Handle, inline: &InlineContent) {
    match inline {
        InlineContent::Text(text) => append(parent, create_text(text)),
        InlineContent::Bold(children) => {
            let strong = create_element("strong", vec![]);
            add_inlines(&strong, children);
            append(parent, strong);
        }
        InlineContent::Italic(children) => {
            let em = create_element("em", vec![]);
            add_inlines(&em, children);
            append(parent, em);
        }
        InlineContent::Link { href, text } => {
            let anchor = create_element("a", vec![("href", href)]);
            append(&anchor, create_text(text));
            append(parent, anchor);
        }
        InlineContent::Token(name) => {
            let span = create_element("span", vec![("class", TOKEN_CLASS), ("data-token", name)]);
            append(&span, create_text(&token(name)));
            append(parent, span);
        }
    }
}

fn append(parent: &Handle, child: Handle) {
    parent.children.borrow_mut().push(child);
}

/// Create an HTML element with attributes
fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a text node
fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Serialize one node, the element itself included
fn serialize_node(node: &Handle) -> Result<String, FormatError> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    let serializable = SerializableHandle::from(node.clone());
    serialize(&mut output, &serializable, opts).map_err(|e| {
        FormatError::SerializationError(format!("HTML serialization failed: {e}"))
    })?;

    String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {e}")))
}
