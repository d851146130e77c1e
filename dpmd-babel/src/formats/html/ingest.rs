//! HTML ingestion (DesignPlus page → component tree)
//!
//! Parses the page with html5ever and classifies every element exactly once
//! into a [`Component`]. Classification goes by the DesignPlus class names
//! first and by tag name second; elements matching neither are transparent
//! and only their children are looked at.
//!
//! Text and inline elements found directly among block elements (a
//! content block holding bare text, say) are gathered into paragraphs.

use super::HtmlOptions;
use crate::common::inlines::{collapse_whitespace, is_blank, normalize, trim};
use crate::error::FormatError;
use crate::ir::nodes::{
    Accordion, Component, ContentBlock, Document, Embed, Header, Heading, InlineContent, Link,
    List, ListItem, PanelGroup, Paragraph, Wrapper,
};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use log::debug;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use url::Url;

pub const WRAPPER_CLASS: &str = "dp-wrapper";
pub const HEADER_CLASS: &str = "dp-header";
pub const HEADER_PRE1_CLASS: &str = "dp-header-pre-1";
pub const HEADER_PRE2_CLASS: &str = "dp-header-pre-2";
pub const HEADER_TITLE_CLASS: &str = "dp-header-title";
pub const PROGRESS_CLASSES: [&str; 3] = [
    "dp-progress-placeholder",
    "dp-progress-completion",
    "dp-module-progress-completion",
];
pub const CONTENT_BLOCK_CLASS: &str = "dp-content-block";
pub const ACCORDION_CLASSES: [&str; 2] = ["dp-panels-wrapper", "dp-accordion-default"];
pub const PANEL_GROUP_CLASS: &str = "dp-panel-group";
pub const PANEL_HEADING_CLASS: &str = "dp-panel-heading";
pub const PANEL_CONTENT_CLASS: &str = "dp-panel-content";
pub const TOKEN_CLASS: &str = "dp-personalization-token";
pub const ICON_CONTENT_CLASS: &str = "dp-icon-content";

const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "br", "cite", "code", "em", "font", "i", "img", "label", "mark", "q", "s",
    "small", "span", "strike", "strong", "sub", "sup", "time", "u",
];
const SKIPPED_TAGS: &[&str] = &["script", "style", "template", "noscript", "head", "title"];

pub fn parse_html(source: &str, options: &HtmlOptions) -> Result<Document, FormatError> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut source.as_bytes())
        .map_err(|e| FormatError::ParseError(format!("HTML parsing failed: {e}")))?;

    let base = match options.base_url.as_deref().filter(|url| !url.is_empty()) {
        Some(url) => Some(
            Url::parse(url)
                .map_err(|e| FormatError::ParseError(format!("Invalid base URL '{url}': {e}")))?,
        ),
        None => None,
    };
    let ingest = Ingest { base };

    if let Some(wrapper) = find_first(&dom.document, &is_wrapper) {
        return Ok(Document::new(vec![ingest.wrapper(&wrapper)]));
    }
    debug!("no {WRAPPER_CLASS} element, reading the body");
    match find_first(&dom.document, &|node| element_name(node) == Some("body")) {
        Some(body) => Ok(Document::new(ingest.blocks(&body))),
        None => Ok(Document::default()),
    }
}

struct Ingest {
    base: Option<Url>,
}

impl Ingest {
    fn wrapper(&self, node: &Handle) -> Component {
        Component::Wrapper(Wrapper {
            children: self.blocks(node),
        })
    }

    /// Classify the children of a block container.
    fn blocks(&self, parent: &Handle) -> Vec<Component> {
        let mut out = Vec::new();
        let mut loose: Vec<InlineContent> = Vec::new();

        for child in parent.children.borrow().iter() {
            match &child.data {
                NodeData::Text { contents } => {
                    loose.push(InlineContent::Text(collapse_whitespace(&contents.borrow())));
                }
                NodeData::Element { .. } if is_inline(child) => {
                    loose.extend(self.inline(child));
                }
                NodeData::Element { .. } => {
                    self.flush_loose(&mut loose, &mut out);
                    out.extend(self.block(child));
                }
                _ => {}
            }
        }
        self.flush_loose(&mut loose, &mut out);
        out
    }

    fn flush_loose(&self, loose: &mut Vec<InlineContent>, out: &mut Vec<Component>) {
        let content = std::mem::take(loose);
        if let Some(component) = paragraph_or_link(content) {
            out.push(component);
        }
    }

    fn block(&self, node: &Handle) -> Vec<Component> {
        let classes = classes(node);
        let has = |class: &str| classes.iter().any(|c| c == class);

        if is_wrapper(node) {
            return vec![self.wrapper(node)];
        }
        if has(HEADER_CLASS) {
            return vec![Component::Header(header(node))];
        }
        if PROGRESS_CLASSES.iter().any(|class| has(*class)) {
            return vec![Component::ProgressPlaceholder];
        }
        if has(CONTENT_BLOCK_CLASS) {
            return vec![Component::ContentBlock(ContentBlock {
                id: attr(node, "data-id").filter(|id| !id.is_empty()),
                children: self.blocks(node),
            })];
        }
        if ACCORDION_CLASSES.iter().any(|class| has(*class)) {
            let mut panels = Vec::new();
            self.panel_groups(node, &mut panels);
            return vec![Component::Accordion(Accordion { panels })];
        }
        if has(PANEL_GROUP_CLASS) {
            debug!("panel group outside an accordion");
            return vec![Component::Accordion(Accordion {
                panels: vec![self.panel(node)],
            })];
        }

        let Some(tag) = element_name(node) else {
            return Vec::new();
        };
        match tag {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => vec![self.heading(node, tag)],
            "p" => self.paragraph(node),
            "ul" | "ol" => vec![Component::List(self.list(node, tag == "ol"))],
            "iframe" => vec![self.embed(node)],
            "hr" => Vec::new(),
            _ if SKIPPED_TAGS.contains(&tag) => Vec::new(),
            _ => self.blocks(node),
        }
    }

    fn heading(&self, node: &Handle, tag: &str) -> Component {
        let level = tag[1..].parse().unwrap_or(1);
        let icon = find_first(node, &is_icon).map(|icon| icon_classes(&icon));
        Component::Heading(Heading {
            level,
            content: trim(self.inline_children(node)),
            icon,
        })
    }

    fn paragraph(&self, node: &Handle) -> Vec<Component> {
        let mut frames = Vec::new();
        collect_all(node, &|n| element_name(n) == Some("iframe"), &mut frames);
        if !frames.is_empty() {
            return frames.iter().map(|frame| self.embed(frame)).collect();
        }
        paragraph_or_link(self.inline_children(node))
            .into_iter()
            .collect()
    }

    fn embed(&self, node: &Handle) -> Component {
        Component::Embed(Embed {
            src: self.resolve(&attr(node, "src").unwrap_or_default()),
            title: attr(node, "title").filter(|title| !title.trim().is_empty()),
        })
    }

    fn list(&self, node: &Handle, ordered: bool) -> List {
        let mut items = Vec::new();
        for child in node.children.borrow().iter() {
            if element_name(child) != Some("li") {
                continue;
            }
            let mut content = Vec::new();
            let mut children = Vec::new();
            for part in child.children.borrow().iter() {
                match element_name(part) {
                    Some(tag @ ("ul" | "ol")) => children.push(self.list(part, tag == "ol")),
                    _ => content.extend(self.inline(part)),
                }
            }
            items.push(ListItem {
                content: trim(content),
                children,
            });
        }
        List { ordered, items }
    }

    fn panel_groups(&self, node: &Handle, out: &mut Vec<PanelGroup>) {
        for child in node.children.borrow().iter() {
            if !matches!(child.data, NodeData::Element { .. }) {
                continue;
            }
            if has_class(child, PANEL_GROUP_CLASS) {
                out.push(self.panel(child));
            } else {
                self.panel_groups(child, out);
            }
        }
    }

    fn panel(&self, node: &Handle) -> PanelGroup {
        let heading = find_first(node, &|n| has_class(n, PANEL_HEADING_CLASS))
            .map(|heading| collapse_whitespace(&text_content(&heading)).trim().to_string())
            .unwrap_or_default();
        let content = match find_first(node, &|n| has_class(n, PANEL_CONTENT_CLASS)) {
            Some(content) => self.blocks(&content),
            None => {
                let mut children = Vec::new();
                for child in node.children.borrow().iter() {
                    if has_class(child, PANEL_HEADING_CLASS) {
                        continue;
                    }
                    children.extend(self.block(child));
                }
                children
            }
        };
        PanelGroup { heading, content }
    }

    fn inline_children(&self, node: &Handle) -> Vec<InlineContent> {
        let mut out = Vec::new();
        for child in node.children.borrow().iter() {
            out.extend(self.inline(child));
        }
        normalize(out)
    }

    fn inline(&self, node: &Handle) -> Vec<InlineContent> {
        match &node.data {
            NodeData::Text { contents } => {
                vec![InlineContent::Text(collapse_whitespace(&contents.borrow()))]
            }
            NodeData::Element { .. } => {
                let tag = element_name(node).unwrap_or_default();
                if has_class(node, TOKEN_CLASS) {
                    return vec![InlineContent::Token(token_name(node))];
                }
                if is_icon(node) || has_class(node, ICON_CONTENT_CLASS) {
                    return Vec::new();
                }
                match tag {
                    "strong" | "b" => vec![InlineContent::Bold(self.inline_children(node))],
                    "em" | "i" => vec![InlineContent::Italic(self.inline_children(node))],
                    "a" => vec![InlineContent::Link {
                        href: self.resolve(&attr(node, "href").unwrap_or_default()),
                        text: collapse_whitespace(&text_content(node)).trim().to_string(),
                    }],
                    "br" => vec![InlineContent::Text(" ".to_string())],
                    "iframe" | "img" => Vec::new(),
                    _ if SKIPPED_TAGS.contains(&tag) => Vec::new(),
                    _ => self.inline_children(node),
                }
            }
            _ => Vec::new(),
        }
    }

    /// Make a relative URL absolute against the base URL, if one is set.
    fn resolve(&self, raw: &str) -> String {
        let raw = raw.trim();
        let Some(base) = &self.base else {
            return raw.to_string();
        };
        match Url::parse(raw) {
            Ok(_) => raw.to_string(),
            Err(url::ParseError::RelativeUrlWithoutBase) => base
                .join(raw)
                .map(|url| url.to_string())
                .unwrap_or_else(|_| raw.to_string()),
            Err(_) => raw.to_string(),
        }
    }
}

/// A paragraph, or a link when the run is a single link. Blank runs
/// (whitespace, `&nbsp;`) produce nothing.
fn paragraph_or_link(content: Vec<InlineContent>) -> Option<Component> {
    let content = trim(content);
    if is_blank(&content) {
        return None;
    }
    if let [InlineContent::Link { href, text }] = content.as_slice() {
        return Some(Component::Link(Link {
            href: href.clone(),
            text: text.clone(),
        }));
    }
    Some(Component::Paragraph(Paragraph { content }))
}

fn header(node: &Handle) -> Header {
    let part = |class: &str| {
        find_first(node, &|n| has_class(n, class))
            .map(|n| collapse_whitespace(&text_content(&n)).trim().to_string())
    };
    let pre1 = part(HEADER_PRE1_CLASS);
    let pre2 = part(HEADER_PRE2_CLASS);
    let title = part(HEADER_TITLE_CLASS);
    if pre1.is_none() && pre2.is_none() && title.is_none() {
        return Header {
            title: collapse_whitespace(&text_content(node)).trim().to_string(),
            ..Header::default()
        };
    }
    Header {
        pre1: pre1.unwrap_or_default(),
        pre2: pre2.unwrap_or_default(),
        title: title.unwrap_or_default(),
    }
}

fn token_name(node: &Handle) -> String {
    match attr(node, "data-token") {
        Some(name) if !name.is_empty() => name,
        _ => text_content(node)
            .trim()
            .trim_start_matches("{{")
            .trim_end_matches("}}")
            .trim()
            .to_string(),
    }
}

fn element_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

fn attr(node: &Handle, key: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref() == key)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

fn classes(node: &Handle) -> Vec<String> {
    attr(node, "class")
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

fn has_class(node: &Handle, class: &str) -> bool {
    classes(node).iter().any(|c| c == class)
}

fn is_wrapper(node: &Handle) -> bool {
    attr(node, "id").as_deref() == Some(WRAPPER_CLASS) || has_class(node, WRAPPER_CLASS)
}

fn is_inline(node: &Handle) -> bool {
    let Some(tag) = element_name(node) else {
        return false;
    };
    if tag == "span" && PROGRESS_CLASSES.iter().any(|class| has_class(node, class)) {
        return false;
    }
    INLINE_TAGS.contains(&tag)
}

/// `<i class="fas fa-book">` inside a heading.
fn is_icon(node: &Handle) -> bool {
    element_name(node) == Some("i") && classes(node).iter().any(|c| c.starts_with("fa"))
}

fn icon_classes(node: &Handle) -> String {
    classes(node)
        .into_iter()
        .filter(|c| c.starts_with("fa"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    push_text(node, &mut out);
    out
}

fn push_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        _ => {
            for child in node.children.borrow().iter() {
                push_text(child, out);
            }
        }
    }
}

/// Depth-first search below `node` (excluding it).
fn find_first(node: &Handle, pred: &dyn Fn(&Handle) -> bool) -> Option<Handle> {
    for child in node.children.borrow().iter() {
        if pred(child) {
            return Some(child.clone());
        }
        if let Some(found) = find_first(child, pred) {
            return Some(found);
        }
    }
    None
}

fn collect_all(node: &Handle, pred: &dyn Fn(&Handle) -> bool, out: &mut Vec<Handle>) {
    for child in node.children.borrow().iter() {
        if pred(child) {
            out.push(child.clone());
        } else {
            collect_all(child, pred, out);
        }
    }
}
