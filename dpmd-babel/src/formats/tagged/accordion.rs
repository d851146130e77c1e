//! Accordion heuristic and the dedicated accordion converter.
//!
//! Tagged text without any structural marker can still describe an
//! accordion: `####` headings each followed by a run of list items. When such
//! text is long enough to overflow one screen, it is converted with
//! [`promote`] instead of the general parser, so the page gets collapsible
//! panels. The decision itself is a [`PromotionPolicy`]; [`ViewportPolicy`]
//! estimates the rendered height from the item text length.
//!
//! [`flatten`] is the reverse: an accordion written as `####` headings and
//! bullet lines, which [`promote`] reads back as the same panels.

use super::grammar::{classify_line, LineKind, UNORDERED_MARKER};
use super::inline::{escape_text, parse_inline, render_inline, render_link, unescape};
use super::lexer::{tokenize, Token};
use crate::common::inlines::trim;
use crate::ir::nodes::{
    Accordion, Component, Document, InlineContent, List, ListItem, PanelGroup, Wrapper,
};
use log::debug;

/// Heading level that starts a panel in accordion-shaped text.
pub const PANEL_HEADING_LEVEL: usize = 4;

/// Decides whether marker-free text is converted as an accordion.
pub trait PromotionPolicy {
    fn should_promote(&self, lines: &[&str]) -> bool;
}

/// Promotes when the list items would overflow the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportPolicy {
    pub enabled: bool,
    pub chars_per_line: usize,
    pub line_height_px: usize,
    pub viewport_height_px: usize,
}

impl Default for ViewportPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            chars_per_line: 70,
            line_height_px: 20,
            viewport_height_px: 600,
        }
    }
}

impl ViewportPolicy {
    /// Rendered lines that fit in the viewport.
    pub fn threshold_lines(&self) -> usize {
        self.viewport_height_px.div_ceil(self.line_height_px.max(1))
    }

    /// Rendered lines taken by the list items; every item takes at least one.
    pub fn estimate_lines(&self, lines: &[&str]) -> usize {
        let chars_per_line = self.chars_per_line.max(1);
        lines
            .iter()
            .filter_map(|line| match classify_line(line) {
                LineKind::ListItem { text, .. } => Some(text.chars().count()),
                _ => None,
            })
            .map(|len| len.div_ceil(chars_per_line).max(1))
            .sum()
    }
}

impl PromotionPolicy for ViewportPolicy {
    fn should_promote(&self, lines: &[&str]) -> bool {
        if !self.enabled {
            return false;
        }
        let has_panel_heading = lines.iter().any(|line| is_panel_heading(line));
        let has_list_items = lines
            .iter()
            .any(|line| matches!(classify_line(line), LineKind::ListItem { .. }));
        if !has_panel_heading || !has_list_items {
            return false;
        }
        let estimated = self.estimate_lines(lines);
        let threshold = self.threshold_lines();
        debug!("accordion heuristic: {estimated} estimated lines, threshold {threshold}");
        estimated >= threshold
    }
}

/// Text of a line starting with exactly four `#`, spaced or not.
fn panel_heading(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix("####")?;
    if rest.starts_with('#') {
        return None;
    }
    Some(rest.trim())
}

fn is_panel_heading(line: &str) -> bool {
    panel_heading(line).is_some()
}

/// True when the text carries any tag marker (`<WRAPPER>`, `<ACCORDION>`,
/// `<PROGRESS-BAR/>`, …). Such text is an export or an edit of one, never
/// hand-written accordion-shaped text.
pub fn has_structural_markers(source: &str) -> bool {
    source.lines().any(|line| {
        tokenize(line).iter().any(|token| {
            matches!(
                token,
                Token::Open(_) | Token::Close(_) | Token::SelfClosing(_)
            )
        })
    })
}

/// Convert accordion-shaped text into a wrapper holding one accordion.
///
/// The text is split before every `####` line. Each segment becomes a panel
/// labelled with the heading text; every non-empty line after it becomes
/// one list item with its marker stripped. Segments without a heading or
/// without items are dropped, and so is anything outside the panels.
pub fn promote(source: &str) -> Document {
    let mut panels: Vec<PanelGroup> = Vec::new();
    let mut current: Option<(String, Vec<ListItem>)> = None;

    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_markup_only(line) {
            continue;
        }
        if let Some(heading) = panel_heading(trimmed) {
            push_panel(&mut panels, current.take());
            current = Some((unescape(heading), Vec::new()));
            continue;
        }
        if let Some((_, items)) = current.as_mut() {
            let text = match classify_line(line) {
                LineKind::ListItem { text, .. } => text,
                _ => trimmed,
            };
            items.push(ListItem {
                content: parse_inline(text),
                children: Vec::new(),
            });
        }
    }
    push_panel(&mut panels, current.take());

    debug!("promoted text to an accordion with {} panels", panels.len());
    Document::new(vec![Component::Wrapper(Wrapper {
        children: vec![Component::Accordion(Accordion { panels })],
    })])
}

fn push_panel(panels: &mut Vec<PanelGroup>, segment: Option<(String, Vec<ListItem>)>) {
    let Some((heading, items)) = segment else {
        return;
    };
    if heading.is_empty() || items.is_empty() {
        return;
    }
    panels.push(PanelGroup {
        heading,
        content: vec![Component::List(List {
            ordered: false,
            items,
        })],
    });
}

/// Lines made of tags and comments only.
fn is_markup_only(line: &str) -> bool {
    let tokens = tokenize(line);
    !tokens.is_empty()
        && tokens.iter().all(|token| match token {
            Token::Text(text) => text.trim().is_empty(),
            Token::Unknown(_) => false,
            _ => true,
        })
}

/// Write an accordion as `####` headings followed by bullet lines.
pub fn flatten(accordion: &Accordion) -> String {
    let mut lines = Vec::new();
    for panel in &accordion.panels {
        lines.push(format!(
            "{} {}",
            "#".repeat(PANEL_HEADING_LEVEL),
            escape_text(panel.heading.trim())
        ));
        let mut items = Vec::new();
        collect_items(&panel.content, &mut items);
        for item in items {
            lines.push(format!("{UNORDERED_MARKER} {item}"));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

fn collect_items(components: &[Component], out: &mut Vec<String>) {
    for component in components {
        match component {
            Component::List(list) => collect_list(list, out),
            Component::Paragraph(paragraph) => push_inline(&paragraph.content, out),
            Component::Heading(heading) => push_inline(&heading.content, out),
            Component::Link(link) => out.push(render_link(&link.text, &link.href)),
            Component::Embed(embed) => out.push(render_link(
                super::grammar::EMBED_LABEL,
                &embed.src,
            )),
            Component::Wrapper(wrapper) => collect_items(&wrapper.children, out),
            Component::ContentBlock(block) => collect_items(&block.children, out),
            Component::Accordion(nested) => {
                for panel in &nested.panels {
                    collect_items(&panel.content, out);
                }
            }
            Component::Header(_) | Component::ProgressPlaceholder => {}
        }
    }
}

fn collect_list(list: &List, out: &mut Vec<String>) {
    for item in &list.items {
        push_inline(&item.content, out);
        for child in &item.children {
            collect_list(child, out);
        }
    }
}

fn push_inline(content: &[InlineContent], out: &mut Vec<String>) {
    let rendered = render_inline(&trim(content.to_vec()));
    if !rendered.is_empty() {
        out.push(rendered);
    }
}
