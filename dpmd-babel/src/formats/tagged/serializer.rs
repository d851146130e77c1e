//! Component tree → tagged text.
//!
//! Depth-first pre-order walk. Containers write their start marker, their
//! children and their end marker, each marker on its own line. Leaves are
//! followed by one blank line so adjacent lists stay apart when read back.

use super::accordion;
use super::grammar::{comment, Tag, BLOCK_ID_KEY, EMBED_LABEL, EMBED_TITLE_KEY, ICON_TAG};
use super::inline::{escape_line_start, escape_text, render_inline, render_link};
use super::TaggedOptions;
use crate::common::inlines::{is_blank, trim};
use crate::ir::nodes::{Accordion, Component, Document, Header, Heading, List};

pub fn serialize_tagged(doc: &Document, options: &TaggedOptions) -> String {
    let mut writer = Writer::new(options);
    for component in &doc.children {
        writer.component(component);
    }
    writer.finish()
}

struct Writer<'a> {
    options: &'a TaggedOptions,
    lines: Vec<String>,
}

impl<'a> Writer<'a> {
    fn new(options: &'a TaggedOptions) -> Self {
        Self {
            options,
            lines: Vec::new(),
        }
    }

    fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|last| !last.is_empty()) {
            self.lines.push(String::new());
        }
    }

    /// End markers sit directly below the last child.
    fn close(&mut self, tag: Tag) {
        while self.lines.last().is_some_and(|last| last.is_empty()) {
            self.lines.pop();
        }
        self.line(tag.close());
    }

    fn finish(mut self) -> String {
        while self.lines.last().is_some_and(|last| last.is_empty()) {
            self.lines.pop();
        }
        if self.lines.is_empty() {
            return String::new();
        }
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    fn component(&mut self, component: &Component) {
        match component {
            Component::Wrapper(wrapper) => {
                self.line(Tag::Wrapper.open());
                for child in &wrapper.children {
                    self.component(child);
                }
                self.close(Tag::Wrapper);
            }
            Component::Header(header) => self.header(header),
            Component::ProgressPlaceholder => self.line(Tag::ProgressBar.open()),
            Component::ContentBlock(block) => {
                if let Some(id) = &block.id {
                    self.line(comment(BLOCK_ID_KEY, id));
                }
                self.line(Tag::ContentBlock.open());
                for child in &block.children {
                    self.component(child);
                }
                self.close(Tag::ContentBlock);
            }
            Component::Heading(heading) => {
                self.line(heading_line(heading));
                self.blank();
            }
            Component::Paragraph(paragraph) => {
                if is_blank(&paragraph.content) {
                    return;
                }
                let content = trim(paragraph.content.clone());
                self.line(escape_line_start(render_inline(&content)));
                self.blank();
            }
            Component::List(list) => {
                self.list(list, 0);
                self.blank();
            }
            Component::Embed(embed) => {
                if let Some(title) = &embed.title {
                    self.line(comment(EMBED_TITLE_KEY, title));
                }
                self.line(render_link(EMBED_LABEL, &embed.src));
                self.blank();
            }
            Component::Link(link) => {
                self.line(render_link(&link.text, &link.href));
                self.blank();
            }
            Component::Accordion(accordion) => self.accordion(accordion),
        }
    }

    fn header(&mut self, header: &Header) {
        self.line(Tag::Header.open());
        let line = format!(
            "{}: {}",
            escape_text(&header.prefix()),
            escape_text(&header.title)
        );
        self.line(line.trim_end());
        self.line(Tag::Header.close());
    }

    fn list(&mut self, list: &List, depth: usize) {
        let indent = self.options.indent_string.repeat(depth);
        for (index, item) in list.items.iter().enumerate() {
            let marker = if list.ordered {
                format!("{}.", index + 1)
            } else {
                super::grammar::UNORDERED_MARKER.to_string()
            };
            let text = render_inline(&trim(item.content.clone()));
            self.line(format!("{indent}{marker} {text}"));
            for child in &item.children {
                self.list(child, depth + 1);
            }
        }
    }

    fn accordion(&mut self, accordion: &Accordion) {
        if self.options.flatten_accordions {
            for line in accordion::flatten(accordion).lines() {
                self.line(line);
            }
            self.blank();
            return;
        }

        self.line(Tag::Accordion.open());
        for panel in &accordion.panels {
            self.line(Tag::PanelGroup.open());
            self.line(format!(
                "{}{}{}",
                Tag::PanelHeading.open(),
                escape_text(panel.heading.trim()),
                Tag::PanelHeading.close()
            ));
            self.line(Tag::PanelContent.open());
            for child in &panel.content {
                self.component(child);
            }
            self.close(Tag::PanelContent);
            self.close(Tag::PanelGroup);
        }
        self.close(Tag::Accordion);
    }
}

fn heading_line(heading: &Heading) -> String {
    let level = heading.level.clamp(1, 6);
    let text = render_inline(&trim(heading.content.clone()));
    let mut line = String::new();
    if let Some(icon) = &heading.icon {
        line.push_str(&format!("<{ICON_TAG} {}> ", icon.trim()));
    }
    line.push_str(&"#".repeat(level));
    if !text.is_empty() {
        line.push(' ');
        line.push_str(&text);
    }
    line
}
