//! Tagged text → component tree.
//!
//! # The Algorithm
//!
//! One forward pass over the lines, with an explicit stack of open
//! containers ([`Frame`]). A start marker pushes a frame, an end marker pops
//! frames down to (and including) the matching one; each popped frame
//! becomes a node of the frame below it. End markers without a matching
//! frame are ignored.
//!
//! Lists are the exception: they have no markers. List lines go to a
//! separate indentation stack ([`ListBuilder`]) that is flushed into the
//! current frame by any non-list line, blank line or marker.
//!
//! A few constructs span more than one token and are carried as pending
//! state: the header line after `<HEADER>`, the icon that belongs to the
//! next heading, the `dp-id` and `dp-iframe-title` comments, and the text of
//! a `<PANEL-HEADING>`.
//!
//! The parser never fails. It is meant to run on validated text; on other
//! input it degrades to empty values and logs what it skipped. Containers
//! still open at the end are closed in reverse order.

use super::grammar::{
    classify_line, parse_comment, LineKind, Tag, BLOCK_ID_KEY, EMBED_LABEL, EMBED_TITLE_KEY,
    PANEL_LIST_DEPTH,
};
use super::inline::{parse_inline, unescape};
use super::lexer::{tokenize, Token};
use crate::common::inlines::is_blank;
use crate::common::lists::{clamp_nesting, ListBuilder};
use crate::ir::nodes::{
    Accordion, Component, ContentBlock, Document, Embed, Header, Heading, Link, PanelGroup,
    Paragraph, Wrapper,
};
use log::{debug, warn};

/// Legacy header lines were written as a level-two heading.
const LEGACY_HEADER_PREFIX: &str = "## ";

/// An open container.
#[derive(Debug)]
enum Frame {
    Root(Vec<Component>),
    Wrapper(Vec<Component>),
    ContentBlock(ContentBlock),
    Accordion(Vec<PanelGroup>),
    PanelGroup(PanelGroup),
    PanelContent(Vec<Component>),
}

impl Frame {
    fn tag(&self) -> Option<Tag> {
        match self {
            Frame::Root(_) => None,
            Frame::Wrapper(_) => Some(Tag::Wrapper),
            Frame::ContentBlock(_) => Some(Tag::ContentBlock),
            Frame::Accordion(_) => Some(Tag::Accordion),
            Frame::PanelGroup(_) => Some(Tag::PanelGroup),
            Frame::PanelContent(_) => Some(Tag::PanelContent),
        }
    }

    /// Append a node. Content directly inside an accordion goes to its last
    /// panel.
    fn push(&mut self, component: Component) {
        match self {
            Frame::Root(children)
            | Frame::Wrapper(children)
            | Frame::PanelContent(children)
            | Frame::ContentBlock(ContentBlock { children, .. }) => children.push(component),
            Frame::PanelGroup(panel) => panel.content.push(component),
            Frame::Accordion(panels) => match panels.last_mut() {
                Some(panel) => panel.content.push(component),
                None => panels.push(PanelGroup {
                    heading: String::new(),
                    content: vec![component],
                }),
            },
        }
    }
}

#[derive(Debug, Default)]
enum HeaderState {
    #[default]
    Idle,
    /// `<HEADER>` seen, waiting for its line.
    AwaitingLine,
    Captured(String),
}

/// Parse tagged text into a component tree.
///
/// `title_override` replaces the header line when it contains a colon.
pub fn parse_tagged(source: &str, title_override: Option<&str>) -> Document {
    let mut parser = Parser::new(title_override);
    for line in source.lines() {
        parser.line(line);
    }
    parser.finish()
}

struct Parser<'a> {
    stack: Vec<Frame>,
    lists: ListBuilder,
    header: HeaderState,
    icon: Option<String>,
    block_id: Option<String>,
    embed_title: Option<String>,
    panel_heading: Option<String>,
    title_override: Option<&'a str>,
}

impl<'a> Parser<'a> {
    fn new(title_override: Option<&'a str>) -> Self {
        Self {
            stack: vec![Frame::Root(Vec::new())],
            lists: ListBuilder::new(),
            header: HeaderState::Idle,
            icon: None,
            block_id: None,
            embed_title: None,
            panel_heading: None,
            title_override,
        }
    }

    fn line(&mut self, line: &str) {
        let tokens = tokenize(line);
        if tokens.iter().all(Token::is_textual) {
            self.content(line);
            return;
        }

        let mut text = String::new();
        for token in tokens {
            if token.is_textual() {
                if let Token::Text(s) | Token::Unknown(s) = token {
                    text.push_str(s);
                }
                continue;
            }
            self.text_segment(&std::mem::take(&mut text));
            self.token(token);
        }
        self.text_segment(&text);

        if self.panel_heading.is_some() {
            warn!("panel heading not closed on its line: {line}");
            self.finish_panel_heading();
        }
    }

    /// Text found between tags on a mixed line.
    fn text_segment(&mut self, text: &str) {
        if let Some(heading) = self.panel_heading.as_mut() {
            heading.push_str(text);
            return;
        }
        if !text.trim().is_empty() {
            self.content(text);
        }
    }

    fn token(&mut self, token: Token<'_>) {
        match token {
            Token::Open(Tag::PanelHeading) => {
                self.flush_lists();
                self.panel_heading = Some(String::new());
            }
            Token::Close(Tag::PanelHeading) => {
                if self.panel_heading.is_some() {
                    self.finish_panel_heading();
                } else {
                    warn!("ignoring {} without an open panel heading", Tag::PanelHeading.close());
                }
            }
            Token::Open(tag) => self.open(tag),
            Token::Close(tag) => self.close(tag),
            Token::SelfClosing(tag) => {
                self.token(Token::Open(tag));
                if !tag.is_void() {
                    self.token(Token::Close(tag));
                }
            }
            Token::Icon(classes) => {
                self.flush_lists();
                self.finish_header();
                if let Some(previous) = self.icon.replace(classes.to_string()) {
                    warn!("icon `{previous}` has no heading");
                }
            }
            Token::Comment(body) => self.comment(body),
            Token::Text(_) | Token::Unknown(_) => {}
        }
    }

    fn comment(&mut self, body: &str) {
        match parse_comment(body) {
            Some((BLOCK_ID_KEY, id)) => self.block_id = Some(id.to_string()),
            Some((EMBED_TITLE_KEY, title)) => self.embed_title = Some(title.to_string()),
            _ => debug!("ignoring comment `{body}`"),
        }
    }

    fn open(&mut self, tag: Tag) {
        self.flush_lists();
        self.finish_header();
        self.drop_icon();

        let frame = match tag {
            Tag::Header => {
                self.header = HeaderState::AwaitingLine;
                return;
            }
            Tag::ProgressBar => {
                self.emit(Component::ProgressPlaceholder);
                return;
            }
            Tag::PanelHeading => {
                self.panel_heading = Some(String::new());
                return;
            }
            Tag::Wrapper => Frame::Wrapper(Vec::new()),
            Tag::ContentBlock => Frame::ContentBlock(ContentBlock {
                id: self.block_id.take(),
                children: Vec::new(),
            }),
            Tag::Accordion => Frame::Accordion(Vec::new()),
            Tag::PanelGroup => Frame::PanelGroup(PanelGroup::default()),
            Tag::PanelContent => Frame::PanelContent(Vec::new()),
        };
        self.stack.push(frame);
    }

    fn close(&mut self, tag: Tag) {
        self.flush_lists();
        if tag == Tag::Header {
            if matches!(self.header, HeaderState::Idle) {
                warn!("ignoring {} without an open header", tag.close());
            }
            self.finish_header();
            return;
        }
        self.finish_header();
        self.drop_icon();

        match self.stack.iter().rposition(|frame| frame.tag() == Some(tag)) {
            Some(depth) => {
                while self.stack.len() > depth {
                    self.pop_frame();
                }
            }
            None => warn!("ignoring {} without a matching start marker", tag.close()),
        }
    }

    /// Pop the top frame and attach it to the frame below.
    fn pop_frame(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            Frame::Root(children) => {
                for child in children {
                    self.emit(child);
                }
            }
            Frame::Wrapper(children) => self.emit(Component::Wrapper(Wrapper { children })),
            Frame::ContentBlock(block) => self.emit(Component::ContentBlock(block)),
            Frame::Accordion(panels) => self.emit(Component::Accordion(Accordion { panels })),
            Frame::PanelGroup(panel) => match self.stack.last_mut() {
                Some(Frame::Accordion(panels)) => panels.push(panel),
                _ => {
                    debug!("panel group outside an accordion, wrapping it in one");
                    self.emit(Component::Accordion(Accordion {
                        panels: vec![panel],
                    }));
                }
            },
            Frame::PanelContent(children) => {
                for mut child in children {
                    if let Component::List(list) = &mut child {
                        clamp_nesting(list, PANEL_LIST_DEPTH);
                    }
                    self.emit(child);
                }
            }
        }
    }

    fn emit(&mut self, component: Component) {
        if let Some(frame) = self.stack.last_mut() {
            frame.push(component);
        }
    }

    fn flush_lists(&mut self) {
        for list in self.lists.finish() {
            self.emit(Component::List(list));
        }
    }

    fn drop_icon(&mut self) {
        if let Some(icon) = self.icon.take() {
            warn!("icon `{icon}` is not followed by a heading");
        }
    }

    fn finish_panel_heading(&mut self) {
        let Some(raw) = self.panel_heading.take() else {
            return;
        };
        let heading = unescape(raw.trim());
        match self.stack.last_mut() {
            Some(Frame::PanelGroup(panel)) => panel.heading = heading,
            Some(Frame::Accordion(panels)) => panels.push(PanelGroup {
                heading,
                content: Vec::new(),
            }),
            _ => {
                warn!("panel heading `{heading}` outside a panel group");
                if !heading.is_empty() {
                    self.emit(Component::Paragraph(Paragraph {
                        content: parse_inline(&heading),
                    }));
                }
            }
        }
    }

    fn finish_header(&mut self) {
        let line = match std::mem::take(&mut self.header) {
            HeaderState::Idle => return,
            HeaderState::AwaitingLine => {
                warn!("header marker without a header line");
                String::new()
            }
            HeaderState::Captured(line) => line,
        };
        let line = match self.title_override {
            Some(title) if title.contains(':') => title.trim().to_string(),
            _ => line,
        };
        self.emit(Component::Header(split_header(&line)));
    }

    /// A content (non-marker) line or text segment.
    fn content(&mut self, text: &str) {
        match self.header {
            HeaderState::AwaitingLine if !text.trim().is_empty() => {
                self.header = HeaderState::Captured(text.trim().to_string());
                return;
            }
            HeaderState::Captured(_) => self.finish_header(),
            _ => {}
        }

        match classify_line(text) {
            LineKind::Blank => self.flush_lists(),
            LineKind::ListItem {
                indent,
                ordered,
                text,
            } => {
                self.drop_icon();
                self.lists.push_item(indent, ordered, parse_inline(text));
            }
            LineKind::Heading { level, text } => {
                self.flush_lists();
                let icon = self.icon.take();
                self.emit(Component::Heading(Heading {
                    level,
                    content: parse_inline(text),
                    icon,
                }));
            }
            LineKind::LinkLine { text, href } => {
                self.flush_lists();
                self.drop_icon();
                let text = unescape(text);
                let href = unescape(href);
                let component = if text == EMBED_LABEL {
                    Component::Embed(Embed {
                        src: href,
                        title: self.embed_title.take(),
                    })
                } else {
                    Component::Link(Link { href, text })
                };
                self.emit(component);
            }
            LineKind::Paragraph(text) => {
                self.flush_lists();
                self.drop_icon();
                let content = parse_inline(text);
                if !is_blank(&content) {
                    self.emit(Component::Paragraph(Paragraph { content }));
                }
            }
        }
    }

    fn finish(mut self) -> Document {
        if self.panel_heading.is_some() {
            self.finish_panel_heading();
        }
        self.flush_lists();
        self.finish_header();
        self.drop_icon();
        while self.stack.len() > 1 {
            if let Some(tag) = self.stack.last().and_then(Frame::tag) {
                debug!("closing {tag} at end of input");
            }
            self.pop_frame();
        }
        match self.stack.pop() {
            Some(Frame::Root(children)) => Document::new(children),
            _ => Document::default(),
        }
    }
}

/// `"Module 1: Getting started"` → pre1 `Module`, pre2 `1`, title
/// `Getting started`. A line without a colon is all title.
fn split_header(line: &str) -> Header {
    let line = line.trim();
    let line = line.strip_prefix(LEGACY_HEADER_PREFIX).unwrap_or(line);
    let (prefix, title) = match line.split_once(':') {
        Some((prefix, title)) => (prefix.trim(), title.trim()),
        None => ("", line.trim()),
    };
    let (pre1, pre2) = match prefix.split_once(' ') {
        Some((pre1, pre2)) => (pre1, pre2.trim()),
        None => (prefix, ""),
    };
    Header {
        pre1: unescape(pre1),
        pre2: unescape(pre2),
        title: unescape(title),
    }
}
