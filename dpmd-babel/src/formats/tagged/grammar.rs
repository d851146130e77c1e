//! The tag grammar of the tagged-text format.
//!
//! Structural markers use XML-style tags, one per line:
//!
//! ```text
//! <WRAPPER>
//! <PROGRESS-BAR/>
//! <HEADER>
//! Module 1: Getting started
//! </HEADER>
//! <!-- dp-id: 8f2c -->
//! <CONTENT-BLOCK>
//! <ICON fas fa-book> ### Readings
//! Read **chapter 1** before {{first_name}} joins the *seminar*.
//! * item
//! <ACCORDION>
//! <PANEL-GROUP>
//! <PANEL-HEADING>Week 1</PANEL-HEADING>
//! <PANEL-CONTENT>
//! * item
//! </PANEL-CONTENT>
//! </PANEL-GROUP>
//! </ACCORDION>
//! </CONTENT-BLOCK>
//! </WRAPPER>
//! ```
//!
//! Everything that is not a tag is content written in a small inline dialect
//! (see `inline.rs`) and classified line by line with [`classify_line`].

use once_cell::sync::Lazy;
use regex::Regex;

/// Closed set of structural tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Wrapper,
    Header,
    ContentBlock,
    Accordion,
    PanelGroup,
    PanelHeading,
    PanelContent,
    ProgressBar,
}

impl Tag {
    pub const ALL: [Tag; 8] = [
        Tag::Wrapper,
        Tag::Header,
        Tag::ContentBlock,
        Tag::Accordion,
        Tag::PanelGroup,
        Tag::PanelHeading,
        Tag::PanelContent,
        Tag::ProgressBar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tag::Wrapper => "WRAPPER",
            Tag::Header => "HEADER",
            Tag::ContentBlock => "CONTENT-BLOCK",
            Tag::Accordion => "ACCORDION",
            Tag::PanelGroup => "PANEL-GROUP",
            Tag::PanelHeading => "PANEL-HEADING",
            Tag::PanelContent => "PANEL-CONTENT",
            Tag::ProgressBar => "PROGRESS-BAR",
        }
    }

    pub fn from_name(name: &str) -> Option<Tag> {
        Tag::ALL.into_iter().find(|tag| tag.name() == name)
    }

    /// Void tags are markers without content or end tag.
    pub fn is_void(self) -> bool {
        matches!(self, Tag::ProgressBar)
    }

    /// Tags whose start and end must sit on the same line.
    pub fn is_single_line(self) -> bool {
        matches!(self, Tag::PanelHeading)
    }

    pub fn open(self) -> String {
        if self.is_void() {
            format!("<{}/>", self.name())
        } else {
            format!("<{}>", self.name())
        }
    }

    pub fn close(self) -> String {
        format!("</{}>", self.name())
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Tag name of the icon annotation, `<ICON fas fa-book>`.
pub const ICON_TAG: &str = "ICON";

/// Comment key carrying a content block's external id.
pub const BLOCK_ID_KEY: &str = "dp-id";

/// Comment key carrying an embed's title.
pub const EMBED_TITLE_KEY: &str = "dp-iframe-title";

/// Link text that marks a link line as an embed.
pub const EMBED_LABEL: &str = "Embedded Content";

pub const BOLD_MARKER: &str = "**";
pub const ITALIC_MARKER: &str = "*";

/// Marker used when writing unordered items. `-` and `+` are read as well.
pub const UNORDERED_MARKER: char = '*';

/// Nesting allowed below the top-level list inside panel content.
pub const PANEL_LIST_DEPTH: usize = 1;

/// Writes a personalization token.
pub fn token(name: &str) -> String {
    format!("{{{{{name}}}}}")
}

/// Writes a `<!-- key: value -->` comment line.
pub fn comment(key: &str, value: &str) -> String {
    format!("<!-- {key}: {value} -->")
}

/// Splits a comment body into `(key, value)`.
pub fn parse_comment(body: &str) -> Option<(&str, &str)> {
    let (key, value) = body.split_once(':')?;
    Some((key.trim(), value.trim()))
}

static LIST_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ \t]*)([*+-]|\d{1,9}[.)])[ \t]+(.*)$").unwrap());
static LINK_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[((?:\\.|[^\]\\])*)\]\(((?:\\.|[^)\\])*)\)$").unwrap());

/// Kind of a content (non-tag) line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Heading { level: usize, text: &'a str },
    ListItem { indent: usize, ordered: bool, text: &'a str },
    /// `[text](href)` filling the whole line; both parts still escaped.
    LinkLine { text: &'a str, href: &'a str },
    Paragraph(&'a str),
}

pub fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if let Some((level, text)) = heading_parts(trimmed) {
        return LineKind::Heading { level, text };
    }
    if let Some(caps) = LIST_ITEM_RE.captures(line) {
        let indent = indent_width(caps.get(1).map_or("", |m| m.as_str()));
        let marker = caps.get(2).map_or("", |m| m.as_str());
        let text = caps.get(3).map_or("", |m| m.as_str()).trim_end();
        return LineKind::ListItem {
            indent,
            ordered: marker.starts_with(|c: char| c.is_ascii_digit()),
            text,
        };
    }
    if let Some(caps) = LINK_LINE_RE.captures(trimmed) {
        return LineKind::LinkLine {
            text: caps.get(1).map_or("", |m| m.as_str()),
            href: caps.get(2).map_or("", |m| m.as_str()),
        };
    }
    LineKind::Paragraph(trimmed)
}

/// `### Title` → `(3, "Title")`. Seven or more `#` is not a heading.
pub fn heading_parts(trimmed: &str) -> Option<(usize, &str)> {
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if rest.is_empty() {
        return Some((level, ""));
    }
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    Some((level, rest.trim()))
}

/// Width of leading indentation, tabs counting as four columns.
pub fn indent_width(indent: &str) -> usize {
    indent
        .chars()
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}
