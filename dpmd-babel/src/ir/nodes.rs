//! Core data structures for the component tree.
//!
//! The tree is a closed set of node kinds. HTML is classified into these
//! kinds once, at ingestion time (see `formats::html::ingest`), so every
//! traversal afterwards is a plain `match`.

use serde::{Deserialize, Serialize};

/// The root of a converted page.
///
/// Usually holds a single [`Component::Wrapper`], but pages without a
/// DesignPlus wrapper produce their content directly at the root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub children: Vec<Component>,
}

impl Document {
    pub fn new(children: Vec<Component>) -> Self {
        Self { children }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A node of the component tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Component {
    Wrapper(Wrapper),
    Header(Header),
    ProgressPlaceholder,
    ContentBlock(ContentBlock),
    Heading(Heading),
    Paragraph(Paragraph),
    List(List),
    Embed(Embed),
    Link(Link),
    Accordion(Accordion),
}

impl Component {
    /// Stable node kind name, used by the tree visualisation.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Component::Wrapper(_) => "Wrapper",
            Component::Header(_) => "Header",
            Component::ProgressPlaceholder => "ProgressPlaceholder",
            Component::ContentBlock(_) => "ContentBlock",
            Component::Heading(_) => "Heading",
            Component::Paragraph(_) => "Paragraph",
            Component::List(_) => "List",
            Component::Embed(_) => "Embed",
            Component::Link(_) => "Link",
            Component::Accordion(_) => "Accordion",
        }
    }
}

/// Root container of one DesignPlus page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wrapper {
    pub children: Vec<Component>,
}

/// Page banner: a two-part prefix label ("Module" "1") and a title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub pre1: String,
    pub pre2: String,
    pub title: String,
}

impl Header {
    /// The prefix as written on the tagged header line.
    pub fn prefix(&self) -> String {
        [self.pre1.as_str(), self.pre2.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Mid-level container grouping a heading with its body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Opaque identifier assigned by the authoring tool (`data-id`).
    pub id: Option<String>,
    pub children: Vec<Component>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub level: usize,
    pub content: Vec<InlineContent>,
    /// Icon class list, e.g. `"fas fa-book"`.
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub content: Vec<InlineContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub content: Vec<InlineContent>,
    /// Sub-lists rendered below the item text.
    pub children: Vec<List>,
}

impl ListItem {
    pub fn from_text(text: &str) -> Self {
        Self {
            content: vec![InlineContent::Text(text.to_string())],
            children: Vec::new(),
        }
    }
}

/// Embedded media (an `<iframe>` in the page).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub src: String,
    pub title: Option<String>,
}

/// A standalone link line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Accordion {
    pub panels: Vec<PanelGroup>,
}

/// One collapsible section of an accordion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelGroup {
    pub heading: String,
    pub content: Vec<Component>,
}

/// Inline content of headings, paragraphs and list items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InlineContent {
    Text(String),
    Bold(Vec<InlineContent>),
    Italic(Vec<InlineContent>),
    Link { href: String, text: String },
    /// Personalization token, substituted per viewer by the host.
    Token(String),
}
