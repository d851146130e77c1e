//! Tagged-text format
//!
//! A flat, line-oriented rendering of a DesignPlus page that can be edited in
//! any text editor and read back. Structure is carried by upper-case tags on
//! their own lines; content uses a small Markdown-like inline dialect.
//!
//! # Element Mapping Table
//!
//! | Component          | Tagged text                                              |
//! |--------------------|----------------------------------------------------------|
//! | Wrapper            | `<WRAPPER>` … `</WRAPPER>`                               |
//! | ProgressPlaceholder| `<PROGRESS-BAR/>`                                        |
//! | Header             | `<HEADER>`, `Module 1: Title`, `</HEADER>`               |
//! | ContentBlock       | `<!-- dp-id: ID -->` (optional), `<CONTENT-BLOCK>` … `</CONTENT-BLOCK>` |
//! | Heading            | `<ICON classes> ### Title` (icon optional)              |
//! | Paragraph          | one line of inline markup                                |
//! | List               | `* item`, `1. item`, nested by indentation               |
//! | Embed              | `<!-- dp-iframe-title: T -->` (optional), `[Embedded Content](src)` |
//! | Link               | `[text](href)` on its own line                           |
//! | Accordion          | `<ACCORDION>` with `<PANEL-GROUP>`, `<PANEL-HEADING>…</PANEL-HEADING>`, `<PANEL-CONTENT>` |
//!
//! # Lossy Conversions
//!
//! - Paragraphs holding only whitespace or `&nbsp;` are dropped.
//! - Lists inside panel content keep one level of nesting; deeper items are
//!   hoisted.
//! - A header prefix is split at its first space, so `pre1` never holds one:
//!   `Unit A` + `3` reads back as `Unit` + `A 3`.
//! - A header with only `pre2` reads back with that value in `pre1`.
//! - Text outside the panels of accordion-shaped text is dropped when the
//!   text is promoted to an accordion (see [`accordion`]).
//!
//! # Reading
//!
//! Import runs in three steps: [`validator::validate`] rejects unbalanced
//! text, the accordion heuristic may hand text without any tag marker to
//! [`accordion::promote`], and everything else goes through
//! [`parser::parse_tagged`].

pub mod accordion;
pub mod grammar;
pub mod inline;
pub mod lexer;
pub mod parser;
pub mod serializer;
pub mod validator;

use crate::error::FormatError;
use crate::format::{bool_option, Format};
use crate::ir::nodes::Document;
use accordion::{has_structural_markers, promote, PromotionPolicy, ViewportPolicy};
use log::debug;
use std::collections::HashMap;

/// Options of the tagged-text format.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedOptions {
    /// Indentation of one list nesting level.
    pub indent_string: String,
    /// Write accordions as `####` headings and bullets instead of markers.
    pub flatten_accordions: bool,
    pub accordion: ViewportPolicy,
}

impl Default for TaggedOptions {
    fn default() -> Self {
        Self {
            indent_string: "    ".to_string(),
            flatten_accordions: false,
            accordion: ViewportPolicy::default(),
        }
    }
}

/// Validate and parse tagged text.
///
/// Fails with [`FormatError::StructuralImbalance`] when the text is not
/// balanced; nothing is parsed in that case.
pub fn parse_with_policy(
    source: &str,
    title_override: Option<&str>,
    policy: &dyn PromotionPolicy,
) -> Result<Document, FormatError> {
    validator::validate(source)?;

    if !has_structural_markers(source) {
        let lines: Vec<&str> = source.lines().collect();
        if policy.should_promote(&lines) {
            debug!("no structural markers, promoting accordion-shaped text");
            return Ok(promote(source));
        }
    }
    Ok(parser::parse_tagged(source, title_override))
}

/// Format implementation for tagged text
#[derive(Default)]
pub struct TaggedFormat {
    options: TaggedOptions,
}

impl TaggedFormat {
    pub fn new(options: TaggedOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TaggedOptions {
        &self.options
    }
}

impl Format for TaggedFormat {
    fn name(&self) -> &str {
        "tagged"
    }

    fn description(&self) -> &str {
        "Line-oriented tagged text"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown", "txt"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        parse_with_policy(source, None, &self.options.accordion)
    }

    fn parse_with_options(
        &self,
        source: &str,
        options: &HashMap<String, String>,
    ) -> Result<Document, FormatError> {
        let mut policy = self.options.accordion;
        if let Some(enabled) = bool_option(options, "accordion-heuristic")? {
            policy.enabled = enabled;
        }
        let title = options.get("title").map(String::as_str);
        parse_with_policy(source, title, &policy)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(serializer::serialize_tagged(doc, &self.options))
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let mut tagged = self.options.clone();
        if let Some(flatten) = bool_option(options, "flatten-accordions")? {
            tagged.flatten_accordions = flatten;
        }
        if let Some(width) = options.get("indent") {
            let width: usize = width.parse().map_err(|_| {
                FormatError::SerializationError(format!("Invalid indent width '{width}'"))
            })?;
            tagged.indent_string = " ".repeat(width);
        }
        Ok(serializer::serialize_tagged(doc, &tagged))
    }
}
