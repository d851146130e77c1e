//! HTML format implementation
//!
//! Reads and writes the HTML of a DesignPlus page: the fragment held by the
//! page editor, rooted at the `dp-wrapper` element.
//!
//! # Library Choice
//!
//! `html5ever` parses (browser-grade error recovery, so editor output of any
//! quality is accepted) and serializes; `markup5ever_rcdom` is the DOM both
//! directions work on. Relative links are resolved with `url`.
//!
//! # Element Mapping Table
//!
//! | HTML                                            | Component           |
//! |-------------------------------------------------|---------------------|
//! | `.dp-wrapper` / `#dp-wrapper`                   | Wrapper             |
//! | `.dp-header` with `.dp-header-pre-1/-pre-2/-title` | Header           |
//! | `.dp-progress-placeholder`, `.dp-progress-completion` | ProgressPlaceholder |
//! | `.dp-content-block[data-id]`                    | ContentBlock        |
//! | `.dp-panels-wrapper`, `.dp-accordion-default`   | Accordion           |
//! | `.dp-panel-group` > `.dp-panel-heading`, `.dp-panel-content` | PanelGroup |
//! | `h1`–`h6`, icon in `<i class="fa…">`            | Heading             |
//! | `p`                                             | Paragraph           |
//! | `p` holding one `a`                             | Link                |
//! | `iframe`                                        | Embed               |
//! | `ul`, `ol`                                      | List                |
//! | `span.dp-personalization-token[data-token]`     | Token (inline)      |
//! | anything else                                   | transparent         |
//!
//! # Lossy Conversions
//!
//! - Attributes and styling other than the ones above are not kept.
//! - Paragraphs holding only whitespace or `&nbsp;` (such as the editor's
//!   trailing spacer) are dropped.
//! - Icon classes not starting with `fa` are dropped.

mod ingest;
mod serializer;

pub use ingest::parse_html;
pub use serializer::serialize_to_html;

use crate::error::FormatError;
use crate::format::{bool_option, Format};
use crate::ir::nodes::Document;
use std::collections::HashMap;

/// Banner image the DesignPlus tool assigns to new wrappers.
pub const DEFAULT_BANNER_IMAGE_URL: &str =
    "https://designtools.ciditools.com/css/images/banner_desert_sky.png";

/// Options for HTML reading and rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlOptions {
    /// `data-img-url` of a rendered wrapper
    pub banner_image_url: String,
    /// Append the editor's `<p>&nbsp;</p>` spacer inside a rendered wrapper
    pub trailing_spacer: bool,
    /// Base for resolving relative `href`/`src` values when reading
    pub base_url: Option<String>,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            banner_image_url: DEFAULT_BANNER_IMAGE_URL.to_string(),
            trailing_spacer: true,
            base_url: None,
        }
    }
}

/// Format implementation for HTML
#[derive(Default)]
pub struct HtmlFormat {
    options: HtmlOptions,
}

impl HtmlFormat {
    pub fn new(options: HtmlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "DesignPlus page HTML"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        parse_html(source, &self.options)
    }

    fn parse_with_options(
        &self,
        source: &str,
        options: &HashMap<String, String>,
    ) -> Result<Document, FormatError> {
        let mut html = self.options.clone();
        if let Some(base) = options.get("base-url") {
            html.base_url = Some(base.clone());
        }
        parse_html(source, &html)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serialize_to_html(doc, &self.options)
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let mut html = self.options.clone();
        if let Some(url) = options.get("banner-url") {
            html.banner_image_url = url.clone();
        }
        if let Some(spacer) = bool_option(options, "trailing-spacer")? {
            html.trailing_spacer = spacer;
        }
        serialize_to_html(doc, &html)
    }
}
