//! Conversion between DesignPlus pages and tagged text
//!
//!     This crate converts the HTML of a DesignPlus page (wrapper, header, content blocks,
//!     accordions) to a line-oriented tagged text that can be edited anywhere, and back.
//!
//!     TLDR: For format authors:
//!         - Every format converts to and from the component tree (./ir/nodes.rs), never to
//!           another format directly.
//!         - HTML is classified into component kinds exactly once, at ingestion. Everything
//!           after that is a `match` over a closed enum.
//!         - Text input is validated before it is parsed. Unbalanced text is rejected with the
//!           line that broke it, never repaired.
//!         - Missing optional data (no title, no icon, no block id) degrades to empty values.
//!
//! Architecture
//!
//!     Format-agnostic logic lives in ./common (inline run cleanup, list nesting from indent
//!     levels) so the format modules only map between their syntax and the tree.
//!
//!     This is a pure lib, that is, it powers dpmd-cli but is shell agnostic: no code here
//!     prints, reads env vars or touches files. The editor a page lives in is reached through
//!     the `host::EditorHost` trait.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── host.rs                 # page export / import against an editor
//!     ├── formats
//!     │   ├── html                # DesignPlus HTML (ingest + render)
//!     │   ├── tagged              # tagged text: grammar, lexer, validator, parser,
//!     │   │                       # serializer, accordion heuristic
//!     │   ├── treeviz             # debug tree view
//!     │   └── json                # serde view of the tree
//!     ├── ir                      # component tree
//!     └── common                  # shared mapping code
//!
//! Testing
//!     tests
//!     ├── common                  # shared helpers
//!     ├── fixtures                # pages and texts
//!     ├── tagged
//!     ├── html
//!     └── roundtrip.rs
//!
//! Core Algorithms
//!
//!     Tree to text is a depth-first walk. Text to tree is a single pass over lines with an
//!     explicit stack of open containers; lists are rebuilt from indentation by a separate
//!     indent stack (./common/lists.rs). Heading-and-bullet text without accordion markers
//!     may be promoted to an accordion by a pluggable policy (./formats/tagged/accordion.rs).
//!
//! Library Choices
//!
//!     html5ever parses and serializes HTML, url resolves relative links, serde/serde_json
//!     back the json format, and log carries diagnostics.

pub mod error;
pub mod format;
pub mod formats;
pub mod host;
pub mod registry;

pub mod common;
pub mod ir;

pub use error::FormatError;
pub use format::Format;
pub use host::{export_page, import_page, EditorHost, PageOptions};
pub use registry::FormatRegistry;

use formats::html::HtmlOptions;
use formats::tagged::TaggedOptions;

/// Convert page HTML to tagged text.
pub fn html_to_tagged(
    html: &str,
    html_options: &HtmlOptions,
    tagged_options: &TaggedOptions,
) -> Result<String, FormatError> {
    let doc = formats::html::parse_html(html, html_options)?;
    Ok(formats::tagged::serializer::serialize_tagged(
        &doc,
        tagged_options,
    ))
}

/// Validate and convert tagged text to page HTML.
///
/// `title_override` takes precedence over the text's header line when it
/// holds a `prefix: title` value.
pub fn tagged_to_html(
    text: &str,
    title_override: Option<&str>,
    tagged_options: &TaggedOptions,
    html_options: &HtmlOptions,
) -> Result<String, FormatError> {
    let doc = formats::tagged::parse_with_policy(text, title_override, &tagged_options.accordion)?;
    formats::html::serialize_to_html(&doc, html_options)
}

