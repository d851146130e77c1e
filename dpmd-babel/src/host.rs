//! Page editor session
//!
//! Export and import of a whole page against the editor that owns it. The
//! editor is reached only through [`EditorHost`]: reading the HTML of its
//! editable root, replacing that content wholesale, and an optional title
//! field. Waiting for the editor to load, file pickers and downloads stay on
//! the host side.
//!
//! Export: root HTML → component tree → tagged text.
//! Import: tagged text → validation → accordion heuristic or general parse
//! (with the host's title) → HTML → editor content.

use crate::error::FormatError;
use crate::formats::html::{parse_html, serialize_to_html, HtmlOptions};
use crate::formats::tagged::serializer::serialize_tagged;
use crate::formats::tagged::{parse_with_policy, TaggedOptions};
use log::debug;

/// The editor a page is exported from and imported into.
pub trait EditorHost {
    /// HTML of the editable document's root, or `None` while the editor has
    /// not loaded one.
    fn editable_root(&self) -> Option<String>;

    /// Replace the editable document's content with `html`.
    fn replace_editable_content(&mut self, html: String);

    /// Page title field. A `prefix: title` value overrides the header line
    /// of imported text.
    fn override_title(&self) -> Option<String> {
        None
    }
}

/// Options of both directions of a page session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageOptions {
    pub tagged: TaggedOptions,
    pub html: HtmlOptions,
}

/// Read the editor's page and render it as tagged text.
pub fn export_page(host: &dyn EditorHost, options: &PageOptions) -> Result<String, FormatError> {
    let root = host.editable_root().ok_or(FormatError::HostNotReady)?;
    let doc = parse_html(&root, &options.html)?;
    debug!("exporting page with {} top-level components", doc.children.len());
    Ok(serialize_tagged(&doc, &options.tagged))
}

/// Convert tagged text and hand the result to the editor.
///
/// Nothing is replaced when the text fails validation.
pub fn import_page(
    host: &mut dyn EditorHost,
    text: &str,
    options: &PageOptions,
) -> Result<(), FormatError> {
    if host.editable_root().is_none() {
        return Err(FormatError::HostNotReady);
    }
    let title = host.override_title();
    let doc = parse_with_policy(text, title.as_deref(), &options.tagged.accordion)?;
    let html = serialize_to_html(&doc, &options.html)?;
    debug!("importing {} bytes of page HTML", html.len());
    host.replace_editable_content(html);
    Ok(())
}
