//! Icon mapping for the tree visualization
//!
//! Kept separate from the treeviz module so that every view of the component
//! tree labels node kinds the same way.

/// Get the Unicode icon for a given node kind
///
/// Kind names are the ones returned by [`crate::ir::nodes::Component::kind_name`],
/// plus the nested kinds (`ListItem`, `PanelGroup`) and inline spans.
pub fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "Document" => "⧉",
        "Wrapper" => "▣",
        "Header" => "⊤",
        "ProgressPlaceholder" => "▭",
        "ContentBlock" => "➔",
        "Heading" => "§",
        "Paragraph" => "¶",
        "List" => "☰",
        "ListItem" => "•",
        "Embed" => "▶",
        "Link" => "⊕",
        "Accordion" => "≡",
        "PanelGroup" => "▸",
        "Text" => "◦",
        "Bold" => "𝐁",
        "Italic" => "𝐼",
        "Token" => "⋯",
        _ => "○",
    }
}
