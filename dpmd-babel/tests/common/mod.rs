//! Shared helpers for the integration tests.
#![allow(dead_code)]

use dpmd_babel::ir::nodes::{Component, Heading, InlineContent, List, ListItem, Paragraph};
use std::path::PathBuf;

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}

pub fn text(s: &str) -> InlineContent {
    InlineContent::Text(s.to_string())
}

pub fn para(s: &str) -> Component {
    Component::Paragraph(Paragraph {
        content: vec![text(s)],
    })
}

pub fn heading(level: usize, s: &str) -> Component {
    Component::Heading(Heading {
        level,
        content: vec![text(s)],
        icon: None,
    })
}

pub fn bullets(items: &[&str]) -> List {
    List {
        ordered: false,
        items: items.iter().map(|item| ListItem::from_text(item)).collect(),
    }
}

/// Accordion-shaped text: one `####` heading per panel, `items` bullets each.
pub fn accordion_text(panels: usize, items: usize) -> String {
    let mut out = String::new();
    for panel in 1..=panels {
        out.push_str(&format!("#### Week {panel}\n"));
        for item in 1..=items {
            out.push_str(&format!("* Task {panel}.{item}\n"));
        }
        out.push('\n');
    }
    out
}
