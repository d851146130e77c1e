//! Normalisation of inline content.
//!
//! HTML ingestion and the tagged-text parser build inline runs in different
//! ways (one text node per DOM node vs. one per markup span). Both pass their
//! output through [`normalize`] so equal content compares equal.

use crate::ir::nodes::InlineContent;

/// Merge adjacent runs of the same kind, drop empty runs and empty emphasis.
///
/// Emphasis is also put in a canonical shape: bold never nests inside bold,
/// italic never nests inside italic, and bold wrapping only an italic span
/// becomes italic wrapping bold. Markup reads `***x***` the second way.
pub fn normalize(content: Vec<InlineContent>) -> Vec<InlineContent> {
    let mut out: Vec<InlineContent> = Vec::with_capacity(content.len());
    for item in content {
        let item = match item {
            InlineContent::Text(text) if text.is_empty() => continue,
            InlineContent::Bold(children) => {
                let children = normalize(unwrap_emphasis(children, Emphasis::Bold));
                if children.is_empty() {
                    continue;
                }
                match <[InlineContent; 1]>::try_from(children) {
                    Ok([InlineContent::Italic(inner)]) => {
                        InlineContent::Italic(vec![InlineContent::Bold(inner)])
                    }
                    Ok([single]) => InlineContent::Bold(vec![single]),
                    Err(children) => InlineContent::Bold(children),
                }
            }
            InlineContent::Italic(children) => {
                let children = normalize(unwrap_emphasis(children, Emphasis::Italic));
                if children.is_empty() {
                    continue;
                }
                InlineContent::Italic(children)
            }
            other => other,
        };
        push_merged(&mut out, item);
    }
    out
}

#[derive(Clone, Copy, PartialEq)]
enum Emphasis {
    Bold,
    Italic,
}

/// Splice out every span of `kind`, at any depth, keeping its children.
fn unwrap_emphasis(content: Vec<InlineContent>, kind: Emphasis) -> Vec<InlineContent> {
    let mut out = Vec::with_capacity(content.len());
    for item in content {
        match item {
            InlineContent::Bold(children) if kind == Emphasis::Bold => {
                out.extend(unwrap_emphasis(children, kind))
            }
            InlineContent::Italic(children) if kind == Emphasis::Italic => {
                out.extend(unwrap_emphasis(children, kind))
            }
            InlineContent::Bold(children) => {
                out.push(InlineContent::Bold(unwrap_emphasis(children, kind)))
            }
            InlineContent::Italic(children) => {
                out.push(InlineContent::Italic(unwrap_emphasis(children, kind)))
            }
            other => out.push(other),
        }
    }
    out
}

fn push_merged(out: &mut Vec<InlineContent>, item: InlineContent) {
    let unmerged = match (out.last_mut(), item) {
        (Some(InlineContent::Text(prev)), InlineContent::Text(text)) => {
            prev.push_str(&text);
            None
        }
        (Some(InlineContent::Bold(prev)), InlineContent::Bold(children)) => {
            let joined = std::mem::take(prev).into_iter().chain(children).collect();
            *prev = normalize(joined);
            None
        }
        (Some(InlineContent::Italic(prev)), InlineContent::Italic(children)) => {
            let joined = std::mem::take(prev).into_iter().chain(children).collect();
            *prev = normalize(joined);
            None
        }
        (_, item) => Some(item),
    };
    if let Some(item) = unmerged {
        out.push(item);
    }
}

/// Collapse HTML whitespace runs (not non-breaking spaces) to one space.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

/// Trim whitespace (including `&nbsp;`) from both ends of an inline run.
pub fn trim(content: Vec<InlineContent>) -> Vec<InlineContent> {
    let mut content = normalize(content);
    trim_start(&mut content);
    trim_end(&mut content);
    normalize(content)
}

fn trim_start(content: &mut [InlineContent]) {
    if let Some(first) = content.first_mut() {
        match first {
            InlineContent::Text(text) => *text = text.trim_start().to_string(),
            InlineContent::Bold(children) | InlineContent::Italic(children) => {
                trim_start(children)
            }
            _ => {}
        }
    }
}

fn trim_end(content: &mut [InlineContent]) {
    if let Some(last) = content.last_mut() {
        match last {
            InlineContent::Text(text) => *text = text.trim_end().to_string(),
            InlineContent::Bold(children) | InlineContent::Italic(children) => trim_end(children),
            _ => {}
        }
    }
}

/// Plain text of an inline run, markup dropped.
pub fn plain_text(content: &[InlineContent]) -> String {
    let mut out = String::new();
    for item in content {
        match item {
            InlineContent::Text(text) => out.push_str(text),
            InlineContent::Bold(children) | InlineContent::Italic(children) => {
                out.push_str(&plain_text(children))
            }
            InlineContent::Link { text, .. } => out.push_str(text),
            InlineContent::Token(name) => out.push_str(&format!("{{{{{name}}}}}")),
        }
    }
    out
}

/// True when the run carries no information: only whitespace or `&nbsp;`.
pub fn is_blank(content: &[InlineContent]) -> bool {
    content.iter().all(|item| match item {
        InlineContent::Text(text) => text.trim().is_empty(),
        InlineContent::Bold(children) | InlineContent::Italic(children) => is_blank(children),
        InlineContent::Link { .. } | InlineContent::Token(_) => false,
    })
}
