//! Inline dialect of tagged text.
//!
//! | Syntax         | Inline                  |
//! |----------------|-------------------------|
//! | `**bold**`     | `Bold`                  |
//! | `*italic*`     | `Italic`                |
//! | `[text](href)` | `Link`                  |
//! | `{{name}}`     | `Token` (never formatted) |
//! | `\X`           | literal `X` (ASCII punctuation) |
//!
//! Unmatched markers are kept as literal text. Personalization tokens are
//! recognised before emphasis, so a token name is never split by an
//! emphasis marker.

use crate::common::inlines::normalize;
use crate::ir::nodes::InlineContent;

/// Parse one line of inline markup.
pub fn parse_inline(source: &str) -> Vec<InlineContent> {
    let chars: Vec<char> = source.chars().collect();
    let mut out = Vec::new();
    parse_span(&chars, &mut out);
    normalize(out)
}

fn parse_span(chars: &[char], out: &mut Vec<InlineContent>) {
    let mut text = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\\' && chars.get(i + 1).is_some_and(|n| n.is_ascii_punctuation()) {
            text.push(chars[i + 1]);
            i += 2;
            continue;
        }

        if c == '{' && chars.get(i + 1) == Some(&'{') {
            if let Some((name, end)) = read_token(chars, i) {
                flush(&mut text, out);
                out.push(InlineContent::Token(name));
                i = end;
                continue;
            }
        }

        if c == '[' {
            if let Some((label, href, end)) = read_link(chars, i) {
                flush(&mut text, out);
                out.push(InlineContent::Link { href, text: label });
                i = end;
                continue;
            }
        }

        if c == '*' {
            // `***` opens italic around bold when that reading closes.
            if star_run(chars, i) >= 3 {
                if let Some(close) = find_italic_close(chars, i + 1) {
                    flush(&mut text, out);
                    let mut inner = Vec::new();
                    parse_span(&chars[i + 1..close], &mut inner);
                    out.push(InlineContent::Italic(inner));
                    i = close + 1;
                    continue;
                }
            }
            if chars.get(i + 1) == Some(&'*') {
                if let Some(close) = find_bold_close(chars, i + 2) {
                    flush(&mut text, out);
                    let mut inner = Vec::new();
                    parse_span(&chars[i + 2..close], &mut inner);
                    out.push(InlineContent::Bold(inner));
                    i = close + 2;
                    continue;
                }
                text.push_str("**");
                i += 2;
                continue;
            }
            if let Some(close) = find_italic_close(chars, i + 1) {
                flush(&mut text, out);
                let mut inner = Vec::new();
                parse_span(&chars[i + 1..close], &mut inner);
                out.push(InlineContent::Italic(inner));
                i = close + 1;
                continue;
            }
        }

        text.push(c);
        i += 1;
    }

    flush(&mut text, out);
}

fn flush(text: &mut String, out: &mut Vec<InlineContent>) {
    if !text.is_empty() {
        out.push(InlineContent::Text(std::mem::take(text)));
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// `{{name}}` starting at `start`; returns the name and the index past `}}`.
fn read_token(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut j = start + 2;
    let mut name = String::new();
    while j < chars.len() && is_token_char(chars[j]) {
        name.push(chars[j]);
        j += 1;
    }
    if name.is_empty() || chars.get(j) != Some(&'}') || chars.get(j + 1) != Some(&'}') {
        return None;
    }
    Some((name, j + 2))
}

/// `[label](href)` starting at `start`; both parts unescaped.
fn read_link(chars: &[char], start: usize) -> Option<(String, String, usize)> {
    let (label, after_label) = read_delimited(chars, start + 1, ']')?;
    if chars.get(after_label) != Some(&'(') {
        return None;
    }
    let (href, end) = read_delimited(chars, after_label + 1, ')')?;
    Some((label, href, end))
}

fn read_delimited(chars: &[char], mut j: usize, close: char) -> Option<(String, usize)> {
    let mut value = String::new();
    while j < chars.len() {
        match chars[j] {
            '\\' if chars.get(j + 1).is_some_and(|n| n.is_ascii_punctuation()) => {
                value.push(chars[j + 1]);
                j += 2;
            }
            c if c == close => return Some((value, j + 1)),
            c => {
                value.push(c);
                j += 1;
            }
        }
    }
    None
}

fn star_run(chars: &[char], at: usize) -> usize {
    chars[at..].iter().take_while(|&&c| c == '*').count()
}

/// Index of the `**` closing a bold span whose body starts at `from`.
///
/// A single `*` inside the body toggles a nested italic. When a run of three
/// or more stars is reached with that italic open, its first star closes the
/// italic and the bold close follows it.
fn find_bold_close(chars: &[char], from: usize) -> Option<usize> {
    let mut j = from;
    let mut italic_open = false;
    while j < chars.len() {
        match chars[j] {
            '\\' => j += 2,
            '*' => {
                let run = star_run(chars, j);
                if run == 1 {
                    italic_open = !italic_open;
                } else if j > from {
                    return Some(if run >= 3 && italic_open { j + 1 } else { j });
                }
                j += run;
            }
            _ => j += 1,
        }
    }
    None
}

/// Index of the `*` closing an italic span whose body starts at `from`.
///
/// A `**` inside the body opens a nested bold when a matching close exists.
/// In a run of three or more stars the italic close comes first unless that
/// bold is still open, in which case the bold closes and then the italic.
fn find_italic_close(chars: &[char], from: usize) -> Option<usize> {
    let mut j = from;
    let mut bold_open = false;
    while j < chars.len() {
        match chars[j] {
            '\\' => j += 2,
            '*' => {
                let run = star_run(chars, j);
                match run {
                    // Italic inside bold inside italic is never written.
                    1 if bold_open => return None,
                    1 if j > from => return Some(j),
                    1 => {}
                    _ if run >= 3 && bold_open => return Some(j + 2),
                    _ if run >= 3 && j > from => return Some(j),
                    _ if bold_open => bold_open = false,
                    _ => bold_open = find_bold_close(chars, j + 2).is_some(),
                }
                j += if run == 1 { 1 } else { 2 };
            }
            _ => j += 1,
        }
    }
    None
}

/// Write inline content back to markup.
pub fn render_inline(content: &[InlineContent]) -> String {
    let mut out = String::new();
    for item in content {
        match item {
            InlineContent::Text(text) => out.push_str(&escape_text(text)),
            InlineContent::Bold(children) => {
                out.push_str("**");
                out.push_str(&render_inline(children));
                out.push_str("**");
            }
            InlineContent::Italic(children) => {
                out.push('*');
                out.push_str(&render_inline(children));
                out.push('*');
            }
            InlineContent::Link { href, text } => {
                out.push_str(&render_link(text, href));
            }
            InlineContent::Token(name) => out.push_str(&super::grammar::token(name)),
        }
    }
    out
}

pub fn render_link(text: &str, href: &str) -> String {
    format!(
        "[{}]({})",
        escape_chars(text, &['\\', '[', ']', '*']),
        escape_chars(href, &['\\', ')'])
    )
}

fn escape_chars(text: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape literal text so it is not read back as markup.
pub fn escape_text(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        let escape = match c {
            '\\' | '*' | '[' | '{' => true,
            // Only where it could start a tag or comment.
            '<' => chars
                .get(i + 1)
                .map_or(true, |n| n.is_ascii_uppercase() || *n == '/' || *n == '!'),
            _ => false,
        };
        if escape {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Remove backslash escapes from plain (non-inline) text.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_punctuation() {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Protect the start of a rendered line from being read as a heading or
/// list marker.
pub fn escape_line_start(line: String) -> String {
    if line.starts_with('#') || line.starts_with("- ") || line.starts_with("+ ") {
        return format!("\\{line}");
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if (rest.starts_with(". ") || rest.starts_with(") ")) || rest == "." || rest == ")" {
            return format!("{}\\{}", &line[..digits], rest);
        }
    }
    if line == "-" || line == "+" {
        return format!("\\{line}");
    }
    line
}
