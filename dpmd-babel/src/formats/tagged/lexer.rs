//! Splits one line of tagged text into tag and text tokens.
//!
//! Only upper-case names are tag-like: `<CONTENT-BLOCK>` is a tag, `<br>` or
//! `a < b` are plain text. A backslash escapes the next character, so `\<X>`
//! stays text. Comments (`<!-- … -->`) are recognised when closed on the same
//! line.

use super::grammar::{Tag, ICON_TAG};
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<(/?)([A-Z][A-Z0-9-]*)((?:[ \t][^<>]*?)?)[ \t]*(/?)>").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Open(Tag),
    Close(Tag),
    /// `<TAG/>`
    SelfClosing(Tag),
    /// Class list of `<ICON …>`.
    Icon(&'a str),
    /// Trimmed body of `<!-- … -->`.
    Comment(&'a str),
    /// Upper-case tag outside the grammar, kept verbatim.
    Unknown(&'a str),
    Text(&'a str),
}

impl Token<'_> {
    /// Tokens that carry no structure of their own.
    pub fn is_textual(&self) -> bool {
        matches!(self, Token::Text(_) | Token::Unknown(_))
    }
}

pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let bytes = line.as_bytes();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                // Skip the escaped character, whatever its width.
                i += 1;
                if let Some(ch) = line[i..].chars().next() {
                    i += ch.len_utf8();
                }
            }
            b'<' => {
                if let Some((token, len)) = read_tag(&line[i..]) {
                    if text_start < i {
                        tokens.push(Token::Text(&line[text_start..i]));
                    }
                    tokens.push(token);
                    i += len;
                    text_start = i;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    if text_start < line.len() {
        tokens.push(Token::Text(&line[text_start..]));
    }
    tokens
}

fn read_tag(rest: &str) -> Option<(Token<'_>, usize)> {
    if let Some(body) = rest.strip_prefix("<!--") {
        let end = body.find("-->")?;
        return Some((Token::Comment(body[..end].trim()), 4 + end + 3));
    }

    let caps = TAG_RE.captures(rest)?;
    let whole = caps.get(0)?;
    let closing = !caps[1].is_empty();
    let name = caps.get(2)?.as_str();
    let attrs = caps.get(3).map_or("", |m| m.as_str()).trim();
    let self_closing = !caps[4].is_empty();

    let token = if name == ICON_TAG && !closing {
        Token::Icon(attrs)
    } else {
        match Tag::from_name(name) {
            Some(tag) if closing => Token::Close(tag),
            Some(tag) if self_closing => Token::SelfClosing(tag),
            Some(tag) => Token::Open(tag),
            None => Token::Unknown(whole.as_str()),
        }
    };
    Some((token, whole.end()))
}
