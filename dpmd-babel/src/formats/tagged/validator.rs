//! Structural validation of tagged text.
//!
//! Every recognised tag on every line is pushed onto, or popped from, one
//! stack. The text is accepted exactly when the tags are balanced: no
//! unknown upper-case tags, no close without an open, no crossing closes,
//! no single-line tag left open at the end of its line and nothing open at
//! the end of input.
//!
//! Validation never repairs anything. A failing document must not be
//! imported.

use super::grammar::Tag;
use super::lexer::{tokenize, Token};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// An upper-case tag that is not part of the grammar.
    UnknownTag(String),
    /// A close tag with nothing open.
    UnexpectedClose(Tag),
    /// A close tag that does not match the innermost open tag.
    MismatchedClose { expected: Tag, found: Tag },
    /// A tag still open at end of input.
    Unclosed(Tag),
    /// A single-line tag whose close is not on the same line.
    SplitSingleLineTag(Tag),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::UnknownTag(tag) => write!(f, "unknown tag {tag}"),
            ValidationIssue::UnexpectedClose(tag) => {
                write!(f, "{} without matching {}", tag.close(), tag.open())
            }
            ValidationIssue::MismatchedClose { expected, found } => {
                write!(f, "expected {} but found {}", expected.close(), found.close())
            }
            ValidationIssue::Unclosed(tag) => write!(f, "{} is never closed", tag.open()),
            ValidationIssue::SplitSingleLineTag(tag) => {
                write!(f, "{} must be closed on the same line", tag.open())
            }
        }
    }
}

/// The first structural problem found, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub line_number: usize,
    pub line: String,
    pub issue: ValidationIssue,
}

impl ValidationError {
    fn new(line_number: usize, line: &str, issue: ValidationIssue) -> Self {
        Self {
            line_number,
            line: line.to_string(),
            issue,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {}: `{}`",
            self.line_number,
            self.issue,
            self.line.trim()
        )
    }
}

impl std::error::Error for ValidationError {}

struct OpenTag<'a> {
    tag: Tag,
    line_number: usize,
    line: &'a str,
}

pub fn validate(source: &str) -> Result<(), ValidationError> {
    let mut stack: Vec<OpenTag<'_>> = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let line_number = index + 1;
        let fail = |issue| ValidationError::new(line_number, line, issue);

        for token in tokenize(line) {
            match token {
                Token::Open(tag) if tag.is_void() => {}
                Token::Open(tag) => stack.push(OpenTag {
                    tag,
                    line_number,
                    line,
                }),
                Token::Close(tag) if tag.is_void() => {
                    return Err(fail(ValidationIssue::UnexpectedClose(tag)));
                }
                Token::Close(found) => match stack.last().map(|open| open.tag) {
                    None => return Err(fail(ValidationIssue::UnexpectedClose(found))),
                    Some(expected) if expected != found => {
                        return Err(fail(ValidationIssue::MismatchedClose { expected, found }));
                    }
                    Some(_) => {
                        stack.pop();
                    }
                },
                Token::Unknown(tag) => {
                    return Err(fail(ValidationIssue::UnknownTag(tag.to_string())));
                }
                Token::SelfClosing(_) | Token::Icon(_) | Token::Comment(_) | Token::Text(_) => {}
            }
        }

        if let Some(open) = stack.iter().find(|open| open.tag.is_single_line()) {
            return Err(ValidationError::new(
                open.line_number,
                open.line,
                ValidationIssue::SplitSingleLineTag(open.tag),
            ));
        }
    }

    match stack.pop() {
        Some(open) => Err(ValidationError::new(
            open.line_number,
            open.line,
            ValidationIssue::Unclosed(open.tag),
        )),
        None => Ok(()),
    }
}
