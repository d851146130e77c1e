//! Structural validation of tagged text.

use dpmd_babel::formats::tagged::grammar::Tag;
use dpmd_babel::formats::tagged::validator::{validate, ValidationIssue};
use proptest::prelude::*;

const CONTAINERS: [Tag; 6] = [
    Tag::Wrapper,
    Tag::Header,
    Tag::ContentBlock,
    Tag::Accordion,
    Tag::PanelGroup,
    Tag::PanelContent,
];

#[derive(Debug, Clone)]
enum Shape {
    Text(String),
    Node(Tag, Vec<Shape>),
}

fn shape() -> impl Strategy<Value = Shape> {
    let leaf = "[a-z ]{0,12}".prop_map(Shape::Text);
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            prop::sample::select(CONTAINERS.to_vec()),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(tag, children)| Shape::Node(tag, children))
    })
}

fn render(shape: &Shape, lines: &mut Vec<String>) {
    match shape {
        Shape::Text(text) => lines.push(text.clone()),
        Shape::Node(tag, children) => {
            lines.push(tag.open());
            for child in children {
                render(child, lines);
            }
            lines.push(tag.close());
        }
    }
}

fn rendered_page(children: Vec<Shape>) -> Vec<String> {
    let mut lines = Vec::new();
    render(&Shape::Node(Tag::Wrapper, children), &mut lines);
    lines
}

proptest! {
    #[test]
    fn balanced_nesting_is_accepted(children in prop::collection::vec(shape(), 0..4)) {
        let text = rendered_page(children).join("\n");
        prop_assert!(validate(&text).is_ok(), "rejected:\n{}", text);
    }

    #[test]
    fn a_missing_close_is_rejected(
        children in prop::collection::vec(shape(), 0..4),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut lines = rendered_page(children);
        let closes: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.starts_with("</"))
            .map(|(i, _)| i)
            .collect();
        lines.remove(closes[pick.index(closes.len())]);
        let text = lines.join("\n");
        prop_assert!(validate(&text).is_err(), "accepted:\n{}", text);
    }
}

#[test]
fn crossing_closes_are_rejected() {
    let err = validate("<WRAPPER>\n<CONTENT-BLOCK>\n</WRAPPER>\n</CONTENT-BLOCK>").unwrap_err();
    assert_eq!(err.line_number, 3);
    assert_eq!(
        err.issue,
        ValidationIssue::MismatchedClose {
            expected: Tag::ContentBlock,
            found: Tag::Wrapper,
        }
    );
}

#[test]
fn block_and_accordion_may_not_cross() {
    let err =
        validate("<CONTENT-BLOCK>\n<ACCORDION>\n</CONTENT-BLOCK>\n</ACCORDION>").unwrap_err();
    assert_eq!(err.line_number, 3);
    assert_eq!(err.line, "</CONTENT-BLOCK>");
}

#[test]
fn unclosed_tag_reports_where_it_was_opened() {
    let err = validate("<WRAPPER>\n<CONTENT-BLOCK>\ntext\n</WRAPPER>").unwrap_err();
    assert_eq!(err.line_number, 4);

    let err = validate("<WRAPPER>\n<ACCORDION>\ntext").unwrap_err();
    assert_eq!(err.line_number, 2);
    assert_eq!(err.issue, ValidationIssue::Unclosed(Tag::Accordion));
}

#[test]
fn stray_close_is_rejected() {
    let err = validate("text\n</PANEL-GROUP>").unwrap_err();
    assert_eq!(err.line_number, 2);
    assert_eq!(err.issue, ValidationIssue::UnexpectedClose(Tag::PanelGroup));
}

#[test]
fn unknown_uppercase_tag_is_rejected() {
    let err = validate("<WRAPPER>\n<SIDEBAR>\n</WRAPPER>").unwrap_err();
    assert_eq!(err.line_number, 2);
    assert!(matches!(err.issue, ValidationIssue::UnknownTag(_)));
}

#[test]
fn panel_heading_must_close_on_its_line() {
    let err = validate("<PANEL-HEADING>Week 1\n</PANEL-HEADING>").unwrap_err();
    assert_eq!(err.line_number, 1);
    assert_eq!(err.issue, ValidationIssue::SplitSingleLineTag(Tag::PanelHeading));
}

#[test]
fn escaped_and_lowercase_tags_are_text() {
    assert!(validate("\\<WRAPPER> is literal\n<br> and a < b").is_ok());
}

#[test]
fn error_message_names_line_and_text() {
    let err = validate("<WRAPPER>\n  </CONTENT-BLOCK>").unwrap_err();
    assert_eq!(
        err.to_string(),
        "line 2: expected </WRAPPER> but found </CONTENT-BLOCK>: `</CONTENT-BLOCK>`"
    );
}
