//! Import tests (tagged text → component tree → page HTML)

use crate::common::{bullets, fixture, heading, para, text};
use dpmd_babel::formats::html::{parse_html, HtmlOptions};
use dpmd_babel::formats::tagged::accordion::ViewportPolicy;
use dpmd_babel::formats::tagged::{parse_with_policy, TaggedOptions};
use dpmd_babel::ir::nodes::*;
use dpmd_babel::{tagged_to_html, FormatError};

fn parse(source: &str) -> Vec<Component> {
    parse_with_policy(source, None, &ViewportPolicy::default())
        .expect("text to be valid")
        .children
}

#[test]
fn reference_text_matches_reference_page() {
    let from_text = parse_with_policy(&fixture("course_page.md"), None, &ViewportPolicy::default())
        .expect("fixture to be valid");
    let from_html = parse_html(&fixture("course_page.html"), &HtmlOptions::default())
        .expect("fixture to parse");
    assert_eq!(from_text, from_html);
}

#[test]
fn list_nesting_follows_indentation() {
    let children = parse("* a\n    * b\n        * c\n    * d\n* e");
    let c = bullets(&["c"]);
    let mut b = ListItem::from_text("b");
    b.children.push(c);
    let mut a = ListItem::from_text("a");
    a.children.push(List {
        ordered: false,
        items: vec![b, ListItem::from_text("d")],
    });
    assert_eq!(
        children,
        vec![Component::List(List {
            ordered: false,
            items: vec![a, ListItem::from_text("e")],
        })]
    );
}

#[test]
fn list_markers_are_interchangeable() {
    assert_eq!(
        parse("- a\n+ b\n* c"),
        vec![Component::List(bullets(&["a", "b", "c"]))]
    );
}

#[test]
fn ordered_and_unordered_items_split_lists() {
    let children = parse("1. one\n2) two\n* bullet");
    assert_eq!(
        children,
        vec![
            Component::List(List {
                ordered: true,
                items: vec![ListItem::from_text("one"), ListItem::from_text("two")],
            }),
            Component::List(bullets(&["bullet"])),
        ]
    );
}

#[test]
fn blank_line_ends_a_list() {
    let children = parse("* a\n\n* b");
    assert_eq!(
        children,
        vec![
            Component::List(bullets(&["a"])),
            Component::List(bullets(&["b"])),
        ]
    );
}

#[test]
fn icon_belongs_to_the_heading_on_its_line() {
    let children = parse("<ICON fas fa-star> ## Goals\n### Plain");
    assert_eq!(
        children,
        vec![
            Component::Heading(Heading {
                level: 2,
                content: vec![text("Goals")],
                icon: Some("fas fa-star".to_string()),
            }),
            heading(3, "Plain"),
        ]
    );
}

#[test]
fn icon_before_a_paragraph_is_dropped() {
    assert_eq!(parse("<ICON fas fa-star>\nJust text"), vec![para("Just text")]);
}

#[test]
fn embed_picks_up_its_title_comment() {
    let children = parse("<!-- dp-iframe-title: Lecture -->\n[Embedded Content](https://v.test/1)\n[Embedded Content](https://v.test/2)");
    assert_eq!(
        children,
        vec![
            Component::Embed(Embed {
                src: "https://v.test/1".into(),
                title: Some("Lecture".into()),
            }),
            Component::Embed(Embed {
                src: "https://v.test/2".into(),
                title: None,
            }),
        ]
    );
}

#[test]
fn whole_line_link_is_a_link_component() {
    assert_eq!(
        parse("[Syllabus](https://x.test/s)\nSee [Syllabus](https://x.test/s) now"),
        vec![
            Component::Link(Link {
                href: "https://x.test/s".into(),
                text: "Syllabus".into(),
            }),
            Component::Paragraph(Paragraph {
                content: vec![
                    text("See "),
                    InlineContent::Link {
                        href: "https://x.test/s".into(),
                        text: "Syllabus".into(),
                    },
                    text(" now"),
                ],
            }),
        ]
    );
}

#[test]
fn block_id_comment_attaches_to_the_next_block() {
    let children = parse("<!-- dp-id: abc -->\n<CONTENT-BLOCK>\nx\n</CONTENT-BLOCK>\n<CONTENT-BLOCK>\n</CONTENT-BLOCK>");
    assert_eq!(
        children,
        vec![
            Component::ContentBlock(ContentBlock {
                id: Some("abc".into()),
                children: vec![para("x")],
            }),
            Component::ContentBlock(ContentBlock::default()),
        ]
    );
}

#[test]
fn panel_lists_are_limited_to_one_sub_level() {
    let source = "<ACCORDION>\n<PANEL-GROUP>\n<PANEL-HEADING>Week 1</PANEL-HEADING>\n<PANEL-CONTENT>\n* a\n    * b\n        * c\n</PANEL-CONTENT>\n</PANEL-GROUP>\n</ACCORDION>";
    let mut a = ListItem::from_text("a");
    a.children.push(bullets(&["b", "c"]));
    assert_eq!(
        parse(source),
        vec![Component::Accordion(Accordion {
            panels: vec![PanelGroup {
                heading: "Week 1".into(),
                content: vec![Component::List(List {
                    ordered: false,
                    items: vec![a],
                })],
            }],
        })]
    );
}

#[test]
fn tokens_survive_emphasis() {
    let children = parse("**{{first_name}}** and *{{course}}*");
    assert_eq!(
        children,
        vec![Component::Paragraph(Paragraph {
            content: vec![
                InlineContent::Bold(vec![InlineContent::Token("first_name".into())]),
                text(" and "),
                InlineContent::Italic(vec![InlineContent::Token("course".into())]),
            ],
        })]
    );
}

#[test]
fn lowercase_angle_brackets_are_text() {
    assert_eq!(parse("a <b> c < d"), vec![para("a <b> c < d")]);
}

#[test]
fn title_override_replaces_header_line() {
    let html = tagged_to_html(
        "<WRAPPER>\n<HEADER>\nModule 1: Old\n</HEADER>\n</WRAPPER>\n",
        Some("Week 9: New title"),
        &TaggedOptions::default(),
        &HtmlOptions::default(),
    )
    .unwrap();
    assert!(html.contains(r#"<span class="dp-header-pre-1">Week</span>"#));
    assert!(html.contains(r#"<span class="dp-header-pre-2">9</span>"#));
    assert!(html.contains(r#"<span class="dp-header-title">New title</span>"#));
}

#[test]
fn invalid_text_is_not_converted() {
    let result = tagged_to_html(
        "<WRAPPER>\n<CONTENT-BLOCK>\n</WRAPPER>\n",
        None,
        &TaggedOptions::default(),
        &HtmlOptions::default(),
    );
    assert!(matches!(result, Err(FormatError::StructuralImbalance(_))));
}

#[test]
fn tokens_render_as_personalization_spans() {
    let html = tagged_to_html(
        "Hello {{first_name}}",
        None,
        &TaggedOptions::default(),
        &HtmlOptions::default(),
    )
    .unwrap();
    assert_eq!(
        html,
        r#"<p>Hello <span class="dp-personalization-token" data-token="first_name">{{first_name}}</span></p>"#
    );
}
