//! Classification of page HTML into components.

use crate::common::{fixture, heading, para, text};
use dpmd_babel::formats::html::{parse_html, HtmlOptions};
use dpmd_babel::ir::nodes::*;
use dpmd_babel::FormatError;

fn ingest(html: &str) -> Vec<Component> {
    parse_html(html, &HtmlOptions::default())
        .expect("html to parse")
        .children
}

fn wrapper_children(html: &str) -> Vec<Component> {
    match ingest(html).as_slice() {
        [Component::Wrapper(wrapper)] => wrapper.children.clone(),
        other => panic!("expected a single wrapper, got {other:?}"),
    }
}

#[test]
fn course_page_structure() {
    let children = wrapper_children(&fixture("course_page.html"));
    let kinds: Vec<&str> = children.iter().map(Component::kind_name).collect();
    assert_eq!(
        kinds,
        ["Header", "ProgressPlaceholder", "ContentBlock", "ContentBlock"]
    );
    assert_eq!(
        children[0],
        Component::Header(Header {
            pre1: "Module".into(),
            pre2: "1".into(),
            title: "Getting Started".into(),
        })
    );
    let Component::ContentBlock(block) = &children[2] else {
        panic!("expected a content block");
    };
    assert_eq!(block.id.as_deref(), Some("intro-1"));
    assert_eq!(
        block.children[0],
        Component::Heading(Heading {
            level: 3,
            content: vec![text("Overview")],
            icon: Some("fas fa-book".into()),
        })
    );
}

#[test]
fn wrapper_is_found_by_id_or_class() {
    assert_eq!(
        ingest(r#"<section><div id="dp-wrapper"><p>a</p></div></section>"#),
        vec![Component::Wrapper(Wrapper {
            children: vec![para("a")],
        })]
    );
    assert_eq!(
        ingest(r#"<div class="other dp-wrapper"><p>b</p></div>"#),
        vec![Component::Wrapper(Wrapper {
            children: vec![para("b")],
        })]
    );
}

#[test]
fn header_without_parts_is_all_title() {
    let children = wrapper_children(
        r#"<div class="dp-wrapper"><header class="dp-header"><h2>Welcome aboard</h2></header></div>"#,
    );
    assert_eq!(
        children,
        vec![Component::Header(Header {
            title: "Welcome aboard".into(),
            ..Header::default()
        })]
    );
}

#[test]
fn icon_classes_keep_only_icon_names() {
    let children = ingest(r#"<h2><i class="fas fa-star dp-icon extra">&nbsp;</i> Goals</h2>"#);
    assert_eq!(
        children,
        vec![Component::Heading(Heading {
            level: 2,
            content: vec![text("Goals")],
            icon: Some("fas fa-star".into()),
        })]
    );
}

#[test]
fn plain_italic_is_not_an_icon() {
    let children = ingest("<h2><i>Really</i> important</h2>");
    assert_eq!(
        children,
        vec![Component::Heading(Heading {
            level: 2,
            content: vec![
                InlineContent::Italic(vec![text("Really")]),
                text(" important"),
            ],
            icon: None,
        })]
    );
}

#[test]
fn relative_links_resolve_against_base_url() {
    let options = HtmlOptions {
        base_url: Some("https://canvas.test/courses/7/pages/".into()),
        ..HtmlOptions::default()
    };
    let doc = parse_html(
        r#"<p><a href="../files/3">Notes</a></p><p><iframe src="https://v.test/1"></iframe></p>"#,
        &options,
    )
    .unwrap();
    assert_eq!(
        doc.children,
        vec![
            Component::Link(Link {
                href: "https://canvas.test/courses/7/files/3".into(),
                text: "Notes".into(),
            }),
            Component::Embed(Embed {
                src: "https://v.test/1".into(),
                title: None,
            }),
        ]
    );
}

#[test]
fn invalid_base_url_is_an_error() {
    let options = HtmlOptions {
        base_url: Some("not a url".into()),
        ..HtmlOptions::default()
    };
    assert!(matches!(
        parse_html("<p>x</p>", &options),
        Err(FormatError::ParseError(_))
    ));
}

#[test]
fn loose_text_becomes_a_paragraph() {
    let children = ingest(r#"<div class="dp-content-block">Some <b>loose</b> text<h3>Next</h3></div>"#);
    assert_eq!(
        children,
        vec![Component::ContentBlock(ContentBlock {
            id: None,
            children: vec![
                Component::Paragraph(Paragraph {
                    content: vec![
                        text("Some "),
                        InlineContent::Bold(vec![text("loose")]),
                        text(" text"),
                    ],
                }),
                heading(3, "Next"),
            ],
        })]
    );
}

#[test]
fn unknown_containers_are_transparent() {
    assert_eq!(
        ingest("<section><article><p>a</p></article><div><h5>b</h5></div></section>"),
        vec![para("a"), heading(5, "b")]
    );
}

#[test]
fn scripts_and_rules_are_skipped() {
    assert_eq!(
        ingest("<p>a</p><script>var x = 1;</script><hr><p>b</p>"),
        vec![para("a"), para("b")]
    );
}

#[test]
fn panel_group_outside_accordion_gets_one() {
    let children = ingest(
        r#"<div class="dp-panel-group"><h4 class="dp-panel-heading">Only</h4><div class="dp-panel-content"><p>x</p></div></div>"#,
    );
    assert_eq!(
        children,
        vec![Component::Accordion(Accordion {
            panels: vec![PanelGroup {
                heading: "Only".into(),
                content: vec![para("x")],
            }],
        })]
    );
}

#[test]
fn empty_page_is_an_empty_document() {
    assert!(parse_html("", &HtmlOptions::default()).unwrap().is_empty());
}
