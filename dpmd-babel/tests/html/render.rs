//! Rendering of components as DesignPlus page HTML.

use crate::common::{bullets, fixture, heading, para};
use dpmd_babel::formats::html::{parse_html, serialize_to_html, HtmlOptions};
use dpmd_babel::formats::tagged::accordion::ViewportPolicy;
use dpmd_babel::formats::tagged::parse_with_policy;
use dpmd_babel::ir::nodes::*;

fn render_with(children: Vec<Component>, options: &HtmlOptions) -> String {
    serialize_to_html(&Document::new(children), options).expect("render to succeed")
}

fn render(children: Vec<Component>) -> String {
    render_with(children, &HtmlOptions::default())
}

#[test]
fn wrapped_block_markup() {
    let options = HtmlOptions {
        banner_image_url: "https://img.test/banner.png".into(),
        trailing_spacer: false,
        base_url: None,
    };
    let html = render_with(
        vec![Component::Wrapper(Wrapper {
            children: vec![Component::ContentBlock(ContentBlock {
                id: Some("b1".into()),
                children: vec![heading(3, "Hi"), para("There")],
            })],
        })],
        &options,
    );
    assert_eq!(
        html,
        r#"<div id="dp-wrapper" class="dp-wrapper kl_uon" data-img-url="https://img.test/banner.png"><div class="dp-content-block" data-id="b1"><h3>Hi</h3><p>There</p></div></div>"#
    );
}

#[test]
fn accordion_markup() {
    let html = render(vec![Component::Accordion(Accordion {
        panels: vec![PanelGroup {
            heading: "Week 1".into(),
            content: vec![Component::List(bullets(&["a", "b"]))],
        }],
    })]);
    assert_eq!(
        html,
        r#"<div class="dp-panels-wrapper dp-accordion-default"><div class="dp-panel-group"><h4 class="dp-panel-heading">Week 1</h4><div class="dp-panel-content"><ul><li>a</li><li>b</li></ul></div></div></div>"#
    );
}

#[test]
fn progress_placeholder_is_hidden() {
    assert_eq!(
        render(vec![Component::ProgressPlaceholder]),
        r#"<div class="dp-progress-placeholder dp-module-progress-completion" style="display: none;">Module Item Completion (browser only)</div>"#
    );
}

#[test]
fn text_is_escaped() {
    let html = render(vec![para("a < b & \"c\"")]);
    assert_eq!(html, "<p>a &lt; b &amp; \"c\"</p>");
}

#[test]
fn embed_keeps_its_title() {
    let html = render(vec![Component::Embed(Embed {
        src: "https://v.test/1".into(),
        title: Some("Lecture".into()),
    })]);
    assert_eq!(html, r#"<p><iframe src="https://v.test/1" title="Lecture"></iframe></p>"#);
}

#[test]
fn blank_paragraphs_are_not_rendered() {
    assert_eq!(render(vec![para("\u{a0}"), para("x")]), "<p>x</p>");
}

#[test]
fn rendered_page_reads_back_as_the_same_tree() {
    let doc = parse_with_policy(&fixture("course_page.md"), None, &ViewportPolicy::default())
        .expect("fixture to be valid");
    let html = serialize_to_html(&doc, &HtmlOptions::default()).unwrap();
    assert_eq!(parse_html(&html, &HtmlOptions::default()).unwrap(), doc);
}
