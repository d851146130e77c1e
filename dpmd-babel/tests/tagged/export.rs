//! Export tests (page HTML → tagged text)

use crate::common::fixture;
use dpmd_babel::formats::html::HtmlOptions;
use dpmd_babel::formats::tagged::TaggedOptions;
use dpmd_babel::html_to_tagged;
use insta::assert_snapshot;

fn export(html: &str) -> String {
    html_to_tagged(html, &HtmlOptions::default(), &TaggedOptions::default())
        .expect("export to succeed")
}

#[test]
fn course_page_exports_to_reference_text() {
    let text = export(&fixture("course_page.html"));
    assert_eq!(text, fixture("course_page.md"));
}

#[test]
fn course_page_with_flattened_accordions() {
    let options = TaggedOptions {
        flatten_accordions: true,
        ..TaggedOptions::default()
    };
    let text = html_to_tagged(&fixture("course_page.html"), &HtmlOptions::default(), &options)
        .expect("export to succeed");
    assert_snapshot!("course_page_flattened", text);
}

#[test]
fn spacer_paragraphs_are_not_exported() {
    let text = export(
        r#"<div class="dp-wrapper"><p>&nbsp;</p><p> &nbsp; </p><p>Body</p><p>&nbsp;</p></div>"#,
    );
    assert_eq!(text, "<WRAPPER>\nBody\n</WRAPPER>\n");
}

#[test]
fn page_without_wrapper_exports_its_body() {
    let text = export("<h2>Notes</h2><p>Plain page.</p>");
    assert_eq!(text, "## Notes\n\nPlain page.\n");
}

#[test]
fn token_keeps_its_name_without_data_attribute() {
    let text = export(
        r#"<p>Hi <span class="dp-personalization-token">{{ last_name }}</span>!</p>"#,
    );
    assert_eq!(text, "Hi {{last_name}}!\n");
}

#[test]
fn literal_markup_characters_are_escaped() {
    let text = export("<p>1. not a list</p><p>*stars* and [brackets]</p><p># not a heading</p>");
    assert_eq!(
        text,
        "1\\. not a list\n\n\\*stars\\* and \\[brackets]\n\n\\# not a heading\n"
    );
}

#[test]
fn custom_list_indent() {
    let options = TaggedOptions {
        indent_string: "  ".to_string(),
        ..TaggedOptions::default()
    };
    let text = html_to_tagged(
        "<ul><li>a<ul><li>b</li></ul></li></ul>",
        &HtmlOptions::default(),
        &options,
    )
    .unwrap();
    assert_eq!(text, "* a\n  * b\n");
}

#[test]
fn content_block_without_id_has_no_comment() {
    let text = export(r#"<div class="dp-content-block"><p>x</p></div>"#);
    assert_eq!(text, "<CONTENT-BLOCK>\nx\n</CONTENT-BLOCK>\n");
}

#[test]
fn adjacent_lists_stay_apart() {
    let text = export("<ul><li>a</li></ul><ul><li>b</li></ul>");
    assert_eq!(text, "* a\n\n* b\n");
}

#[test]
fn nested_list_takes_one_line_per_item_and_reads_back() {
    use dpmd_babel::formats::tagged::parser::parse_tagged;
    use dpmd_babel::formats::tagged::serializer::serialize_tagged;
    use dpmd_babel::ir::nodes::{Component, Document, List, ListItem};

    let mut second = ListItem::from_text("two");
    second.children.push(crate::common::bullets(&["x", "y"]));
    let doc = Document::new(vec![Component::List(List {
        ordered: true,
        items: vec![ListItem::from_text("one"), second, ListItem::from_text("three")],
    })]);

    let text = serialize_tagged(&doc, &TaggedOptions::default());
    assert_eq!(text, "1. one\n2. two\n    * x\n    * y\n3. three\n");
    assert_eq!(text.lines().count(), 5);
    assert_eq!(parse_tagged(&text, None), doc);
}
