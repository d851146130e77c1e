//! Accordion promotion of text without tag markers.

use crate::common::{accordion_text, bullets, heading, para};
use dpmd_babel::formats::tagged::accordion::flatten;
use dpmd_babel::formats::tagged::accordion::{PromotionPolicy, ViewportPolicy};
use dpmd_babel::formats::tagged::serializer::serialize_tagged;
use dpmd_babel::formats::tagged::{parse_with_policy, TaggedOptions};
use dpmd_babel::ir::nodes::*;

fn parse(source: &str, policy: &dyn PromotionPolicy) -> Document {
    parse_with_policy(source, None, policy).expect("text to be valid")
}

fn accordion_of(doc: &Document) -> Option<&Accordion> {
    match doc.children.as_slice() {
        [Component::Wrapper(wrapper)] => match wrapper.children.as_slice() {
            [Component::Accordion(accordion)] => Some(accordion),
            _ => None,
        },
        _ => None,
    }
}

#[test]
fn twenty_nine_lines_stay_plain() {
    let doc = parse(&accordion_text(1, 29), &ViewportPolicy::default());
    assert!(accordion_of(&doc).is_none());
    assert_eq!(doc.children[0], heading(4, "Week 1"));
    assert!(matches!(&doc.children[1], Component::List(list) if list.items.len() == 29));
}

#[test]
fn thirty_lines_become_an_accordion() {
    let doc = parse(&accordion_text(3, 10), &ViewportPolicy::default());
    let accordion = accordion_of(&doc).expect("promoted accordion");
    let headings: Vec<&str> = accordion.panels.iter().map(|p| p.heading.as_str()).collect();
    assert_eq!(headings, ["Week 1", "Week 2", "Week 3"]);
    assert_eq!(
        accordion.panels[0].content,
        vec![Component::List(bullets(&[
            "Task 1.1", "Task 1.2", "Task 1.3", "Task 1.4", "Task 1.5", "Task 1.6", "Task 1.7",
            "Task 1.8", "Task 1.9", "Task 1.10",
        ]))]
    );
}

#[test]
fn long_items_count_by_wrapped_length() {
    // 10 items of 141 characters take three lines each.
    let mut text = String::from("#### Readings\n");
    for _ in 0..10 {
        text.push_str(&format!("* {}\n", "r".repeat(141)));
    }
    assert!(accordion_of(&parse(&text, &ViewportPolicy::default())).is_some());
}

#[test]
fn explicit_markers_disable_promotion() {
    let mut text = accordion_text(1, 40);
    text.push_str("<ACCORDION>\n</ACCORDION>\n");
    let doc = parse(&text, &ViewportPolicy::default());
    assert_eq!(doc.children[0], heading(4, "Week 1"));
}

#[test]
fn disabled_policy_never_promotes() {
    let policy = ViewportPolicy {
        enabled: false,
        ..ViewportPolicy::default()
    };
    assert!(accordion_of(&parse(&accordion_text(2, 40), &policy)).is_none());
}

#[test]
fn smaller_viewport_lowers_the_threshold() {
    let policy = ViewportPolicy {
        viewport_height_px: 100,
        ..ViewportPolicy::default()
    };
    assert!(accordion_of(&parse(&accordion_text(1, 5), &policy)).is_some());
}

#[test]
fn text_outside_panels_is_dropped_when_promoting() {
    let text = format!("Intro line\n{}", accordion_text(1, 30));
    let doc = parse(&text, &ViewportPolicy::default());
    let accordion = accordion_of(&doc).expect("promoted accordion");
    assert_eq!(accordion.panels.len(), 1);
}

#[test]
fn promotion_policy_is_pluggable() {
    struct Always;
    impl PromotionPolicy for Always {
        fn should_promote(&self, _lines: &[&str]) -> bool {
            true
        }
    }
    let doc = parse("#### Only\n* one", &Always);
    let accordion = accordion_of(&doc).expect("promoted accordion");
    assert_eq!(accordion.panels[0].heading, "Only");
}

#[test]
fn flattened_accordion_is_promoted_back() {
    let accordion = Accordion {
        panels: (1..=3)
            .map(|week| PanelGroup {
                heading: format!("Week {week}"),
                content: vec![Component::List(List {
                    ordered: false,
                    items: (1..=10)
                        .map(|n| ListItem::from_text(&format!("Task {n}")))
                        .collect(),
                })],
            })
            .collect(),
    };
    let text = flatten(&accordion);
    assert!(!text.contains('<'));

    let reparsed = parse(&text, &ViewportPolicy::default());
    assert_eq!(accordion_of(&reparsed), Some(&accordion));
}

#[test]
fn flattened_export_keeps_its_structure() {
    let accordion = Accordion {
        panels: vec![PanelGroup {
            heading: "Week 1".into(),
            content: vec![Component::List(List {
                ordered: false,
                items: (1..=30)
                    .map(|n| ListItem::from_text(&format!("Task {n}")))
                    .collect(),
            })],
        }],
    };
    let doc = Document::new(vec![Component::Wrapper(Wrapper {
        children: vec![Component::Accordion(accordion)],
    })]);
    let options = TaggedOptions {
        flatten_accordions: true,
        ..TaggedOptions::default()
    };
    let text = serialize_tagged(&doc, &options);
    assert!(!text.contains("<ACCORDION>"));

    let reparsed = parse(&text, &ViewportPolicy::default());
    let [Component::Wrapper(wrapper)] = reparsed.children.as_slice() else {
        panic!("expected one wrapper, got {:?}", reparsed.children);
    };
    assert_eq!(wrapper.children[0], heading(4, "Week 1"));
    assert!(matches!(&wrapper.children[1], Component::List(list) if list.items.len() == 30));
}

/// A page with a header, a paragraph and a long `####` task list.
fn task_page() -> Document {
    let tasks: Vec<String> = (1..=30).map(|n| format!("Task {n}")).collect();
    let tasks: Vec<&str> = tasks.iter().map(String::as_str).collect();
    Document::new(vec![Component::Wrapper(Wrapper {
        children: vec![
            Component::Header(Header {
                pre1: "Module".into(),
                pre2: "1".into(),
                title: "Getting Started".into(),
            }),
            Component::ContentBlock(ContentBlock {
                id: Some("b1".into()),
                children: vec![
                    para("Read these before class."),
                    heading(4, "Tasks"),
                    Component::List(bullets(&tasks)),
                ],
            }),
        ],
    })])
}

#[test]
fn exported_page_is_never_promoted() {
    let doc = task_page();
    let text = serialize_tagged(&doc, &TaggedOptions::default());
    let reparsed = parse(&text, &ViewportPolicy::default());
    assert_eq!(reparsed, doc);
}

#[test]
fn any_tag_marker_disables_promotion() {
    let text = format!("<PROGRESS-BAR/>
{}", accordion_text(1, 40));
    let doc = parse(&text, &ViewportPolicy::default());
    assert_eq!(doc.children[0], Component::ProgressPlaceholder);
    assert_eq!(doc.children[1], heading(4, "Week 1"));
}
