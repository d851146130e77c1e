use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const PAGE: &str = r#"<div id="dp-wrapper" class="dp-wrapper kl_uon">
<header class="dp-header"><h2 class="dp-heading"><span class="dp-header-pre"><span class="dp-header-pre-1">Module</span> <span class="dp-header-pre-2">1</span></span> <span class="dp-header-title">Intro</span></h2></header>
<div class="dp-content-block"><p>Hello <span class="dp-personalization-token" data-token="first_name">{{first_name}}</span></p></div>
</div>"#;

#[test]
fn export_then_import_keeps_the_page() {
    let dir = tempdir().unwrap();
    let page = dir.path().join("page.html");
    let text = dir.path().join("page.md");
    fs::write(&page, PAGE).unwrap();

    cargo_bin_cmd!("dpmd")
        .arg("export")
        .arg(page.as_os_str())
        .arg("-o")
        .arg(text.as_os_str())
        .assert()
        .success();

    let exported = fs::read_to_string(&text).unwrap();
    assert!(exported.contains("Module 1: Intro\n"));
    assert!(exported.contains("Hello {{first_name}}\n"));

    cargo_bin_cmd!("dpmd")
        .arg("import")
        .arg(page.as_os_str())
        .arg(text.as_os_str())
        .assert()
        .success();

    let html = fs::read_to_string(&page).unwrap();
    assert!(html.contains(r#"data-token="first_name""#));

    cargo_bin_cmd!("dpmd")
        .arg("export")
        .arg(page.as_os_str())
        .assert()
        .success()
        .stdout(predicate::eq(exported));
}

#[test]
fn import_title_overrides_header() {
    let dir = tempdir().unwrap();
    let page = dir.path().join("page.html");
    let text = dir.path().join("page.md");
    fs::write(&page, "").unwrap();
    fs::write(&text, "<WRAPPER>\n<HEADER>\nModule 1: Intro\n</HEADER>\n</WRAPPER>\n").unwrap();

    cargo_bin_cmd!("dpmd")
        .arg("import")
        .arg(page.as_os_str())
        .arg(text.as_os_str())
        .arg("--title")
        .arg("Week 3: Renamed")
        .assert()
        .success();

    let html = fs::read_to_string(&page).unwrap();
    assert!(html.contains(r#"<span class="dp-header-title">Renamed</span>"#));
}

#[test]
fn invalid_import_leaves_page_untouched() {
    let dir = tempdir().unwrap();
    let page = dir.path().join("page.html");
    let text = dir.path().join("page.md");
    fs::write(&page, PAGE).unwrap();
    fs::write(&text, "<WRAPPER>\n<PANEL-CONTENT>\n</WRAPPER>\n").unwrap();

    cargo_bin_cmd!("dpmd")
        .arg("import")
        .arg(page.as_os_str())
        .arg(text.as_os_str())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Import error"));

    assert_eq!(fs::read_to_string(&page).unwrap(), PAGE);
}

#[test]
fn export_of_missing_page_is_not_ready() {
    let dir = tempdir().unwrap();
    cargo_bin_cmd!("dpmd")
        .arg("export")
        .arg(dir.path().join("missing.html").as_os_str())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not available"));
}
