use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_refdoc")))
}

fn fixture_path(name: &str) -> String {
    format!(
        "{}/tests/fixtures/include/libtorrent/{}",
        env!("CARGO_MANIFEST_DIR"),
        name
    )
}

fn read(dir: &TempDir, name: &str) -> String {
    std::fs::read_to_string(dir.path().join(name)).unwrap()
}

// -- multi-page output --

#[test]
fn multi_page_creates_category_documents() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("session.hpp"))
        .arg(fixture_path("bdecode.hpp"))
        .assert()
        .success();

    assert!(dir.path().join("reference.rst").exists());
    assert!(dir.path().join("reference-Session.rst").exists());
    assert!(dir.path().join("reference-Bdecoding.rst").exists());
    assert!(dir.path().join("reference-Error_Codes.rst").exists());
}

#[test]
fn class_page_contains_anchors_and_highlighted_signatures() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("session.hpp"))
        .assert()
        .success();

    let page = read(&dir, "reference-Session.rst");
    assert!(page.starts_with(".. include:: header.rst"));
    assert!(page.contains("<a name=\"session_handle\"></a>"));
    assert!(page.contains("Declared in \"`libtorrent/session.hpp`__\""));
    assert!(page.contains("void **pause** ();"));
    // overloads documented together share one heading
    assert!(page.contains("pause() resume()"));
    // the overview precedes the declarations
    assert!(page.contains("The session holds all state that spans multiple torrents."));
}

#[test]
fn prose_mentions_become_links() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("session.hpp"))
        .assert()
        .success();

    let page = read(&dir, "reference-Session.rst");
    // make_magnet_uri's description mentions session_handle
    assert!(page.contains("`session_handle`__ argument"));
    assert!(page.contains("__ reference-Session.html#session_handle"));
}

#[test]
fn toc_partitions_categories_into_sections() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("session.hpp"))
        .arg(fixture_path("bdecode.hpp"))
        .assert()
        .success();

    let toc = read(&dir, "reference.rst");
    assert!(toc.contains("reference documentation"));
    assert!(toc.contains(".. rubric:: Session"));
    assert!(toc.contains(".. rubric:: Bdecoding"));
    assert!(toc.contains(".. rubric:: Error Codes"));
    assert!(toc.contains("\t| `session_handle`__"));
    assert!(toc.contains("\t__ reference-Session.html#session_handle"));
    // the overview gets its own entry
    assert!(toc.contains("\t| overview__"));
    assert!(toc.contains("\t__ reference-Session.html#overview"));
}

#[test]
fn enum_rendered_as_value_table() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("bdecode.hpp"))
        .assert()
        .success();

    let page = read(&dir, "reference-Error_Codes.rst");
    assert!(page.contains("enum bdecode_errors"));
    assert!(page.contains("| name "));
    assert!(page.contains("| expected_digit | 10 "));
    assert!(page.contains("| overflow       | 11 "));
}

#[test]
fn hidden_and_internal_members_excluded_by_default() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("session.hpp"))
        .assert()
        .success();

    let page = read(&dir, "reference-Session.rst");
    assert!(!page.contains("internal_detail"));
    assert!(!page.contains("secret_field"));
    assert!(!page.contains("not_documented"));
}

#[test]
fn internal_mode_includes_marked_members() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg("--internal")
        .arg(fixture_path("session.hpp"))
        .assert()
        .success();

    let page = read(&dir, "reference-Session.rst");
    assert!(page.contains("internal_detail"));
    assert!(page.contains("not_documented"));
    // "hidden" declarations stay hidden even in internal mode
    assert!(!page.contains("secret_field"));
}

#[test]
fn undocumented_declaration_warns_but_still_renders() {
    let dir = TempDir::new().unwrap();

    let assert = cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("session.hpp"))
        .assert()
        .success();

    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("undocumented_fn"));
    assert!(stderr.contains("is not documented"));

    let page = read(&dir, "reference-Session.rst");
    assert!(page.contains("undocumented_fn"));
}

// -- single-page output --

#[test]
fn single_page_concatenates_categories() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg("--single-page")
        .arg(fixture_path("session.hpp"))
        .arg(fixture_path("bdecode.hpp"))
        .assert()
        .success();

    assert!(!dir.path().join("reference.rst").exists());
    let page = read(&dir, "single-page-ref.rst");
    assert!(page.starts_with(".. include:: header.rst"));
    assert!(page.contains("session_handle"));
    assert!(page.contains("bdecode_errors"));
}

// -- dump mode --

#[test]
fn dump_prints_extracted_outline() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg("--dump")
        .arg(fixture_path("session.hpp"))
        .assert()
        .success()
        .stdout(predicate::str::contains("session_handle"))
        .stdout(predicate::str::contains("pause()"));
}

// -- plain output --

#[test]
fn plain_output_keeps_prose_only() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg("--plain-output")
        .arg(fixture_path("bdecode.hpp"))
        .assert()
        .success();

    let plain = read(&dir, "plain_text_out.txt");
    assert!(plain.contains("decodes a bencoded buffer"));
    assert!(!plain.contains("TORRENT_EXPORT"));
}

// -- cross-linking extra documents --

#[test]
fn link_doc_rewrites_prose_document() {
    let dir = TempDir::new().unwrap();
    let manual = dir.path().join("manual.rst");
    std::fs::write(&manual, "construct a session_handle to get started\n").unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["--link-doc", manual.to_str().unwrap()])
        .arg(fixture_path("session.hpp"))
        .assert()
        .success();

    let out = read(&dir, "manual-ref.rst");
    assert!(out.contains("`session_handle`__"));
    assert!(out.contains("__ reference-Session.html#session_handle"));
}

// -- fatal structural violations --

#[test]
fn unbalanced_braces_abort_without_output() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("unterminated.hpp"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse struct broken"));

    assert!(!dir.path().join("reference.rst").exists());
}

#[test]
fn todo_in_documentation_aborts() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("todo.hpp"))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "TODO comment in public documentation",
        ));
}

#[test]
fn orphaned_export_aborts() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("orphan.hpp"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("export macro without function or class"));
}

#[test]
fn wrong_qualifier_order_aborts() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("bad_constexpr.hpp"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("constexpr static"));
}

#[test]
fn no_input_files_is_an_error() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input files"));
}
