//! End-to-end tests for the batch converter.

mod common;

use attrex::batch::{self, BatchOptions};

use common::{fixture_tree, read_file, write_file};

fn options(root: &std::path::Path) -> BatchOptions {
    BatchOptions {
        root: root.to_path_buf(),
        legacy_attr: "attrs".to_string(),
        ext: "xml".to_string(),
        dry_run: false,
    }
}

#[test]
fn test_batch_converts_tree() {
    let dir = tempfile::tempdir().unwrap();
    fixture_tree(dir.path());

    let report = batch::run(&options(dir.path())).unwrap();

    assert_eq!(report.files_scanned, 2, "txt file must not be scanned");
    assert_eq!(report.files_converted, 1);
    assert_eq!(report.files_unchanged, 1);
    assert_eq!(report.elements_converted, 2);
    assert_eq!(report.entries_translated, 2);
    assert!(report.errors.is_empty());
    assert!(report.misses.is_empty());

    let converted = read_file(&dir.path().join("views/order_views.xml"));
    assert!(converted.contains("invisible=\"state == 'draft'\""));
    assert!(converted.contains("readonly=\"1\""));
    assert!(!converted.contains("attrs="));
    assert!(converted.starts_with("<?xml"));
    // Surrounding structure survives
    assert!(converted.contains("<record id=\"view_order_form\" model=\"ir.ui.view\">"));
}

#[test]
fn test_rerun_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    fixture_tree(dir.path());

    batch::run(&options(dir.path())).unwrap();
    let after_first = read_file(&dir.path().join("views/order_views.xml"));

    let second = batch::run(&options(dir.path())).unwrap();
    let after_second = read_file(&dir.path().join("views/order_views.xml"));

    assert_eq!(second.files_converted, 0);
    assert_eq!(second.files_unchanged, 2);
    assert_eq!(after_first, after_second, "second run must not rewrite");
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fixture_tree(dir.path());
    let before = read_file(&dir.path().join("views/order_views.xml"));

    let mut opts = options(dir.path());
    opts.dry_run = true;
    let report = batch::run(&opts).unwrap();

    assert_eq!(report.files_converted, 1);
    assert!(report.dry_run);
    assert_eq!(read_file(&dir.path().join("views/order_views.xml")), before);
}

#[test]
fn test_malformed_file_is_reported_and_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fixture_tree(dir.path());
    let bad = write_file(dir.path(), "views/broken.xml", "<odoo><form></odoo></form>");

    let report = batch::run(&options(dir.path())).unwrap();

    assert_eq!(report.errors.len(), 1, "exactly one diagnostic for the file");
    assert!(report.errors[0].path.ends_with("broken.xml"));
    assert!(report.errors[0].reason.contains("parse"));
    assert_eq!(read_file(&bad), "<odoo><form></odoo></form>");
    // The rest of the batch still converted
    assert_eq!(report.files_converted, 1);
}

#[test]
fn test_unsupported_shape_is_counted_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "views/mixed.xml",
        concat!(
            "<form>",
            "<field name=\"a\" attrs=\"{'invisible': [{'not': 'a triple'}]}\"/>",
            "<field name=\"b\" attrs=\"{'required': [('state', '!=', 'done')]}\"/>",
            "</form>",
        ),
    );

    let report = batch::run(&options(dir.path())).unwrap();

    assert_eq!(report.misses.len(), 1);
    assert_eq!(report.misses[0].element, "field");
    assert_eq!(report.elements_converted, 1);
    assert!(report.errors.is_empty());

    let out = read_file(&path);
    // The bad element keeps its legacy attribute, the good one converted
    assert!(out.contains("attrs=\"{'invisible': [{'not': 'a triple'}]}\""));
    assert!(out.contains("required=\"state != 'done'\""));
}

#[test]
fn test_or_marker_example() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "views/amount.xml",
        "<field name=\"amount\" attrs=\"{'invisible': ['|', ('amount', '&lt;=', 8), ('amount', '&gt;', 12)]}\"/>",
    );

    let report = batch::run(&options(dir.path())).unwrap();

    assert_eq!(report.elements_converted, 1);
    let out = read_file(&path);
    assert!(out.contains("invisible=\"amount &lt;= 8 or amount &gt; 12\""));
}

#[test]
fn test_empty_root_reports_zero() {
    let dir = tempfile::tempdir().unwrap();
    let report = batch::run(&options(dir.path())).unwrap();
    assert_eq!(report.files_scanned, 0);
    assert!(!report.completed_at.is_empty());
}

#[test]
#[serial_test::serial]
fn test_quiet_env_flag() {
    std::env::set_var("ATTREX_QUIET", "1");
    assert!(attrex::ui::is_quiet());
    std::env::set_var("ATTREX_QUIET", "false");
    assert!(!attrex::ui::is_quiet());
    std::env::remove_var("ATTREX_QUIET");
    assert!(!attrex::ui::is_quiet());
}
