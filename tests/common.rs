//! Common test helpers for integration tests

use std::fs;
use std::path::{Path, PathBuf};

/// Write a file under `root`, creating parent directories as needed.
pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(&path, content).expect("write fixture file");
    path
}

/// Read a file back as a string.
pub fn read_file(path: &Path) -> String {
    fs::read_to_string(path).expect("read fixture file")
}

/// Populate `root` with a small module tree: one convertible view, one
/// already-modern view, and one non-XML file.
pub fn fixture_tree(root: &Path) {
    write_file(
        root,
        "views/order_views.xml",
        concat!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
            "<odoo>\n",
            "  <record id=\"view_order_form\" model=\"ir.ui.view\">\n",
            "    <field name=\"arch\" type=\"xml\">\n",
            "      <form>\n",
            "        <field name=\"date_done\" attrs=\"{'invisible': [('state', '=', 'draft')]}\"/>\n",
            "        <field name=\"amount\" attrs=\"{'readonly': True}\"/>\n",
            "      </form>\n",
            "    </field>\n",
            "  </record>\n",
            "</odoo>\n",
        ),
    );
    write_file(
        root,
        "views/modern.xml",
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<odoo>\n  <field name=\"x\" invisible=\"1\"/>\n</odoo>\n",
    );
    write_file(root, "static/readme.txt", "not a view\n");
}
