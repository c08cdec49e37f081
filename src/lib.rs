//! # attrex - legacy `attrs` converter for Odoo view XML
//!
//! Odoo 17 dropped the combined `attrs` view attribute in favor of discrete
//! `invisible` / `readonly` / `required` attributes holding Python boolean
//! expressions. attrex batch-converts a module tree in place.
//!
//! ## Overview
//!
//! The converter walks every `.xml` file under a root, finds elements with a
//! non-empty `attrs` attribute, decodes the Python-literal payload with a
//! restricted parser (no evaluation), rewrites each entry as a discrete
//! attribute, and drops the legacy one. Conversion is best-effort: malformed
//! files and untranslatable shapes are reported and skipped, never fatal.
//!
//! ## Modules
//!
//! - [`literal`] - Restricted Python-literal parser for attribute payloads
//! - [`domain`] - Condition tree decoding and expression rendering
//! - [`convert`] - Per-file XML rewrite
//! - [`batch`] - Directory walk and aggregate reporting
//! - [`ui`] - Console formatting helpers
//!
//! ## Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use attrex::batch::{self, BatchOptions};
//!
//! let report = batch::run(&BatchOptions {
//!     root: PathBuf::from("addons/my_module"),
//!     legacy_attr: "attrs".to_string(),
//!     ext: "xml".to_string(),
//!     dry_run: true,
//! })
//! .expect("batch run failed");
//!
//! println!("{} files would change", report.files_converted);
//! ```

pub mod batch;
pub mod convert;
pub mod domain;
pub mod literal;
pub mod ui;

/// Default conversion parameters.
pub mod defaults {
    /// The legacy combined-condition attribute name.
    pub const LEGACY_ATTR: &str = "attrs";
    /// Extension of view files to scan.
    pub const VIEW_EXT: &str = "xml";
}

/// Generate a UTC timestamp in ISO 8601 format: `YYYY-MM-DDTHH:MM:SSZ`
pub fn utc_now_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
