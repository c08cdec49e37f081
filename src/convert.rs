//! Per-file XML rewrite: replace a legacy condition attribute with the
//! translated per-purpose attributes.
//!
//! Files are streamed event-by-event with quick-xml; every event that is not
//! a start/empty tag carrying the legacy attribute passes through unchanged,
//! so text, comments, processing instructions, and attribute order all
//! survive the rewrite.

use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::domain;
use crate::literal::{self, Kind};

/// An attribute the translator refused to convert, with its element context.
#[derive(Debug, Clone)]
pub struct Miss {
    pub element: String,
    pub reason: String,
}

/// Result of converting one document in memory.
#[derive(Debug)]
pub struct Conversion {
    pub output: Vec<u8>,
    pub elements_converted: usize,
    pub entries_translated: usize,
    pub misses: Vec<Miss>,
}

/// Terminal state of one file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    /// Legacy attributes were found and rewritten (or would be, on dry run).
    Converted,
    /// Nothing to do; the file was not touched.
    Unchanged,
    /// File-scoped failure (unreadable, malformed, or unwritable).
    Failed(String),
}

/// Outcome of processing one file on disk.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
    pub elements_converted: usize,
    pub entries_translated: usize,
    pub misses: Vec<Miss>,
}

impl FileOutcome {
    fn failed(path: &Path, reason: String) -> FileOutcome {
        FileOutcome {
            path: path.to_path_buf(),
            status: FileStatus::Failed(reason),
            elements_converted: 0,
            entries_translated: 0,
            misses: Vec::new(),
        }
    }
}

/// Convert one file in place.
///
/// Never returns an error: every failure is file-scoped and lands in the
/// outcome so the batch can keep going. The file is rewritten only when at
/// least one element converted, which keeps re-runs byte-identical no-ops.
pub fn convert_file(path: &Path, legacy_attr: &str, dry_run: bool) -> FileOutcome {
    let input = match fs::read_to_string(path) {
        Ok(input) => input,
        Err(e) => return FileOutcome::failed(path, format!("read failed: {}", e)),
    };

    let conversion = match convert_document(&input, legacy_attr) {
        Ok(conversion) => conversion,
        Err(e) => return FileOutcome::failed(path, format!("parse error: {:#}", e)),
    };

    let status = if conversion.elements_converted == 0 {
        FileStatus::Unchanged
    } else if dry_run {
        FileStatus::Converted
    } else {
        match write_atomic(path, &conversion.output) {
            Ok(()) => FileStatus::Converted,
            Err(e) => FileStatus::Failed(format!("write failed: {:#}", e)),
        }
    };

    FileOutcome {
        path: path.to_path_buf(),
        status,
        elements_converted: conversion.elements_converted,
        entries_translated: conversion.entries_translated,
        misses: conversion.misses,
    }
}

/// Write through a temp file in the same directory and rename over the
/// original, so a crash mid-write cannot leave a half-rewritten file.
fn write_atomic(path: &Path, output: &[u8]) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))
        .context("creating temp file")?;
    tmp.write_all(output).context("writing temp file")?;
    tmp.persist(path)
        .map_err(|e| anyhow!("replacing {}: {}", path.display(), e.error))?;
    Ok(())
}

/// Convert a document held in memory.
///
/// Output is UTF-8 with an XML declaration; an existing declaration is
/// replaced rather than duplicated. Errors mean the document is malformed
/// and must be left on disk as-is.
pub fn convert_document(input: &str, legacy_attr: &str) -> Result<Conversion> {
    let mut reader = Reader::from_str(input);
    let mut writer = Writer::new(Vec::new());

    let mut conversion = Conversion {
        output: Vec::new(),
        elements_converted: 0,
        entries_translated: 0,
        misses: Vec::new(),
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    if !input.trim_start().starts_with("<?xml") {
        writer.write_event(Event::Text(BytesText::new("\n")))?;
    }

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            // Superseded by the declaration written above
            Event::Decl(_) => {}
            Event::Start(elem) => {
                let rewritten = rewrite_element(&elem, legacy_attr, &mut conversion)?;
                match rewritten {
                    Some(new_elem) => writer.write_event(Event::Start(new_elem))?,
                    None => writer.write_event(Event::Start(elem))?,
                }
            }
            Event::Empty(elem) => {
                let rewritten = rewrite_element(&elem, legacy_attr, &mut conversion)?;
                match rewritten {
                    Some(new_elem) => writer.write_event(Event::Empty(new_elem))?,
                    None => writer.write_event(Event::Empty(elem))?,
                }
            }
            event => writer.write_event(event)?,
        }
    }

    conversion.output = writer.into_inner();
    Ok(conversion)
}

/// Rewrite one element if it carries a non-empty legacy attribute.
///
/// Returns `None` when the element passes through untouched. Attribute
/// errors (stray quotes, duplicate names) bubble up as document errors;
/// translation failures are recorded as misses and leave the element alone.
fn rewrite_element(
    elem: &BytesStart,
    legacy_attr: &str,
    conversion: &mut Conversion,
) -> Result<Option<BytesStart<'static>>> {
    let tag = String::from_utf8_lossy(elem.name().as_ref()).into_owned();

    let mut legacy_value: Option<String> = None;
    let mut others: Vec<(String, Cow<'_, [u8]>)> = Vec::new();
    for attr in elem.attributes() {
        let attr = attr.with_context(|| format!("bad attribute on <{}>", tag))?;
        if attr.key.as_ref() == legacy_attr.as_bytes() {
            let value = attr
                .unescape_value()
                .with_context(|| format!("bad attribute value on <{}>", tag))?;
            legacy_value = Some(value.into_owned());
        } else {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            others.push((key, attr.value));
        }
    }

    let payload = match legacy_value {
        Some(value) if !value.trim().is_empty() => value,
        // Absent or empty: nothing to convert on this element
        _ => return Ok(None),
    };

    let entries = match literal::parse(&payload) {
        Ok(lit) => match lit.kind {
            Kind::Dict(entries) => entries,
            _ => {
                conversion.misses.push(Miss {
                    element: tag,
                    reason: format!("payload {} is not a dict literal", lit.raw),
                });
                return Ok(None);
            }
        },
        Err(e) => {
            conversion.misses.push(Miss {
                element: tag,
                reason: format!("payload is not a literal: {}", e),
            });
            return Ok(None);
        }
    };

    let translated = match domain::translate_attrs(&entries) {
        Ok(translated) => translated,
        Err(unsupported) => {
            conversion.misses.push(Miss {
                element: tag,
                reason: unsupported.reason,
            });
            return Ok(None);
        }
    };

    let mut new_elem = BytesStart::new(tag);
    for (key, value) in &others {
        // Raw (still-escaped) values are pushed as-is to avoid re-escaping
        new_elem.push_attribute((key.as_bytes(), value.as_ref()));
    }
    for (key, value) in &translated {
        let escaped = escape_attr(value);
        new_elem.push_attribute((key.as_bytes(), escaped.as_bytes()));
    }

    conversion.elements_converted += 1;
    conversion.entries_translated += translated.len();
    Ok(Some(new_elem.into_owned()))
}

/// Escape a generated expression for use in a double-quoted attribute.
///
/// Quote characters inside expressions stay literal apostrophes, matching
/// how view files are conventionally written; only the characters XML
/// forbids in attribute values are replaced.
fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
