//! Condition domain decoding and expression rendering.
//!
//! A legacy condition list mixes condition triples like
//! `('state', '=', 'draft')` with prefix combinator markers `'|'` and `'&'`
//! that each apply to the two operands following them. This module decodes
//! that encoding into an explicit tree and renders the tree as an infix
//! boolean expression (`state == 'draft'`, `amount <= 8 or amount > 12`).
//!
//! Decoding never guesses: any shape outside the known grammar comes back
//! as [`Unsupported`], and the caller leaves the original attribute alone.

use std::fmt;

use regex::Regex;

use crate::literal::{Kind, Literal};

/// Logical combinator joining two sub-expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineOp {
    And,
    Or,
}

impl CombineOp {
    /// Recognize a prefix marker string.
    fn from_marker(marker: &str) -> Option<CombineOp> {
        match marker {
            "&" => Some(CombineOp::And),
            "|" => Some(CombineOp::Or),
            _ => None,
        }
    }

    fn joiner(self) -> &'static str {
        match self {
            CombineOp::And => " and ",
            CombineOp::Or => " or ",
        }
    }
}

/// One decoded `(field, operator, value)` condition.
///
/// `operator` is already mapped to its expression form (`=` becomes `==`)
/// and `value` keeps its source text for verbatim rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionTriple {
    pub field: String,
    pub operator: String,
    pub value: Literal,
}

/// Decoded condition tree.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainExpr {
    Leaf(ConditionTriple),
    Combine {
        op: CombineOp,
        left: Box<DomainExpr>,
        right: Box<DomainExpr>,
    },
}

impl DomainExpr {
    /// Render the tree as an infix boolean expression.
    ///
    /// Operands that are themselves combinators of a different operator are
    /// parenthesized so the text keeps the decoded structure.
    pub fn to_expression(&self) -> String {
        match self {
            DomainExpr::Leaf(triple) => format!(
                "{} {} {}",
                triple.field, triple.operator, triple.value.raw
            ),
            DomainExpr::Combine { op, left, right } => format!(
                "{}{}{}",
                render_operand(left, *op),
                op.joiner(),
                render_operand(right, *op)
            ),
        }
    }
}

fn render_operand(expr: &DomainExpr, parent: CombineOp) -> String {
    match expr {
        DomainExpr::Combine { op, .. } if *op != parent => {
            format!("({})", expr.to_expression())
        }
        _ => expr.to_expression(),
    }
}

/// A condition shape the decoder refuses to interpret.
///
/// This is attribute-scoped data, not a process error: the caller counts it
/// and moves on.
#[derive(Debug, Clone, PartialEq)]
pub struct Unsupported {
    pub reason: String,
}

impl Unsupported {
    fn new(reason: impl Into<String>) -> Self {
        Unsupported {
            reason: reason.into(),
        }
    }

    fn for_entry(self, key: &str) -> Self {
        Unsupported {
            reason: format!("entry '{}': {}", key, self.reason),
        }
    }
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Map a legacy condition operator to its expression form.
fn map_operator(op: &str) -> Option<&'static str> {
    match op {
        "=" => Some("=="),
        "!=" => Some("!="),
        "in" => Some("in"),
        "not in" => Some("not in"),
        "<" => Some("<"),
        "<=" => Some("<="),
        ">" => Some(">"),
        ">=" => Some(">="),
        _ => None,
    }
}

/// Check that a field name is a dotted identifier path (`state`,
/// `parent.state`). Anything else would not survive as an expression.
fn is_field_name(name: &str) -> bool {
    let re = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap();
    re.is_match(name)
}

/// Decode a condition list into a [`DomainExpr`].
///
/// Consecutive top-level conditions without a marker are joined with `and`
/// in their original order.
pub fn decode(items: &[Literal]) -> Result<DomainExpr, Unsupported> {
    if items.is_empty() {
        return Err(Unsupported::new("empty condition list"));
    }
    let mut cursor = Cursor { items, pos: 0 };
    let mut expr = decode_operand(&mut cursor)?;
    while cursor.pos < items.len() {
        let right = decode_operand(&mut cursor)?;
        expr = DomainExpr::Combine {
            op: CombineOp::And,
            left: Box::new(expr),
            right: Box::new(right),
        };
    }
    Ok(expr)
}

struct Cursor<'a> {
    items: &'a [Literal],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn next(&mut self) -> Option<&'a Literal> {
        let item = self.items.get(self.pos)?;
        self.pos += 1;
        Some(item)
    }
}

fn decode_operand(cursor: &mut Cursor) -> Result<DomainExpr, Unsupported> {
    let item = match cursor.next() {
        Some(item) => item,
        None => return Err(Unsupported::new("combinator is missing an operand")),
    };
    match &item.kind {
        Kind::Str(s) => match CombineOp::from_marker(s) {
            Some(op) => {
                let left = decode_operand(cursor)?;
                let right = decode_operand(cursor)?;
                Ok(DomainExpr::Combine {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            None => Err(Unsupported::new(format!(
                "unexpected string {} in condition list",
                item.raw
            ))),
        },
        Kind::Tuple(fields) => decode_triple(fields),
        Kind::List(inner) => decode(inner),
        _ => Err(Unsupported::new(format!(
            "unexpected item {} in condition list",
            item.raw
        ))),
    }
}

fn decode_triple(fields: &[Literal]) -> Result<DomainExpr, Unsupported> {
    if fields.len() != 3 {
        return Err(Unsupported::new(format!(
            "condition tuple has {} elements, expected 3",
            fields.len()
        )));
    }
    let field = match &fields[0].kind {
        Kind::Str(s) if is_field_name(s) => s.clone(),
        _ => {
            return Err(Unsupported::new(format!(
                "{} is not a field name",
                fields[0].raw
            )))
        }
    };
    let operator = match &fields[1].kind {
        Kind::Str(op) => match map_operator(op) {
            Some(mapped) => mapped.to_string(),
            None => return Err(Unsupported::new(format!("unknown operator '{}'", op))),
        },
        _ => {
            return Err(Unsupported::new(format!(
                "{} is not an operator",
                fields[1].raw
            )))
        }
    };
    if matches!(fields[2].kind, Kind::Dict(_)) {
        return Err(Unsupported::new(format!(
            "dict {} cannot be a condition value",
            fields[2].raw
        )));
    }
    Ok(DomainExpr::Leaf(ConditionTriple {
        field,
        operator,
        value: fields[2].clone(),
    }))
}

/// Translate one purpose entry of the legacy dict.
///
/// Booleans become `"1"`/`"0"`, condition lists become expressions, and
/// anything else is unsupported.
pub fn translate_entry(value: &Literal) -> Result<String, Unsupported> {
    match &value.kind {
        Kind::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
        Kind::List(items) => decode(items).map(|expr| expr.to_expression()),
        _ => Err(Unsupported::new(format!(
            "value {} is neither a boolean nor a condition list",
            value.raw
        ))),
    }
}

/// Translate every entry of a decoded legacy dict, in source order.
///
/// One unsupported entry fails the whole element: rewriting only part of an
/// attribute set would drop the conditions that did not translate.
pub fn translate_attrs(
    entries: &[(String, Literal)],
) -> Result<Vec<(String, String)>, Unsupported> {
    entries
        .iter()
        .map(|(key, value)| {
            translate_entry(value)
                .map(|expr| (key.clone(), expr))
                .map_err(|unsupported| unsupported.for_entry(key))
        })
        .collect()
}
