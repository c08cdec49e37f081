//! Restricted parser for Python-literal attribute payloads.
//!
//! The legacy `attrs` attribute carries a Python dict literal such as
//! `{'invisible': [('state', '=', 'draft')]}`. Instead of handing that text
//! to a general-purpose evaluator, this module parses only the shapes the
//! conversion actually needs: quoted strings, numbers, `True`/`False`,
//! `None`, lists, tuples, and string-keyed dicts. Anything outside that
//! grammar is a positioned parse error, never a guess.
//!
//! Every parsed value keeps the exact source slice it came from, so the
//! translator can render values verbatim (quoting, numeric formatting, and
//! list/tuple syntax survive the round trip).

use std::fmt;

/// A parsed literal plus the source text it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: Kind,
    /// Exact source slice, e.g. `'draft'` or `[1, 2]`.
    pub raw: String,
}

/// The supported literal shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Decoded string contents (without quotes, escapes resolved).
    Str(String),
    None,
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    /// Keys are decoded string contents, in source order.
    Dict(Vec<(String, Literal)>),
}

/// Parse failure with a byte offset into the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl std::error::Error for ParseError {}

/// Parse a complete payload into a single literal.
///
/// Trailing characters after the literal are an error.
pub fn parse(input: &str) -> Result<Literal, ParseError> {
    let mut parser = Parser { src: input, pos: 0 };
    let value = parser.parse_value()?;
    parser.skip_ws();
    if parser.pos < parser.src.len() {
        return Err(parser.error("trailing characters after literal"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn parse_value(&mut self) -> Result<Literal, ParseError> {
        self.skip_ws();
        let start = self.pos;
        let kind = match self.peek() {
            Some('\'') | Some('"') => self.parse_string()?,
            Some('[') => self.parse_list()?,
            Some('(') => return self.parse_parenthesized(start),
            Some('{') => self.parse_dict()?,
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number()?,
            Some(c) if c.is_ascii_alphabetic() => self.parse_keyword()?,
            Some(c) => return Err(self.error(format!("unexpected character '{}'", c))),
            None => return Err(self.error("unexpected end of input")),
        };
        Ok(Literal {
            kind,
            raw: self.src[start..self.pos].to_string(),
        })
    }

    fn parse_string(&mut self) -> Result<Kind, ParseError> {
        let quote = self.bump().unwrap_or('\'');
        let mut decoded = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(Kind::Str(decoded)),
                Some('\\') => match self.bump() {
                    Some('n') => decoded.push('\n'),
                    Some('t') => decoded.push('\t'),
                    Some('r') => decoded.push('\r'),
                    Some('\\') => decoded.push('\\'),
                    Some('\'') => decoded.push('\''),
                    Some('"') => decoded.push('"'),
                    Some(c) => return Err(self.error(format!("unsupported escape '\\{}'", c))),
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => decoded.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Kind, ParseError> {
        let start = self.pos;
        self.eat('-');
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {
                    self.bump();
                }
                '.' if !is_float => {
                    is_float = true;
                    self.bump();
                }
                'e' | 'E' => {
                    is_float = true;
                    self.bump();
                    if matches!(self.peek(), Some('+') | Some('-')) {
                        self.bump();
                    }
                }
                _ => break,
            }
        }
        let text = &self.src[start..self.pos];
        if !is_float {
            if let Ok(i) = text.parse::<i64>() {
                return Ok(Kind::Int(i));
            }
        }
        text.parse::<f64>()
            .map(Kind::Float)
            .map_err(|_| self.error(format!("invalid number '{}'", text)))
    }

    fn parse_keyword(&mut self) -> Result<Kind, ParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        match &self.src[start..self.pos] {
            "True" => Ok(Kind::Bool(true)),
            "False" => Ok(Kind::Bool(false)),
            "None" => Ok(Kind::None),
            other => Err(ParseError {
                offset: start,
                message: format!("unsupported token '{}'", other),
            }),
        }
    }

    fn parse_list(&mut self) -> Result<Kind, ParseError> {
        self.bump(); // consume '['
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(']') {
                break;
            }
            items.push(self.parse_value()?);
            self.skip_ws();
            if !self.eat(',') && self.peek() != Some(']') {
                return Err(self.error("expected ',' or ']'"));
            }
        }
        Ok(Kind::List(items))
    }

    /// Parentheses are a tuple when a comma is present, otherwise plain
    /// grouping around a single value (Python's own rule).
    fn parse_parenthesized(&mut self, start: usize) -> Result<Literal, ParseError> {
        self.bump(); // consume '('
        let mut items = Vec::new();
        let mut saw_comma = false;
        loop {
            self.skip_ws();
            if self.eat(')') {
                break;
            }
            items.push(self.parse_value()?);
            self.skip_ws();
            if self.eat(',') {
                saw_comma = true;
            } else if self.peek() != Some(')') {
                return Err(self.error("expected ',' or ')'"));
            }
        }
        if items.len() == 1 && !saw_comma {
            return Ok(items.into_iter().next().expect("one grouped value"));
        }
        Ok(Literal {
            kind: Kind::Tuple(items),
            raw: self.src[start..self.pos].to_string(),
        })
    }

    fn parse_dict(&mut self) -> Result<Kind, ParseError> {
        self.bump(); // consume '{'
        let mut entries = Vec::new();
        loop {
            self.skip_ws();
            if self.eat('}') {
                break;
            }
            let key = self.parse_value()?;
            let key = match key.kind {
                Kind::Str(s) => s,
                _ => {
                    return Err(ParseError {
                        offset: self.pos,
                        message: format!("dict key {} is not a string", key.raw),
                    })
                }
            };
            self.skip_ws();
            if !self.eat(':') {
                return Err(self.error("expected ':' after dict key"));
            }
            entries.push((key, self.parse_value()?));
            self.skip_ws();
            if !self.eat(',') && self.peek() != Some('}') {
                return Err(self.error("expected ',' or '}'"));
            }
        }
        Ok(Kind::Dict(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strings() {
        let lit = parse("'draft'").unwrap();
        assert_eq!(lit.kind, Kind::Str("draft".to_string()));
        assert_eq!(lit.raw, "'draft'");

        let lit = parse("\"it\\'s\"").unwrap();
        assert_eq!(lit.kind, Kind::Str("it's".to_string()));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse("42").unwrap().kind, Kind::Int(42));
        assert_eq!(parse("-8").unwrap().kind, Kind::Int(-8));
        assert_eq!(parse("2.5").unwrap().kind, Kind::Float(2.5));
        assert_eq!(parse("1e3").unwrap().kind, Kind::Float(1000.0));
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse("True").unwrap().kind, Kind::Bool(true));
        assert_eq!(parse("False").unwrap().kind, Kind::Bool(false));
        assert_eq!(parse("None").unwrap().kind, Kind::None);
        assert!(parse("null").is_err());
    }

    #[test]
    fn test_parse_condition_tuple() {
        let lit = parse("('state', '=', 'draft')").unwrap();
        match lit.kind {
            Kind::Tuple(items) => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[0].kind, Kind::Str("state".to_string()));
                assert_eq!(items[2].raw, "'draft'");
            }
            other => panic!("expected tuple, got {:?}", other),
        }
    }

    #[test]
    fn test_parenthesized_value_is_not_a_tuple() {
        assert_eq!(parse("(5)").unwrap().kind, Kind::Int(5));
        match parse("(5,)").unwrap().kind {
            Kind::Tuple(items) => assert_eq!(items.len(), 1),
            other => panic!("expected tuple, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_attrs_dict() {
        let lit = parse("{'invisible': [('state', '=', 'draft')], 'required': True}").unwrap();
        match lit.kind {
            Kind::Dict(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].0, "invisible");
                assert_eq!(entries[1].0, "required");
                assert_eq!(entries[1].1.kind, Kind::Bool(true));
            }
            other => panic!("expected dict, got {:?}", other),
        }
    }

    #[test]
    fn test_raw_preserves_source_formatting() {
        let lit = parse("[('qty', 'in', [1, 2,  3])]").unwrap();
        match lit.kind {
            Kind::List(items) => match &items[0].kind {
                Kind::Tuple(fields) => assert_eq!(fields[2].raw, "[1, 2,  3]"),
                other => panic!("expected tuple, got {:?}", other),
            },
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_literal_input() {
        assert!(parse("os.system('x')").is_err());
        assert!(parse("{'a': f(1)}").is_err());
        assert!(parse("[1] + [2]").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn test_rejects_non_string_dict_key() {
        let err = parse("{1: True}").unwrap_err();
        assert!(err.message.contains("not a string"));
    }

    #[test]
    fn test_error_carries_offset() {
        let err = parse("[('a', '=', $)]").unwrap_err();
        assert_eq!(err.offset, 12);
    }
}
