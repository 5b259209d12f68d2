// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LDAP-style selection filters over registration properties.
//!
//! Supported grammar:
//!
//! ```text
//! filter  = "(" body ")"
//! body    = "&" filter+ | "|" filter+ | "!" filter | key "=" value
//! ```
//!
//! A value of `*` tests for presence of the key. Any other value is compared
//! for equality against the property's string form; array properties match
//! if any element does. Keys are compared case-insensitively.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

use crate::tracker::Properties;

/// Reasons a filter string fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("filter is empty")]
    Empty,

    #[error("expected `{expected}` at position {position}")]
    Expected { expected: char, position: usize },

    #[error("filter ends unexpectedly at position {position}")]
    UnexpectedEnd { position: usize },

    #[error("missing attribute name at position {position}")]
    MissingKey { position: usize },

    #[error("`{operator}` needs at least one operand at position {position}")]
    EmptyComposite { operator: char, position: usize },

    #[error("unexpected `{found}` at position {position}")]
    Unexpected { found: char, position: usize },

    #[error("trailing input after filter at position {position}")]
    TrailingInput { position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    And(Vec<Node>),
    Or(Vec<Node>),
    Not(Box<Node>),
    Present(String),
    Equal(String, String),
}

/// A parsed selection filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyFilter {
    text: String,
    root: Node,
}

impl PropertyFilter {
    pub fn parse(text: &str) -> Result<Self, FilterError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(FilterError::Empty);
        }

        let mut parser = Parser {
            input: trimmed,
            pos: 0,
        };
        let root = parser.filter()?;
        parser.skip_whitespace();
        if parser.pos < trimmed.len() {
            return Err(FilterError::TrailingInput { position: parser.pos });
        }

        Ok(Self {
            text: trimmed.to_string(),
            root,
        })
    }

    /// Returns true if `properties` satisfy the filter.
    pub fn matches(&self, properties: &Properties) -> bool {
        eval(&self.root, properties)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl FromStr for PropertyFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PropertyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn eval(node: &Node, properties: &Properties) -> bool {
    match node {
        Node::And(nodes) => nodes.iter().all(|n| eval(n, properties)),
        Node::Or(nodes) => nodes.iter().any(|n| eval(n, properties)),
        Node::Not(node) => !eval(node, properties),
        Node::Present(key) => lookup(properties, key).is_some_and(|v| !v.is_null()),
        Node::Equal(key, expected) => lookup(properties, key).is_some_and(|v| value_matches(v, expected)),
    }
}

fn lookup<'a>(properties: &'a Properties, key: &str) -> Option<&'a Value> {
    properties
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

fn value_matches(value: &Value, expected: &str) -> bool {
    match value {
        Value::String(s) => s == expected,
        Value::Array(items) => items.iter().any(|item| value_matches(item, expected)),
        Value::Null => false,
        Value::Object(_) => false,
        other => other.to_string() == expected,
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), FilterError> {
        self.skip_whitespace();
        match self.peek() {
            Some(b) if b == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(FilterError::Expected {
                expected: expected as char,
                position: self.pos,
            }),
            None => Err(FilterError::UnexpectedEnd { position: self.pos }),
        }
    }

    fn filter(&mut self) -> Result<Node, FilterError> {
        self.expect(b'(')?;
        self.skip_whitespace();
        let node = match self.peek() {
            Some(b'&') => {
                self.pos += 1;
                Node::And(self.operands('&')?)
            }
            Some(b'|') => {
                self.pos += 1;
                Node::Or(self.operands('|')?)
            }
            Some(b'!') => {
                self.pos += 1;
                Node::Not(Box::new(self.filter()?))
            }
            Some(_) => self.item()?,
            None => return Err(FilterError::UnexpectedEnd { position: self.pos }),
        };
        self.expect(b')')?;
        Ok(node)
    }

    fn operands(&mut self, operator: char) -> Result<Vec<Node>, FilterError> {
        let position = self.pos;
        let mut nodes = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'(') {
                break;
            }
            nodes.push(self.filter()?);
        }
        if nodes.is_empty() {
            return Err(FilterError::EmptyComposite { operator, position });
        }
        Ok(nodes)
    }

    fn item(&mut self) -> Result<Node, FilterError> {
        let start = self.pos;
        let key_end = self.scan_until(b'=')?;
        let key = self.input[start..key_end].trim();
        if key.is_empty() {
            return Err(FilterError::MissingKey { position: start });
        }
        self.pos = key_end + 1;

        let value_start = self.pos;
        let value_end = self.scan_until(b')')?;
        let value = self.input[value_start..value_end].trim();
        self.pos = value_end;

        if value == "*" {
            Ok(Node::Present(key.to_string()))
        } else {
            Ok(Node::Equal(key.to_string(), value.to_string()))
        }
    }

    /// Find the next `delimiter`, rejecting nested parentheses on the way.
    fn scan_until(&self, delimiter: u8) -> Result<usize, FilterError> {
        let bytes = self.input.as_bytes();
        let mut i = self.pos;
        while let Some(&b) = bytes.get(i) {
            if b == delimiter {
                return Ok(i);
            }
            if b == b'(' || b == b')' || (delimiter == b')' && b == b'=') {
                return Err(FilterError::Unexpected {
                    found: b as char,
                    position: i,
                });
            }
            i += 1;
        }
        Err(FilterError::UnexpectedEnd { position: i })
    }
}
