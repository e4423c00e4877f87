//! Enum type cataloging and substitution.
//!
//! MySQL declares enumerations inline (`status enum('a','b')`), PostgreSQL
//! needs a named type declared up front. The catalog is built from the raw
//! dump, one entry per distinct value list in first-seen order, and the
//! substitution pass later swaps every inline constructor in the rewritten
//! document for the cataloged type name.
//!
//! Both passes key entries by the decoded values, so `'it\'s'` in the raw dump
//! and `'it''s'` in the rewritten document land on the same entry.

use crate::parser::{self, find_closing_paren, split_values, Quoting};
use ahash::AHashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};

static ENUM_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\benum\s*\(").unwrap());

/// Separator used when joining decoded values into a catalog key.
const KEY_SEPARATOR: char = '\u{1f}';

/// One distinct enumeration and the synthetic type that replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDefinition {
    pub type_name: String,
    pub values: Vec<String>,
}

impl EnumDefinition {
    /// `CREATE TYPE ... AS ENUM (...)` with values re-quoted for PostgreSQL.
    pub fn create_statement(&self) -> String {
        let values: Vec<String> = self
            .values
            .iter()
            .map(|v| format!("'{}'", v.replace('\'', "''")))
            .collect();
        format!(
            "CREATE TYPE {} AS ENUM ({});",
            self.type_name,
            values.join(", ")
        )
    }

    pub fn drop_statement(&self) -> String {
        format!("DROP TYPE IF EXISTS {} CASCADE;", self.type_name)
    }
}

/// Distinct enum definitions of a dump, in first-seen order.
#[derive(Debug, Default)]
pub struct EnumCatalog {
    definitions: Vec<EnumDefinition>,
    by_key: AHashMap<String, usize>,
}

/// An inline enum constructor found on a line.
#[derive(Debug)]
struct EnumSpan {
    start: usize,
    end: usize,
    values: Vec<String>,
}

impl EnumCatalog {
    /// Catalog every enum declared in the raw dump.
    pub fn extract(content: &str, type_prefix: &str) -> Self {
        let mut catalog = Self::default();

        for line in content.lines() {
            if parser::is_comment(line) || parser::is_data_line(line) {
                continue;
            }
            for span in find_enum_spans(line, Quoting::MySql) {
                catalog.insert(span.values, type_prefix);
            }
        }

        catalog
    }

    fn insert(&mut self, values: Vec<String>, type_prefix: &str) {
        let key = canonical_key(&values);
        if self.by_key.contains_key(&key) {
            return;
        }
        let type_name = type_name_for(&key, type_prefix);
        self.by_key.insert(key, self.definitions.len());
        self.definitions.push(EnumDefinition { type_name, values });
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn definitions(&self) -> &[EnumDefinition] {
        &self.definitions
    }

    /// Look up the definition for an exact (ordered) value list.
    pub fn get(&self, values: &[String]) -> Option<&EnumDefinition> {
        self.by_key
            .get(&canonical_key(values))
            .map(|&idx| &self.definitions[idx])
    }

    /// True when `name` is one of the synthetic type names (case-insensitive).
    pub fn is_type_name(&self, name: &str) -> bool {
        self.definitions
            .iter()
            .any(|d| d.type_name.eq_ignore_ascii_case(name))
    }

    /// `DROP TYPE` / `CREATE TYPE` pairs for every entry, first-seen order.
    pub fn declarations(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.definitions.len() * 2);
        for def in &self.definitions {
            out.push(def.drop_statement());
            out.push(def.create_statement());
        }
        out
    }

    /// Replace inline constructors on one rewritten line. `None` when nothing changed.
    pub fn substitute_line(&self, line: &str) -> Option<String> {
        if self.is_empty() || parser::is_comment(line) || parser::is_data_line(line) {
            return None;
        }

        let spans = find_enum_spans(line, Quoting::Standard);
        if spans.is_empty() {
            return None;
        }

        let mut result = String::with_capacity(line.len());
        let mut last = 0;
        let mut changed = false;

        for span in spans {
            if let Some(def) = self.get(&span.values) {
                result.push_str(&line[last..span.start]);
                result.push_str(&def.type_name);
                last = span.end;
                changed = true;
            }
        }

        if !changed {
            return None;
        }
        result.push_str(&line[last..]);
        Some(result)
    }

    /// Substitution pass over the whole document; returns lines changed.
    pub fn substitute(&self, lines: &mut [String]) -> usize {
        let mut changed = 0;
        for line in lines.iter_mut() {
            if let Some(replaced) = self.substitute_line(line) {
                *line = replaced;
                changed += 1;
            }
        }
        changed
    }
}

fn canonical_key(values: &[String]) -> String {
    let mut key = String::new();
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            key.push(KEY_SEPARATOR);
        }
        key.push_str(v);
    }
    key
}

fn type_name_for(key: &str, prefix: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    let hex = hex::encode(digest);
    format!("{}{}", prefix, &hex[..8])
}

fn find_enum_spans(line: &str, quoting: Quoting) -> Vec<EnumSpan> {
    let mut spans = Vec::new();
    let mut search_from = 0;

    while let Some(m) = ENUM_OPEN_RE.find_at(line, search_from) {
        let open = m.end() - 1;
        let Some(close) = find_closing_paren(line, open, quoting) else {
            break;
        };

        if let Some(values) = decode_value_list(&line[open + 1..close], quoting) {
            spans.push(EnumSpan {
                start: m.start(),
                end: close + 1,
                values,
            });
        }
        search_from = close + 1;
    }

    spans
}

/// Decode `'a','b'` into its values; `None` if any item is not a quoted literal.
fn decode_value_list(inner: &str, quoting: Quoting) -> Option<Vec<String>> {
    let items = split_values(inner, quoting);
    if items.is_empty() {
        return None;
    }

    let mut values = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if item.len() < 2 || !item.starts_with('\'') || !item.ends_with('\'') {
            return None;
        }
        values.push(decode_literal(&item[1..item.len() - 1], quoting));
    }
    Some(values)
}

fn decode_literal(body: &str, quoting: Quoting) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                out.push('\'');
            }
            '\\' if quoting == Quoting::MySql => match chars.peek() {
                Some(&'\\') | Some(&'\'') | Some(&'"') => {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                _ => out.push(c),
            },
            _ => out.push(c),
        }
    }

    out
}
