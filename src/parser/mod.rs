//! Line classification shared by the conversion passes.
//!
//! The converter never builds an AST. Each pass looks at one line at a time
//! and only needs to know which table a CREATE TABLE or INSERT line names,
//! and whether the line is a comment, row data or a key clause.

pub mod scanner;

use once_cell::sync::Lazy;
use regex::Regex;

pub use scanner::{
    find_closing_paren, find_open_paren, map_code, segments, split_values, Quoting, ScanState, Segment,
};

static CREATE_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^\s*CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?[`"]?([^\s`"(]+)[`"]?"#)
        .unwrap()
});

static INSERT_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^\s*(?:INSERT|REPLACE)(?:\s+IGNORE)?\s+INTO\s+[`"]?([^\s`"(]+)[`"]?\s*(?:\(([^)]*)\))?\s*VALUES\b"#,
    )
    .unwrap()
});

// `KEY`/`INDEX` only count with a column list, so columns named `key` or
// `index` (`key INTEGER`, `index int(11)`) stay column definitions.
static STRUCTURAL_CLAUSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^(PRIMARY\s+KEY|UNIQUE\s+KEY|UNIQUE\s+INDEX|UNIQUE\s*\(|(?:KEY|INDEX)\b\s*(?:[`"]?\w+[`"]?\s*)?\(\s*[`"]?[A-Za-z_]|CONSTRAINT\s|FOREIGN\s+KEY|FULLTEXT\s|SPATIAL\s|CHECK\s*\()"#,
    )
    .unwrap()
});

/// Table name of a `CREATE TABLE` opener line, unquoted.
pub fn create_table_name(line: &str) -> Option<String> {
    CREATE_TABLE_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// The part of an INSERT statement that precedes its value tuples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertHeader {
    /// Target table, unquoted, as written.
    pub table: String,
    /// Explicit column list, unquoted and trimmed; `None` when omitted.
    pub columns: Option<Vec<String>>,
    /// Byte offset just past the `VALUES` keyword.
    pub values_end: usize,
}

impl InsertHeader {
    pub fn parse(line: &str) -> Option<Self> {
        let caps = INSERT_HEADER_RE.captures(line)?;
        let table = caps.get(1)?.as_str().to_string();
        let columns = caps.get(2).map(|m| {
            m.as_str()
                .split(',')
                .map(|c| c.trim().trim_matches('`').trim_matches('"').to_string())
                .collect()
        });
        let values_end = caps.get(0)?.end();

        Some(Self {
            table,
            columns,
            values_end,
        })
    }
}

/// `--` comment line (after leading whitespace).
#[inline]
pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with("--")
}

#[inline]
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Key, index or constraint line inside a table body.
pub fn is_structural_clause(line: &str) -> bool {
    STRUCTURAL_CLAUSE_RE.is_match(line.trim_start())
}

/// Lines carrying row data: INSERT/REPLACE headers and tuple continuations.
pub fn is_data_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    if trimmed.starts_with('(') {
        return true;
    }
    let head: String = trimmed
        .chars()
        .take(7)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    head.starts_with("INSERT") || head.starts_with("REPLACE")
}
