//! MySQL → PostgreSQL data type mapping.
//!
//! Handles:
//! - Integer types, width and signedness (TINYINT(1) → BOOLEAN, INT UNSIGNED → BIGINT, ...)
//! - Float types (DOUBLE → DOUBLE PRECISION, FLOAT → REAL)
//! - Date/time types (TIMESTAMP → TIMESTAMPTZ, DATETIME → TIMESTAMP)
//! - Binary types (BLOB variants, BINARY, VARBINARY → BYTEA)
//! - Text variants (TINYTEXT, MEDIUMTEXT, LONGTEXT → TEXT)
//! - SET('a','b') → TEXT
//!
//! The replacements run in a fixed order. Signed/unsigned variants with a
//! width must be consumed before the bare type patterns see them, and the
//! one-bit TINYINT must become BOOLEAN before the generic TINYINT rule.

use crate::parser::{find_closing_paren, split_values, Quoting};
use once_cell::sync::Lazy;
use regex::Regex;

/// Type mapper for the MySQL → PostgreSQL direction
pub struct TypeMapper;

impl TypeMapper {
    /// Map every MySQL type keyword in a run of SQL code (no string literals).
    pub fn mysql_to_postgres(code: &str) -> String {
        let mut result = code.to_string();

        // Integer types
        result = RE_TINYINT_BOOL.replace_all(&result, "BOOLEAN").to_string();
        result = RE_TINYINT_UNSIGNED.replace_all(&result, "SMALLINT").to_string();
        result = RE_TINYINT.replace_all(&result, "SMALLINT").to_string();
        result = RE_SMALLINT_UNSIGNED.replace_all(&result, "INTEGER").to_string();
        result = RE_SMALLINT.replace_all(&result, "SMALLINT").to_string();
        result = RE_MEDIUMINT.replace_all(&result, "INTEGER").to_string();
        result = RE_INT_UNSIGNED.replace_all(&result, "BIGINT").to_string();
        result = RE_INT.replace_all(&result, "INTEGER").to_string();
        result = RE_BIGINT.replace_all(&result, "BIGINT").to_string();

        // Float types
        result = RE_DOUBLE.replace_all(&result, "DOUBLE PRECISION").to_string();
        result = RE_FLOAT.replace_all(&result, "REAL").to_string();

        // Date/time types (TIMESTAMP first so DATETIME's output is left alone)
        result = RE_TIMESTAMP_NULL_DEFAULT
            .replace_all(&result, "TIMESTAMPTZ${1} DEFAULT NULL")
            .to_string();
        result = RE_TIMESTAMP.replace_all(&result, "TIMESTAMPTZ").to_string();
        result = RE_DATETIME.replace_all(&result, "TIMESTAMP").to_string();

        // Binary types
        result = RE_BLOB.replace_all(&result, "BYTEA").to_string();
        result = RE_VARBINARY.replace_all(&result, "BYTEA").to_string();
        result = RE_BINARY.replace_all(&result, "BYTEA").to_string();

        // Text types
        result = RE_TEXT_VARIANT.replace_all(&result, "TEXT").to_string();

        // Leftover modifiers (DECIMAL(10,2) UNSIGNED, FLOAT UNSIGNED, ...)
        result = RE_ZEROFILL.replace_all(&result, "").to_string();
        result = RE_UNSIGNED.replace_all(&result, "").to_string();

        result
    }

    /// Replace a MySQL `SET('a','b')` column type with TEXT.
    ///
    /// Works on a whole line because the member list is made of literals, read
    /// with standard quoting (the line has already had its escapes rewritten).
    pub fn set_type_to_text(line: &str) -> String {
        let mut result = String::with_capacity(line.len());
        let mut last = 0;
        let mut search_from = 0;

        while let Some(m) = RE_SET_OPEN.find_at(line, search_from) {
            let open = m.end() - 1;
            let Some(close) = find_closing_paren(line, open, Quoting::Standard) else {
                break;
            };
            let members = split_values(&line[open + 1..close], Quoting::Standard);
            let all_literals = !members.is_empty()
                && members.iter().all(|v| {
                    let v = v.trim();
                    v.len() >= 2 && v.starts_with('\'') && v.ends_with('\'')
                });
            if all_literals {
                result.push_str(&line[last..m.start()]);
                result.push_str("TEXT");
                last = close + 1;
            }
            search_from = close + 1;
        }

        if last == 0 {
            return line.to_string();
        }
        result.push_str(&line[last..]);
        result
    }
}

// Pre-compiled regexes for type matching
const WIDTH: &str = r"(?:\s*\(\s*\d+\s*\))?";

static RE_TINYINT_BOOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bTINYINT\s*\(\s*1\s*\)").unwrap());
static RE_TINYINT_UNSIGNED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\bTINYINT\b{}\s+UNSIGNED\b", WIDTH)).unwrap()
});
static RE_TINYINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)\bTINYINT\b{}", WIDTH)).unwrap());
static RE_SMALLINT_UNSIGNED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\bSMALLINT\b{}\s+UNSIGNED\b", WIDTH)).unwrap()
});
static RE_SMALLINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)\bSMALLINT\b{}", WIDTH)).unwrap());
static RE_MEDIUMINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\bMEDIUMINT\b{}(?:\s+UNSIGNED\b)?", WIDTH)).unwrap()
});
static RE_INT_UNSIGNED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:INT|INTEGER)\b{}\s+UNSIGNED\b", WIDTH)).unwrap()
});
static RE_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)\b(?:INT|INTEGER)\b{}", WIDTH)).unwrap());
static RE_BIGINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\bBIGINT\b{}(?:\s+UNSIGNED\b)?", WIDTH)).unwrap()
});

static RE_DOUBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bDOUBLE\b(?:\s+PRECISION\b)?(?:\s*\(\s*\d+\s*(?:,\s*\d+\s*)?\))?").unwrap()
});
static RE_FLOAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bFLOAT\b(?:\s*\(\s*\d+\s*(?:,\s*\d+\s*)?\))?").unwrap());

static RE_TIMESTAMP_NULL_DEFAULT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bTIMESTAMP\b(\s*\(\s*\d+\s*\))?\s+NULL\s+DEFAULT\s+NULL\b").unwrap()
});
static RE_TIMESTAMP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bTIMESTAMP\b").unwrap());
static RE_DATETIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bDATETIME\b").unwrap());

static RE_BLOB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:TINY|MEDIUM|LONG)?BLOB\b").unwrap());
static RE_VARBINARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)\bVARBINARY\b{}", WIDTH)).unwrap());
static RE_BINARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bBINARY\s*\(\s*\d+\s*\)").unwrap());

static RE_TEXT_VARIANT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:TINY|MEDIUM|LONG)TEXT\b").unwrap());

static RE_SET_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bSET\s*\(").unwrap());

static RE_UNSIGNED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+UNSIGNED\b").unwrap());
static RE_ZEROFILL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+ZEROFILL\b").unwrap());
