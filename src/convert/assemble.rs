//! Final document assembly: drop statements, enum declarations, session wrapper.

use super::enums::EnumCatalog;
use crate::parser;

/// Title of the injected enum declaration block.
pub const ENUM_BLOCK_TITLE: &str = "-- Enum type declarations";

const PREAMBLE: &[&str] = &[
    "-- Preamble for PostgreSQL import",
    "SET client_encoding = 'UTF8';",
    "SET standard_conforming_strings = on;",
    "SET session_replication_role = 'replica';",
    "",
];

const EPILOGUE: &[&str] = &[
    "",
    "-- Restore session settings",
    "SET session_replication_role = 'origin';",
];

/// Put `DROP TABLE IF EXISTS <t> CASCADE;` before every CREATE TABLE line.
pub fn insert_drop_statements(lines: &mut Vec<String>) -> usize {
    let mut out = Vec::with_capacity(lines.len() + 64);
    let mut inserted = 0;

    for line in lines.drain(..) {
        if let Some(table) = parser::create_table_name(&line) {
            out.push(format!("DROP TABLE IF EXISTS {} CASCADE;", table));
            inserted += 1;
        }
        out.push(line);
    }

    *lines = out;
    inserted
}

/// Where the enum block goes: after the first `SET timezone` line and any
/// blank lines following it, otherwise at the top.
fn enum_anchor(lines: &[String]) -> usize {
    let Some(anchor) = lines
        .iter()
        .position(|l| l.contains("SET timezone") && !parser::is_comment(l))
    else {
        return 0;
    };

    let mut idx = anchor + 1;
    while idx < lines.len() && parser::is_blank(&lines[idx]) {
        idx += 1;
    }
    idx
}

/// Inject the `DROP TYPE`/`CREATE TYPE` block. Returns false when there is nothing to inject.
pub fn inject_enum_declarations(lines: &mut Vec<String>, catalog: &EnumCatalog) -> bool {
    if catalog.is_empty() {
        return false;
    }

    let mut block = vec![
        String::new(),
        "--".to_string(),
        ENUM_BLOCK_TITLE.to_string(),
        "--".to_string(),
        String::new(),
    ];
    block.extend(catalog.declarations());
    block.push(String::new());

    let at = enum_anchor(lines);
    lines.splice(at..at, block);
    true
}

/// Surround the document with the session preamble and epilogue.
pub fn wrap_session(lines: &mut Vec<String>) {
    lines.splice(0..0, PREAMBLE.iter().map(|s| s.to_string()));
    lines.extend(EPILOGUE.iter().map(|s| s.to_string()));
}

/// Join lines into the output text, newline-terminated.
pub fn render(lines: &[String]) -> String {
    let size: usize = lines.iter().map(|l| l.len() + 1).sum();
    let mut out = String::with_capacity(size);
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}
