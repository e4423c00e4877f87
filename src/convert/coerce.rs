//! Catalog-driven rewriting of INSERT values.
//!
//! For each INSERT whose target table has boolean or enum columns, every
//! tuple of the statement (on the header line or on continuation lines up to
//! the terminator) is split with the quote-aware scanner and the targeted
//! positions are rewritten:
//! - boolean columns: `0` → `FALSE`, `1` → `TRUE`
//! - enum columns: `''` → `NULL`
//!
//! The scan runs over the rewritten document, so literals follow standard
//! quoting (backslashes are plain characters). It stops at the first
//! top-level token after a tuple that is not a separating comma, which leaves
//! tails such as `ON DUPLICATE KEY UPDATE c = VALUES(c)` untouched.
//!
//! Tuples that cannot be balanced on their line are left alone and reported.

use super::catalog::SchemaCatalog;
use super::warnings::{ConvertWarning, WarningCollector};
use crate::parser::{find_closing_paren, find_open_paren, split_values, InsertHeader, Quoting};
use serde::Serialize;
use smallvec::SmallVec;

/// Rewrite applied at one value position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    Boolean,
    EnumNull,
}

/// Value positions of one INSERT that need rewriting, in column order.
pub type Positions = SmallVec<[(usize, Coercion); 8]>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoerceStats {
    /// INSERT statements with at least one targeted position
    pub inserts_coerced: usize,
    /// Individual values rewritten
    pub values_coerced: usize,
}

/// Resolve the positions to rewrite for an INSERT header.
///
/// Without an explicit column list the table's declared column order is used.
pub fn positions_for(header: &InsertHeader, catalog: &SchemaCatalog) -> Positions {
    let mut positions = Positions::new();
    let table = header.table.as_str();

    if !catalog.booleans.has_table(table) && !catalog.enums.has_table(table) {
        return positions;
    }

    let columns: &[String] = match (&header.columns, catalog.layout(table)) {
        (Some(explicit), _) => explicit.as_slice(),
        (None, Some(layout)) => layout,
        (None, None) => return positions,
    };

    for (i, column) in columns.iter().enumerate() {
        if catalog.booleans.contains(table, column) {
            positions.push((i, Coercion::Boolean));
        } else if catalog.enums.contains(table, column) {
            positions.push((i, Coercion::EnumNull));
        }
    }

    positions
}

/// Rewrite INSERT values across the document.
pub fn coerce_insert_values(
    lines: &mut [String],
    catalog: &SchemaCatalog,
    warnings: &mut WarningCollector,
) -> CoerceStats {
    let mut stats = CoerceStats::default();
    if catalog.is_empty() {
        return stats;
    }

    let mut active: Option<Positions> = None;

    for (idx, line) in lines.iter_mut().enumerate() {
        let line_no = idx + 1;

        if let Some(header) = InsertHeader::parse(line) {
            active = None;
            let positions = positions_for(&header, catalog);
            if positions.is_empty() {
                continue;
            }
            stats.inserts_coerced += 1;

            let (prefix, suffix) = line.split_at(header.values_end);
            let (rewritten, count) = coerce_tuples(suffix, &positions, line_no, warnings);
            if count > 0 {
                stats.values_coerced += count;
                *line = format!("{}{}", prefix, rewritten);
            }

            if !line.trim_end().ends_with(';') {
                active = Some(positions);
            }
            continue;
        }

        let Some(positions) = active.as_ref() else {
            continue;
        };

        let trimmed = line.trim();
        let ends_statement = trimmed.ends_with(';');

        if trimmed.starts_with('(') {
            let (rewritten, count) = coerce_tuples(line, positions, line_no, warnings);
            if count > 0 {
                stats.values_coerced += count;
                *line = rewritten;
            }
        }

        if ends_statement {
            active = None;
        }
    }

    stats
}

/// Rewrite every tuple in `text`; returns the new text and the number of values changed.
fn coerce_tuples(
    text: &str,
    positions: &[(usize, Coercion)],
    line_no: usize,
    warnings: &mut WarningCollector,
) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut changed = 0;
    let mut cursor = 0;

    // Every search starts outside a literal: just past a closed tuple.
    while let Some(open) =
        find_open_paren(&text[cursor..], 0, Quoting::Standard).map(|p| p + cursor)
    {
        let gap = &text[cursor..open];
        if !gap.bytes().all(|b| b == b',' || b.is_ascii_whitespace()) {
            break;
        }
        out.push_str(gap);

        let Some(close) = find_closing_paren(text, open, Quoting::Standard) else {
            warnings.add(ConvertWarning::structural(line_no, &text[open..]));
            out.push_str(&text[open..]);
            return (out, changed);
        };

        let mut values: SmallVec<[String; 16]> = split_values(&text[open + 1..close], Quoting::Standard)
            .into_iter()
            .map(String::from)
            .collect();

        for &(pos, kind) in positions {
            if let Some(value) = values.get_mut(pos) {
                if let Some(replacement) = coerce_value(value, kind) {
                    *value = replacement;
                    changed += 1;
                }
            }
        }

        out.push('(');
        out.push_str(&values.join(","));
        out.push(')');
        cursor = close + 1;
    }

    out.push_str(&text[cursor..]);
    (out, changed)
}

/// Coerce one raw value, keeping its surrounding whitespace.
fn coerce_value(raw: &str, kind: Coercion) -> Option<String> {
    let trimmed = raw.trim();
    let replacement = match (kind, trimmed) {
        (Coercion::Boolean, "0") => "FALSE",
        (Coercion::Boolean, "1") => "TRUE",
        (Coercion::EnumNull, "''") | (Coercion::EnumNull, "\"\"") => "NULL",
        _ => return None,
    };

    let lead = &raw[..raw.len() - raw.trim_start().len()];
    let trail = &raw[raw.trim_end().len()..];
    Some(format!("{}{}{}", lead, replacement, trail))
}
