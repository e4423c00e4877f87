//! Per-table column catalogs inferred from the rewritten schema.
//!
//! The builder walks CREATE TABLE bodies with a two-state machine (outside a
//! table / inside one) and records which columns ended up BOOLEAN and which
//! ended up as one of the synthetic enum types. Table and column names are
//! stored lower-cased, matching how PostgreSQL folds unquoted identifiers.

use super::enums::EnumCatalog;
use crate::parser;
use ahash::{AHashMap, AHashSet};
use once_cell::sync::Lazy;
use regex::Regex;

static COLUMN_DEF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"?([A-Za-z_][\w$]*)"?\s+(\S+)"#).unwrap());

/// Table name → set of column names. Never holds an empty set.
#[derive(Debug, Default, Clone)]
pub struct ColumnCatalog {
    tables: AHashMap<String, AHashSet<String>>,
}

impl ColumnCatalog {
    fn set(&mut self, table: &str, columns: AHashSet<String>) {
        if columns.is_empty() {
            self.tables.remove(table);
        } else {
            self.tables.insert(table.to_string(), columns);
        }
    }

    pub fn contains(&self, table: &str, column: &str) -> bool {
        self.tables
            .get(&table.to_lowercase())
            .is_some_and(|cols| cols.contains(&column.to_lowercase()))
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(&table.to_lowercase())
    }

    /// Number of tables with at least one column.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Boolean and enum column catalogs, plus the column order of every table
/// that appears in either.
#[derive(Debug, Default, Clone)]
pub struct SchemaCatalog {
    pub booleans: ColumnCatalog,
    pub enums: ColumnCatalog,
    layouts: AHashMap<String, Vec<String>>,
}

/// Scan state for the table body currently open.
struct TableScan {
    name: String,
    columns: Vec<String>,
    booleans: AHashSet<String>,
    enums: AHashSet<String>,
}

impl TableScan {
    fn new(name: &str) -> Self {
        Self {
            name: name.trim_end_matches('(').to_lowercase(),
            columns: Vec::new(),
            booleans: AHashSet::new(),
            enums: AHashSet::new(),
        }
    }
}

impl SchemaCatalog {
    /// Build the catalogs from the rewritten (and enum-substituted) document.
    pub fn build(lines: &[String], enum_catalog: &EnumCatalog) -> Self {
        let mut catalog = Self::default();
        let mut current: Option<TableScan> = None;

        for line in lines {
            let trimmed = line.trim();

            if let Some(name) = parser::create_table_name(trimmed) {
                if let Some(scan) = current.take() {
                    catalog.finish(scan);
                }
                let scan = TableScan::new(&name);
                if trimmed.ends_with(';') {
                    catalog.finish(scan);
                } else {
                    current = Some(scan);
                }
                continue;
            }

            if current.is_none() {
                continue;
            }

            if trimmed.starts_with(')') {
                if let Some(scan) = current.take() {
                    catalog.finish(scan);
                }
                continue;
            }

            if trimmed.is_empty() || parser::is_comment(trimmed) || parser::is_structural_clause(trimmed) {
                continue;
            }

            let Some(scan) = current.as_mut() else {
                continue;
            };
            let Some(caps) = COLUMN_DEF_RE.captures(trimmed) else {
                continue;
            };
            let (Some(name), Some(type_token)) = (caps.get(1), caps.get(2)) else {
                continue;
            };

            let column = name.as_str().to_lowercase();
            let type_name = base_type(type_token.as_str());

            if type_name.eq_ignore_ascii_case("BOOLEAN") {
                scan.booleans.insert(column.clone());
            } else if enum_catalog.is_type_name(type_name) {
                scan.enums.insert(column.clone());
            }
            scan.columns.push(column);
        }

        if let Some(scan) = current.take() {
            catalog.finish(scan);
        }

        catalog
    }

    fn finish(&mut self, scan: TableScan) {
        let relevant = !scan.booleans.is_empty() || !scan.enums.is_empty();
        self.booleans.set(&scan.name, scan.booleans);
        self.enums.set(&scan.name, scan.enums);
        if relevant {
            self.layouts.insert(scan.name, scan.columns);
        } else {
            self.layouts.remove(&scan.name);
        }
    }

    /// Declared column order, for inserts that omit the column list.
    pub fn layout(&self, table: &str) -> Option<&[String]> {
        self.layouts.get(&table.to_lowercase()).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.booleans.is_empty() && self.enums.is_empty()
    }
}

/// `BOOLEAN,` → `BOOLEAN`; `varchar(10)` → `varchar`
fn base_type(token: &str) -> &str {
    let token = token.trim_end_matches(',');
    match token.find('(') {
        Some(idx) => &token[..idx],
        None => token,
    }
}
