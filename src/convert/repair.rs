//! Structural repair after clause commenting.
//!
//! Commenting out a key clause can leave the line before it ending in a
//! comma that now leads nowhere:
//!
//! ```sql
//! ALTER TABLE posts
//!   ADD PRIMARY KEY (id),
//! --   ADD KEY idx_user (user_id);
//! ```
//!
//! The comma becomes the terminator. Inside a table body the comma before
//! the closing `)` is dropped instead, and an `ALTER TABLE` header left with
//! no live clause is commented out as well.

use crate::parser;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static ALTER_CLAUSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:ADD|DROP|MODIFY|CHANGE|ALTER\s+COLUMN|RENAME)\s").unwrap()
});

static ALTER_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*ALTER\s+TABLE\s+\S+\s*$").unwrap());

static STATEMENT_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:CREATE|ALTER\s+TABLE|DROP\s+TABLE|INSERT|REPLACE|SET|LOCK|UNLOCK|COMMIT|START)\b")
        .unwrap()
});

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RepairStats {
    /// Trailing commas turned into `;`
    pub commas_terminated: usize,
    /// Trailing commas removed before a closing `)`
    pub commas_dropped: usize,
    /// `ALTER TABLE` headers commented out
    pub headers_commented: usize,
}

impl RepairStats {
    pub fn commas_repaired(&self) -> usize {
        self.commas_terminated + self.commas_dropped
    }
}

/// Fix dangling separators left by commented-out clauses.
pub fn repair_structure(lines: &mut [String]) -> RepairStats {
    let mut stats = RepairStats::default();

    for i in 0..lines.len() {
        let trimmed = lines[i].trim_end();
        if !trimmed.ends_with(',') || parser::is_comment(trimmed) || parser::is_data_line(trimmed) {
            continue;
        }

        let Some(next) = next_non_blank(lines, i + 1) else {
            continue;
        };

        if ALTER_CLAUSE_RE.is_match(trimmed) {
            if parser::is_comment(&lines[next]) {
                let resumes = next_live(lines, next)
                    .is_some_and(|k| ALTER_CLAUSE_RE.is_match(&lines[k]));
                if !resumes {
                    replace_trailing_comma(&mut lines[i], ";");
                    stats.commas_terminated += 1;
                }
            } else if parser::create_table_name(&lines[next]).is_some() {
                replace_trailing_comma(&mut lines[i], ";");
                stats.commas_terminated += 1;
            }
            continue;
        }

        if let Some(live) = next_live(lines, i + 1) {
            if lines[live].trim_start().starts_with(')') {
                replace_trailing_comma(&mut lines[i], "");
                stats.commas_dropped += 1;
            }
        }
    }

    for i in 0..lines.len() {
        if ALTER_HEADER_RE.is_match(&lines[i]) && !has_live_clause(lines, i + 1) {
            lines[i] = format!("-- {}", lines[i]);
            stats.headers_commented += 1;
        }
    }

    stats
}

fn next_non_blank(lines: &[String], from: usize) -> Option<usize> {
    (from..lines.len()).find(|&j| !parser::is_blank(&lines[j]))
}

/// Next line that is neither blank nor a comment.
fn next_live(lines: &[String], from: usize) -> Option<usize> {
    (from..lines.len()).find(|&j| !parser::is_blank(&lines[j]) && !parser::is_comment(&lines[j]))
}

/// Whether the statement opened by an ALTER TABLE header still has a live clause.
fn has_live_clause(lines: &[String], from: usize) -> bool {
    for line in &lines[from..] {
        if parser::is_blank(line) {
            continue;
        }
        if parser::is_comment(line) {
            if line.trim_end().ends_with(';') {
                return false;
            }
            continue;
        }
        return !STATEMENT_START_RE.is_match(line);
    }
    false
}

fn replace_trailing_comma(line: &mut String, with: &str) {
    let trimmed_len = line.trim_end().len();
    let tail = line[trimmed_len..].to_string();
    line.truncate(trimmed_len - 1);
    line.push_str(with);
    line.push_str(&tail);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Vec<String> {
        text.lines().map(String::from).collect()
    }

    #[test]
    fn test_comma_before_commented_key_terminates() {
        let mut lines = doc("ALTER TABLE posts\n  ADD PRIMARY KEY (id),\n--   ADD KEY idx_user (user_id);");
        let stats = repair_structure(&mut lines);

        assert_eq!(lines[1], "  ADD PRIMARY KEY (id);");
        assert_eq!(stats.commas_terminated, 1);
        assert_eq!(stats.headers_commented, 0);
    }

    #[test]
    fn test_comma_before_section_comment_terminates() {
        let mut lines = doc("ALTER TABLE a\n  ADD PRIMARY KEY (id),\n\n--\n-- Indexes for table b\n--\n");
        repair_structure(&mut lines);
        assert_eq!(lines[1], "  ADD PRIMARY KEY (id);");
    }

    #[test]
    fn test_comma_kept_when_live_clause_follows() {
        let mut lines = doc(
            "ALTER TABLE a\n  ADD PRIMARY KEY (id),\n--   ADD KEY k (x),\n  ADD UNIQUE (email);",
        );
        let stats = repair_structure(&mut lines);
        assert_eq!(lines[1], "  ADD PRIMARY KEY (id),");
        assert_eq!(stats.commas_repaired(), 0);
    }

    #[test]
    fn test_comma_before_create_table_terminates() {
        let mut lines = doc("ALTER TABLE a\n  ADD PRIMARY KEY (id),\nCREATE TABLE b (");
        repair_structure(&mut lines);
        assert_eq!(lines[1], "  ADD PRIMARY KEY (id);");
    }

    #[test]
    fn test_comma_dropped_before_closing_paren() {
        let mut lines = doc("CREATE TABLE t (\n  id INTEGER,\n  name TEXT,\n--   KEY idx (name)\n);");
        let stats = repair_structure(&mut lines);

        assert_eq!(lines[1], "  id INTEGER,");
        assert_eq!(lines[2], "  name TEXT");
        assert_eq!(stats.commas_dropped, 1);
    }

    #[test]
    fn test_fully_commented_alter_header() {
        let mut lines = doc("ALTER TABLE logs\n--   ADD KEY a (x),\n--   ADD KEY b (y);\n\nCREATE TABLE z (");
        let stats = repair_structure(&mut lines);
        assert_eq!(lines[0], "-- ALTER TABLE logs");
        assert_eq!(stats.headers_commented, 1);
    }

    #[test]
    fn test_live_alter_header_kept() {
        let mut lines = doc("ALTER TABLE logs\n  ADD PRIMARY KEY (id);");
        repair_structure(&mut lines);
        assert_eq!(lines[0], "ALTER TABLE logs");
    }

    #[test]
    fn test_result_is_well_formed() {
        let mut lines = doc(
            "ALTER TABLE posts\n  ADD PRIMARY KEY (id),\n  ADD UNIQUE (slug),\n--   ADD KEY a (b);",
        );
        repair_structure(&mut lines);

        let live: Vec<&String> = lines.iter().filter(|l| !parser::is_comment(l)).collect();
        let text = live.iter().map(|s| s.as_str()).collect::<Vec<_>>().join("\n");
        assert_eq!(text.matches(';').count(), 1);
        assert!(text.trim_end().ends_with(';'));
        assert_eq!(text.matches('(').count(), text.matches(')').count());
    }

    #[test]
    fn test_data_lines_untouched() {
        let mut lines = doc("INSERT INTO t VALUES\n(1, 'a'),\n-- note\n(2, 'b');");
        let stats = repair_structure(&mut lines);
        assert_eq!(lines[1], "(1, 'a'),");
        assert_eq!(stats, RepairStats::default());
    }
}
