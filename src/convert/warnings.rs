//! Warning system for the convert command.
//!
//! Conversion never aborts on malformed input. Lines the passes cannot make
//! sense of are passed through and reported here instead.

use serde::Serialize;

/// Longest statement preview kept in a warning.
const PREVIEW_LEN: usize = 80;

/// Warning types that can occur during conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConvertWarning {
    /// A tuple or parenthesized list could not be closed on its line
    StructuralParse { line: usize, preview: String },
    /// A MySQL-only construct survived the rewrite pass
    UnrecognizedClause {
        line: usize,
        marker: String,
        preview: String,
    },
}

impl ConvertWarning {
    pub fn structural(line: usize, text: &str) -> Self {
        ConvertWarning::StructuralParse {
            line,
            preview: preview(text),
        }
    }

    pub fn unrecognized(line: usize, marker: &str, text: &str) -> Self {
        ConvertWarning::UnrecognizedClause {
            line,
            marker: marker.to_string(),
            preview: preview(text),
        }
    }
}

impl std::fmt::Display for ConvertWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertWarning::StructuralParse { line, preview } => {
                write!(f, "Line {}: unbalanced value list ({})", line, preview)
            }
            ConvertWarning::UnrecognizedClause {
                line,
                marker,
                preview,
            } => {
                write!(f, "Line {}: unconverted {} ({})", line, marker, preview)
            }
        }
    }
}

fn preview(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= PREVIEW_LEN {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(PREVIEW_LEN).collect();
    format!("{}...", cut)
}

/// Collects warnings during conversion
#[derive(Debug, Default)]
pub struct WarningCollector {
    warnings: Vec<ConvertWarning>,
    max_warnings: usize,
    total: usize,
}

impl WarningCollector {
    pub fn new() -> Self {
        Self::with_limit(100)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            warnings: Vec::new(),
            max_warnings: limit,
            total: 0,
        }
    }

    /// Add a warning. Every call is counted, only the first `limit` distinct ones are kept.
    pub fn add(&mut self, warning: ConvertWarning) {
        self.total += 1;
        if self.warnings.len() < self.max_warnings && !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    pub fn warnings(&self) -> &[ConvertWarning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        self.total > 0
    }

    /// Warnings stored
    pub fn count(&self) -> usize {
        self.warnings.len()
    }

    /// Warnings raised, including those past the limit
    pub fn total(&self) -> usize {
        self.total
    }

    /// Print summary of warnings
    pub fn print_summary(&self) {
        if self.warnings.is_empty() {
            return;
        }

        eprintln!("\nConversion warnings ({}):", self.total);
        for warning in &self.warnings {
            eprintln!("  ⚠ {}", warning);
        }

        if self.total > self.warnings.len() {
            eprintln!(
                "  ... ({} additional warnings truncated)",
                self.total - self.warnings.len()
            );
        }
    }
}
