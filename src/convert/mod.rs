//! MySQL/MariaDB dump → PostgreSQL script conversion.
//!
//! The whole dump is held in memory as a line vector and transformed by a
//! fixed sequence of passes:
//!
//! 1. enum cataloging over the raw text
//! 2. line rewriting ([`rules`])
//! 3. enum substitution
//! 4. structural repair
//! 5. schema catalog over the rewritten lines
//! 6. INSERT value coercion
//! 7. assembly (drops, enum declarations, session wrapper)
//!
//! Nothing is written until the final document exists.

pub mod assemble;
pub mod catalog;
pub mod coerce;
pub mod config;
pub mod enums;
pub mod repair;
pub mod rules;
pub mod types;
pub mod warnings;

use crate::parser::{self, segments, Quoting, Segment};
use crate::source;
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

pub use catalog::{ColumnCatalog, SchemaCatalog};
pub use coerce::{CoerceStats, Coercion};
pub use config::ConvertOptions;
pub use enums::{EnumCatalog, EnumDefinition};
pub use repair::RepairStats;
pub use rules::{rewrite_line, RuleSet};
pub use types::TypeMapper;
pub use warnings::{ConvertWarning, WarningCollector};

/// MySQL-only constructs that should not survive a conversion.
static RESIDUAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)/\*!|\bENGINE\s*=|\bUNSIGNED\b|\bAUTO_INCREMENT\b|\bLOCK\s+TABLES\b|\benum\s*\(")
        .unwrap()
});

/// Configuration for the convert command
#[derive(Debug, Default)]
pub struct ConvertConfig {
    /// Input SQL file
    pub input: PathBuf,
    /// Output SQL file (None for stdout)
    pub output: Option<PathBuf>,
    /// Conversion options (YAML config or defaults)
    pub options: ConvertOptions,
    /// Dry run mode
    pub dry_run: bool,
    /// Show progress
    pub progress: bool,
    /// Strict mode (fail on any warning)
    pub strict: bool,
}

/// Statistics from convert operation
#[derive(Debug, Default, Clone, Serialize)]
pub struct ConvertStats {
    pub lines_read: usize,
    pub lines_written: usize,
    /// Input lines changed by rewriting, substitution, repair or coercion
    pub lines_rewritten: usize,
    pub enum_types: usize,
    pub boolean_tables: usize,
    pub enum_tables: usize,
    pub tables_dropped: usize,
    pub inserts_coerced: usize,
    pub values_coerced: usize,
    pub commas_repaired: usize,
    pub headers_commented: usize,
    pub warnings_total: usize,
    pub warnings: Vec<String>,
}

/// Pipeline stage, reported to the progress spinner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CatalogEnums,
    Rewrite,
    SubstituteEnums,
    Repair,
    CatalogColumns,
    CoerceValues,
    Assemble,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Stage::CatalogEnums => "Cataloging enum types...",
            Stage::Rewrite => "Rewriting lines...",
            Stage::SubstituteEnums => "Substituting enum types...",
            Stage::Repair => "Repairing dangling separators...",
            Stage::CatalogColumns => "Cataloging boolean and enum columns...",
            Stage::CoerceValues => "Coercing INSERT values...",
            Stage::Assemble => "Assembling output...",
        };
        f.write_str(msg)
    }
}

/// Result of an in-memory conversion.
#[derive(Debug)]
pub struct Converted {
    pub text: String,
    pub stats: ConvertStats,
    pub warnings: WarningCollector,
}

/// The in-memory conversion pipeline.
pub struct Converter {
    options: ConvertOptions,
    rules: RuleSet,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        let rules = RuleSet::new(&options);
        Self { options, rules }
    }

    /// Convert a whole dump.
    pub fn convert(&self, content: &str) -> Converted {
        self.convert_with_progress(content, |_| {})
    }

    /// Convert a whole dump, calling `on_stage` as each pass starts.
    pub fn convert_with_progress<F>(&self, content: &str, mut on_stage: F) -> Converted
    where
        F: FnMut(Stage),
    {
        let mut stats = ConvertStats::default();
        let mut warnings = WarningCollector::new();

        on_stage(Stage::CatalogEnums);
        let enum_catalog = EnumCatalog::extract(content, &self.options.enum_type_prefix);
        stats.enum_types = enum_catalog.len();

        on_stage(Stage::Rewrite);
        let mut lines: Vec<String> = content.lines().map(|l| self.rules.rewrite(l)).collect();
        stats.lines_read = lines.len();

        on_stage(Stage::SubstituteEnums);
        enum_catalog.substitute(&mut lines);

        on_stage(Stage::Repair);
        let repair = repair::repair_structure(&mut lines);
        stats.commas_repaired = repair.commas_repaired();
        stats.headers_commented = repair.headers_commented;

        for (idx, line) in lines.iter().enumerate() {
            if let Some(marker) = residual_marker(line) {
                warnings.add(ConvertWarning::unrecognized(idx + 1, &marker, line));
            }
        }

        on_stage(Stage::CatalogColumns);
        let schema = SchemaCatalog::build(&lines, &enum_catalog);
        stats.boolean_tables = schema.booleans.len();
        stats.enum_tables = schema.enums.len();

        on_stage(Stage::CoerceValues);
        let coerced = coerce::coerce_insert_values(&mut lines, &schema, &mut warnings);
        stats.inserts_coerced = coerced.inserts_coerced;
        stats.values_coerced = coerced.values_coerced;

        stats.lines_rewritten = content
            .lines()
            .zip(lines.iter())
            .filter(|(before, after)| *before != after.as_str())
            .count();

        on_stage(Stage::Assemble);
        if self.options.drop_tables {
            stats.tables_dropped = assemble::insert_drop_statements(&mut lines);
        }
        assemble::inject_enum_declarations(&mut lines, &enum_catalog);
        if self.options.session_preamble {
            assemble::wrap_session(&mut lines);
        }

        stats.lines_written = lines.len();
        stats.warnings_total = warnings.total();
        stats.warnings = warnings.warnings().iter().map(|w| w.to_string()).collect();

        Converted {
            text: assemble::render(&lines),
            stats,
            warnings,
        }
    }
}

/// First MySQL-only marker left in the code part of a live schema line.
fn residual_marker(line: &str) -> Option<String> {
    if parser::is_comment(line) || parser::is_data_line(line) {
        return None;
    }
    segments(line, Quoting::Standard).into_iter().find_map(|segment| match segment {
        Segment::Code(code) => RESIDUAL_RE
            .find(code)
            .map(|m| m.as_str().to_uppercase()),
        Segment::Literal(_) => None,
    })
}

/// Run the convert command
pub fn run(config: &ConvertConfig) -> anyhow::Result<ConvertStats> {
    let content = source::read_dump(&config.input, config.progress)?;

    let spinner = if config.progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let converter = Converter::new(config.options.clone());
    let converted = converter.convert_with_progress(&content, |stage| {
        if let Some(ref pb) = spinner {
            pb.set_message(stage.to_string());
        }
    });
    drop(content);

    if let Some(pb) = spinner {
        pb.finish_with_message(format!("Converted {} lines", converted.stats.lines_read));
    }

    if config.strict && converted.warnings.has_warnings() {
        converted.warnings.print_summary();
        anyhow::bail!(
            "Strict mode: {} warning(s) in {}; no output written",
            converted.warnings.total(),
            config.input.display()
        );
    }

    if !config.dry_run {
        write_output(config, &converted.text)?;
    }

    Ok(converted.stats)
}

/// Write the document atomically (temp file + rename), or to stdout.
fn write_output(config: &ConvertConfig, text: &str) -> anyhow::Result<()> {
    let Some(path) = &config.output else {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(text.as_bytes())?;
        handle.flush()?;
        return Ok(());
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(text.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;

    Ok(())
}
