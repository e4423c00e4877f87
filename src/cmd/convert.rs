//! Convert command CLI handler.

use crate::convert::{self, ConvertConfig, ConvertOptions, ConvertStats};
use crate::source::Compression;
use std::path::PathBuf;

use super::glob_util::{expand_file_pattern, MultiFileResult};

pub struct ConvertArgs {
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub strict: bool,
    pub progress: bool,
    pub dry_run: bool,
    pub json: bool,
    pub fail_fast: bool,
}

pub fn run(args: ConvertArgs) -> anyhow::Result<()> {
    if args.json && args.output.is_none() && !args.dry_run {
        anyhow::bail!("--json needs --output (stdout carries the converted script)");
    }

    let options = ConvertOptions::load_or_default(args.config.as_deref())?;
    let expanded = expand_file_pattern(&args.file)?;

    if !expanded.pattern_was_glob {
        let Some(file) = expanded.files.into_iter().next() else {
            anyhow::bail!("no input file");
        };
        return run_single(file, &args, options);
    }

    let Some(output_dir) = args.output.clone() else {
        anyhow::bail!("Output directory required when using glob patterns. Use --output <dir>");
    };
    run_multi(expanded.files, output_dir, &args, options)
}

fn run_single(file: PathBuf, args: &ConvertArgs, options: ConvertOptions) -> anyhow::Result<()> {
    let config = ConvertConfig {
        input: file,
        output: args.output.clone(),
        options,
        dry_run: args.dry_run,
        progress: args.progress && !args.json,
        strict: args.strict,
    };

    let stats = convert::run(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_stats(&stats, args.dry_run, args.progress);
    }

    Ok(())
}

fn run_multi(
    files: Vec<PathBuf>,
    output_dir: PathBuf,
    args: &ConvertArgs,
    options: ConvertOptions,
) -> anyhow::Result<()> {
    let total = files.len();
    let mut result = MultiFileResult::new();
    result.total_files = total;

    if !args.dry_run {
        std::fs::create_dir_all(&output_dir)?;
    }

    eprintln!("Converting {} files to PostgreSQL...\n", total);

    let mut all_stats = Vec::with_capacity(total);

    for (idx, file) in files.iter().enumerate() {
        eprintln!("[{}/{}] Converting: {}", idx + 1, total, file.display());

        let file_size_mb = std::fs::metadata(file)
            .map(|m| m.len() as f64 / (1024.0 * 1024.0))
            .unwrap_or(0.0);

        let output_file = if args.dry_run {
            None
        } else {
            Some(output_dir.join(output_name(file, idx)))
        };

        let config = ConvertConfig {
            input: file.clone(),
            output: output_file.clone(),
            options: options.clone(),
            dry_run: args.dry_run,
            progress: false,
            strict: args.strict,
        };

        match convert::run(&config) {
            Ok(stats) => {
                let warning_str = if stats.warnings_total == 0 {
                    String::new()
                } else {
                    format!(" ({} warnings)", stats.warnings_total)
                };

                eprintln!(
                    "  {:.2} MB → {} lines, {} enum types, {} values coerced{}",
                    file_size_mb,
                    stats.lines_written,
                    stats.enum_types,
                    stats.values_coerced,
                    warning_str
                );

                if let Some(out) = output_file {
                    eprintln!("  → {}", out.display());
                }
                eprintln!();

                result.record_success();
                all_stats.push(stats);
            }
            Err(e) => {
                eprintln!("  Error: {}\n", e);
                result.record_failure(file.clone(), e.to_string());
                if args.fail_fast {
                    break;
                }
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&all_stats)?);
    }

    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!("Conversion Summary:");
    eprintln!("  Total files: {}", total);
    eprintln!("  Succeeded: {}", result.succeeded);
    eprintln!("  Failed: {}", result.failed);

    if result.has_failures() {
        eprintln!();
        eprintln!("Failed files:");
        for (path, error) in &result.errors {
            eprintln!("  - {}: {}", path.display(), error);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// `dumps/shop.sql.gz` → `shop.sql`
fn output_name(file: &std::path::Path, idx: usize) -> String {
    match file.file_name() {
        Some(name) => Compression::from_path(file).strip_extension(&name.to_string_lossy()),
        None => format!("output_{}.sql", idx),
    }
}

fn print_stats(stats: &ConvertStats, dry_run: bool, progress: bool) {
    if !progress && !dry_run {
        return;
    }

    eprintln!();
    eprintln!("Conversion Statistics:");
    eprintln!("  Lines read: {}", stats.lines_read);
    eprintln!("  Lines written: {}", stats.lines_written);
    eprintln!("  Lines rewritten: {}", stats.lines_rewritten);
    eprintln!("  Enum types: {}", stats.enum_types);
    eprintln!("  Tables with boolean columns: {}", stats.boolean_tables);
    eprintln!("  Tables with enum columns: {}", stats.enum_tables);
    eprintln!("  Tables dropped before create: {}", stats.tables_dropped);
    eprintln!(
        "  INSERT values coerced: {} (in {} statements)",
        stats.values_coerced, stats.inserts_coerced
    );
    eprintln!("  Separators repaired: {}", stats.commas_repaired);
    eprintln!("  ALTER headers commented: {}", stats.headers_commented);

    if stats.warnings_total > 0 {
        eprintln!();
        eprintln!("Warnings ({}):", stats.warnings_total);
        for warning in &stats.warnings {
            eprintln!("  ⚠ {}", warning);
        }
        if stats.warnings_total > stats.warnings.len() {
            eprintln!(
                "  ... ({} additional warnings truncated)",
                stats.warnings_total - stats.warnings.len()
            );
        }
    }

    if dry_run {
        eprintln!();
        eprintln!("(Dry run - no output written)");
    }
}
