mod convert;
mod enums;
mod glob_util;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mysql2pg")]
#[command(version)]
#[command(about = "Convert MySQL/MariaDB dumps into PostgreSQL scripts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a MySQL/MariaDB dump into a PostgreSQL script
    Convert {
        /// Input SQL file or glob pattern (e.g., *.sql, dumps/**/*.sql)
        /// Supports .gz, .bz2, .xz, .zst compression
        file: PathBuf,

        /// Output SQL file or directory (default: stdout for single file, required for glob)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// YAML file with conversion options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Strict mode: fail (and write nothing) on any conversion warning
        #[arg(long)]
        strict: bool,

        /// Show progress during conversion
        #[arg(short, long)]
        progress: bool,

        /// Preview without writing files (dry run)
        #[arg(long)]
        dry_run: bool,

        /// Print statistics as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Stop on first file that fails (for glob patterns)
        #[arg(long)]
        fail_fast: bool,
    },

    /// List the enum types a dump would produce
    Enums {
        /// Input SQL file (supports .gz, .bz2, .xz, .zst compression)
        file: PathBuf,

        /// YAML file with conversion options (for the type name prefix)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Convert {
            file,
            output,
            config,
            strict,
            progress,
            dry_run,
            json,
            fail_fast,
        } => convert::run(convert::ConvertArgs {
            file,
            output,
            config,
            strict,
            progress,
            dry_run,
            json,
            fail_fast,
        }),
        Commands::Enums { file, config, json } => enums::run(file, config, json),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "mysql2pg", &mut io::stdout());
            Ok(())
        }
    }
}
