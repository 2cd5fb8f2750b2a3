//! nenaconv - word-processor HTML to NENA markup

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use nenaconv::config::{ConfigTable, load_table};
use nenaconv::corpus::{ConvertOptions, convert_corpus, lint_file};

#[derive(Parser)]
#[command(name = "nenaconv")]
#[command(version, about = "Convert word-processor HTML texts to NENA markup", long_about = None)]
#[command(after_help = "EXAMPLES:
    nenaconv convert dialects/ -o nena/0.01     Convert every dialect
    nenaconv convert dialects/ --strict --dry-run
                                                Check a corpus without writing
    nenaconv lint nena/0.01/Barwar/*.nena       Check written texts")]
struct Cli {
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a corpus of <DIALECT>/*.html files
    Convert {
        /// Directory containing one subdirectory per dialect
        #[arg(value_name = "CORPUS")]
        corpus: PathBuf,

        /// Output directory; texts go to <OUT>/<dialect>/<title>.nena
        #[arg(short, long, value_name = "OUT", default_value = "nena")]
        output: PathBuf,

        /// Fail a file on its first diagnostic
        #[arg(long)]
        strict: bool,

        /// JSON document types, consulted before the built-in ones
        #[arg(long, value_name = "FILE")]
        config: Vec<PathBuf>,

        /// Write per-file diagnostics as JSON
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        /// Structure everything but write no texts
        #[arg(long)]
        dry_run: bool,
    },

    /// Check written .nena files for unbalanced markup
    Lint {
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    let result = match cli.command {
        Command::Convert {
            corpus,
            output,
            strict,
            config,
            report,
            dry_run,
        } => convert(&corpus, &output, strict, &config, report.as_deref(), dry_run),
        Command::Lint { files } => lint(&files),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every file converted.
fn convert(
    corpus: &Path,
    output: &Path,
    strict: bool,
    config_files: &[PathBuf],
    report_path: Option<&Path>,
    dry_run: bool,
) -> Result<bool, String> {
    let mut table = ConfigTable::new();
    for path in config_files {
        let loaded = load_table(path).map_err(|e| format!("{}: {e}", path.display()))?;
        table = table.then(loaded);
    }
    let table = table.then(ConfigTable::builtin().map_err(|e| e.to_string())?);

    let report = convert_corpus(corpus, &table, ConvertOptions { strict })
        .map_err(|e| format!("{}: {e}", corpus.display()))?;

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report.files).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| format!("{}: {e}", path.display()))?;
    }

    if dry_run {
        log::info!("dry run: {} text(s) not written", report.text_count());
    } else {
        let written = report.write(output).map_err(|e| e.to_string())?;
        log::info!("wrote {written} file(s) to {}", output.display());
    }

    Ok(report.failed_files().next().is_none())
}

/// Returns whether every file parsed.
fn lint(files: &[PathBuf]) -> Result<bool, String> {
    let mut clean = true;
    for path in files {
        match lint_file(path) {
            Ok(parsed) => log::debug!(
                "{}: {} field(s), {} paragraph(s)",
                path.display(),
                parsed.fields.len(),
                parsed.paragraphs.len()
            ),
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                clean = false;
            }
        }
    }
    Ok(clean)
}
