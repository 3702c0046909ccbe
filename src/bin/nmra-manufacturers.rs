//! CLI binary for nmra-manufacturers.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractorConfig` and prints a summary.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use nmra_manufacturers::pipeline::output::to_json;
use nmra_manufacturers::{
    extract, extract_to_file, refresh_appendix, ExtractionStats, ExtractorConfig,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Regenerate lmrs/core/data/manufacturers.json from the checked-in PDF
  nmra-manufacturers

  # Download the latest appendix first, then regenerate
  nmra-manufacturers --refresh

  # Inspect the result without touching the repository
  nmra-manufacturers --stdout | less

  # Use a pdftotext from a custom location
  nmra-manufacturers --pdftotext /opt/poppler/bin/pdftotext

ENVIRONMENT VARIABLES:
  NMRA_INPUT        Appendix PDF path
  NMRA_OUTPUT       Output JSON path
  NMRA_PDFTOTEXT    Text-extraction program
  RUST_LOG          Overrides --verbose / --quiet log filtering

REQUIREMENTS:
  pdftotext from poppler-utils must be installed.
"#;

/// Extract the NMRA manufacturer ID table into JSON.
#[derive(Parser, Debug)]
#[command(
    name = "nmra-manufacturers",
    version,
    about = "Extract the NMRA S-9.2.2 Appendix A manufacturer table into JSON",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Appendix PDF to read.
    #[arg(short, long, env = "NMRA_INPUT", default_value = nmra_manufacturers::config::DEFAULT_INPUT)]
    input: PathBuf,

    /// JSON file to write (overwritten).
    #[arg(short, long, env = "NMRA_OUTPUT", default_value = nmra_manufacturers::config::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Text-extraction program, invoked as `<prog> -layout <pdf> -`.
    #[arg(long, env = "NMRA_PDFTOTEXT", default_value = "pdftotext")]
    pdftotext: String,

    /// Download the latest appendix from nmra.org before extracting.
    #[arg(long, env = "NMRA_REFRESH")]
    refresh: bool,

    /// HTTP timeout in seconds for --refresh.
    #[arg(long, env = "NMRA_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Print the JSON to stdout instead of writing the output file.
    #[arg(long)]
    stdout: bool,

    /// Enable DEBUG-level tracing logs (shows every continuation line).
    #[arg(short, long, env = "NMRA_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "NMRA_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = ExtractorConfig::builder()
        .input(&cli.input)
        .output(&cli.output)
        .pdftotext(&cli.pdftotext)
        .download_timeout_secs(cli.download_timeout)
        .build()
        .context("Invalid configuration")?;

    // ── Optional refresh ─────────────────────────────────────────────────
    if cli.refresh {
        let outcome = if cli.quiet {
            refresh_appendix(&config, None).await
        } else {
            let bar = download_bar();
            let progress = |downloaded: u64, total: Option<u64>| {
                if let Some(t) = total {
                    if bar.length().unwrap_or(0) != t {
                        bar.set_length(t);
                    }
                }
                bar.set_position(downloaded);
            };
            let outcome = refresh_appendix(&config, Some(&progress)).await;
            bar.finish_and_clear();
            outcome
        };
        let outcome = outcome.context("Failed to refresh the manufacturers appendix")?;

        if !cli.quiet {
            eprintln!(
                "{} {}  {}",
                if outcome.updated { green("✔") } else { dim("=") },
                if outcome.updated {
                    "Appendix updated"
                } else {
                    "Appendix unchanged"
                },
                dim(&outcome.url),
            );
        }
    }

    // ── Extraction (blocking: waits on pdftotext) ────────────────────────
    if cli.stdout {
        let (document, stats) = tokio::task::block_in_place(|| extract(&config))
            .context("Extraction failed")?;
        let json = to_json(&document).context("Failed to serialise output")?;
        io::stdout()
            .lock()
            .write_all(json.as_bytes())
            .context("Failed to write to stdout")?;
        if !cli.quiet {
            print_summary(&stats, None);
        }
    } else {
        let stats = tokio::task::block_in_place(|| extract_to_file(&config))
            .context("Extraction failed")?;
        if !cli.quiet {
            print_summary(&stats, Some(&cli.output));
        }
    }

    Ok(())
}

fn download_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {bytes}/{total_bytes}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    bar.set_prefix("Appendix A");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn print_summary(stats: &ExtractionStats, output: Option<&PathBuf>) {
    let mark = if stats.table_found && stats.orphaned_lines == 0 {
        green("✔")
    } else {
        cyan("⚠")
    };
    let target = output
        .map(|p| format!("  →  {}", bold(&p.display().to_string())))
        .unwrap_or_default();

    eprintln!(
        "{}  {} manufacturers  {}ms{}",
        mark, stats.rows, stats.duration_ms, target
    );
    if stats.continuations > 0 || stats.orphaned_lines > 0 {
        eprintln!(
            "   {} wrapped name lines joined  /  {} lines dropped",
            dim(&stats.continuations.to_string()),
            dim(&stats.orphaned_lines.to_string()),
        );
    }
}
