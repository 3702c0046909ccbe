//! Extraction entry points.
//!
//! [`extract`] runs the whole pipeline and returns the document in memory;
//! [`extract_to_file`] additionally writes it to the configured output path.
//! [`extract_from_text`] skips the external tool, for callers that already
//! hold the rendered text.

use crate::config::ExtractorConfig;
use crate::document::{ExtractionStats, ManufacturerDocument};
use crate::error::ExtractError;
use crate::pipeline::{input, output, scan, text};
use std::time::Instant;
use tracing::{info, warn};

/// Extract the manufacturer table from `config.input`.
///
/// # Errors
/// Returns `Err(ExtractError)` only for fatal errors:
/// - input missing, unreadable or not a PDF
/// - pdftotext missing, failing, or emitting non-UTF-8 text
///
/// A PDF without the table is not an error: the document has no
/// manufacturers and `stats.table_found` is false.
pub fn extract(
    config: &ExtractorConfig,
) -> Result<(ManufacturerDocument, ExtractionStats), ExtractError> {
    let start = Instant::now();
    info!("Extracting manufacturers from {}", config.input.display());

    // ── Step 1: Validate input ───────────────────────────────────────────
    let pdf_path = input::resolve_pdf(&config.input)?;

    // ── Step 2: Render to text ───────────────────────────────────────────
    let rendered = text::render_text(&config.pdftotext, &pdf_path)?;

    // ── Step 3: Scan ─────────────────────────────────────────────────────
    let (document, mut stats) = extract_from_text(&rendered, config);
    stats.duration_ms = start.elapsed().as_millis() as u64;

    info!(
        "Extracted {} manufacturers ({} continuation lines) in {}ms",
        stats.rows, stats.continuations, stats.duration_ms
    );
    Ok((document, stats))
}

/// Extract and write the document to `config.output`.
pub fn extract_to_file(config: &ExtractorConfig) -> Result<ExtractionStats, ExtractError> {
    let (document, stats) = extract(config)?;
    output::write_document(&document, &config.output)?;
    info!("Wrote {}", config.output.display());
    Ok(stats)
}

/// Build the document from text already rendered by pdftotext.
pub fn extract_from_text(
    rendered: &str,
    config: &ExtractorConfig,
) -> (ManufacturerDocument, ExtractionStats) {
    let outcome = scan::scan(rendered, &config.markers);

    if outcome.revision.is_none() {
        warn!("No 'Revised: <date>' line found; $revision will be omitted");
    }

    let document = ManufacturerDocument {
        origin: config.origin.clone(),
        title: config.title.clone(),
        revision: outcome.revision,
        manufacturers: outcome.manufacturers,
    };
    (document, outcome.stats)
}
