//! Line scanner: find the manufacturer table in pdftotext output and parse it.
//!
//! ## Shape of the input
//!
//! ```text
//!                 Table 1 – Manufacturer ID codes
//! Manufacturer                              Binary    Hex     Decimal  Country
//! Electronic Solutions Ulm GmbH           10010111   0x97       151   DE
//! Public Domain & Do-It-Yourself        00001101   0x0D        13
//! Decoders
//! S-9.2.2 Appendix A                  Revised: 12 July 2023          Page 2
//!                 Table 2 – ...
//! ```
//!
//! Everything before the `Table 1` line and from the `Table 2` line onward is
//! ignored, except that the first `Revised: <date>` seen anywhere up to the
//! end marker is captured. Rows are recognised by their trailing columns
//! because names contain digits, ampersands and dots freely.
//!
//! ## Known fidelity risk
//!
//! A table line that does not look like a row is assumed to be the wrapped
//! tail of the previous name (see [`append_continuation`]). That is right for
//! names like the one above, but a genuine row with an unexpected column
//! layout is silently glued onto its neighbour too. The count of such lines
//! is reported in [`ExtractionStats::continuations`] so it can be eyeballed
//! against the PDF after each update.

use crate::config::TableMarkers;
use crate::document::{ExtractionStats, ManufacturerRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

// name, binary code, hex code, decimal ID, optional country token
static RE_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*\S)\s+[0-9]+\s+0[xX][0-9A-F]{2}\s+(\d+)(?:\s+([A-Z/-]+))?$").unwrap()
});

static RE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:S-9\.2\.2|Manufacturer\s+Binary)").unwrap());

static RE_REVISION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Revised:\s+(\d{1,2}\s+\w+\s+\d{4})").unwrap());

/// Everything the scanner collected from one rendering.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub revision: Option<String>,
    pub manufacturers: Vec<ManufacturerRecord>,
    /// Counters only; `duration_ms` is left at zero for the caller to fill.
    pub stats: ExtractionStats,
}

/// What a trimmed line means before row parsing is attempted.
#[derive(Debug, PartialEq, Eq)]
enum LineKind {
    TableStart,
    TableEnd,
    /// Blank, page header or page footer.
    Boilerplate,
    Content,
}

fn classify(line: &str, markers: &TableMarkers) -> LineKind {
    if line.starts_with(&markers.start) {
        LineKind::TableStart
    } else if line.starts_with(&markers.end) {
        LineKind::TableEnd
    } else if line.is_empty() || RE_HEADER.is_match(line) {
        LineKind::Boilerplate
    } else {
        LineKind::Content
    }
}

/// Scan the full pdftotext output.
pub fn scan(text: &str, markers: &TableMarkers) -> ScanOutcome {
    let mut within_table = false;
    let mut revision: Option<String> = None;
    let mut manufacturers: Vec<ManufacturerRecord> = Vec::new();
    let mut stats = ExtractionStats::default();

    for raw in text.lines() {
        let line = raw.trim();
        stats.lines_scanned += 1;

        if revision.is_none() {
            revision = find_revision(line);
            if let Some(ref r) = revision {
                debug!("Found revision: {}", r);
            }
        }

        match classify(line, markers) {
            LineKind::TableStart => {
                within_table = true;
                stats.table_found = true;
            }
            LineKind::TableEnd => break,
            LineKind::Boilerplate => {}
            LineKind::Content if !within_table => {}
            LineKind::Content => match parse_row(line) {
                Some(record) => {
                    stats.rows += 1;
                    manufacturers.push(record);
                }
                None => append_continuation(&mut manufacturers, line, &mut stats),
            },
        }
    }

    if !stats.table_found {
        warn!("No line starting with '{}' found; manufacturer list is empty", markers.start);
    }

    ScanOutcome {
        revision,
        manufacturers,
        stats,
    }
}

/// Parse one trimmed table line into a record.
///
/// Returns `None` when the trailing columns are missing or the decimal ID
/// does not fit in a `u32`.
pub fn parse_row(line: &str) -> Option<ManufacturerRecord> {
    let caps = RE_ROW.captures(line)?;
    let id = caps[2].parse::<u32>().ok()?;
    let countries = caps
        .get(3)
        .map(|m| split_countries(m.as_str()))
        .unwrap_or_default();

    Some(ManufacturerRecord {
        id,
        name: caps[1].to_string(),
        countries,
    })
}

/// Split a country column such as `DE/AT` into codes; blank gives none.
///
/// Every `/`-separated piece is kept, so `DE/` yields `["DE", ""]`.
pub fn split_countries(token: &str) -> Vec<String> {
    if token.trim().is_empty() {
        return Vec::new();
    }
    token.split('/').map(str::to_string).collect()
}

/// Extract the date from a `Revised: 12 July 2023` footer, if present.
pub fn find_revision(line: &str) -> Option<String> {
    RE_REVISION.captures(line).map(|c| c[1].to_string())
}

/// Fallback for table lines that are not rows: treat them as a wrapped name.
///
/// This is a heuristic with no validation. A malformed row ends up inside
/// the previous manufacturer's name rather than being reported.
fn append_continuation(
    manufacturers: &mut [ManufacturerRecord],
    line: &str,
    stats: &mut ExtractionStats,
) {
    match manufacturers.last_mut() {
        Some(last) => {
            debug!("Continuation of '{}': '{}'", last.name, line);
            last.name.push(' ');
            last.name.push_str(line);
            stats.continuations += 1;
        }
        None => {
            warn!("Dropping table line before first row: '{}'", line);
            stats.orphaned_lines += 1;
        }
    }
}
