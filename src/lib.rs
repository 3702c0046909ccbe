//! # nmra-manufacturers
//!
//! Extract the manufacturer ID table from the NMRA S-9.2.2 Appendix A PDF
//! into a JSON lookup file.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 0. Refresh  optionally download the latest appendix (--refresh)
//!  ├─ 1. Input    check the local file is a readable PDF
//!  ├─ 2. Text     pdftotext -layout <pdf> -
//!  ├─ 3. Scan     find Table 1, parse rows, join wrapped names
//!  └─ 4. Output   indented JSON document
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nmra_manufacturers::{extract_to_file, ExtractorConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractorConfig::default();
//!     let stats = extract_to_file(&config)?;
//!     eprintln!("{} manufacturers", stats.rows);
//!     Ok(())
//! }
//! ```
//!
//! ## Output
//!
//! ```json
//! {
//!   "$origin": "https://www.nmra.org/index-nmra-standards-and-recommended-practices/",
//!   "$title": "NMRA S-9.2.2, Appendix A",
//!   "$revision": "12 July 2023",
//!   "manufacturers": [
//!     { "id": 151, "name": "Electronic Solutions Ulm GmbH", "countries": ["DE"] }
//!   ]
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `nmra-manufacturers` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod refresh;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractorConfig, ExtractorConfigBuilder, TableMarkers};
pub use document::{ExtractionStats, ManufacturerDocument, ManufacturerRecord};
pub use error::ExtractError;
pub use extract::{extract, extract_from_text, extract_to_file};
pub use refresh::{refresh_appendix, RefreshOutcome};
