//! Pipeline stages for manufacturer-table extraction.
//!
//! Each submodule implements exactly one step, so the scanner can be tested
//! on plain strings without pdftotext installed.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ text ──▶ scan ──▶ output
//! (path)  (pdftotext) (rows)  (JSON)
//! ```
//!
//! 1. [`input`]: check the appendix path exists and is a PDF
//! 2. [`text`]: run `pdftotext -layout` and capture stdout
//! 3. [`scan`]: find Table 1, parse rows, join wrapped names
//! 4. [`output`]: write the indented JSON document

pub mod input;
pub mod output;
pub mod scan;
pub mod text;
