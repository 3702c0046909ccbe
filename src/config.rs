//! Configuration for a manufacturer-table extraction run.
//!
//! All behaviour is controlled through [`ExtractorConfig`], built via its
//! [`ExtractorConfigBuilder`]. The defaults reproduce the repository layout
//! the tool was written for, so `ExtractorConfig::default()` needs no
//! arguments at all.

use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Repository-relative path of the appendix PDF.
pub const DEFAULT_INPUT: &str = "docs/NMRA/appendix_a_s-9_2_2_5.pdf";

/// Repository-relative path of the generated manufacturer database.
pub const DEFAULT_OUTPUT: &str = "lmrs/core/data/manufacturers.json";

/// NMRA page listing all standards and recommended practices.
pub const STANDARDS_URL: &str =
    "https://www.nmra.org/index-nmra-standards-and-recommended-practices/";

/// Link text of the appendix on [`STANDARDS_URL`].
pub const APPENDIX_TITLE: &str = "S-9.2.2, Appendix A";

/// Configuration for an extraction run.
///
/// # Example
/// ```rust
/// use nmra_manufacturers::ExtractorConfig;
///
/// let config = ExtractorConfig::builder()
///     .input("appendix.pdf")
///     .output("manufacturers.json")
///     .build()
///     .unwrap();
/// assert_eq!(config.pdftotext, "pdftotext");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Appendix PDF to read. Default: [`DEFAULT_INPUT`].
    pub input: PathBuf,

    /// JSON file to write. Default: [`DEFAULT_OUTPUT`].
    ///
    /// Overwritten on every run; no backup is kept.
    pub output: PathBuf,

    /// Text-extraction program, invoked as `<pdftotext> -layout <input> -`.
    /// Default: `pdftotext` from `PATH`.
    pub pdftotext: String,

    /// Value of the `$origin` field. Default: [`STANDARDS_URL`].
    ///
    /// Also the page searched for the appendix link when refreshing.
    pub origin: String,

    /// Value of the `$title` field. Default: `NMRA S-9.2.2, Appendix A`.
    pub title: String,

    /// Lines that open and close the manufacturer table.
    pub markers: TableMarkers,

    /// Timeout for each HTTP request of the refresh step, in seconds. Default: 120.
    pub download_timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            pdftotext: "pdftotext".to_string(),
            origin: STANDARDS_URL.to_string(),
            title: format!("NMRA {APPENDIX_TITLE}"),
            markers: TableMarkers::default(),
            download_timeout_secs: 120,
        }
    }
}

impl ExtractorConfig {
    /// Create a new builder for `ExtractorConfig`.
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractorConfig`].
#[derive(Debug)]
pub struct ExtractorConfigBuilder {
    config: ExtractorConfig,
}

impl ExtractorConfigBuilder {
    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.input = path.into();
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = path.into();
        self
    }

    pub fn pdftotext(mut self, program: impl Into<String>) -> Self {
        self.config.pdftotext = program.into();
        self
    }

    pub fn origin(mut self, url: impl Into<String>) -> Self {
        self.config.origin = url.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn markers(mut self, markers: TableMarkers) -> Self {
        self.config.markers = markers;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractorConfig, ExtractError> {
        let c = &self.config;
        if c.pdftotext.trim().is_empty() {
            return Err(ExtractError::InvalidConfig(
                "pdftotext program must not be empty".into(),
            ));
        }
        if c.markers.start.is_empty() || c.markers.end.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "table markers must not be empty".into(),
            ));
        }
        if c.markers.start == c.markers.end {
            return Err(ExtractError::InvalidConfig(format!(
                "start and end table markers are both '{}'",
                c.markers.start
            )));
        }
        Ok(self.config)
    }
}

/// Line prefixes delimiting the manufacturer table in the rendered text.
///
/// Matching is a plain prefix test on the trimmed line, so the default
/// `"Table 1"` also matches `"Table 1. Manufacturer ID codes"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMarkers {
    /// Prefix of the line that opens the table.
    pub start: String,
    /// Prefix of the line that opens the following table; scanning stops there.
    pub end: String,
}

impl Default for TableMarkers {
    fn default() -> Self {
        Self {
            start: "Table 1".to_string(),
            end: "Table 2".to_string(),
        }
    }
}
