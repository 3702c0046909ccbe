//! The manufacturer database document and per-run statistics.

use serde::{Deserialize, Serialize};

/// One row of the manufacturer table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufacturerRecord {
    /// Decimal manufacturer ID as written to CV8.
    pub id: u32,
    /// Manufacturer name, including any wrapped continuation lines.
    pub name: String,
    /// Country codes, e.g. `["DE", "AT"]`. Empty when the table leaves it blank.
    pub countries: Vec<String>,
}

/// The generated `manufacturers.json` document.
///
/// Field order here is the key order in the written JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufacturerDocument {
    /// Where the appendix is published.
    #[serde(rename = "$origin")]
    pub origin: String,

    #[serde(rename = "$title")]
    pub title: String,

    /// Revision date from the appendix footer, e.g. `"12 July 2023"`.
    #[serde(rename = "$revision", default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    /// Records in table order.
    pub manufacturers: Vec<ManufacturerRecord>,
}

impl ManufacturerDocument {
    /// Look up a manufacturer by its decimal ID.
    pub fn find(&self, id: u32) -> Option<&ManufacturerRecord> {
        self.manufacturers.iter().find(|m| m.id == id)
    }
}

/// Counters describing how a run went.
///
/// Not part of the JSON document. `continuations` and `orphaned_lines`
/// measure how much of the output came from name-wrapping guesses rather
/// than parsed rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Lines read before scanning stopped.
    pub lines_scanned: usize,
    /// Lines parsed as manufacturer rows.
    pub rows: usize,
    /// Lines appended to the previous record's name.
    pub continuations: usize,
    /// Unparseable table lines with no record to attach to; dropped.
    pub orphaned_lines: usize,
    /// Whether the start marker was seen at all.
    pub table_found: bool,
    /// Wall-clock time of the whole run, including the external tool.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ManufacturerDocument {
        ManufacturerDocument {
            origin: "https://www.nmra.org/".into(),
            title: "NMRA S-9.2.2, Appendix A".into(),
            revision: Some("12 July 2023".into()),
            manufacturers: vec![
                ManufacturerRecord {
                    id: 97,
                    name: "Doehler & Haass".into(),
                    countries: vec!["DE".into()],
                },
                ManufacturerRecord {
                    id: 151,
                    name: "Electronic Solutions Ulm GmbH".into(),
                    countries: vec!["DE".into(), "AT".into()],
                },
                ManufacturerRecord {
                    id: 13,
                    name: "Public Domain & Do-It-Yourself Decoders".into(),
                    countries: vec![],
                },
            ],
        }
    }

    #[test]
    fn json_uses_dollar_keys_in_order() {
        let json = serde_json::to_string_pretty(&sample()).unwrap();
        let origin = json.find("\"$origin\"").unwrap();
        let title = json.find("\"$title\"").unwrap();
        let revision = json.find("\"$revision\"").unwrap();
        let list = json.find("\"manufacturers\"").unwrap();
        assert!(origin < title && title < revision && revision < list);
        assert!(json.starts_with("{\n  \"$origin\""), "got: {json}");
    }

    #[test]
    fn revision_is_omitted_when_absent() {
        let mut doc = sample();
        doc.revision = None;
        let json = serde_json::to_string(&doc).unwrap();
        assert!(!json.contains("$revision"));
    }

    #[test]
    fn json_round_trip_keeps_record_order() {
        let doc = sample();
        let json = serde_json::to_string_pretty(&doc).unwrap();
        let back: ManufacturerDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
        let ids: Vec<u32> = back.manufacturers.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![97, 151, 13]);
    }

    #[test]
    fn find_by_id() {
        let doc = sample();
        assert_eq!(doc.find(151).map(|m| m.countries.len()), Some(2));
        assert!(doc.find(1).is_none());
    }
}
