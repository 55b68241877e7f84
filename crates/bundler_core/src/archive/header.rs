//! Informational archive header reader.
//!
//! The header is written by `encode_at` as `#` comment lines before the first
//! record. Decoding ignores it; this reader exists for archive listings.

use super::HEADER_DATE_FORMAT;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#\s*Project Archive\s*[–-]\s*(.*?)\s*$").expect("valid label regex")
});
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\s*Date:\s*(.+?)\s*$").expect("valid date regex"));
static TOTAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\s*Total files:\s*(\d+)\s*$").expect("valid total regex"));

/// Metadata declared in the archive comment header.
///
/// Every field is optional: hand-edited or foreign archives may omit lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveHeader {
    /// Project label from `# Project Archive – <label>`.
    pub label: Option<String>,
    /// Generation time from `# Date: <YYYY-MM-DD HH:MM:SS>`.
    pub generated_at: Option<NaiveDateTime>,
    /// File count from `# Total files: <N>`.
    pub declared_file_count: Option<usize>,
}

/// Reads header metadata from the text preceding the first marker.
///
/// Never fails; unrecognized or unparsable lines leave the field unset.
pub fn read_header(archive_text: &str) -> ArchiveHeader {
    let header_end = archive_text.find("===").unwrap_or(archive_text.len());
    let mut header = ArchiveHeader::default();

    for line in archive_text[..header_end].lines() {
        if let Some(captures) = LABEL_RE.captures(line) {
            let label = captures[1].to_string();
            if !label.is_empty() {
                header.label = Some(label);
            }
        } else if let Some(captures) = DATE_RE.captures(line) {
            header.generated_at =
                NaiveDateTime::parse_from_str(&captures[1], HEADER_DATE_FORMAT).ok();
        } else if let Some(captures) = TOTAL_RE.captures(line) {
            header.declared_file_count = captures[1].parse().ok();
        }
    }

    header
}
