//! Archive encoder and marker-scanning decoder.
//!
//! # Responsibility
//! - Produce byte-stable archive text for a given file set and timestamp.
//! - Split archive text into records using start/end marker lines.
//!
//! # Invariants
//! - Decoding starts at the first `===` occurrence; earlier text is ignored.
//! - Records with an empty filename or whitespace-only content are dropped.
//! - A filename seen twice keeps the content of the later record.
//! - No escaping: marker-like filenames or content lines are unsupported.

use super::{
    ArchiveError, ArchiveResult, END_MARKER, HEADER_DATE_FORMAT, HEADER_TITLE,
    START_MARKER_PREFIX, START_MARKER_SUFFIX,
};
use crate::model::record::{ArchiveRecord, DecodedArchive};
use chrono::{Local, NaiveDateTime};
use log::{debug, info, warn};
use std::time::Instant;

const MARKER_TOKEN: &str = "===";

/// Encodes `files` into archive text stamped with the current local time.
///
/// See [`encode_at`] for the layout.
pub fn encode<I, K, V>(project_label: &str, files: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    encode_at(project_label, files, Local::now().naive_local())
}

/// Encodes `files` into archive text with an explicit generation timestamp.
///
/// Layout:
/// - three `#` header lines (label, date, total file count) and a blank line;
/// - per file, sorted by name: `=== <name> ===`, the content with trailing
///   whitespace stripped, a blank line, `=== END ===`, and a blank separator.
///
/// Output depends only on the set of files and `generated_at`, never on the
/// iteration order of `files`.
pub fn encode_at<I, K, V>(project_label: &str, files: I, generated_at: NaiveDateTime) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut records = files
        .into_iter()
        .map(|(filename, content)| ArchiveRecord::new(filename, content))
        .collect::<Vec<_>>();
    records.sort_by(|left, right| left.filename.cmp(&right.filename));

    let mut lines = Vec::with_capacity(4 + records.len() * 3);
    lines.push(format!("{HEADER_TITLE} – {project_label}"));
    lines.push(format!("# Date: {}", generated_at.format(HEADER_DATE_FORMAT)));
    lines.push(format!("# Total files: {}", records.len()));
    lines.push(String::new());

    for record in &records {
        lines.push(format!(
            "{START_MARKER_PREFIX}{}{START_MARKER_SUFFIX}",
            record.filename
        ));
        lines.push(record.content.clone());
        lines.push(format!("\n{END_MARKER}\n"));
    }

    debug!(
        "event=archive_encode module=archive status=ok records={}",
        records.len()
    );
    lines.join("\n")
}

/// Decodes archive text into a name-sorted mapping.
///
/// # Errors
/// - Returns [`ArchiveError::MalformedArchive`] when the text contains no
///   `===` marker anywhere.
///
/// An archive whose markers yield no usable record decodes to an empty
/// [`DecodedArchive`]; callers treat that as "nothing to do".
pub fn decode(archive_text: &str) -> ArchiveResult<DecodedArchive> {
    let started_at = Instant::now();
    let Some(first_marker) = archive_text.find(MARKER_TOKEN) else {
        warn!(
            "event=archive_decode module=archive status=error error_code=malformed_archive bytes={}",
            archive_text.len()
        );
        return Err(ArchiveError::MalformedArchive(
            "no `===` marker found".to_string(),
        ));
    };

    let mut archive = DecodedArchive::new();
    let mut stats = ScanStats::default();
    let mut open: Option<OpenRecord<'_>> = None;

    for line in archive_text[first_marker..].lines() {
        if is_end_marker(line) {
            if let Some(record) = open.take() {
                close_record(record, &mut archive, &mut stats);
            }
            continue;
        }

        match open.as_mut() {
            Some(record) => record.lines.push(line),
            None => {
                if let Some(filename) = parse_start_marker(line) {
                    open = Some(OpenRecord {
                        filename,
                        lines: Vec::new(),
                    });
                }
            }
        }
    }
    // An unterminated trailing record still counts.
    if let Some(record) = open.take() {
        close_record(record, &mut archive, &mut stats);
    }

    info!(
        "event=archive_decode module=archive status=ok records={} discarded={} replaced={} duration_ms={}",
        archive.len(),
        stats.discarded,
        stats.replaced,
        started_at.elapsed().as_millis()
    );
    Ok(archive)
}

#[derive(Default)]
struct ScanStats {
    discarded: usize,
    replaced: usize,
}

struct OpenRecord<'a> {
    filename: &'a str,
    lines: Vec<&'a str>,
}

impl OpenRecord<'_> {
    fn finish(self) -> Option<ArchiveRecord> {
        let filename = self.filename.trim();
        if filename.is_empty() {
            return None;
        }
        let content = self.lines.join("\n");
        if content.trim().is_empty() {
            return None;
        }
        Some(ArchiveRecord::new(filename, content))
    }
}

fn close_record(record: OpenRecord<'_>, archive: &mut DecodedArchive, stats: &mut ScanStats) {
    match record.finish() {
        Some(record) => {
            if archive.insert(record).is_some() {
                stats.replaced += 1;
            }
        }
        None => stats.discarded += 1,
    }
}

fn is_end_marker(line: &str) -> bool {
    line.trim_end() == END_MARKER
}

fn parse_start_marker(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix(START_MARKER_PREFIX)?
        .strip_suffix(START_MARKER_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::{decode, encode_at, is_end_marker, parse_start_marker};
    use crate::archive::ArchiveError;
    use chrono::NaiveDate;

    fn fixed_time() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|date| date.and_hms_opt(14, 5, 7))
            .expect("valid fixed timestamp")
    }

    #[test]
    fn encode_matches_documented_layout() {
        let text = encode_at(
            "demo",
            [("b.py", "print('b')\n\n"), ("a.py", "import os  \n")],
            fixed_time(),
        );

        let expected = "# Project Archive – demo\n\
# Date: 2024-03-09 14:05:07\n\
# Total files: 2\n\
\n\
=== a.py ===\n\
import os\n\
\n\
=== END ===\n\
\n\
=== b.py ===\n\
print('b')\n\
\n\
=== END ===\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn encode_without_files_emits_header_only() {
        let text = encode_at("empty", Vec::<(&str, &str)>::new(), fixed_time());
        assert_eq!(
            text,
            "# Project Archive – empty\n# Date: 2024-03-09 14:05:07\n# Total files: 0\n"
        );
    }

    #[test]
    fn marker_helpers_follow_line_shapes() {
        assert_eq!(parse_start_marker("=== main.py ==="), Some("main.py"));
        assert_eq!(parse_start_marker("  === spaced.py ===  "), Some("spaced.py"));
        assert_eq!(parse_start_marker("=== ==="), None);
        assert_eq!(parse_start_marker("main.py"), None);
        assert!(is_end_marker("=== END ===   "));
        assert!(!is_end_marker("  === END ==="));
    }

    #[test]
    fn decode_keeps_leading_indentation_of_content() {
        let archive = decode("=== a.py ===\n    indented()\nnext()\n=== END ===\n").unwrap();
        assert_eq!(archive.content("a.py"), Some("    indented()\nnext()"));
    }

    #[test]
    fn decode_accepts_unterminated_last_record() {
        let archive = decode("=== a.py ===\nbody\n\n=== END ===\n=== b.py ===\ntail\n").unwrap();
        assert_eq!(archive.filenames(), vec!["a.py", "b.py"]);
        assert_eq!(archive.content("b.py"), Some("tail"));
    }

    #[test]
    fn decode_without_marker_is_malformed() {
        let err = decode("just some notes\nwithout records").unwrap_err();
        assert!(matches!(err, ArchiveError::MalformedArchive(_)));
    }
}
