//! Archive record and decoded archive model.
//!
//! # Responsibility
//! - Represent one filename/content pair as stored in an archive.
//! - Hold the name-sorted mapping produced by `archive::decode`.
//!
//! # Invariants
//! - `ArchiveRecord::filename` is non-empty and trimmed.
//! - `ArchiveRecord::content` has trailing whitespace stripped.
//! - `DecodedArchive::filenames()` is always sorted and deduplicated.

use std::collections::BTreeMap;

/// One filename + content pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRecord {
    /// Plain file name, relative to the project directory.
    pub filename: String,
    /// Text content with trailing whitespace removed.
    pub content: String,
}

impl ArchiveRecord {
    /// Creates a record, normalizing filename and content the same way the
    /// codec does on both write and read.
    pub fn new(filename: impl AsRef<str>, content: impl AsRef<str>) -> Self {
        Self {
            filename: filename.as_ref().trim().to_string(),
            content: content.as_ref().trim_end().to_string(),
        }
    }
}

/// Result of decoding archive text.
///
/// Records are keyed by filename; inserting a name twice keeps the later
/// content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedArchive {
    files: BTreeMap<String, String>,
}

impl DecodedArchive {
    /// Creates an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts one record. Returns the previous content when the filename
    /// was already present.
    pub fn insert(&mut self, record: ArchiveRecord) -> Option<String> {
        self.files.insert(record.filename, record.content)
    }

    /// Filenames in lexicographic order.
    pub fn filenames(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    /// Content for one filename.
    pub fn content(&self, filename: &str) -> Option<&str> {
        self.files.get(filename).map(String::as_str)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.files.contains_key(filename)
    }

    /// Filename to content mapping.
    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    /// Consumes the archive and returns its mapping.
    pub fn into_files(self) -> BTreeMap<String, String> {
        self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// `true` when decoding found no usable records ("nothing to do").
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterates records in filename order.
    pub fn records(&self) -> impl Iterator<Item = ArchiveRecord> + '_ {
        self.files.iter().map(|(filename, content)| ArchiveRecord {
            filename: filename.clone(),
            content: content.clone(),
        })
    }
}

impl FromIterator<ArchiveRecord> for DecodedArchive {
    fn from_iter<T: IntoIterator<Item = ArchiveRecord>>(iter: T) -> Self {
        let mut archive = Self::new();
        for record in iter {
            archive.insert(record);
        }
        archive
    }
}

#[cfg(test)]
mod tests {
    use super::{ArchiveRecord, DecodedArchive};

    #[test]
    fn record_new_trims_filename_and_trailing_content() {
        let record = ArchiveRecord::new("  main.py ", "  print(1)\n\n  ");
        assert_eq!(record.filename, "main.py");
        assert_eq!(record.content, "  print(1)");
    }

    #[test]
    fn later_insert_wins_and_names_stay_sorted() {
        let archive: DecodedArchive = [
            ArchiveRecord::new("z.py", "z"),
            ArchiveRecord::new("a.py", "first"),
            ArchiveRecord::new("a.py", "second"),
        ]
        .into_iter()
        .collect();

        assert_eq!(archive.filenames(), vec!["a.py", "z.py"]);
        assert_eq!(archive.content("a.py"), Some("second"));
        assert_eq!(archive.len(), 2);
    }
}
