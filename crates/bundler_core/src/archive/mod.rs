//! Archive text format: encoding, decoding and header inspection.
//!
//! # Responsibility
//! - Serialize a filename -> content mapping into one human-readable text.
//! - Recover that mapping from archive text with an explicit marker scanner.
//! - Read the informational comment header for display.
//!
//! # Invariants
//! - Encoded records are always emitted in lexicographic filename order.
//! - Decoding is all-or-nothing: structural failure yields no partial result.
//! - The header is informational and never influences decoded records.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod codec;
pub mod header;

pub use codec::{decode, encode, encode_at};
pub use header::{read_header, ArchiveHeader};

/// First header line prefix, followed by ` – <label>`.
pub const HEADER_TITLE: &str = "# Project Archive";
/// Start marker prefix, e.g. `=== main.py ===`.
pub const START_MARKER_PREFIX: &str = "=== ";
/// Start marker suffix.
pub const START_MARKER_SUFFIX: &str = " ===";
/// Line terminating one record.
pub const END_MARKER: &str = "=== END ===";
/// Header timestamp layout (`YYYY-MM-DD HH:MM:SS`).
pub const HEADER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Structural archive failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    /// Input contains no record marker at all.
    MalformedArchive(String),
}

impl Display for ArchiveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedArchive(details) => write!(f, "malformed archive: {details}"),
        }
    }
}

impl Error for ArchiveError {}
