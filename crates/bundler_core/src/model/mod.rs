//! Domain model shared by the archive codec, store and services.
//!
//! # Responsibility
//! - Define the record shape carried between codec and planner.
//! - Keep decoded archives in one canonical, name-sorted form.
//!
//! # Invariants
//! - Filenames inside a decoded archive are unique and trimmed.
//! - Record content never carries trailing whitespace.

pub mod record;
