//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate codec and store calls into bundle/restore use-cases.
//! - Keep the presentation collaborator decoupled from filesystem details.

pub mod bundle_service;
pub mod restore_service;
