//! Core error taxonomy
//!
//! Failure classes kept deliberately narrow:
//! - `MalformedReport`: the parser refuses to produce a report
//! - `ExternalTool`: analyzer invocation failed; never yields a partial snapshot
//! - `Storage` / `Serialize`: snapshot write failures, surfaced to the caller
//! - `InvalidSnapshot`: a persisted record was rejected on read
//!
//! A single corrupt record during listing is not an error: it is skipped
//! with a warning so the remaining history stays readable.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Report text was empty, not valid JSON, or missing required fields.
    #[error("malformed analyzer report: {0}")]
    MalformedReport(String),

    /// Analyzer binary missing, timed out, or exited with no usable output.
    #[error("analyzer invocation failed: {0}")]
    ExternalTool(String),

    /// Snapshot write failed. Propagated rather than swallowed because a
    /// missing snapshot breaks trend continuity.
    #[error("snapshot storage failed at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be serialized for persistence.
    #[error("snapshot serialization failed: {0}")]
    Serialize(serde_json::Error),

    /// A persisted snapshot record failed validation on read.
    #[error("snapshot record rejected: {0}")]
    InvalidSnapshot(String),
}
