//! Engine-side error types.
//!
//! Three distinct failure families: the external generator failing,
//! a generation run aborting, and store-contract violations.

use paperstage_domain::{DomainError, SegmentId};
use thiserror::Error;

/// Failure surfaced by the external per-segment content generator.
#[derive(Debug, Error, Clone)]
pub enum GeneratorError {
    /// The generator backend was unreachable or errored
    #[error("Generator backend error: {0}")]
    Backend(String),

    /// The generator produced output that could not be used
    #[error("Invalid generator output: {0}")]
    InvalidOutput(String),
}

impl GeneratorError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn invalid_output(msg: impl Into<String>) -> Self {
        Self::InvalidOutput(msg.into())
    }
}

/// Failure of a generation run.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A must-generate-first segment failed. Fatal: there is no playable
    /// state without the whole priority prefix.
    #[error("Priority segment {segment_id} failed: {source}")]
    PriorityFailed {
        segment_id: SegmentId,
        #[source]
        source: GeneratorError,
    },

    /// The document produced no segments to generate
    #[error("Nothing to generate: {0}")]
    NothingToGenerate(String),

    /// `generate_initial_content` was called twice on the same run
    #[error("Generation run already started for document {0}")]
    AlreadyStarted(String),
}

impl GenerationError {
    pub fn priority_failed(segment_id: SegmentId, source: GeneratorError) -> Self {
        Self::PriorityFailed { segment_id, source }
    }
}

/// Failure of a progress & save store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Operating on a document id the store has never seen
    #[error("Unknown game instance for document {0}")]
    UnknownInstance(String),

    /// Slot index or slot contents violated the store contract
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The underlying storage backend failed
    #[error("Storage backend error: {0}")]
    Storage(String),

    /// Persisted state could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn unknown_instance(document_id: impl ToString) -> Self {
        Self::UnknownInstance(document_id.to_string())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_failure_carries_segment() {
        let err = GenerationError::priority_failed(
            SegmentId::new("segment_intro"),
            GeneratorError::backend("timeout"),
        );
        assert!(err.to_string().contains("segment_intro"));
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_store_error_wraps_domain_error() {
        let err: StoreError = DomainError::slot_out_of_range(10, 10).into();
        assert!(matches!(err, StoreError::Domain(_)));
    }
}
