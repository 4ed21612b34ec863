//! Unified error types for the domain layer
//!
//! Provides a common error type that can be used across all domain operations,
//! enabling consistent error handling without forcing adapters to use String or anyhow.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Save slot index outside the configured slot range
    #[error("Save slot {index} out of range: valid indices are 0..{slot_count}")]
    SlotOutOfRange { index: usize, slot_count: usize },

    /// Save slot exists but holds no data
    #[error("Save slot is empty: {0}")]
    EmptySlot(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// State transition not allowed
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// Use this when domain invariants or constraints are violated:
    /// required fields are empty, values are outside allowed ranges,
    /// or state transitions are invalid.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a slot out of range error
    pub fn slot_out_of_range(index: usize, slot_count: usize) -> Self {
        Self::SlotOutOfRange { index, slot_count }
    }

    /// Create an empty slot error
    pub fn empty_slot(slot: impl Into<String>) -> Self {
        Self::EmptySlot(slot.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("segment list cannot be empty");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation failed: segment list cannot be empty"
        );
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("GameInstance", "123e4567-e89b-12d3-a456-426614174000");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("GameInstance"));
        assert!(err.to_string().contains("123e4567"));
    }

    #[test]
    fn test_slot_out_of_range_error() {
        let err = DomainError::slot_out_of_range(10, 10);
        assert!(matches!(err, DomainError::SlotOutOfRange { .. }));
        assert_eq!(
            err.to_string(),
            "Save slot 10 out of range: valid indices are 0..10"
        );
    }

    #[test]
    fn test_empty_slot_error() {
        let err = DomainError::empty_slot("quick");
        assert!(matches!(err, DomainError::EmptySlot(_)));
        assert!(err.to_string().contains("quick"));
    }
}
