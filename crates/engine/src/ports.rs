//! Outbound ports for external collaborators.
//!
//! The per-segment content generator and the key-value storage backend are
//! black boxes to this subsystem; both are reached through these traits.

use async_trait::async_trait;

use paperstage_domain::{DialogueLine, Document, Segment};

use crate::config::GenerationOptions;
use crate::error::{GeneratorError, StoreError};

/// External per-segment content generator (an LLM-backed collaborator).
///
/// Failures surface as errors and are handled by the orchestrator's retry
/// logic; implementations should not retry internally.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SegmentGenerator: Send + Sync {
    /// Generate the ordered dialogue for one segment of a document.
    async fn generate(
        &self,
        segment: &Segment,
        document: &Document,
        options: &GenerationOptions,
    ) -> Result<Vec<DialogueLine>, GeneratorError>;
}

/// Injectable key-value storage backend for the progress & save store.
///
/// The store is storage-agnostic; the default adapters live in
/// [`crate::storage`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoragePort: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
    async fn keys(&self) -> Result<Vec<String>, StoreError>;
    async fn size(&self) -> Result<usize, StoreError>;
}
