//! PaperStage engine.
//!
//! Incremental segmentation, background generation, and the progress/save
//! store: everything needed to start playing a document before the whole
//! presentation exists.
//!
//! ## Structure
//!
//! - `segmentation` - cuts a structured document into prioritized segments
//! - `orchestrator` - blocking priority phase + detached background loop
//! - `events` - synchronous segment lifecycle event dispatch
//! - `waiting` - filler lines while a segment is still generating
//! - `store` - per-document playback progress and save slots
//! - `storage` - key-value adapters behind the injectable storage port
//! - `ports` - traits for the external generator and storage collaborators

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod orchestrator;
pub mod ports;
pub mod segmentation;
pub mod storage;
pub mod store;
pub mod waiting;

#[cfg(test)]
mod store_integration_tests;

pub use config::{GenerationConfig, GenerationOptions};
pub use error::{GenerationError, GeneratorError, StoreError};
pub use events::{SegmentEventBus, Subscription};
pub use orchestrator::{GameReadyHandle, GenerationOrchestrator, InitialContent};
pub use ports::{SegmentGenerator, StoragePort};
pub use segmentation::SegmentationStrategy;
pub use storage::{FileStorage, MemoryStorage};
pub use store::{ProgressSaveStore, SaveSlot};
pub use waiting::WaitingDialoguePool;
