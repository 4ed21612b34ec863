//! PaperStage domain types.
//!
//! Core types, value objects, and invariants for the incremental
//! segmentation, background-generation, and progress/save subsystem.
//! No async, no I/O - the engine crate owns all side effects.

pub mod dialogue;
pub mod document;
pub mod error;
pub mod events;
pub mod ids;
pub mod progress;
pub mod save;
pub mod segment;
pub mod task;

pub use dialogue::{DialogueLine, SegmentContent, WaitingContext, WaitingDialogue};
pub use document::{Document, Section, SectionType};
pub use error::DomainError;
pub use events::{SegmentEvent, SegmentEventKind};
pub use ids::{DocumentId, InstanceId, SegmentId, TaskId};
pub use progress::{GameProgress, GenerationProgress, SegmentProgress};
pub use save::{
    GameInstance, GameSettings, PlaybackState, SaveData, DEFAULT_SAVE_SLOT_COUNT,
};
pub use segment::{Segment, SegmentKind, MAX_ESTIMATED_UNITS, MIN_ESTIMATED_UNITS};
pub use task::{GenerationTask, TaskStatus};
