//! GenerationTask entity - Tracks background generation work per segment

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{DocumentId, SegmentId, TaskId};

/// Status of a generation task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum TaskStatus {
    /// Waiting in queue to be processed
    Queued,
    /// Currently being generated
    Running,
    /// Generation complete
    Completed,
    /// Generation failed after exhausting retries
    Failed { error: String },
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. })
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, Self::Queued)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "Queued"),
            Self::Running => write!(f, "Running"),
            Self::Completed => write!(f, "Completed"),
            Self::Failed { error } => write!(f, "Failed: {}", error),
        }
    }
}

/// A unit of background generation work bound to one segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationTask {
    pub id: TaskId,
    /// Segment this task generates
    pub segment_id: SegmentId,
    /// Document the segment belongs to
    pub document_id: DocumentId,
    /// Estimated generation time in seconds
    pub estimated_time_secs: u64,
    /// Current status
    pub status: TaskStatus,
    /// Generation attempts made so far
    pub attempts: u32,
    /// When the task was created
    pub created_at: DateTime<Utc>,
    /// When the task reached a terminal status
    pub completed_at: Option<DateTime<Utc>>,
}

impl GenerationTask {
    pub fn new(segment_id: SegmentId, document_id: DocumentId, estimated_time_secs: u64) -> Self {
        Self {
            id: TaskId::new(),
            segment_id,
            document_id,
            estimated_time_secs,
            status: TaskStatus::Queued,
            attempts: 0,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Start an attempt on this task
    pub fn start_attempt(&mut self) {
        self.status = TaskStatus::Running;
        self.attempts += 1;
    }

    /// Mark the task as completed
    pub fn complete(&mut self) {
        self.status = TaskStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the task as permanently failed
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = TaskStatus::Failed {
            error: error.into(),
        };
        self.completed_at = Some(Utc::now());
    }
}
