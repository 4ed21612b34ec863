//! Progress snapshots - generation-side and playback-side

use serde::{Deserialize, Serialize};

use crate::ids::SegmentId;
use crate::task::TaskStatus;

/// Per-segment generation progress, derived from task state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentProgress {
    pub segment_id: SegmentId,
    pub status: TaskStatus,
    /// 0 pending, ~50 running, 100 completed
    pub percent: u8,
    /// Human-readable status line for display
    pub message: String,
}

/// A derived, recomputed-on-demand snapshot of one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationProgress {
    pub total_segments: usize,
    pub completed_segments: usize,
    /// Unit-weighted overall percentage in [0, 100]
    pub overall_progress: f64,
    /// Whether the playable prefix exists (overall progress >= threshold)
    pub can_start_game: bool,
    pub segments: Vec<SegmentProgress>,
    /// Sum of remaining segments' estimated generation time
    pub estimated_remaining_secs: u64,
}

impl GenerationProgress {
    /// Snapshot for a run with no segments at all.
    pub fn empty() -> Self {
        Self {
            total_segments: 0,
            completed_segments: 0,
            overall_progress: 0.0,
            can_start_game: false,
            segments: Vec::new(),
            estimated_remaining_secs: 0,
        }
    }
}

/// Playback-side progress for one game instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameProgress {
    /// Segment the player is currently in
    pub current_segment: SegmentId,
    /// Segments whose content has been produced and is playable
    pub available_segments: Vec<SegmentId>,
    /// Segments the player has finished
    pub completed_segments: Vec<SegmentId>,
    /// Completed/available ratio in [0, 100]
    pub total_progress: f64,
    /// Position within the current segment (dialogue-line index)
    pub position_in_segment: usize,
}

impl GameProgress {
    /// Fresh progress seeded at the first segment.
    pub fn seeded(first_segment: SegmentId) -> Self {
        Self {
            current_segment: first_segment,
            available_segments: Vec::new(),
            completed_segments: Vec::new(),
            total_progress: 0.0,
            position_in_segment: 0,
        }
    }

    /// Recompute `total_progress` from the completed/available ratio.
    pub fn recompute_total(&mut self) {
        if self.available_segments.is_empty() {
            self.total_progress = 0.0;
        } else {
            self.total_progress = (self.completed_segments.len() as f64
                / self.available_segments.len() as f64)
                * 100.0;
        }
    }
}
