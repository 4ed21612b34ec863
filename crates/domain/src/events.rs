//! Segment lifecycle events emitted during a generation run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::SegmentId;

/// What happened to a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "type")]
pub enum SegmentEventKind {
    /// Generation of the segment began
    Started,
    /// Generation of the segment finished
    Completed {
        /// Number of dialogue lines produced
        dialogue_count: usize,
    },
    /// Generation of the segment failed (terminally, for background tasks)
    Failed { error: String },
    /// The playable prefix is ready and background generation may begin
    GameReady,
}

/// An immutable, timestamped segment lifecycle notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentEvent {
    pub segment_id: SegmentId,
    pub kind: SegmentEventKind,
    pub timestamp: DateTime<Utc>,
}

impl SegmentEvent {
    pub fn started(segment_id: SegmentId) -> Self {
        Self {
            segment_id,
            kind: SegmentEventKind::Started,
            timestamp: Utc::now(),
        }
    }

    pub fn completed(segment_id: SegmentId, dialogue_count: usize) -> Self {
        Self {
            segment_id,
            kind: SegmentEventKind::Completed { dialogue_count },
            timestamp: Utc::now(),
        }
    }

    pub fn failed(segment_id: SegmentId, error: impl Into<String>) -> Self {
        Self {
            segment_id,
            kind: SegmentEventKind::Failed {
                error: error.into(),
            },
            timestamp: Utc::now(),
        }
    }

    pub fn game_ready(segment_id: SegmentId) -> Self {
        Self {
            segment_id,
            kind: SegmentEventKind::GameReady,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_tagged_kind() {
        let event = SegmentEvent::completed(SegmentId::new("segment_intro"), 12);
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["kind"]["type"], "completed");
        assert_eq!(json["kind"]["dialogueCount"], 12);
        assert_eq!(json["segmentId"], "segment_intro");
    }
}
