//! GameInstance and SaveData - persisted playback state per document

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{DocumentId, InstanceId, SegmentId};
use crate::progress::GameProgress;

/// Default number of manual save slots.
pub const DEFAULT_SAVE_SLOT_COUNT: usize = 10;

/// Display/audio settings for one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    /// Text reveal speed, characters per second
    pub text_speed: u32,
    /// Advance dialogue automatically
    pub auto_mode: bool,
    /// Master volume in [0, 100]
    pub master_volume: u8,
    /// Voice volume in [0, 100]
    pub voice_volume: u8,
    /// BCP 47 language tag for display strings
    pub locale: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            text_speed: 40,
            auto_mode: false,
            master_volume: 80,
            voice_volume: 100,
            locale: "en".to_string(),
        }
    }
}

/// A point-in-time capture of playback state.
///
/// Carries the list of segments available at save time, so that loading a
/// save never references a segment the generator had not yet produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    /// Optional user-supplied label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Optional screenshot reference (path or data URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    pub saved_at: DateTime<Utc>,
    /// Segment being played when the save was taken
    pub current_segment: SegmentId,
    /// Scene index within the segment
    pub current_scene: usize,
    /// Dialogue-line index within the scene
    pub current_position: usize,
    /// Script variable snapshot
    pub variables: HashMap<String, serde_json::Value>,
    /// Dialogue history log (already-seen lines)
    pub history: Vec<String>,
    /// Playback progress at save time
    pub progress: GameProgress,
    /// Segments whose content existed when the save was taken
    pub available_segments: Vec<SegmentId>,
}

/// Playback state handed to the store by the playback engine when saving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub current_segment: SegmentId,
    pub current_scene: usize,
    pub current_position: usize,
    pub variables: HashMap<String, serde_json::Value>,
    pub history: Vec<String>,
}

/// One playable document session.
///
/// Owned by the progress & save store for the lifetime of the document,
/// independent of any single generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInstance {
    pub id: InstanceId,
    pub document_id: DocumentId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub last_played_at: DateTime<Utc>,
    /// Manual save slots, each nullable
    pub save_slots: Vec<Option<SaveData>>,
    /// Dedicated quick-save slot, always overwritten
    pub quick_save: Option<SaveData>,
    /// Dedicated auto-save slot, always overwritten
    pub auto_save: Option<SaveData>,
    pub progress: GameProgress,
    pub settings: GameSettings,
    /// Segments the player has unlocked for replay
    pub unlocked_segments: Vec<SegmentId>,
}

impl GameInstance {
    /// Create a fresh instance with empty save slots and progress seeded at
    /// the first segment.
    pub fn new(document_id: DocumentId, title: impl Into<String>, slot_count: usize) -> Self {
        let now = Utc::now();
        Self {
            id: InstanceId::new(),
            document_id,
            title: title.into(),
            created_at: now,
            last_played_at: now,
            save_slots: vec![None; slot_count],
            quick_save: None,
            auto_save: None,
            progress: GameProgress::seeded(SegmentId::new("segment_intro")),
            settings: GameSettings::default(),
            unlocked_segments: Vec::new(),
        }
    }

    /// Write a save into a manual slot, validating the index.
    pub fn write_slot(&mut self, index: usize, save: SaveData) -> Result<(), DomainError> {
        let slot_count = self.save_slots.len();
        let slot = self
            .save_slots
            .get_mut(index)
            .ok_or_else(|| DomainError::slot_out_of_range(index, slot_count))?;
        *slot = Some(save);
        Ok(())
    }

    /// Read a save from a manual slot, validating the index.
    pub fn read_slot(&self, index: usize) -> Result<&SaveData, DomainError> {
        let slot = self
            .save_slots
            .get(index)
            .ok_or_else(|| DomainError::slot_out_of_range(index, self.save_slots.len()))?;
        slot.as_ref()
            .ok_or_else(|| DomainError::empty_slot(format!("manual slot {}", index)))
    }

    /// Mark a segment as unlocked for replay. Idempotent.
    pub fn unlock_segment(&mut self, segment_id: SegmentId) {
        if !self.unlocked_segments.contains(&segment_id) {
            self.unlocked_segments.push(segment_id);
        }
    }
}
