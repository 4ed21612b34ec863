//! Produced content units and waiting-dialogue types.

use serde::{Deserialize, Serialize};

use crate::ids::SegmentId;

/// One generated dialogue/scene unit, as returned by the external generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueLine {
    /// Speaking character
    pub speaker: String,
    /// Line text
    pub text: String,
    /// Optional emotion hint for the renderer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    /// Optional scene/backdrop hint for the renderer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_hint: Option<String>,
}

impl DialogueLine {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            emotion: None,
            scene_hint: None,
        }
    }
}

/// The ordered produced content for one segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentContent {
    pub segment_id: SegmentId,
    pub lines: Vec<DialogueLine>,
}

impl SegmentContent {
    pub fn new(segment_id: SegmentId, lines: Vec<DialogueLine>) -> Self {
        Self { segment_id, lines }
    }
}

/// Narrative context a waiting dialogue is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitingContext {
    /// A segment is still being generated
    Generating,
    /// Content exists but is being loaded
    Loading,
    /// Between two segments
    Transition,
}

/// A localized filler line shown while a segment is still generating.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitingDialogue {
    pub context: WaitingContext,
    /// BCP 47 language tag ("en", "zh", ...)
    pub locale: String,
    pub text: String,
}

impl WaitingDialogue {
    pub fn new(context: WaitingContext, locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            context,
            locale: locale.into(),
            text: text.into(),
        }
    }
}
