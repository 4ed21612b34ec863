//! Segment entity - one independently-generatable slice of a document

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::Section;
use crate::ids::SegmentId;

/// Lower bound on a segment's estimated unit count.
pub const MIN_ESTIMATED_UNITS: u32 = 4;
/// Upper bound on a segment's estimated unit count.
pub const MAX_ESTIMATED_UNITS: u32 = 20;

/// The fixed set of segment kinds.
///
/// Kinds double as the priority order: intro plays first, extra last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Intro,
    Methods,
    Results,
    Conclusion,
    Extra,
}

impl SegmentKind {
    /// All kinds in priority order.
    pub const ALL: [SegmentKind; 5] = [
        Self::Intro,
        Self::Methods,
        Self::Results,
        Self::Conclusion,
        Self::Extra,
    ];

    /// Generation priority (lower = earlier).
    pub fn priority(self) -> u8 {
        match self {
            Self::Intro => 1,
            Self::Methods => 2,
            Self::Results => 3,
            Self::Conclusion => 4,
            Self::Extra => 5,
        }
    }

    /// Stable segment id for this kind.
    pub fn segment_id(self) -> SegmentId {
        SegmentId::new(format!("segment_{}", self))
    }

    /// Display title for the segment of this kind.
    pub fn title(self) -> &'static str {
        match self {
            Self::Intro => "Opening",
            Self::Methods => "The Approach",
            Self::Results => "The Findings",
            Self::Conclusion => "Closing Thoughts",
            Self::Extra => "Further Reading",
        }
    }

    /// Display description for the segment of this kind.
    pub fn description(self) -> &'static str {
        match self {
            Self::Intro => "What this work is about and why it matters",
            Self::Methods => "How the authors tackled the problem",
            Self::Results => "What they found",
            Self::Conclusion => "What it all means",
            Self::Extra => "Supporting material and side notes",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intro => write!(f, "intro"),
            Self::Methods => write!(f, "methods"),
            Self::Results => write!(f, "results"),
            Self::Conclusion => write!(f, "conclusion"),
            Self::Extra => write!(f, "extra"),
        }
    }
}

/// A contiguous slice of the source document assigned to one generation unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub kind: SegmentKind,
    /// Generation priority (lower = earlier)
    pub priority: u8,
    /// Source sections covered by this segment
    pub content: Vec<Section>,
    /// Estimated dialogue-unit count, clamped to [4, 20]
    pub estimated_unit_count: u32,
    /// Whether this segment must be generated before playback may start
    pub must_generate_first: bool,
    /// Display title
    pub title: String,
    /// Display description
    pub description: String,
}

impl Segment {
    pub fn new(kind: SegmentKind, content: Vec<Section>, estimated_unit_count: u32) -> Self {
        Self {
            id: kind.segment_id(),
            kind,
            priority: kind.priority(),
            content,
            estimated_unit_count: estimated_unit_count
                .clamp(MIN_ESTIMATED_UNITS, MAX_ESTIMATED_UNITS),
            must_generate_first: false,
            title: kind.title().to_string(),
            description: kind.description().to_string(),
        }
    }

    pub fn with_must_generate_first(mut self, must_generate_first: bool) -> Self {
        self.must_generate_first = must_generate_first;
        self
    }
}
