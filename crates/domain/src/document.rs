//! Structured document types consumed from the document-structure extractor.
//!
//! The extractor itself is an external collaborator; this module only defines
//! the shape of its output that segmentation consumes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::DocumentId;

/// Type of a document section, as reported by the structure extractor.
///
/// Unknown types are preserved verbatim in `Other` so segmentation can route
/// them to the catch-all segment kind instead of dropping them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Abstract,
    Introduction,
    Background,
    RelatedWork,
    Methods,
    Approach,
    Experiments,
    Results,
    Evaluation,
    Discussion,
    Conclusion,
    Appendix,
    References,
    Other(String),
}

impl FromStr for SectionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(DomainError::parse("empty section type"));
        }
        Ok(match s.to_ascii_lowercase().as_str() {
            "abstract" => Self::Abstract,
            "introduction" | "intro" => Self::Introduction,
            "background" => Self::Background,
            "related_work" | "related work" => Self::RelatedWork,
            "methods" | "method" | "methodology" => Self::Methods,
            "approach" => Self::Approach,
            "experiments" | "experiment" => Self::Experiments,
            "results" => Self::Results,
            "evaluation" => Self::Evaluation,
            "discussion" => Self::Discussion,
            "conclusion" | "conclusions" => Self::Conclusion,
            "appendix" => Self::Appendix,
            "references" | "bibliography" => Self::References,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abstract => write!(f, "abstract"),
            Self::Introduction => write!(f, "introduction"),
            Self::Background => write!(f, "background"),
            Self::RelatedWork => write!(f, "related_work"),
            Self::Methods => write!(f, "methods"),
            Self::Approach => write!(f, "approach"),
            Self::Experiments => write!(f, "experiments"),
            Self::Results => write!(f, "results"),
            Self::Evaluation => write!(f, "evaluation"),
            Self::Discussion => write!(f, "discussion"),
            Self::Conclusion => write!(f, "conclusion"),
            Self::Appendix => write!(f, "appendix"),
            Self::References => write!(f, "references"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

/// One typed section of the source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Section type assigned by the extractor
    pub section_type: SectionType,
    /// Section heading
    pub title: String,
    /// Body text of the section
    pub content: String,
    /// Nesting depth (0 = top-level)
    pub level: u8,
}

impl Section {
    pub fn new(
        section_type: SectionType,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            section_type,
            title: title.into(),
            content: content.into(),
            level: 0,
        }
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }
}

/// A structured document: the segmentation input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    /// Raw document text, used as a catch-all when no sections are usable
    pub raw_text: String,
    /// Ordered typed sections from the extractor
    pub sections: Vec<Section>,
}

impl Document {
    pub fn new(title: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            id: DocumentId::new(),
            title: title.into(),
            raw_text: String::new(),
            sections,
        }
    }

    pub fn with_raw_text(mut self, raw_text: impl Into<String>) -> Self {
        self.raw_text = raw_text.into();
        self
    }
}
