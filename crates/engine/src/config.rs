//! Generation configuration and per-call options.

use serde::{Deserialize, Serialize};

use paperstage_domain::DEFAULT_SAVE_SLOT_COUNT;

/// Recognized generation options and their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    /// Minimum unit-weighted coverage the priority segments must reach
    /// before playback may start, as a percentage
    pub min_start_percentage: f64,
    /// Whether to run background generation at all after the priority phase
    pub enable_background_generation: bool,
    /// Base delay between background attempts, in milliseconds; retry
    /// backoff is `background_task_delay * attempt` (linear)
    pub background_task_delay_ms: u64,
    /// Reserved: the background loop is strictly sequential regardless of
    /// this value. Kept so callers' stored configs round-trip.
    pub max_concurrent_tasks: usize,
    /// Whether waiting dialogues are offered while segments generate
    pub enable_waiting_dialogues: bool,
    /// Whether failed background segments are retried at all
    pub retry_failed_segments: bool,
    /// Maximum generation attempts per background segment
    pub max_retry_attempts: u32,
    /// Number of manual save slots per instance
    pub save_slot_count: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_start_percentage: 50.0,
            enable_background_generation: true,
            background_task_delay_ms: 1000,
            max_concurrent_tasks: 2,
            enable_waiting_dialogues: true,
            retry_failed_segments: true,
            max_retry_attempts: 3,
            save_slot_count: DEFAULT_SAVE_SLOT_COUNT,
        }
    }
}

impl GenerationConfig {
    pub fn with_min_start_percentage(mut self, percentage: f64) -> Self {
        self.min_start_percentage = percentage;
        self
    }

    pub fn with_background_task_delay_ms(mut self, delay_ms: u64) -> Self {
        self.background_task_delay_ms = delay_ms;
        self
    }

    pub fn with_max_retry_attempts(mut self, attempts: u32) -> Self {
        self.max_retry_attempts = attempts;
        self
    }

    pub fn with_retry_failed_segments(mut self, retry: bool) -> Self {
        self.retry_failed_segments = retry;
        self
    }

    pub fn with_background_generation(mut self, enabled: bool) -> Self {
        self.enable_background_generation = enabled;
        self
    }
}

/// Per-call options passed through to the external content generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationOptions {
    /// BCP 47 language tag for generated dialogue
    pub locale: String,
    /// Free-form style hint ("casual", "lecture", ...)
    pub style: Option<String>,
    /// Estimated generation latency per dialogue unit, in seconds.
    /// Drives the remaining-time estimate in progress snapshots.
    pub secs_per_unit: u64,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            style: None,
            secs_per_unit: 12,
        }
    }
}
