//! Generation orchestrator - turns segments into played content with a
//! blocking "must be ready" phase and a detached "fill in the rest" phase.
//!
//! One orchestrator instance owns the state of one generation run for one
//! document. Multiple documents generate concurrently by creating multiple
//! orchestrators; there is no process-wide registry.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;

use paperstage_domain::{
    Document, GenerationProgress, GenerationTask, Segment, SegmentContent, SegmentEvent,
    SegmentId, SegmentProgress, TaskStatus, WaitingContext, WaitingDialogue,
};

use crate::config::{GenerationConfig, GenerationOptions};
use crate::error::GenerationError;
use crate::events::{SegmentEventBus, Subscription};
use crate::ports::SegmentGenerator;
use crate::waiting::WaitingDialoguePool;

/// Result of the blocking priority phase.
pub struct InitialContent {
    /// Produced content for every priority segment, in priority order
    pub content: Vec<SegmentContent>,
    /// Segments queued for background generation, in priority order
    pub queued_segments: Vec<SegmentId>,
    /// Progress snapshot taken right after the priority phase
    pub progress: GenerationProgress,
    /// Invoke once playback has begun to start background generation
    pub game_ready: GameReadyHandle,
}

/// Callback handle that signals "playback has begun".
///
/// Invoking it emits the `game_ready` event and starts the detached
/// background loop (unless background generation is disabled).
pub struct GameReadyHandle {
    orchestrator: Arc<GenerationOrchestrator>,
    first_segment: SegmentId,
}

impl GameReadyHandle {
    /// Emit `game_ready` and spawn the background generation loop.
    ///
    /// Returns the loop's join handle, or `None` when background generation
    /// is disabled or nothing is queued.
    pub fn start(self) -> Option<JoinHandle<()>> {
        let orchestrator = self.orchestrator;
        orchestrator
            .events
            .emit(&SegmentEvent::game_ready(self.first_segment));

        if !orchestrator.config.enable_background_generation {
            tracing::info!("background generation disabled; queued segments stay pending");
            return None;
        }
        if orchestrator.queued_order().is_empty() {
            return None;
        }

        Some(tokio::spawn(async move {
            orchestrator.run_background().await;
        }))
    }
}

/// Orchestrates one generation run for one document.
pub struct GenerationOrchestrator {
    document: Arc<Document>,
    config: GenerationConfig,
    options: GenerationOptions,
    generator: Arc<dyn SegmentGenerator>,
    events: Arc<SegmentEventBus>,
    waiting: WaitingDialoguePool,
    /// Segments of this run, fixed by `generate_initial_content`
    segments: OnceLock<Vec<Segment>>,
    /// Produced content, keyed by segment id. Written by the initial phase,
    /// then only by the background loop.
    content: DashMap<SegmentId, SegmentContent>,
    /// Background task registry, keyed by segment id
    tasks: DashMap<SegmentId, GenerationTask>,
}

impl GenerationOrchestrator {
    pub fn new(
        document: Document,
        generator: Arc<dyn SegmentGenerator>,
        config: GenerationConfig,
        options: GenerationOptions,
    ) -> Arc<Self> {
        let waiting = WaitingDialoguePool::new(config.enable_waiting_dialogues);
        Arc::new(Self {
            document: Arc::new(document),
            config,
            options,
            generator,
            events: Arc::new(SegmentEventBus::new()),
            waiting,
            segments: OnceLock::new(),
            content: DashMap::new(),
            tasks: DashMap::new(),
        })
    }

    /// Subscribe to segment lifecycle events.
    pub fn subscribe(
        &self,
        listener: impl Fn(&SegmentEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.events.subscribe(listener)
    }

    /// Blocking priority phase: generate every must-generate-first segment
    /// in priority order, then queue the rest.
    ///
    /// Any priority-segment failure is fatal: the error propagates and no
    /// playable content is returned.
    pub async fn generate_initial_content(
        self: &Arc<Self>,
        mut segments: Vec<Segment>,
    ) -> Result<InitialContent, GenerationError> {
        if segments.is_empty() {
            return Err(GenerationError::NothingToGenerate(
                self.document.title.clone(),
            ));
        }
        segments.sort_by_key(|s| s.priority);

        if self.segments.set(segments).is_err() {
            return Err(GenerationError::AlreadyStarted(
                self.document.id.to_string(),
            ));
        }
        let segments = self.run_segments();

        let mut initial = Vec::new();
        for segment in segments.iter().filter(|s| s.must_generate_first) {
            self.events.emit(&SegmentEvent::started(segment.id.clone()));
            tracing::info!(segment = %segment.id, "generating priority segment");

            let lines = match self
                .generator
                .generate(segment, &self.document, &self.options)
                .await
            {
                Ok(lines) => lines,
                Err(err) => {
                    self.events
                        .emit(&SegmentEvent::failed(segment.id.clone(), err.to_string()));
                    tracing::error!(segment = %segment.id, error = %err, "priority segment failed");
                    return Err(GenerationError::priority_failed(segment.id.clone(), err));
                }
            };

            let content = SegmentContent::new(segment.id.clone(), lines);
            self.events
                .emit(&SegmentEvent::completed(segment.id.clone(), content.lines.len()));
            self.content.insert(segment.id.clone(), content.clone());
            initial.push(content);
        }

        let mut queued = Vec::new();
        for segment in segments.iter().filter(|s| !s.must_generate_first) {
            let task = GenerationTask::new(
                segment.id.clone(),
                self.document.id,
                self.estimated_time_secs(segment),
            );
            self.tasks.insert(segment.id.clone(), task);
            queued.push(segment.id.clone());
        }

        let first_segment = segments
            .first()
            .map(|s| s.id.clone())
            .unwrap_or_else(|| SegmentId::new("segment_intro"));

        Ok(InitialContent {
            content: initial,
            queued_segments: queued,
            progress: self.progress(),
            game_ready: GameReadyHandle {
                orchestrator: Arc::clone(self),
                first_segment,
            },
        })
    }

    /// Detached background loop: strictly one task in flight at a time.
    ///
    /// Sequential processing is deliberate; it bounds load on the external
    /// generator and keeps ordering deterministic. `max_concurrent_tasks`
    /// is reserved and not honored here.
    async fn run_background(self: Arc<Self>) {
        tracing::info!(document = %self.document.id, "starting background generation loop");
        let delay = Duration::from_millis(self.config.background_task_delay_ms);

        for segment_id in self.queued_order() {
            self.process_task(&segment_id).await;
            // Throttle between tasks regardless of outcome.
            tokio::time::sleep(delay).await;
        }

        tracing::info!(document = %self.document.id, "background generation loop finished");
    }

    /// Run one background task to a terminal status, with bounded linear
    /// retry. A single segment's failure never blocks the next task.
    async fn process_task(&self, segment_id: &SegmentId) {
        let Some(segment) = self
            .run_segments()
            .iter()
            .find(|s| &s.id == segment_id)
            .cloned()
        else {
            return;
        };

        self.events.emit(&SegmentEvent::started(segment_id.clone()));

        let max_attempts = if self.config.retry_failed_segments {
            self.config.max_retry_attempts.max(1)
        } else {
            1
        };
        let base_delay = Duration::from_millis(self.config.background_task_delay_ms);

        loop {
            let attempt = {
                let Some(mut task) = self.tasks.get_mut(segment_id) else {
                    return;
                };
                task.start_attempt();
                task.attempts
            };

            match self
                .generator
                .generate(&segment, &self.document, &self.options)
                .await
            {
                Ok(lines) => {
                    let content = SegmentContent::new(segment_id.clone(), lines);
                    let count = content.lines.len();
                    self.content.insert(segment_id.clone(), content);
                    if let Some(mut task) = self.tasks.get_mut(segment_id) {
                        task.complete();
                    }
                    self.events
                        .emit(&SegmentEvent::completed(segment_id.clone(), count));
                    tracing::info!(segment = %segment_id, attempt, "background segment completed");
                    return;
                }
                Err(err) => {
                    if attempt >= max_attempts {
                        if let Some(mut task) = self.tasks.get_mut(segment_id) {
                            task.fail(err.to_string());
                        }
                        self.events
                            .emit(&SegmentEvent::failed(segment_id.clone(), err.to_string()));
                        tracing::error!(
                            segment = %segment_id,
                            attempts = attempt,
                            error = %err,
                            "background segment failed permanently"
                        );
                        return;
                    }
                    tracing::warn!(
                        segment = %segment_id,
                        attempt,
                        error = %err,
                        "background segment attempt failed; retrying"
                    );
                    // Linear backoff: delay x attempt number.
                    tokio::time::sleep(base_delay * attempt).await;
                }
            }
        }
    }

    /// Recompute the progress snapshot from current task and content state.
    ///
    /// Overall percentage is unit-weighted, not an unweighted segment count,
    /// so large segments do not misrepresent progress.
    pub fn progress(&self) -> GenerationProgress {
        let segments = self.run_segments();
        if segments.is_empty() {
            return GenerationProgress::empty();
        }

        let mut total_units: u64 = 0;
        let mut weighted: f64 = 0.0;
        let mut completed = 0usize;
        let mut remaining_secs: u64 = 0;
        let mut per_segment = Vec::with_capacity(segments.len());

        for segment in segments {
            let status = self.segment_status(&segment.id);
            let percent: u8 = match status {
                TaskStatus::Completed => 100,
                TaskStatus::Running => 50,
                TaskStatus::Queued | TaskStatus::Failed { .. } => 0,
            };
            if percent == 100 {
                completed += 1;
            } else {
                remaining_secs += self
                    .tasks
                    .get(&segment.id)
                    .map(|t| t.estimated_time_secs)
                    .unwrap_or_else(|| self.estimated_time_secs(segment));
            }

            let units = u64::from(segment.estimated_unit_count);
            total_units += units;
            weighted += units as f64 * f64::from(percent);

            let message = match &status {
                TaskStatus::Queued => "Waiting to generate".to_string(),
                TaskStatus::Running => "Generating...".to_string(),
                TaskStatus::Completed => "Ready".to_string(),
                TaskStatus::Failed { error } => format!("Failed: {}", error),
            };
            per_segment.push(SegmentProgress {
                segment_id: segment.id.clone(),
                status,
                percent,
                message,
            });
        }

        let overall = if total_units == 0 {
            0.0
        } else {
            weighted / total_units as f64
        };

        GenerationProgress {
            total_segments: segments.len(),
            completed_segments: completed,
            overall_progress: overall,
            can_start_game: overall >= self.config.min_start_percentage,
            segments: per_segment,
            estimated_remaining_secs: remaining_secs,
        }
    }

    /// Whether a segment's produced content is available for playback.
    pub fn is_segment_available(&self, segment_id: &SegmentId) -> bool {
        self.content.contains_key(segment_id)
    }

    /// Produced content for one segment, if generated.
    pub fn segment_content(&self, segment_id: &SegmentId) -> Option<SegmentContent> {
        self.content.get(segment_id).map(|c| c.clone())
    }

    /// All produced content in deterministic (segment-id-sorted) order.
    pub fn all_content(&self) -> Vec<SegmentContent> {
        let mut content: Vec<SegmentContent> =
            self.content.iter().map(|entry| entry.value().clone()).collect();
        content.sort_by(|a, b| a.segment_id.cmp(&b.segment_id));
        content
    }

    /// A waiting dialogue for the configured locale, if the pool is enabled.
    pub fn waiting_line(&self, context: WaitingContext) -> Option<WaitingDialogue> {
        self.waiting.pick(context, &self.options.locale).cloned()
    }

    fn run_segments(&self) -> &[Segment] {
        self.segments.get().map(Vec::as_slice).unwrap_or(&[])
    }

    fn queued_order(&self) -> Vec<SegmentId> {
        self.run_segments()
            .iter()
            .filter(|s| !s.must_generate_first)
            .map(|s| s.id.clone())
            .collect()
    }

    fn segment_status(&self, segment_id: &SegmentId) -> TaskStatus {
        if self.content.contains_key(segment_id) {
            return TaskStatus::Completed;
        }
        self.tasks
            .get(segment_id)
            .map(|t| t.status.clone())
            .unwrap_or(TaskStatus::Queued)
    }

    fn estimated_time_secs(&self, segment: &Segment) -> u64 {
        u64::from(segment.estimated_unit_count) * self.options.secs_per_unit
    }
}
