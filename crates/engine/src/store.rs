//! Progress & save store - persists and restores playback state per
//! document instance, decoupled from generation completeness.
//!
//! The store is the only component permitted to mutate persisted state.
//! All mutating operations on an unknown document id fail with a
//! descriptive error; there are no silent no-ops.

use std::sync::Arc;

use chrono::Utc;

use paperstage_domain::{
    DocumentId, GameInstance, GameSettings, PlaybackState, SaveData, SegmentId,
};

use crate::error::StoreError;
use crate::ports::StoragePort;

const KEY_PREFIX: &str = "paperstage_instance_";

/// Which save slot an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveSlot {
    /// A bounds-checked manual slot
    Manual(usize),
    /// The dedicated quick-save slot
    Quick,
    /// The dedicated auto-save slot
    Auto,
}

/// Storage-agnostic progress & save store.
pub struct ProgressSaveStore {
    storage: Arc<dyn StoragePort>,
    slot_count: usize,
}

impl ProgressSaveStore {
    pub fn new(storage: Arc<dyn StoragePort>, slot_count: usize) -> Self {
        Self {
            storage,
            slot_count,
        }
    }

    /// Create and persist a fresh instance with empty save slots and
    /// progress seeded at the first segment.
    pub async fn create_instance(
        &self,
        document_id: DocumentId,
        title: impl Into<String>,
    ) -> Result<GameInstance, StoreError> {
        let instance = GameInstance::new(document_id, title, self.slot_count);
        self.persist(&instance).await?;
        tracing::info!(document = %document_id, "created game instance");
        Ok(instance)
    }

    /// Fetch the instance for a document.
    pub async fn get_instance(&self, document_id: DocumentId) -> Result<GameInstance, StoreError> {
        let key = Self::key(document_id);
        let raw = self
            .storage
            .get(&key)
            .await?
            .ok_or_else(|| StoreError::unknown_instance(document_id))?;
        // Timestamps rehydrate from their ISO string form here.
        Ok(serde_json::from_str(&raw)?)
    }

    /// All persisted instances, in key order.
    pub async fn list_instances(&self) -> Result<Vec<GameInstance>, StoreError> {
        let mut instances = Vec::new();
        for key in self.storage.keys().await? {
            if !key.starts_with(KEY_PREFIX) {
                continue;
            }
            if let Some(raw) = self.storage.get(&key).await? {
                instances.push(serde_json::from_str(&raw)?);
            }
        }
        Ok(instances)
    }

    /// Remove an instance and all its saves.
    pub async fn delete_instance(&self, document_id: DocumentId) -> Result<(), StoreError> {
        // Existence check keeps the no-silent-no-op contract.
        self.get_instance(document_id).await?;
        self.storage.remove(&Self::key(document_id)).await
    }

    /// Write a manual save. Validates the slot index before any state is
    /// touched; the snapshot records the segments available at this moment.
    pub async fn save(
        &self,
        document_id: DocumentId,
        slot_index: usize,
        state: PlaybackState,
        screenshot: Option<String>,
        label: Option<String>,
    ) -> Result<(), StoreError> {
        let mut instance = self.get_instance(document_id).await?;
        let save = Self::snapshot(&instance, state, screenshot, label);
        instance.write_slot(slot_index, save)?;
        self.persist(&instance).await?;
        tracing::debug!(document = %document_id, slot = slot_index, "manual save written");
        Ok(())
    }

    /// Overwrite the quick-save slot.
    pub async fn quick_save(
        &self,
        document_id: DocumentId,
        state: PlaybackState,
    ) -> Result<(), StoreError> {
        let mut instance = self.get_instance(document_id).await?;
        instance.quick_save = Some(Self::snapshot(&instance, state, None, None));
        self.persist(&instance).await
    }

    /// Overwrite the auto-save slot.
    pub async fn auto_save(
        &self,
        document_id: DocumentId,
        state: PlaybackState,
    ) -> Result<(), StoreError> {
        let mut instance = self.get_instance(document_id).await?;
        instance.auto_save = Some(Self::snapshot(&instance, state, None, None));
        self.persist(&instance).await
    }

    /// Load a save. Fails if the instance or the slot is empty; does not
    /// mutate generation state, only `last_played_at`.
    pub async fn load(
        &self,
        document_id: DocumentId,
        slot: SaveSlot,
    ) -> Result<SaveData, StoreError> {
        let mut instance = self.get_instance(document_id).await?;
        let save = match slot {
            SaveSlot::Manual(index) => instance.read_slot(index)?.clone(),
            SaveSlot::Quick => instance
                .quick_save
                .clone()
                .ok_or_else(|| paperstage_domain::DomainError::empty_slot("quick"))?,
            SaveSlot::Auto => instance
                .auto_save
                .clone()
                .ok_or_else(|| paperstage_domain::DomainError::empty_slot("auto"))?,
        };
        instance.last_played_at = Utc::now();
        self.persist(&instance).await?;
        Ok(save)
    }

    /// Update the playback position within the current segment.
    pub async fn update_progress(
        &self,
        document_id: DocumentId,
        current_segment: SegmentId,
        position_in_segment: usize,
    ) -> Result<(), StoreError> {
        self.mutate(document_id, |instance| {
            instance.progress.current_segment = current_segment;
            instance.progress.position_in_segment = position_in_segment;
        })
        .await
    }

    /// Record that a segment's content has been produced and is playable.
    pub async fn add_available_segment(
        &self,
        document_id: DocumentId,
        segment_id: SegmentId,
    ) -> Result<(), StoreError> {
        self.mutate(document_id, |instance| {
            if !instance.progress.available_segments.contains(&segment_id) {
                instance.progress.available_segments.push(segment_id.clone());
            }
            instance.unlock_segment(segment_id);
        })
        .await
    }

    /// Record that the player finished a segment.
    pub async fn complete_segment(
        &self,
        document_id: DocumentId,
        segment_id: SegmentId,
    ) -> Result<(), StoreError> {
        self.mutate(document_id, |instance| {
            if !instance.progress.completed_segments.contains(&segment_id) {
                instance.progress.completed_segments.push(segment_id);
            }
        })
        .await
    }

    /// Replace the instance's display/audio settings.
    pub async fn update_settings(
        &self,
        document_id: DocumentId,
        settings: GameSettings,
    ) -> Result<(), StoreError> {
        self.mutate(document_id, |instance| {
            instance.settings = settings;
        })
        .await
    }

    /// Load-mutate-recompute-persist cycle shared by the partial mutations.
    async fn mutate(
        &self,
        document_id: DocumentId,
        apply: impl FnOnce(&mut GameInstance),
    ) -> Result<(), StoreError> {
        let mut instance = self.get_instance(document_id).await?;
        apply(&mut instance);
        instance.progress.recompute_total();
        instance.last_played_at = Utc::now();
        self.persist(&instance).await
    }

    async fn persist(&self, instance: &GameInstance) -> Result<(), StoreError> {
        let key = Self::key(instance.document_id);
        let json = serde_json::to_string(instance)?;
        self.storage.set(&key, json).await
    }

    fn snapshot(
        instance: &GameInstance,
        state: PlaybackState,
        screenshot: Option<String>,
        label: Option<String>,
    ) -> SaveData {
        SaveData {
            label,
            screenshot,
            saved_at: Utc::now(),
            current_segment: state.current_segment,
            current_scene: state.current_scene,
            current_position: state.current_position,
            variables: state.variables,
            history: state.history,
            progress: instance.progress.clone(),
            // Captured now so a later load never references a segment the
            // generator had not yet produced.
            available_segments: instance.progress.available_segments.clone(),
        }
    }

    fn key(document_id: DocumentId) -> String {
        format!("{}{}", KEY_PREFIX, document_id)
    }
}
