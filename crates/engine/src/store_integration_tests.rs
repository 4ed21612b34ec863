//! Save/load round-trip tests for the progress & save store.

use std::collections::HashMap;
use std::sync::Arc;

use paperstage_domain::{DocumentId, DomainError, GameSettings, PlaybackState, SegmentId};

use crate::error::StoreError;
use crate::ports::{MockStoragePort, StoragePort};
use crate::storage::{FileStorage, MemoryStorage};
use crate::store::{ProgressSaveStore, SaveSlot};

fn store() -> ProgressSaveStore {
    ProgressSaveStore::new(Arc::new(MemoryStorage::new()), 10)
}

fn playback_state() -> PlaybackState {
    let mut variables = HashMap::new();
    variables.insert("met_navi".to_string(), serde_json::json!(true));
    variables.insert("score".to_string(), serde_json::json!(42));
    PlaybackState {
        current_segment: SegmentId::new("segment_methods"),
        current_scene: 2,
        current_position: 17,
        variables,
        history: vec!["Welcome!".to_string(), "Let's begin.".to_string()],
    }
}

#[tokio::test]
async fn save_load_roundtrip_preserves_playback_state() {
    let store = store();
    let document_id = DocumentId::new();
    store
        .create_instance(document_id, "Attention Is All You Need")
        .await
        .expect("create");
    store
        .add_available_segment(document_id, SegmentId::new("segment_intro"))
        .await
        .expect("available intro");
    store
        .add_available_segment(document_id, SegmentId::new("segment_methods"))
        .await
        .expect("available methods");

    let state = playback_state();
    store
        .save(document_id, 3, state.clone(), None, Some("before results".to_string()))
        .await
        .expect("save");

    let loaded = store
        .load(document_id, SaveSlot::Manual(3))
        .await
        .expect("load");

    assert_eq!(loaded.current_segment, state.current_segment);
    assert_eq!(loaded.current_scene, state.current_scene);
    assert_eq!(loaded.current_position, state.current_position);
    assert_eq!(loaded.variables, state.variables);
    assert_eq!(loaded.history, state.history);
    assert_eq!(loaded.label.as_deref(), Some("before results"));
    // The save never references a segment that was not yet available.
    assert_eq!(
        loaded.available_segments,
        vec![
            SegmentId::new("segment_intro"),
            SegmentId::new("segment_methods")
        ]
    );
}

#[tokio::test]
async fn saving_to_slot_ten_of_ten_is_rejected_without_mutation() {
    let store = store();
    let document_id = DocumentId::new();
    store
        .create_instance(document_id, "t")
        .await
        .expect("create");

    let result = store
        .save(document_id, 10, playback_state(), None, None)
        .await;
    assert!(matches!(
        result,
        Err(StoreError::Domain(DomainError::SlotOutOfRange {
            index: 10,
            slot_count: 10
        }))
    ));

    // No state was mutated: every slot is still empty.
    let instance = store.get_instance(document_id).await.expect("get");
    assert!(instance.save_slots.iter().all(Option::is_none));
}

#[tokio::test]
async fn operations_on_unknown_documents_fail_loudly() {
    let store = store();
    let unknown = DocumentId::new();

    assert!(matches!(
        store.save(unknown, 0, playback_state(), None, None).await,
        Err(StoreError::UnknownInstance(_))
    ));
    assert!(matches!(
        store.quick_save(unknown, playback_state()).await,
        Err(StoreError::UnknownInstance(_))
    ));
    assert!(matches!(
        store.load(unknown, SaveSlot::Auto).await,
        Err(StoreError::UnknownInstance(_))
    ));
    assert!(matches!(
        store
            .update_progress(unknown, SegmentId::new("segment_intro"), 0)
            .await,
        Err(StoreError::UnknownInstance(_))
    ));
    assert!(matches!(
        store.delete_instance(unknown).await,
        Err(StoreError::UnknownInstance(_))
    ));
}

#[tokio::test]
async fn loading_an_empty_slot_fails() {
    let store = store();
    let document_id = DocumentId::new();
    store
        .create_instance(document_id, "t")
        .await
        .expect("create");

    assert!(matches!(
        store.load(document_id, SaveSlot::Manual(0)).await,
        Err(StoreError::Domain(DomainError::EmptySlot(_)))
    ));
    assert!(matches!(
        store.load(document_id, SaveSlot::Quick).await,
        Err(StoreError::Domain(DomainError::EmptySlot(_)))
    ));
}

#[tokio::test]
async fn quick_and_auto_saves_always_overwrite() {
    let store = store();
    let document_id = DocumentId::new();
    store
        .create_instance(document_id, "t")
        .await
        .expect("create");

    let mut first = playback_state();
    first.current_position = 1;
    store
        .quick_save(document_id, first)
        .await
        .expect("first quick save");

    let mut second = playback_state();
    second.current_position = 99;
    store
        .quick_save(document_id, second)
        .await
        .expect("second quick save");
    store
        .auto_save(document_id, playback_state())
        .await
        .expect("auto save");

    let quick = store
        .load(document_id, SaveSlot::Quick)
        .await
        .expect("load quick");
    assert_eq!(quick.current_position, 99);
    assert!(store.load(document_id, SaveSlot::Auto).await.is_ok());
}

#[tokio::test]
async fn partial_mutations_recompute_total_progress() {
    let store = store();
    let document_id = DocumentId::new();
    store
        .create_instance(document_id, "t")
        .await
        .expect("create");

    store
        .add_available_segment(document_id, SegmentId::new("segment_intro"))
        .await
        .expect("available intro");
    store
        .add_available_segment(document_id, SegmentId::new("segment_methods"))
        .await
        .expect("available methods");
    store
        .complete_segment(document_id, SegmentId::new("segment_intro"))
        .await
        .expect("complete intro");

    let instance = store.get_instance(document_id).await.expect("get");
    assert_eq!(instance.progress.total_progress, 50.0);
    // Availability also unlocks the segment for replay.
    assert!(instance
        .unlocked_segments
        .contains(&SegmentId::new("segment_intro")));

    store
        .update_progress(document_id, SegmentId::new("segment_methods"), 5)
        .await
        .expect("update position");
    let instance = store.get_instance(document_id).await.expect("get");
    assert_eq!(
        instance.progress.current_segment,
        SegmentId::new("segment_methods")
    );
    assert_eq!(instance.progress.position_in_segment, 5);
}

#[tokio::test]
async fn settings_update_is_persisted() {
    let store = store();
    let document_id = DocumentId::new();
    store
        .create_instance(document_id, "t")
        .await
        .expect("create");

    let settings = GameSettings {
        text_speed: 80,
        auto_mode: true,
        master_volume: 30,
        voice_volume: 60,
        locale: "zh".to_string(),
    };
    store
        .update_settings(document_id, settings.clone())
        .await
        .expect("update settings");

    let instance = store.get_instance(document_id).await.expect("get");
    assert_eq!(instance.settings, settings);
}

#[tokio::test]
async fn instances_can_be_listed_and_deleted() {
    let store = store();
    let first = DocumentId::new();
    let second = DocumentId::new();
    store.create_instance(first, "one").await.expect("create");
    store.create_instance(second, "two").await.expect("create");

    assert_eq!(store.list_instances().await.expect("list").len(), 2);

    store.delete_instance(first).await.expect("delete");
    let remaining = store.list_instances().await.expect("list");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].document_id, second);
}

#[tokio::test]
async fn instances_survive_a_store_restart_on_file_storage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let document_id = DocumentId::new();

    {
        let storage = Arc::new(FileStorage::new(dir.path()).await.expect("storage"));
        let store = ProgressSaveStore::new(storage, 10);
        store
            .create_instance(document_id, "persistent")
            .await
            .expect("create");
        store
            .quick_save(document_id, playback_state())
            .await
            .expect("quick save");
    }

    let storage = Arc::new(FileStorage::new(dir.path()).await.expect("reopen"));
    let store = ProgressSaveStore::new(storage, 10);
    let instance = store.get_instance(document_id).await.expect("rehydrate");
    assert_eq!(instance.title, "persistent");
    // Timestamps come back from their ISO string form.
    assert!(instance.created_at <= instance.last_played_at);
    let quick = store
        .load(document_id, SaveSlot::Quick)
        .await
        .expect("load quick");
    assert_eq!(quick.current_position, 17);
}

#[tokio::test]
async fn storage_backend_failures_propagate() {
    let mut storage = MockStoragePort::new();
    storage
        .expect_get()
        .returning(|_| Err(StoreError::storage("disk on fire")));
    let store = ProgressSaveStore::new(Arc::new(storage), 10);

    let result = store.get_instance(DocumentId::new()).await;
    assert!(matches!(result, Err(StoreError::Storage(_))));
}

#[tokio::test]
async fn memory_storage_satisfies_the_port_contract() {
    let storage: Arc<dyn StoragePort> = Arc::new(MemoryStorage::new());
    storage
        .set("k", "v".to_string())
        .await
        .expect("set");
    assert_eq!(storage.size().await.expect("size"), 1);
    assert_eq!(storage.get("k").await.expect("get"), Some("v".to_string()));
}
