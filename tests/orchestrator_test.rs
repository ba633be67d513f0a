mod common;

use std::sync::Arc;

use clouder::{
    error::{ProviderError, ProviderErrorBody, ServiceError},
    management::{PlaylistOrchestrator, ResponseCache},
    types::{MESSAGE_ALREADY_IN_TARGET, MESSAGE_MOVED, MoveTrackRequest},
    utils,
};
use common::{Call, CountingStore, RecordingProvider, add, remove};
use serde_json::json;

fn orchestrator(
    store: Arc<CountingStore>,
    provider: Arc<RecordingProvider>,
) -> PlaylistOrchestrator {
    PlaylistOrchestrator::new(store, provider, Arc::new(ResponseCache::new()))
}

fn request(source: &str, target: &str, trash: &str) -> MoveTrackRequest {
    MoveTrackRequest {
        track_id: "TRACK".into(),
        source_playlist_id: source.into(),
        target_playlist_id: target.into(),
        trash_playlist_id: trash.into(),
    }
}

async fn run_move(source: &str, target: &str, trash: &str) -> (String, Vec<Call>) {
    let provider = Arc::new(RecordingProvider::new());
    let service = orchestrator(Arc::new(CountingStore::new()), Arc::clone(&provider));
    let response = service
        .move_track("token", &request(source, target, trash))
        .await
        .unwrap();
    (response.message, provider.calls())
}

#[tokio::test]
async fn test_move_to_same_playlist_makes_no_calls() {
    for trash in ["A", "B"] {
        let (message, calls) = run_move("A", "A", trash).await;
        assert_eq!(message, MESSAGE_ALREADY_IN_TARGET);
        assert!(calls.is_empty(), "unexpected calls for trash={trash}: {calls:?}");
    }
}

#[tokio::test]
async fn test_move_with_distinct_playlists_makes_three_ordered_calls() {
    let (message, calls) = run_move("A", "B", "C").await;
    assert_eq!(message, MESSAGE_MOVED);
    assert_eq!(calls, vec![add("B"), add("C"), remove("A")]);
}

#[tokio::test]
async fn test_move_when_trash_is_target_adds_once() {
    let (message, calls) = run_move("A", "B", "B").await;
    assert_eq!(message, MESSAGE_MOVED);
    assert_eq!(calls, vec![add("B"), remove("A")]);
}

#[tokio::test]
async fn test_move_when_trash_is_source_keeps_source() {
    let (message, calls) = run_move("A", "B", "A").await;
    assert_eq!(message, MESSAGE_MOVED);
    assert_eq!(calls, vec![add("B"), add("A")]);
}

#[tokio::test]
async fn test_move_never_removes_what_it_just_added() {
    for (source, target, trash) in [("A", "B", "C"), ("A", "B", "B"), ("A", "B", "A")] {
        let (_, calls) = run_move(source, target, trash).await;

        // add-target first, removal (if any) last
        assert_eq!(calls.first(), Some(&add(target)));
        for (i, call) in calls.iter().enumerate() {
            if let Call::Remove(playlist) = call {
                assert_eq!(i, calls.len() - 1);
                assert!(!calls[..i].contains(&add(playlist)));
            }
        }
    }
}

#[tokio::test]
async fn test_failed_target_add_aborts_move() {
    let error = ProviderError::new(
        403,
        ProviderErrorBody::Json(json!({"error": {"status": 403, "message": "Forbidden"}})),
    );
    let provider = Arc::new(RecordingProvider::failing_on(add("B"), error.clone()));
    let service = orchestrator(Arc::new(CountingStore::new()), Arc::clone(&provider));

    let err = service
        .move_track("token", &request("A", "B", "C"))
        .await
        .unwrap_err();

    assert_eq!(err, error);
    assert_eq!(provider.calls(), vec![add("B")]);
}

#[tokio::test]
async fn test_failed_trash_add_leaves_source_untouched() {
    let provider = Arc::new(RecordingProvider::failing_on(
        add("C"),
        ProviderError::internal(),
    ));
    let service = orchestrator(Arc::new(CountingStore::new()), Arc::clone(&provider));

    let err = service
        .move_track("token", &request("A", "B", "C"))
        .await
        .unwrap_err();

    assert_eq!(err.status, 500);
    assert_eq!(provider.calls(), vec![add("B"), add("C")]);
}

#[tokio::test]
async fn test_failed_removal_propagates_after_adds() {
    let error = ProviderError::new(404, ProviderErrorBody::Text("Not found".into()));
    let provider = Arc::new(RecordingProvider::failing_on(remove("A"), error.clone()));
    let service = orchestrator(Arc::new(CountingStore::new()), Arc::clone(&provider));

    let err = service
        .move_track("token", &request("A", "B", "C"))
        .await
        .unwrap_err();

    assert_eq!(err, error);
    assert_eq!(provider.calls(), vec![add("B"), add("C"), remove("A")]);
}

#[tokio::test]
async fn test_list_weeks_reads_store_every_time() {
    let store = Arc::new(CountingStore::new().with("clouder_weeks", common::weeks()));
    let service = orchestrator(Arc::clone(&store), Arc::new(RecordingProvider::new()));

    let weeks = service.list_weeks().await.unwrap();
    service.list_weeks().await.unwrap();

    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[0].week_id, "2025-W14");
    assert_eq!(weeks[0].start_date.to_string(), "2025-03-29");
    assert_eq!(store.queries(), 2);
}

#[tokio::test]
async fn test_list_weeks_fails_on_malformed_date() {
    let store = Arc::new(CountingStore::new().with(
        "clouder_weeks",
        json!([
            {"week_id": "2025-W14", "start_date": "2025-03-29", "end_date": "2025-04-04"},
            {"week_id": "2025-W15", "start_date": "next saturday", "end_date": "2025-04-11"}
        ]),
    ));
    let service = orchestrator(store, Arc::new(RecordingProvider::new()));

    let err = service.list_weeks().await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_cached_playlists_are_served_without_store_query() {
    let store = Arc::new(CountingStore::new().with("sp_playlists", common::playlists()));
    let service = orchestrator(Arc::clone(&store), Arc::new(RecordingProvider::new()));

    let first = service
        .list_playlists_for_week("2025-W14", true)
        .await
        .unwrap();
    let second = service
        .list_playlists_for_week("2025-W14", true)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
    assert_eq!(first.len(), 2);
    assert_eq!(store.queries(), 1);
}

#[tokio::test]
async fn test_uncached_playlists_always_query_store() {
    let store = Arc::new(CountingStore::new().with("sp_playlists", common::playlists()));
    let service = orchestrator(Arc::clone(&store), Arc::new(RecordingProvider::new()));

    service
        .list_playlists_for_week("2025-W14", true)
        .await
        .unwrap();
    service
        .list_playlists_for_week("2025-W14", false)
        .await
        .unwrap();
    service
        .list_playlists_for_week("2025-W14", false)
        .await
        .unwrap();

    assert_eq!(store.queries(), 3);
}

#[tokio::test]
async fn test_uncached_call_does_not_populate_cache() {
    let store = Arc::new(CountingStore::new().with("sp_playlists", common::playlists()));
    let service = orchestrator(Arc::clone(&store), Arc::new(RecordingProvider::new()));

    service
        .list_playlists_for_week("2025-W14", false)
        .await
        .unwrap();

    assert!(service.cache().is_empty().await);
}

#[tokio::test]
async fn test_playlist_extra_fields_pass_through() {
    let store = Arc::new(CountingStore::new().with("sp_playlists", common::playlists()));
    let service = orchestrator(store, Arc::new(RecordingProvider::new()));

    let playlists = service
        .list_playlists_for_week("2025-W14", true)
        .await
        .unwrap();

    let techno = &playlists[0];
    assert_eq!(techno.playlist_id, "PL1");
    assert_eq!(techno.extra.get("followers"), Some(&json!(12)));
    assert!(!techno.extra.contains_key("_id"));
}

#[tokio::test]
async fn test_playlist_missing_required_field_fails_list() {
    let store = Arc::new(CountingStore::new().with(
        "sp_playlists",
        json!([
            {
                "playlist_id": "PL1",
                "playlist_name": "W14 Techno",
                "week_id": "2025-W14",
                "curated_name": "Techno",
                "curated_type": "genre"
            },
            {
                "playlist_id": "PL2",
                "week_id": "2025-W14",
                "curated_name": "Trash",
                "curated_type": "trash"
            }
        ]),
    ));
    let service = orchestrator(store, Arc::new(RecordingProvider::new()));

    let err = service
        .list_playlists_for_week("2025-W14", true)
        .await
        .unwrap_err();

    match err {
        ServiceError::Validation(e) => {
            assert_eq!(e.collection, "sp_playlists");
            assert!(e.reason.contains("playlist_name"), "{}", e.reason);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_stale_cache_entry_is_revalidated() {
    let store = Arc::new(CountingStore::new().with("sp_playlists", common::playlists()));
    let service = orchestrator(Arc::clone(&store), Arc::new(RecordingProvider::new()));

    service
        .cache()
        .insert(
            utils::playlists_by_week_key("2025-W14"),
            json!([{"playlist_id": "PL1"}]),
        )
        .await;

    let err = service
        .list_playlists_for_week("2025-W14", true)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(store.queries(), 0);

    // bypassing the cache still works
    let fresh = service
        .list_playlists_for_week("2025-W14", false)
        .await
        .unwrap();
    assert_eq!(fresh.len(), 2);
}

#[tokio::test]
async fn test_unknown_playlist_is_never_cached() {
    let store = Arc::new(CountingStore::new().with("sp_playlists", common::playlists()));
    let service = orchestrator(Arc::clone(&store), Arc::new(RecordingProvider::new()));

    let first = service
        .get_week_for_playlist("unknown-id", true)
        .await
        .unwrap();
    let second = service
        .get_week_for_playlist("unknown-id", true)
        .await
        .unwrap();

    assert_eq!(first.week_id, None);
    assert_eq!(second.week_id, None);
    assert_eq!(store.queries(), 2);
    assert!(service.cache().is_empty().await);
}

#[tokio::test]
async fn test_known_playlist_week_is_cached() {
    let store = Arc::new(CountingStore::new().with("sp_playlists", common::playlists()));
    let service = orchestrator(Arc::clone(&store), Arc::new(RecordingProvider::new()));

    let first = service.get_week_for_playlist("PL3", true).await.unwrap();
    let second = service.get_week_for_playlist("PL3", true).await.unwrap();

    assert_eq!(first.week_id.as_deref(), Some("2025-W15"));
    assert_eq!(first, second);
    assert_eq!(store.queries(), 1);
    assert_eq!(
        service
            .cache()
            .get(&utils::week_by_playlist_key("PL3"))
            .await,
        Some(json!({"clouder_week": "2025-W15"}))
    );
}

#[tokio::test]
async fn test_first_matching_record_wins() {
    let store = Arc::new(CountingStore::new().with(
        "sp_playlists",
        json!([
            {"playlist_id": "PL1", "week_id": "2025-W14"},
            {"playlist_id": "PL1", "week_id": "2025-W15"}
        ]),
    ));
    let service = orchestrator(store, Arc::new(RecordingProvider::new()));

    let week = service.get_week_for_playlist("PL1", false).await.unwrap();
    assert_eq!(week.week_id.as_deref(), Some("2025-W14"));
}

#[tokio::test]
async fn test_playlist_without_week_is_a_validation_error() {
    let store = Arc::new(
        CountingStore::new().with("sp_playlists", json!([{"playlist_id": "PL1", "week_id": 14}])),
    );
    let service = orchestrator(store, Arc::new(RecordingProvider::new()));

    let err = service.get_week_for_playlist("PL1", true).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert!(service.cache().is_empty().await);
}
