//! Tracking Cache Definition of Done (DoD) Integration Tests
//!
//! Exercises the cache through its public API against the in-memory store,
//! which follows the reference backend's semantics (md5-of-link IDs).

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use jobtrack_core::application::{derive_id, ApplicationRef, TrackOutcome, TrackingCache, UntrackOutcome};
use jobtrack_core::domain::{Application, ApplicationStatus, Job, NotificationKind};
use jobtrack_core::port::application_store::mocks::InMemoryApplicationStore;
use jobtrack_core::port::notification_sink::mocks::RecordingSink;
use jobtrack_core::port::time_provider::mocks::StepClock;
use jobtrack_core::port::StoreError;
use jobtrack_core::AppError;

fn setup() -> (TrackingCache, Arc<InMemoryApplicationStore>, Arc<RecordingSink>) {
    let store = Arc::new(InMemoryApplicationStore::with_clock(Arc::new(
        StepClock::starting_2024(),
    )));
    let sink = Arc::new(RecordingSink::new());
    let cache = TrackingCache::new(store.clone(), sink.clone());
    (cache, store, sink)
}

fn sample_job() -> Job {
    let mut job = Job::new("C", "T", "L", "https://a/b", "M");
    job.new = true;
    job
}

fn id_set(cache: &TrackingCache) -> HashSet<String> {
    cache.applications().into_iter().map(|a| a.id).collect()
}

/// DoD 1: End-to-end scenario against an empty store
#[tokio::test]
async fn test_end_to_end_scenario() {
    let (cache, _store, sink) = setup();

    assert_eq!(cache.load().await.unwrap(), 0);
    let state = cache.snapshot();
    assert!(state.applications().is_empty());
    assert!(state.tracked_ids().is_empty());

    let TrackOutcome::Tracked(created) = cache.track(&sample_job()).await.unwrap() else {
        panic!("expected a new application");
    };
    assert_eq!(cache.applications().len(), 1);
    assert_eq!(created.status, ApplicationStatus::Interested);

    let updated = cache
        .update_status(created.id.as_str(), ApplicationStatus::Interview)
        .await
        .unwrap();
    let cached = cache.find(&ApplicationRef::from(created.id.as_str())).unwrap();
    assert_eq!(cached.status, ApplicationStatus::Interview);
    assert!(updated.last_update > created.last_update);

    let outcome = cache.untrack(created.id.as_str()).await.unwrap();
    assert_eq!(outcome, UntrackOutcome::Removed(created.id.clone()));
    assert!(cache.applications().is_empty());
    assert!(cache.snapshot().tracked_ids().is_empty());

    assert_eq!(sink.count_of(NotificationKind::Success), 3);
    assert_eq!(sink.count_of(NotificationKind::Error), 0);

    println!("✅ DoD 1: load → track → update status → untrack");
}

/// DoD 2: Tracking the same link twice leaves one application
#[tokio::test]
async fn test_track_is_idempotent() {
    let (cache, store, sink) = setup();
    cache.load().await.unwrap();

    cache.track(&sample_job()).await.unwrap();
    let second = cache.track(&sample_job()).await.unwrap();

    assert!(matches!(second, TrackOutcome::AlreadyTracked(_)));
    assert_eq!(cache.applications().len(), 1);
    assert_eq!(store.stored().len(), 1);

    let last = sink.last().unwrap();
    assert_eq!(last.kind, NotificationKind::Info);

    println!("✅ DoD 2: second track is informational");
}

/// DoD 3: Derived IDs are deterministic and well-formed
#[test]
fn test_identity_determinism() {
    let inputs = [
        "",
        "https://x/y",
        "https://example.com/offre/ingénieur-système",
        "日本語のリンク",
        "a",
    ];

    for input in inputs {
        let first = derive_id(input);
        assert_eq!(first, derive_id(input));
        assert!(first.len() <= 16);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    assert_eq!(derive_id(""), "");
    assert_eq!(derive_id("https://x/y"), "aHR0cHM6Ly94L3k");
    assert_eq!(
        derive_id("https://example.com/offre/ingénieur-système"),
        "aHR0cHM6Ly9leGFt"
    );

    println!("✅ DoD 3: derive_id is pure");
}

/// DoD 4: tracked_ids mirrors applications after every operation
#[tokio::test]
async fn test_index_invariant_holds() {
    let (cache, store, _sink) = setup();
    store.seed(Application::new("SRV1", Job::new("C", "T", "L", "https://a/1", "M"), Utc::now()));

    let check = |cache: &TrackingCache| {
        let state = cache.snapshot();
        let ids: HashSet<String> = state.applications().iter().map(|a| a.id.clone()).collect();
        assert_eq!(&ids, state.tracked_ids());
    };

    cache.load().await.unwrap();
    check(&cache);

    for n in 2..5 {
        let job = Job::new("C", "T", "L", format!("https://a/{n}"), "M");
        cache.track(&job).await.unwrap();
        check(&cache);
    }

    cache.update_notes("SRV1", "ping recruiter").await.unwrap();
    check(&cache);

    store.fail_next(StoreError::Transport("connection reset".to_string()));
    let _ = cache.untrack("SRV1").await;
    check(&cache);

    cache.untrack("SRV1").await.unwrap();
    check(&cache);

    cache.untrack("never-existed").await.unwrap();
    check(&cache);

    println!("✅ DoD 4: tracked_ids == ids(applications)");
}

/// DoD 5: track then untrack restores the original ID set
#[tokio::test]
async fn test_round_trip() {
    let (cache, store, _sink) = setup();
    store.seed(Application::new("SRV1", Job::new("C", "T", "L", "https://a/1", "M"), Utc::now()));
    cache.load().await.unwrap();
    let before = id_set(&cache);

    let TrackOutcome::Tracked(created) = cache.track(&sample_job()).await.unwrap() else {
        panic!("expected a new application");
    };
    cache.untrack(created.id).await.unwrap();

    assert_eq!(id_set(&cache), before);

    println!("✅ DoD 5: round trip");
}

/// DoD 6: Derived ID resolves to the store ID
#[tokio::test]
async fn test_reconciliation_through_cache() {
    let (cache, store, _sink) = setup();
    store.seed(Application::new("SRV123", Job::new("C", "T", "L", "https://x/y", "M"), Utc::now()));
    cache.load().await.unwrap();

    let derived = derive_id("https://x/y");
    assert_ne!(derived, "SRV123");

    let updated = cache
        .update_status(derived.as_str(), ApplicationStatus::Applied)
        .await
        .unwrap();
    assert_eq!(updated.id, "SRV123");

    let outcome = cache.untrack(ApplicationRef::Link("https://x/y".to_string())).await.unwrap();
    assert_eq!(outcome, UntrackOutcome::Removed("SRV123".to_string()));

    println!("✅ DoD 6: legacy IDs reconcile");
}

/// DoD 7: Any status may move to any status
#[tokio::test]
async fn test_status_transition_freedom() {
    let (cache, _store, _sink) = setup();
    cache.load().await.unwrap();
    let TrackOutcome::Tracked(app) = cache.track(&sample_job()).await.unwrap() else {
        panic!("expected a new application");
    };

    for from in ApplicationStatus::ALL {
        for to in ApplicationStatus::ALL {
            cache.update_status(app.id.as_str(), from).await.unwrap();
            let updated = cache.update_status(app.id.as_str(), to).await.unwrap();
            assert_eq!(updated.status, to, "{from} -> {to}");
        }
    }

    cache.update_status(app.id.as_str(), ApplicationStatus::Offer).await.unwrap();
    cache
        .update_status(app.id.as_str(), ApplicationStatus::Interested)
        .await
        .unwrap();
    let card = cache.find(&ApplicationRef::from(app.id.as_str())).unwrap();
    assert_eq!(card.status, ApplicationStatus::Interested);

    println!("✅ DoD 7: Offer → Interested allowed");
}

/// DoD 8: A failed notes update leaves prior notes untouched
#[tokio::test]
async fn test_failure_isolation() {
    let (cache, store, sink) = setup();
    cache.load().await.unwrap();
    let TrackOutcome::Tracked(app) = cache.track(&sample_job()).await.unwrap() else {
        panic!("expected a new application");
    };
    cache.update_notes(app.id.as_str(), "first call done").await.unwrap();

    store.fail_next(StoreError::Transport("connection refused".to_string()));
    let err = cache
        .update_notes(app.id.as_str(), "second call scheduled")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Store(StoreError::Transport(_))));

    let cached = cache.find(&ApplicationRef::from(app.id.as_str())).unwrap();
    assert_eq!(cached.notes.as_deref(), Some("first call done"));
    assert!(cache.error().is_some());
    assert!(!cache.is_loading());
    assert_eq!(sink.last().unwrap().kind, NotificationKind::Error);

    println!("✅ DoD 8: failure isolation");
}

/// Two cache instances are independent sessions
#[tokio::test]
async fn test_sessions_do_not_share_state() {
    let store = Arc::new(InMemoryApplicationStore::new());
    let first = TrackingCache::new(store.clone(), Arc::new(RecordingSink::new()));
    let second = TrackingCache::new(store.clone(), Arc::new(RecordingSink::new()));

    first.track(&sample_job()).await.unwrap();

    assert_eq!(first.applications().len(), 1);
    assert!(second.applications().is_empty());

    second.load().await.unwrap();
    assert_eq!(second.applications().len(), 1);
}

/// Links sharing a derived ID never redirect a mutation to another application
#[tokio::test]
async fn test_untracked_link_does_not_touch_colliding_application() {
    let (cache, store, _sink) = setup();
    let tracked = "https://www.a.com/1";
    let untracked = "https://www.b.com/2";
    assert_eq!(derive_id(tracked), derive_id(untracked));

    store.seed(Application::new("SRV-A", Job::new("C", "T", "L", tracked, "M"), Utc::now()));
    cache.load().await.unwrap();

    let target = ApplicationRef::Link(untracked.to_string());
    assert!(cache.find(&target).is_none());

    assert!(cache
        .update_status(target.clone(), ApplicationStatus::Rejected)
        .await
        .is_err());
    let outcome = cache.untrack(target).await.unwrap();
    assert_eq!(outcome, UntrackOutcome::AlreadyGone(derive_id(untracked)));

    let cached = cache.find(&ApplicationRef::from("SRV-A")).unwrap();
    assert_eq!(cached.status, ApplicationStatus::Interested);
    assert_eq!(store.stored().len(), 1);
    assert_eq!(store.stored()[0].status, ApplicationStatus::Interested);
}
