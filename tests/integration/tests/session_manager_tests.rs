//! Session manager scenarios
//!
//! Run on tokio's paused clock; every sleep advances virtual time only.
//!
//! Run with: cargo test -p integration-tests --test session_manager_tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use botgate_core::Intents;
use botgate_gateway::{EventHandler, EventHandlers, GatewayError, SessionManager};
use integration_tests::*;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

fn new_manager(factory: MockTransportFactory) -> (SessionManager, Arc<Recorder>) {
    let recorder = factory.recorder();
    (SessionManager::new(Arc::new(factory)), recorder)
}

fn no_handlers() -> Arc<EventHandlers> {
    Arc::new(EventHandlers::new())
}

// ============================================================================
// Preconditions
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_quota_exceeded_fails_without_connecting() {
    let (manager, recorder) = new_manager(MockTransportFactory::new());

    let result = manager
        .start(
            CancellationToken::new(),
            &exhausted_access_point(4, 3),
            &bot_token(),
            no_handlers(),
        )
        .await;

    assert!(matches!(
        result,
        Err(GatewayError::SessionLimit {
            shards: 4,
            remaining: 3
        })
    ));
    assert_eq!(recorder.launch_count(), 0);
}

// ============================================================================
// Launch cadence
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_shards_launch_spaced_by_interval() {
    let factory = MockTransportFactory::new().with_connect_delay(Duration::from_secs(5));
    let (manager, recorder) = new_manager(factory);
    let running = spawn_manager(manager, access_point(3, 1), bot_token(), no_handlers());

    tokio::time::sleep(Duration::from_secs(7)).await;

    let launches = recorder.launches();
    assert_eq!(launches.len(), 3);
    assert_eq!(
        launches.iter().map(|(shard, _)| *shard).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    for pair in launches.windows(2) {
        assert_eq!(pair[1].1 - pair[0].1, Duration::from_secs(2));
    }

    assert!(running.shutdown().await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_higher_concurrency_shortens_interval() {
    let (manager, recorder) = new_manager(MockTransportFactory::new());
    let running = spawn_manager(manager, access_point(4, 2), bot_token(), no_handlers());

    tokio::time::sleep(Duration::from_millis(4500)).await;

    let launches = recorder.launches();
    assert_eq!(launches.len(), 4);
    for pair in launches.windows(2) {
        assert_eq!(pair[1].1 - pair[0].1, Duration::from_secs(1));
    }

    assert!(running.shutdown().await.is_ok());
}

// ============================================================================
// Reconnect classification
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_transient_error_resumes_with_same_identity() {
    let factory = MockTransportFactory::new().script(
        0,
        [Step::fail_after("sess-1", 42, GatewayError::NeedReconnect)],
    );
    let (manager, recorder) = new_manager(factory);
    let running = spawn_manager(manager, access_point(1, 1), bot_token(), no_handlers());

    tokio::time::sleep(Duration::from_secs(5)).await;

    let handshakes = recorder.handshakes();
    assert_eq!(handshakes.len(), 2);
    assert_eq!(handshakes[0].kind, HandshakeKind::Identify);
    assert_eq!(handshakes[1].kind, HandshakeKind::Resume);
    assert_eq!(handshakes[1].session_id, "sess-1");
    assert_eq!(handshakes[1].seq, 42);

    assert!(running.shutdown().await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_unknown_close_code_is_transient() {
    let factory =
        MockTransportFactory::new().script(0, [Step::fail_after("sess-2", 7, closed(4009))]);
    let (manager, recorder) = new_manager(factory);
    let running = spawn_manager(manager, access_point(1, 1), bot_token(), no_handlers());

    tokio::time::sleep(Duration::from_secs(5)).await;

    let handshakes = recorder.handshakes();
    assert_eq!(handshakes[1].kind, HandshakeKind::Resume);
    assert_eq!(handshakes[1].session_id, "sess-2");
    assert_eq!(handshakes[1].seq, 7);

    assert!(running.shutdown().await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_invalid_session_clears_identity() {
    let factory = MockTransportFactory::new().script(
        0,
        [
            Step::fail_after("sess-1", 42, GatewayError::InvalidSession),
            Step::fail_after("sess-2", 3, closed(4007)),
        ],
    );
    let (manager, recorder) = new_manager(factory);
    let running = spawn_manager(manager, access_point(1, 1), bot_token(), no_handlers());

    tokio::time::sleep(Duration::from_secs(7)).await;

    let handshakes = recorder.handshakes();
    assert_eq!(handshakes.len(), 3);
    for handshake in &handshakes[1..] {
        assert_eq!(handshake.kind, HandshakeKind::Identify);
        assert!(handshake.session_id.is_empty());
        assert_eq!(handshake.seq, 0);
    }

    assert!(running.shutdown().await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_banned_bot_stops_everything() {
    let errors = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&errors);
    let handlers = Arc::new(EventHandlers::new().with(EventHandler::error_notify(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    })));

    let factory = MockTransportFactory::new().script(0, [Step::fail(closed(4915))]);
    let (manager, recorder) = new_manager(factory);
    let running = spawn_manager(manager, access_point(3, 1), bot_token(), handlers);

    let result = running.handle.await.unwrap();

    assert!(matches!(result, Err(GatewayError::Closed { code: 4915, .. })));
    assert!(running.manager.is_stopped());
    assert_eq!(errors.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(recorder.launch_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_orderly_close_is_not_requeued() {
    let factory = MockTransportFactory::new().script(0, [Step::close()]);
    let (manager, recorder) = new_manager(factory);
    let running = spawn_manager(manager, access_point(1, 1), bot_token(), no_handlers());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(recorder.launch_count(), 1);

    assert!(running.shutdown().await.is_ok());
}

// ============================================================================
// Failure containment
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_connect_failure_requeues_unchanged() {
    let factory = MockTransportFactory::new().script(0, [Step::ConnectError]);
    let (manager, recorder) = new_manager(factory);
    let running = spawn_manager(manager, access_point(1, 1), bot_token(), no_handlers());

    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(recorder.launch_count(), 2);
    let handshakes = recorder.handshakes();
    assert_eq!(handshakes.len(), 1);
    assert_eq!(handshakes[0].kind, HandshakeKind::Identify);

    assert!(running.shutdown().await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_handshake_failure_stops_shard() {
    let factory = MockTransportFactory::new().script(0, [Step::HandshakeError]);
    let (manager, recorder) = new_manager(factory);
    let running = spawn_manager(manager, access_point(1, 1), bot_token(), no_handlers());

    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(recorder.launch_count(), 1);
    assert!(!running.manager.is_stopped());

    assert!(running.shutdown().await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_panic_is_contained_and_requeued() {
    let panics = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&panics);

    let factory = MockTransportFactory::new().script(
        0,
        [
            Step::fail_after("sess-9", 5, GatewayError::NeedReconnect),
            Step::Panic,
        ],
    );
    let (manager, recorder) = new_manager(factory);
    let manager = manager.with_panic_handler(move |message, session| {
        sink.lock()
            .push((message.to_string(), session.id.clone(), session.last_seq));
    });
    let running = spawn_manager(manager, access_point(2, 1), bot_token(), no_handlers());

    tokio::time::sleep(Duration::from_secs(9)).await;

    assert_eq!(
        *panics.lock(),
        vec![("scripted panic".to_string(), "sess-9".to_string(), 5)]
    );

    let resumes: Vec<_> = recorder
        .handshakes()
        .into_iter()
        .filter(|h| h.shard_id == 0 && h.kind == HandshakeKind::Resume)
        .collect();
    assert_eq!(resumes.len(), 1);
    assert_eq!(resumes[0].session_id, "sess-9");
    assert_eq!(resumes[0].seq, 5);

    // Shard 1 was never disturbed
    assert_eq!(
        recorder
            .launches()
            .iter()
            .filter(|(shard, _)| *shard == 1)
            .count(),
        1
    );

    assert!(running.shutdown().await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_live_connections_never_exceed_shards() {
    let mut factory = MockTransportFactory::new();
    for shard in 0..3 {
        factory = factory.script(
            shard,
            [
                Step::fail_after("a", 1, GatewayError::ConnectionLost),
                Step::ConnectError,
                Step::fail(GatewayError::InvalidSession),
                Step::Panic,
                Step::fail(closed(4008)),
            ],
        );
    }
    let (manager, recorder) = new_manager(factory.with_connect_delay(Duration::from_millis(700)));
    let running = spawn_manager(manager, access_point(3, 1), bot_token(), no_handlers());

    tokio::time::sleep(Duration::from_secs(60)).await;

    assert_eq!(recorder.launch_count(), 18);
    assert_eq!(recorder.live(), 3);
    assert!(recorder.max_live() <= 3);

    assert!(running.shutdown().await.is_ok());
}

// ============================================================================
// Stop and cancellation
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_cancel_closes_every_connection() {
    let (manager, recorder) = new_manager(MockTransportFactory::new());
    let running = spawn_manager(manager, access_point(2, 1), bot_token(), no_handlers());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(recorder.live(), 2);

    assert!(running.shutdown().await.is_ok());
    settle().await;

    assert_eq!(recorder.closes(), 2);
    assert_eq!(recorder.live(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_stop_concurrently_is_safe() {
    let (manager, recorder) = new_manager(MockTransportFactory::new());
    let running = spawn_manager(manager, access_point(2, 1), bot_token(), no_handlers());

    tokio::time::sleep(Duration::from_secs(5)).await;

    let stoppers: Vec<_> = (0..8)
        .map(|_| {
            let manager = Arc::clone(&running.manager);
            tokio::spawn(async move { manager.stop() })
        })
        .collect();
    for stopper in stoppers {
        stopper.await.unwrap();
    }

    assert!(running.handle.await.unwrap().is_ok());
    assert!(running.manager.is_stopped());

    settle().await;
    assert_eq!(recorder.closes(), 2);
    assert_eq!(recorder.live(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_stop_without_start_is_noop() {
    let (manager, _) = new_manager(MockTransportFactory::new());
    manager.stop();
    manager.stop();
    assert!(manager.is_stopped());
}

// ============================================================================
// Intents
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_audio_only_handlers_identify_with_audio_intent() {
    let handlers = Arc::new(EventHandlers::new().with(EventHandler::audio(|_, _| Ok(()))));
    let (manager, recorder) = new_manager(MockTransportFactory::new());
    let running = spawn_manager(manager, access_point(1, 1), bot_token(), handlers);

    tokio::time::sleep(Duration::from_secs(3)).await;

    let handshakes = recorder.handshakes();
    assert_eq!(handshakes.len(), 1);
    assert_eq!(handshakes[0].kind, HandshakeKind::Identify);
    assert_eq!(handshakes[0].intents, Intents::AUDIO);

    assert!(running.shutdown().await.is_ok());
}
