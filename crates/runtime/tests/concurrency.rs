use std::time::Duration;

use runtime::{Runtime, RuntimeConfig, StartRequest};

const ROOM: &str = "#######\n#@....#\n#....>#\n#######";

/// Submissions from cloned handles are applied one at a time.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_submissions_are_serialized() {
    let runtime = Runtime::builder().build().await.unwrap();
    let handle = runtime.handle();
    handle.start(StartRequest::from_text(ROOM)).await.unwrap();

    let other = handle.clone();
    let (a, b) = tokio::join!(handle.submit_action("."), other.submit_action("."));
    let mut nonces = vec![a.unwrap().nonce, b.unwrap().nonce];
    nonces.sort_unstable();
    assert_eq!(nonces, vec![1, 2]);

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let handle = handle.clone();
            tokio::spawn(async move { handle.submit_action("wait").await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let snapshot = handle.snapshot().unwrap();
    assert_eq!(snapshot.nonce, 10);
    assert_eq!(snapshot.turn, 10);
}

/// A turn that outlives the timeout still commits; the caller just gets the
/// latest published snapshot back.
#[tokio::test]
async fn timed_out_submission_still_commits() {
    let runtime = Runtime::builder()
        .turn_timeout(Duration::ZERO)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    handle.start(StartRequest::from_text(ROOM)).await.unwrap();

    let mut snapshots = handle.subscribe_snapshots();
    let _ = snapshots.borrow_and_update();

    let returned = handle.submit_action("d").await.unwrap();
    assert!(returned.nonce <= 1);

    while snapshots.borrow_and_update().as_ref().map(|s| s.nonce) != Some(1) {
        snapshots.changed().await.unwrap();
    }
    let snapshot = handle.snapshot().unwrap();
    assert_eq!((snapshot.player.x, snapshot.player.y), (2, 1));
}

/// A full command queue delays the caller but never drops the submission,
/// even when the reply wait times out immediately.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn timed_out_submissions_behind_a_full_queue_all_commit() {
    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            command_buffer_size: 1,
            turn_timeout: Duration::ZERO,
            ..RuntimeConfig::default()
        })
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    handle.start(StartRequest::from_text(ROOM)).await.unwrap();

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let handle = handle.clone();
            tokio::spawn(async move { handle.submit_action("wait").await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    // Every submission is queued by now; this query runs after all of them.
    handle.legal_actions().await.unwrap();
    let snapshot = handle.snapshot().unwrap();
    assert_eq!(snapshot.nonce, 16);
}

#[tokio::test]
async fn shutdown_waits_for_the_worker() {
    let runtime = Runtime::builder().build().await.unwrap();
    let handle = runtime.handle();
    handle.start(StartRequest::from_text(ROOM)).await.unwrap();
    drop(handle);

    runtime.shutdown().await.unwrap();
}
