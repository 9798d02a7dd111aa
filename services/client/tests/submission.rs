//! Submission-controller behavior: local validation, creation-request
//! accounting, and error surfacing on the form.

mod common;

use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use client_lib::session::poll::PollOutcome;
use client_lib::session::submit::submit;
use common::{deps, receipt, report, FakeBackend, RecordingView, Scripted, ViewEvent};
use meeting_comic_core::domain::{SubmissionReceipt, TaskState};

#[tokio::test]
async fn empty_note_sends_nothing_and_shows_content_required() {
    let backend = Arc::new(FakeBackend::new());
    let view = Arc::new(RecordingView::new());
    let deps = deps(backend.clone(), view.clone());

    let outcome = submit(&deps, "   \n   ", Path::new(".")).await;

    assert_eq!(outcome, None);
    assert_eq!(backend.submit_calls.load(Ordering::SeqCst), 0);
    assert_eq!(backend.status_calls.load(Ordering::SeqCst), 0);

    let events = view.events();
    assert!(events.contains(&ViewEvent::Error("content required".to_string())));
    assert!(events.contains(&ViewEvent::Form));
    // The submit control always comes back.
    assert_eq!(events.last(), Some(&ViewEvent::SubmitBusy(false)));
}

#[tokio::test(start_paused = true)]
async fn plain_note_issues_exactly_one_creation_request() {
    let backend = Arc::new(FakeBackend::new());
    let view = Arc::new(RecordingView::new());
    let deps = deps(backend.clone(), view.clone());

    let outcome = submit(&deps, "hello", Path::new(".")).await;

    assert_eq!(outcome, Some(PollOutcome::Completed));
    assert_eq!(backend.submit_calls.load(Ordering::SeqCst), 1);

    let request = backend.last_request.lock().unwrap().take().unwrap();
    assert_eq!(request.meeting_text, "hello");
    assert!(request.images.is_empty());
    assert_eq!(request.visitor_id, None);
}

#[tokio::test]
async fn rejected_creation_surfaces_the_server_detail_verbatim() {
    let backend = Arc::new(
        FakeBackend::new().with_submit(Scripted::Rejected("too long".to_string())),
    );
    let view = Arc::new(RecordingView::new());
    let deps = deps(backend.clone(), view.clone());

    let outcome = submit(&deps, "a very long note", Path::new(".")).await;

    assert_eq!(outcome, None);
    assert_eq!(backend.status_calls.load(Ordering::SeqCst), 0);

    let events = view.events();
    assert!(events.contains(&ViewEvent::Error("too long".to_string())));
    assert!(events.contains(&ViewEvent::Form));
    assert!(!events.contains(&ViewEvent::Loading));
}

#[tokio::test]
async fn network_failure_on_creation_shows_a_generic_message() {
    let backend = Arc::new(
        FakeBackend::new().with_submit(Scripted::Network("connection refused".to_string())),
    );
    let view = Arc::new(RecordingView::new());
    let deps = deps(backend.clone(), view.clone());

    let outcome = submit(&deps, "hello", Path::new(".")).await;

    assert_eq!(outcome, None);
    let events = view.events();
    assert!(events.contains(&ViewEvent::Error(
        "could not reach the generation service".to_string()
    )));
}

#[tokio::test(start_paused = true)]
async fn nickname_echo_updates_the_status_badge() {
    let backend = Arc::new(FakeBackend::new().with_submit(Scripted::Ok(SubmissionReceipt {
        nickname: Some("quick-otter".to_string()),
        ..receipt("t7")
    })));
    let view = Arc::new(RecordingView::new());
    let deps = deps(backend.clone(), view.clone());

    submit(&deps, "hello", Path::new(".")).await;

    let events = view.events();
    assert!(events.contains(&ViewEvent::Badge(
        "quick-otter's comic in progress".to_string()
    )));
    assert_eq!(
        deps.visitor.lock().await.nickname.as_deref(),
        Some("quick-otter")
    );
}

#[tokio::test(start_paused = true)]
async fn server_hints_seed_the_message_rotation() {
    let backend = Arc::new(
        FakeBackend::new()
            .with_submit(Scripted::Ok(SubmissionReceipt {
                rotation_hints: vec!["inking the title panel".to_string()],
                ..receipt("t8")
            }))
            // Keep the loading session alive long enough to rotate.
            .with_status_queue(vec![
                report(TaskState::Processing, None),
                report(TaskState::Processing, None),
            ]),
    );
    let view = Arc::new(RecordingView::new());
    let deps = deps(backend.clone(), view.clone());

    submit(&deps, "hello", Path::new(".")).await;

    let events = view.events();
    assert!(events.contains(&ViewEvent::Message("inking the title panel".to_string())));
}

#[tokio::test(start_paused = true)]
async fn every_attempt_starts_busy_with_a_cleared_error() {
    let backend = Arc::new(FakeBackend::new());
    let view = Arc::new(RecordingView::new());
    let deps = deps(backend.clone(), view.clone());

    submit(&deps, "hello", Path::new(".")).await;

    let events = view.events();
    assert_eq!(
        &events[..2],
        &[ViewEvent::SubmitBusy(true), ViewEvent::ClearError]
    );
}
