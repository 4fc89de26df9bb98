//! Share-code deep links resolved through the club query policy.

mod common;

use common::{club, Harness};
use radzi_app::workflows::{ResolutionStatus, NOT_FOUND_MESSAGE_KEY};
use radzi_core::effects::ApiError;
use radzi_core::types::{ClubId, Route};
use radzi_testkit::{ScriptedAuth, SimulatedTimeHandler};
use std::sync::Arc;
use std::time::Duration;

fn harness() -> Harness {
    Harness::new(
        Arc::new(SimulatedTimeHandler::new(0)),
        ScriptedAuth::authenticated(),
    )
}

#[tokio::test]
async fn known_code_redirects_once() {
    let h = harness();
    h.api.add_club("ABC123", club(42, "Warsaw Riders"));
    let screen = h.app.share_code_screen();

    assert_eq!(screen.resolve("ABC123").await, ResolutionStatus::Redirected);
    assert_eq!(h.navigator.routes(), vec![Route::Club(ClubId(42))]);
    assert_eq!(h.navigator.routes()[0].path(), "/clubs/42");

    let entry = h.app.queries().club_by_share_code("ABC123").await;
    assert_eq!(screen.on_lookup_result("ABC123", &entry), ResolutionStatus::Redirected);
    assert_eq!(screen.resolve(" ABC123 ").await, ResolutionStatus::Redirected);

    assert_eq!(h.navigator.count(), 1);
    assert_eq!(h.api.counts().clubs, 1);
    let state = screen.resolution();
    assert_eq!(state.club.as_ref().map(|c| c.id), Some(ClubId(42)));
    assert_eq!(state.message_key(), None);
}

#[tokio::test]
async fn unknown_code_is_not_found() {
    let h = harness();
    let screen = h.app.share_code_screen();

    assert_eq!(screen.resolve("NOPE").await, ResolutionStatus::NotFound);
    assert_eq!(h.navigator.count(), 0);
    assert_eq!(screen.resolution().message_key(), Some(NOT_FOUND_MESSAGE_KEY));
}

#[tokio::test]
async fn lookup_error_is_not_found() {
    let h = harness();
    h.api.set_club_error(Some(ApiError::Status {
        status: 500,
        url: "https://api.radzi.app/v1/clubs/share/ABC123".to_string(),
    }));
    let screen = h.app.share_code_screen();

    assert_eq!(screen.resolve("ABC123").await, ResolutionStatus::NotFound);
    assert_eq!(h.navigator.count(), 0);
}

#[tokio::test]
async fn blank_code_skips_lookup() {
    let h = harness();
    let screen = h.app.share_code_screen();

    assert_eq!(screen.resolve("   ").await, ResolutionStatus::NotFound);
    assert_eq!(h.api.counts().clubs, 0);
}

#[tokio::test(start_paused = true)]
async fn late_result_after_unmount_is_ignored() {
    let h = harness();
    h.api.add_club("ABC123", club(42, "Warsaw Riders"));
    h.api.set_delay(Duration::from_millis(300));
    let screen = h.app.share_code_screen();
    let lifetime = screen.lifetime();

    let leave = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        lifetime.unmount();
    };
    let (status, ()) = tokio::join!(screen.resolve("ABC123"), leave);

    assert_eq!(status, ResolutionStatus::Loading);
    assert_eq!(h.navigator.count(), 0);
}

#[tokio::test]
async fn unmounted_screen_issues_no_lookup() {
    let h = harness();
    h.api.add_club("ABC123", club(42, "Warsaw Riders"));
    let screen = h.app.share_code_screen();
    let rx = screen.subscribe();
    screen.unmount();

    assert_eq!(screen.resolve("ABC123").await, ResolutionStatus::AwaitingInput);
    assert_eq!(h.api.counts().clubs, 0);
    assert_eq!(h.navigator.count(), 0);
    assert!(!rx.has_changed().unwrap());
    assert_eq!(screen.resolution().code, None);
}

#[tokio::test]
async fn observers_see_every_transition() {
    let h = harness();
    h.api.add_club("ABC123", club(42, "Warsaw Riders"));
    let screen = h.app.share_code_screen();
    let rx = screen.subscribe();
    assert_eq!(rx.borrow().status, ResolutionStatus::AwaitingInput);

    screen.resolve("ABC123").await;

    assert_eq!(rx.borrow().status, ResolutionStatus::Redirected);
    assert_eq!(rx.borrow().code.as_deref(), Some("ABC123"));
}

#[tokio::test]
async fn each_visit_redirects_independently() {
    let h = harness();
    h.api.add_club("ABC123", club(42, "Warsaw Riders"));

    let first = h.app.share_code_screen();
    first.resolve("ABC123").await;
    drop(first);
    let second = h.app.share_code_screen();
    second.resolve("ABC123").await;

    assert_eq!(h.navigator.count(), 2);
    assert_eq!(h.api.counts().clubs, 1);
}
