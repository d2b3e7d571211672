//! Backend confirmation and rollback of optimistic actions

use crate::common::{post, Call, Harness, RecordingService};
use assert_matches::assert_matches;
use medfeed::offline::{confirm, RetryPolicy};
use medfeed::screen::Received;
use medfeed::shared::{ContentKey, ServiceError, SyncError};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn backend_receives_new_desired_state() {
    let harness = Harness::new();
    let mut s = harness.screen("home");
    let service = RecordingService::new();
    let p = ContentKey::post("p");
    s.load_feed("full", vec![post("p", 2, true)]);

    let unlike = assert_ok!(s.toggle_like(&p));
    let result = confirm(&service, &unlike, &RetryPolicy::none()).await;
    assert_ok!(s.settle(&unlike, result.map(|_| ())));

    let bookmark = assert_ok!(s.toggle_bookmark(&p));
    let result = confirm(&service, &bookmark, &RetryPolicy::none()).await;
    assert_ok!(s.settle(&bookmark, result.map(|_| ())));

    assert_eq!(
        service.calls(),
        vec![Call::Like(p.clone(), false), Call::Bookmark(p.clone(), true)]
    );
    assert_eq!(s.pending().count_pending(), 0);
}

#[tokio::test]
async fn rejected_like_is_compensated_on_every_screen() {
    let harness = Harness::new();
    let mut s = harness.screen("home");
    let mut t = harness.screen("bookmarks");
    let service = RecordingService::new();
    let p = ContentKey::post("p");
    service.fail_on(p.clone(), ServiceError::rejected("author blocked you"));

    s.load_feed("full", vec![post("p", 10, false)]);
    t.load_feed("saved", vec![post("p", 10, false)]);

    let action = assert_ok!(s.toggle_like(&p));
    t.pump();
    assert_likes!(t, p, 11, true);

    let result = confirm(&service, &action, &RetryPolicy::none()).await;
    let settled = s.settle(&action, result.map(|_| ()));
    assert_matches!(settled, Err(SyncError::Service(ServiceError::Rejected { .. })));

    assert_likes!(s, p, 10, false);
    let mut compensations = 0;
    while let Some(received) = t.next_change().await {
        if matches!(received, Received::Applied(_)) {
            compensations += 1;
        }
        if harness.hub.last_sequence() == 2 {
            break;
        }
    }
    assert_eq!(compensations, 1);
    assert_likes!(t, p, 10, false);
}

#[tokio::test]
async fn same_field_failures_roll_back_in_either_order() {
    for reversed in [false, true] {
        let harness = Harness::new();
        let mut s = harness.screen("home");
        let mut t = harness.screen("search");
        let service = RecordingService::new();
        let p = ContentKey::post("p");
        service.fail_on(p.clone(), ServiceError::rejected("account suspended"));

        s.load_feed("full", vec![post("p", 5, false)]);
        t.load_feed("results", vec![post("p", 5, false)]);

        let like = assert_ok!(s.toggle_like(&p));
        let unlike = assert_ok!(s.toggle_like(&p));
        let order = if reversed { [&unlike, &like] } else { [&like, &unlike] };
        for action in order {
            let result = confirm(&service, action, &RetryPolicy::none()).await;
            assert!(s.settle(action, result.map(|_| ())).is_err());
        }
        t.pump();

        assert_likes!(s, p, 5, false);
        assert_likes!(t, p, 5, false);
        assert_eq!(s.pending().count_pending(), 0);
    }
}

#[tokio::test]
async fn older_failure_is_moot_once_newer_action_succeeds() {
    let harness = Harness::new();
    let mut s = harness.screen("home");
    let mut t = harness.screen("search");
    let flaky = RecordingService::new();
    let p = ContentKey::post("p");
    flaky.fail_on(p.clone(), ServiceError::unavailable("timeout"));
    let healthy = RecordingService::new();

    s.load_feed("full", vec![post("p", 5, false)]);
    t.load_feed("results", vec![post("p", 5, false)]);

    let like = assert_ok!(s.toggle_like(&p));
    let unlike = assert_ok!(s.toggle_like(&p));
    let bookmark = assert_ok!(s.toggle_bookmark(&p));

    let result = confirm(&flaky, &like, &RetryPolicy::none()).await;
    assert!(s.settle(&like, result.map(|_| ())).is_err());
    let result = confirm(&healthy, &unlike, &RetryPolicy::none()).await;
    assert_ok!(s.settle(&unlike, result.map(|_| ())));
    let result = confirm(&flaky, &bookmark, &RetryPolicy::none()).await;
    assert!(s.settle(&bookmark, result.map(|_| ())).is_err());
    t.pump();

    // The unlike landed, the bookmark did not.
    for screen in [&s, &t] {
        assert_likes!(screen, p, 5, false);
        assert!(!screen.store().get(&p).unwrap().bookmarked);
    }
}
