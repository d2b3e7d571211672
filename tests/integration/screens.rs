//! Cross-screen consistency of likes, bookmarks, deletes and case changes

use crate::common::{case, post, Harness};
use medfeed::shared::{
    Author, ChangeEvent, CommentAction, ContentKey, EchoPolicy, RevisionState, SyncConfig,
};
use pretty_assertions::assert_eq;

#[test]
fn like_in_top_updates_full_and_other_screen() {
    let harness = Harness::new();
    let mut s = harness.screen("home");
    let mut t = harness.screen("profile");
    let x = ContentKey::post("x");

    s.load_feed("top", vec![post("x", 5, false)]);
    s.load_feed("full", vec![post("w", 0, false), post("x", 5, false)]);
    t.load_feed("posts", vec![post("x", 5, false)]);
    s.take_dirty();

    let action = assert_ok!(s.toggle_like(&x));
    assert_eq!(action.event(), ChangeEvent::LikeChanged { key: x.clone(), liked: true });

    for feed in ["top", "full"] {
        let copy = s.store().feed(feed).find(|item| item.key == x).unwrap();
        assert_eq!((copy.likes, copy.liked), (6, true));
    }
    assert_eq!(s.take_dirty().into_iter().collect::<Vec<_>>(), vec!["full", "top"]);

    // S ignores its own echo; T converges.
    assert_eq!(s.pump(), 0);
    assert_likes!(s, x, 6, true);
    assert_eq!(t.pump(), 1);
    assert_likes!(t, x, 6, true);
    assert!(t.is_dirty("posts"));
}

#[test]
fn owner_delete_removes_item_everywhere() {
    let harness = Harness::new();
    let mut s = harness.screen("profile");
    let mut t = harness.screen("home");
    let y = ContentKey::post("y");

    s.load_feed("posts", vec![post("y", 1, false), post("z", 0, false)]);
    s.load_feed("pinned", vec![post("y", 1, false)]);
    t.load_feed("top", vec![post("y", 1, false)]);
    t.load_feed("full", vec![post("a", 0, false), post("y", 1, false)]);

    assert_ok!(s.delete(&y));
    // Local removal does not wait for the broadcast.
    assert_absent!(s, y);
    assert!(t.store().contains(&y));

    t.pump();
    assert_absent!(t, y);
    assert_eq!(t.store().feed("full").count(), 1);
    assert!(t.is_dirty("top") && t.is_dirty("full"));
}

#[test]
fn interleaved_broadcasts_are_not_swallowed() {
    let harness = Harness::new();
    let mut s = harness.screen("home");
    let mut t = harness.screen("search");
    let y = ContentKey::post("y");
    let z = ContentKey::post("z");
    let w = ContentKey::post("w");

    let page = vec![post("y", 0, false), post("z", 0, false), post("w", 3, false)];
    s.load_feed("full", page.clone());
    t.load_feed("results", page);

    // A genuine event from T arrives at S before S's own echoes.
    assert_ok!(t.toggle_like(&w));
    assert_ok!(s.toggle_like(&y));
    assert_ok!(s.toggle_bookmark(&z));

    s.pump();
    t.pump();

    for screen in [&s, &t] {
        assert_likes!(screen, y, 1, true);
        assert_likes!(screen, w, 4, true);
        assert!(screen.store().get(&z).unwrap().bookmarked);
    }
}

#[test]
fn legacy_flag_swallows_foreign_event() {
    let config = SyncConfig::builder()
        .echo_policy(EchoPolicy::LegacyFlag)
        .build()
        .unwrap();
    let harness = Harness::with_config(config);
    let mut s = harness.screen("home");
    let mut t = harness.screen("search");
    let y = ContentKey::post("y");
    let w = ContentKey::post("w");

    let page = vec![post("y", 0, false), post("w", 3, false)];
    s.load_feed("full", page.clone());
    t.load_feed("results", page);

    assert_ok!(t.toggle_like(&w));
    assert_ok!(s.toggle_like(&y));
    s.pump();

    // T's like was dropped in place of S's echo: S never sees it.
    assert_likes!(s, w, 3, false);
    assert_likes!(s, y, 1, true);
}

#[test]
fn comment_counts_follow_top_level_only() {
    let harness = Harness::new();
    let mut detail = harness.screen("case-detail");
    let mut feed = harness.screen("cases");
    let c = ContentKey::case("c1");

    detail.load_feed("case", vec![case("c1", 4)]);
    feed.load_feed("top", vec![case("c1", 4)]);
    feed.load_feed("full", vec![case("c1", 4)]);

    assert_ok!(detail.publish(ChangeEvent::comment(c.clone(), CommentAction::Add)));
    assert_ok!(detail.publish(ChangeEvent::CommentCountChanged {
        key: c.clone(),
        path: vec!["root-comment".to_string()],
        action: CommentAction::Add,
    }));
    assert_ok!(detail.publish(ChangeEvent::comment(c.clone(), CommentAction::Edit)));

    assert_eq!(feed.pump(), 1);
    assert_eq!(feed.store().get(&c).unwrap().comments, 5);
    assert_eq!(detail.store().get(&c).unwrap().comments, 5);
}

#[test]
fn revision_solve_and_profile_changes_propagate() {
    let harness = Harness::new();
    let mut author_screen = harness.screen("my-cases");
    let mut reader = harness.screen("home");
    let c = ContentKey::case("c7");

    author_screen.load_feed("cases", vec![case("c7", 0)]);
    reader.load_feed("full", vec![case("c7", 0), post("p1", 0, false)]);
    reader.cache_author(Author::new("author-2", "Dr. Kim"));

    assert_ok!(author_screen.publish(ChangeEvent::RevisionChanged { key: c.clone() }));
    reader.pump();
    assert_eq!(reader.store().get(&c).unwrap().revision, RevisionState::Update);

    assert_ok!(author_screen.publish(ChangeEvent::SolveChanged {
        key: c.clone(),
        diagnosis: Some("Sarcoidosis".to_string()),
    }));
    assert_ok!(author_screen.publish(ChangeEvent::UserChanged {
        author: Author {
            profession: Some("Pulmonologist".to_string()),
            ..Author::new("author-2", "Dr. Kim")
        },
    }));
    reader.take_dirty();
    assert_eq!(reader.pump(), 2);

    let solved = reader.store().get(&c).unwrap();
    assert!(solved.solved);
    assert_eq!(solved.revision, RevisionState::Diagnosis);
    assert_eq!(
        reader.store().author("author-2").unwrap().profession.as_deref(),
        Some("Pulmonologist")
    );
    assert!(reader.is_dirty("full"));
}

#[test]
fn torn_down_screen_stops_listening() {
    let harness = Harness::new();
    let mut s = harness.screen("home");
    let t = harness.screen("profile");
    assert_eq!(harness.hub.subscriber_count(), 2);

    drop(t);
    assert_eq!(harness.hub.subscriber_count(), 1);

    s.load_feed("full", vec![post("p", 0, false)]);
    assert_ok!(s.toggle_like(&ContentKey::post("p")));
    assert_eq!(s.pump(), 0);
}

#[test]
fn paging_and_closing_feeds() {
    let harness = Harness::new();
    let mut s = harness.screen("home");
    let mut t = harness.screen("search");
    let b = ContentKey::post("b");

    s.load_feed("full", vec![post("a", 0, false)]);
    let appended = s.append_page("full", vec![post("a", 0, false), post("b", 1, false).with_bookmark(true)]);
    assert_eq!(appended, 1);
    t.load_feed("results", vec![post("b", 1, false)]);

    assert_ok!(t.toggle_like(&b));
    s.pump();
    assert_likes!(s, b, 2, true);
    assert!(s.store().get(&b).unwrap().bookmarked);

    assert!(s.close_feed("full"));
    assert!(s.store().is_empty());
    assert!(!s.is_dirty("full"));

    // Nothing held any more, so later changes are skipped.
    assert_ok!(t.toggle_like(&b));
    assert_eq!(s.pump(), 0);
}
