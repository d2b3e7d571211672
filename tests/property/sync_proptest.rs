//! Property-based tests for reconciliation and cross-screen convergence
//!
//! Uses proptest to generate gesture sequences and event payloads

use crate::common::{case, post, Harness};
use medfeed::screen::{reconcile, FeedStore, Screen};
use medfeed::shared::{ChangeEvent, CommentAction, ContentKey};
use proptest::prelude::*;

fn comment_action() -> impl Strategy<Value = CommentAction> {
    prop_oneof![
        Just(CommentAction::Add),
        Just(CommentAction::Remove),
        Just(CommentAction::Edit),
    ]
}

#[derive(Debug, Clone)]
enum Gesture {
    Like(usize),
    Bookmark(usize),
    Comment(usize, CommentAction),
}

fn gesture() -> impl Strategy<Value = (usize, Gesture)> {
    let gesture = prop_oneof![
        (0..3usize).prop_map(Gesture::Like),
        (0..3usize).prop_map(Gesture::Bookmark),
        (0..3usize, comment_action()).prop_map(|(i, a)| Gesture::Comment(i, a)),
    ];
    (0..2usize, gesture)
}

fn keys() -> [ContentKey; 3] {
    [ContentKey::post("p0"), ContentKey::post("p1"), ContentKey::case("c0")]
}

fn perform(screen: &mut Screen, gesture: &Gesture) {
    let keys = keys();
    let result = match gesture {
        Gesture::Like(i) => screen.toggle_like(&keys[*i]).map(|_| ()),
        Gesture::Bookmark(i) => screen.toggle_bookmark(&keys[*i]).map(|_| ()),
        Gesture::Comment(i, action) => screen.publish(ChangeEvent::comment(keys[*i].clone(), *action)),
    };
    assert!(result.is_ok(), "{:?} failed on {}", gesture, screen.name());
}

proptest! {
    #[test]
    fn test_like_then_unlike_restores_count(likes in 0u32..10_000, liked in any::<bool>()) {
        let mut store = FeedStore::new();
        store.replace_feed("full", vec![post("p", likes, liked)]);
        let key = ContentKey::post("p");

        reconcile(&mut store, &ChangeEvent::LikeChanged { key: key.clone(), liked: !liked }).unwrap();
        reconcile(&mut store, &ChangeEvent::LikeChanged { key: key.clone(), liked }).unwrap();

        let item = store.get(&key).unwrap();
        prop_assert_eq!(item.liked, liked);
        // Unliking at zero saturates.
        let expected = if liked && likes == 0 { 1 } else { likes };
        prop_assert_eq!(item.likes, expected);
    }

    #[test]
    fn test_like_replay_is_idempotent(likes in 0u32..10_000, liked in any::<bool>(), replays in 1usize..5) {
        let mut store = FeedStore::new();
        store.replace_feed("full", vec![post("p", likes, false)]);
        let key = ContentKey::post("p");
        let event = ChangeEvent::LikeChanged { key: key.clone(), liked };

        for _ in 0..replays {
            reconcile(&mut store, &event).unwrap();
        }
        prop_assert_eq!(store.get(&key).unwrap().likes, likes + u32::from(liked));
    }

    #[test]
    fn test_replies_never_change_count(
        comments in 0u32..500,
        path in prop::collection::vec("[a-z0-9]{1,8}", 1..4),
        action in comment_action(),
    ) {
        let mut store = FeedStore::new();
        store.replace_feed("cases", vec![case("c", comments)]);
        let key = ContentKey::case("c");

        let dirty = reconcile(&mut store, &ChangeEvent::CommentCountChanged {
            key: key.clone(),
            path,
            action,
        }).unwrap();

        prop_assert!(dirty.is_empty());
        prop_assert_eq!(store.get(&key).unwrap().comments, comments);
    }

    #[test]
    fn test_comment_count_never_underflows(
        start in 0u32..5,
        actions in prop::collection::vec(comment_action(), 0..40),
    ) {
        let mut store = FeedStore::new();
        store.replace_feed("cases", vec![case("c", start)]);
        let key = ContentKey::case("c");

        let mut model = start;
        for action in actions {
            reconcile(&mut store, &ChangeEvent::comment(key.clone(), action)).unwrap();
            model = match action {
                CommentAction::Add => model + 1,
                CommentAction::Remove => model.saturating_sub(1),
                CommentAction::Edit => model,
            };
            prop_assert_eq!(store.get(&key).unwrap().comments, model);
        }
    }

    #[test]
    fn test_screens_converge(gestures in prop::collection::vec(gesture(), 0..30)) {
        let harness = Harness::new();
        let mut screens = [harness.screen("home"), harness.screen("search")];
        let page = vec![post("p0", 3, false), post("p1", 0, true), case("c0", 1)];
        screens[0].load_feed("top", page[..1].to_vec());
        screens[0].load_feed("full", page.clone());
        screens[1].load_feed("results", page);

        for (origin, gesture) in &gestures {
            perform(&mut screens[*origin], gesture);
            for screen in screens.iter_mut() {
                screen.pump();
            }
        }

        for key in keys() {
            prop_assert_eq!(screens[0].store().get(&key), screens[1].store().get(&key));
        }
        let top = screens[0].store().feed("top").next().cloned();
        prop_assert_eq!(top.as_ref(), screens[0].store().get(&ContentKey::post("p0")));
    }
}
