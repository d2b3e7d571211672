/**
 * Feed Simulation Entry Point
 *
 * Wires two screens to one content hub and a scripted backend, runs a few
 * engagement gestures (one of which the backend rejects) and prints the
 * converged state of both screens as JSON.
 */

mod service;

use medfeed::offline::{confirm, PendingAction, RetryPolicy};
use medfeed::realtime::ContentHub;
use medfeed::screen::Screen;
use medfeed::shared::{Author, ChangeEvent, CommentAction, ContentItem, ContentKey, SyncConfig};
use service::ScriptedService;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = SyncConfig::load_default()?;
    tracing::info!("[Sim] echo policy {:?}, hub capacity {}", config.echo_policy, config.hub_capacity);

    let hub = ContentHub::from_config(&config);
    let mut home = Screen::new("home", &hub, &config);
    let mut profile = Screen::new("profile", &hub, &config);

    let welcome = ContentKey::post("welcome");
    let rash = ContentKey::case("rash-42");
    let draft = ContentKey::post("draft");

    let author = Author::new("u-ada", "Dr. Ada Chen");
    let posts = vec![
        ContentItem::new(welcome.clone(), "u-ada").with_likes(5, false),
        ContentItem::new(rash.clone(), "u-ada").with_comments(3),
        ContentItem::new(draft.clone(), "u-ada"),
    ];

    home.cache_author(author.clone());
    home.load_feed("top", posts[..1].to_vec());
    home.load_feed("full", posts.clone());
    profile.cache_author(author.clone());
    profile.load_feed("posts", posts);

    let service = ScriptedService::new(Duration::from_millis(20)).reject(rash.clone());
    let policy = RetryPolicy::from(&config.retry);

    let like = home.toggle_like(&welcome)?;
    let bookmark = home.toggle_bookmark(&welcome)?;
    let doomed = home.toggle_like(&rash)?;
    let delete = profile.delete(&draft)?;
    sync(&mut home, &mut profile);

    settle(&mut home, &service, &policy, &like).await;
    settle(&mut home, &service, &policy, &bookmark).await;
    settle(&mut home, &service, &policy, &doomed).await;
    settle(&mut profile, &service, &policy, &delete).await;

    profile.publish(ChangeEvent::comment(rash.clone(), CommentAction::Add))?;
    profile.publish(ChangeEvent::SolveChanged {
        key: rash.clone(),
        diagnosis: Some("Erythema migrans".to_string()),
    })?;
    profile.publish(ChangeEvent::UserChanged {
        author: Author {
            profession: Some("Dermatologist".to_string()),
            ..author
        },
    })?;
    sync(&mut home, &mut profile);

    for screen in [&mut home, &mut profile] {
        let dirty = screen.take_dirty();
        tracing::info!("[Sim] {} needs redraw of {:?}", screen.name(), dirty);
        println!("{}", serde_json::to_string_pretty(&screen.snapshot())?);
    }

    Ok(())
}

fn sync(home: &mut Screen, profile: &mut Screen) {
    let applied = home.pump() + profile.pump();
    tracing::debug!("[Sim] {} envelopes applied", applied);
}

async fn settle(
    screen: &mut Screen,
    service: &ScriptedService,
    policy: &RetryPolicy,
    action: &PendingAction,
) {
    let result = confirm(service, action, policy).await.map(|_| ());
    if let Err(e) = screen.settle(action, result) {
        // Only the initiating screen alerts the viewer.
        tracing::warn!("[Sim] {} would show an alert: {}", screen.name(), e);
    }
}
