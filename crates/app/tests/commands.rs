//! End-to-end command handling over in-memory collaborators.

mod support;

use support::TestApp;
use watertime_core::LiveTimers;
use watertime_domain::{AlarmId, Config};
use watertime_lib::{execute, Command, Reply};

#[tokio::test]
async fn add_list_toggle_remove() {
    let mut app = TestApp::started().await;

    let added = app.run("add-interval 60").await;
    assert!(added.starts_with("added 60 min (on) id="), "{added}");
    let id = app.ctx.alarms.rules()[0].id.clone();
    assert!(app.timers.is_live(&id));

    let listed = app.run("list").await;
    assert!(listed.contains("60 min"));
    assert!(listed.contains(id.as_str()));

    let toggled = app.run(&format!("toggle {id}")).await;
    assert!(toggled.contains("(off)"), "{toggled}");
    assert!(!app.timers.is_live(&id));

    let removed = app.run(&format!("remove {id}")).await;
    assert!(removed.starts_with("removed 60 min"), "{removed}");
    assert_eq!(app.run("list").await, "no alarms");
}

#[tokio::test]
async fn rejected_input_is_explained() {
    let mut app = TestApp::started().await;

    assert!(app.run("add-interval 0").await.starts_with("invalid input"));
    assert!(app.run("add-time 24:00").await.starts_with("invalid input"));
    app.run("add-time 07:30").await;
    assert_eq!(app.run("add-time 7:30").await, "an alarm at 07:30 already exists");
    assert_eq!(app.run("toggle nope").await, "no alarm with id nope");
    assert_eq!(app.ctx.alarms.rules().len(), 1);
}

#[tokio::test]
async fn restore_defaults_reseeds_hourly_rules() {
    let mut app = TestApp::started().await;
    app.run("add-interval 20").await;

    assert_eq!(app.run("restore-defaults").await, "restored 13 default alarms");
    assert!(app.timers.is_live(&AlarmId::new("fixed-08:00")));
    assert!(app.timers.is_live(&AlarmId::new("fixed-20:00")));
}

#[tokio::test]
async fn intake_commands_track_progress() {
    let mut app = TestApp::started().await;

    assert_eq!(app.run("goal 1000").await, "daily goal set to 1000 ml");
    assert_eq!(app.run("drink 250").await, "logged 250 ml at 9:00; 250 / 1000 ml (25%)");

    app.clock.advance(chrono::Duration::minutes(30));
    let reached = app.run("drink 750").await;
    assert!(reached.starts_with("logged 750 ml at 9:30; 1000 / 1000 ml (100%)"), "{reached}");
    assert!(reached.ends_with("goal reached, well done!"));

    assert_eq!(app.run("status").await, "1000 / 1000 ml (100%) across 2 drinks");
    assert!(app.run("drink lots").await.starts_with("invalid amount"));

    assert_eq!(app.run("reset-goal").await, "daily goal cleared");
    assert_eq!(app.run("status").await, "1000 ml today, no goal set across 2 drinks");
}

#[tokio::test]
async fn seeded_context_starts_with_live_timers() {
    let app = TestApp::started_with(Config::default()).await;

    assert_eq!(app.ctx.alarms.rules().len(), 13);
    assert_eq!(app.timers.live_ids().len(), 13);
}

#[tokio::test]
async fn shutdown_clears_timers_and_quit_ends_the_session() {
    let mut app = TestApp::started().await;
    app.run("add-interval 15").await;

    assert_eq!(execute(&mut app.ctx, Command::Quit).await.unwrap(), Reply::Quit);
    app.ctx.shutdown();
    app.ctx.shutdown();

    assert!(app.timers.live_ids().is_empty());
}

#[tokio::test]
async fn persistence_failures_surface_as_errors() {
    let mut app = TestApp::started().await;
    app.store.fail_writes(true);

    let result = execute(&mut app.ctx, Command::AddInterval("30".into())).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn production_context_persists_to_the_configured_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let mut config = Config::default();
    config.storage.path = path.display().to_string();
    config.alarms.seed_fixed_hourly = false;

    let (mut ctx, _rings) = watertime_lib::AppContext::new_with_config(config).unwrap();
    ctx.start().await.unwrap();
    execute(&mut ctx, Command::AddTime("07:30".into())).await.unwrap();
    ctx.shutdown();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("07:30"), "{written}");
}
