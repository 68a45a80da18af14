//! BDD step definitions for the watch cycle feature

use std::sync::Arc;

use cucumber::{given, then, when};

use roomwatch::classifier::PageClassifier;
use roomwatch::config::{Target, DEFAULT_UNAVAILABLE_MARKER};
use roomwatch::cycle::WatchCycle;
use roomwatch::notifier::{NotificationDispatcher, Notifier};
use roomwatch::state::{PersistedState, StateStore};

use crate::world::WatchWorld;

fn unavailable_page() -> String {
    format!(
        "<html><body><p>{}</p></body></html>",
        DEFAULT_UNAVAILABLE_MARKER
    )
}

fn available_page() -> String {
    "<html><body><table><tr><td>Plan A</td></tr></table></body></html>".to_string()
}

fn parse_bool(s: &str) -> bool {
    match s {
        "true" => true,
        "false" => false,
        other => panic!("Not a boolean: {}", other),
    }
}

async fn run_cycle(world: &mut WatchWorld) {
    let config = world.config();
    let classifier = PageClassifier::new(&config.fetch, world.http.clone());
    let notifiers: Vec<Arc<dyn Notifier>> = vec![world.recorder.clone()];
    let cycle = WatchCycle::new(&config, classifier, NotificationDispatcher::new(notifiers));

    let before = world.recorder.count();
    cycle.run().await.expect("watch cycle failed");
    world
        .notifications_per_run
        .push(world.recorder.count() - before);
}

fn load_state(world: &mut WatchWorld) -> PersistedState {
    let config = world.config();
    StateStore::new(&config.storage.state_file).load()
}

fn log_lines(world: &mut WatchWorld) -> Vec<String> {
    let config = world.config();
    std::fs::read_to_string(&config.storage.log_file)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[given(expr = "a target {string} labelled {string} at {string}")]
fn target(world: &mut WatchWorld, id: String, label: String, url: String) {
    world.targets.push(Target::new(label, url).with_id(id));
}

#[given("a notifier that accepts every message")]
fn accepting_notifier(_world: &mut WatchWorld) {
    // the world's recording notifier always succeeds
}

#[given("the page shows the unavailable marker")]
fn page_unavailable(world: &mut WatchWorld) {
    world.http.set_page(Some(unavailable_page()));
}

#[given("the page no longer shows the unavailable marker")]
fn page_available(world: &mut WatchWorld) {
    world.http.set_page(Some(available_page()));
}

#[given("the page is unreachable")]
fn page_unreachable(world: &mut WatchWorld) {
    world.http.set_page(None);
}

#[given(expr = "the stored availability for {string} is {word}")]
fn stored_availability(world: &mut WatchWorld, id: String, value: String) {
    let config = world.config();
    let mut state = PersistedState::new();
    state.set(&id, parse_bool(&value));
    StateStore::new(&config.storage.state_file)
        .save(&state)
        .expect("seed state file");
}

#[given(expr = "the state file contains {string}")]
fn state_file_contains(world: &mut WatchWorld, content: String) {
    let config = world.config();
    let path = config.storage.state_file;
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
}

#[when("a watch cycle runs")]
async fn watch_cycle_runs(world: &mut WatchWorld) {
    run_cycle(world).await;
}

#[when(expr = "the page availability over successive runs is {string}")]
async fn availability_sequence(world: &mut WatchWorld, observations: String) {
    for observation in observations.split(',').map(str::trim) {
        match observation {
            "a" => world.http.set_page(Some(available_page())),
            "u" => world.http.set_page(Some(unavailable_page())),
            "error" => world.http.set_page(None),
            other => panic!("Unknown observation: {}", other),
        }
        run_cycle(world).await;
    }
}

#[then("no notification should be sent in that run")]
fn no_notification(world: &mut WatchWorld) {
    let last = *world.notifications_per_run.last().expect("no run yet");
    assert_eq!(last, 0, "Expected no notification, got {}", last);
}

#[then(expr = "exactly {int} notification(s) should be sent in that run")]
fn notifications_in_run(world: &mut WatchWorld, expected: usize) {
    let last = *world.notifications_per_run.last().expect("no run yet");
    assert_eq!(last, expected);
}

#[then(expr = "the last notification should name {string} and link {string}")]
fn last_notification(world: &mut WatchWorld, label: String, url: String) {
    let expected = format!("{}\n{}", label, url);
    assert_eq!(world.recorder.last(), Some(expected));
}

#[then(expr = "the stored availability for {string} should be {word}")]
fn stored_availability_is(world: &mut WatchWorld, id: String, value: String) {
    let state = load_state(world);
    assert!(state.contains(&id), "No stored entry for '{}'", id);
    assert_eq!(state.get(&id), parse_bool(&value));
}

#[then(expr = "there should be no stored availability for {string}")]
fn no_stored_availability(world: &mut WatchWorld, id: String) {
    let state = load_state(world);
    assert!(!state.contains(&id), "Unexpected stored entry for '{}'", id);
}

#[then(expr = "the last activity line should end with {string}")]
fn last_activity_line(world: &mut WatchWorld, expected: String) {
    let lines = log_lines(world);
    let last = lines.last().expect("activity log is empty");
    assert!(
        last.ends_with(&expected),
        "Expected '{}' to end with '{}'",
        last,
        expected
    );
}

#[then(expr = "the activity log should have {int} lines")]
fn activity_line_count(world: &mut WatchWorld, expected: usize) {
    assert_eq!(log_lines(world).len(), expected);
}

#[then(expr = "notifications should have been sent on runs {string}")]
fn notified_runs(world: &mut WatchWorld, runs: String) {
    let expected: Vec<usize> = runs
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().expect("run number"))
        .collect();
    let actual: Vec<usize> = world
        .notifications_per_run
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(i, _)| i + 1)
        .collect();
    assert_eq!(actual, expected);
    assert!(world.notifications_per_run.iter().all(|c| *c <= 1));
}
