//! BDD step definitions for the notification dispatch feature

use std::sync::atomic::Ordering;
use std::sync::Arc;

use cucumber::{given, then, when};

use roomwatch::notifier::Notifier;
use roomwatch::ntfy::NtfyNotifier;
use roomwatch::pushover::PushoverNotifier;

use crate::world::WatchWorld;

#[given("a Pushover notifier with valid credentials")]
fn pushover_valid(world: &mut WatchWorld) {
    let notifier = PushoverNotifier::new("test-token", "test-user", world.http.clone());
    world.notifiers.push(Arc::new(notifier));
}

#[given("a Pushover notifier without credentials")]
fn pushover_missing(world: &mut WatchWorld) {
    let notifier = PushoverNotifier::new("", "", world.http.clone());
    world.notifiers.push(Arc::new(notifier));
}

#[given(expr = "an ntfy notifier for topic {string}")]
fn ntfy_topic(world: &mut WatchWorld, topic_url: String) {
    let notifier: Arc<dyn Notifier> = Arc::new(NtfyNotifier::new(topic_url, world.http.clone()));
    world.notifiers.push(notifier);
}

#[given("no notifier is configured")]
fn no_notifier(world: &mut WatchWorld) {
    world.notifiers.clear();
}

#[given("the provider acknowledges requests")]
fn provider_ok(world: &mut WatchWorld) {
    world.http.set_provider_status(Some(200));
}

#[given(expr = "the provider responds with status {int}")]
fn provider_status(world: &mut WatchWorld, status: u16) {
    world.http.set_provider_status(Some(status));
}

#[given("the provider is unreachable")]
fn provider_unreachable(world: &mut WatchWorld) {
    world.http.set_provider_status(None);
}

#[when(expr = "the message {string} is dispatched")]
async fn dispatch(world: &mut WatchWorld, message: String) {
    let outcome = world.dispatcher().send(&message).await;
    world.dispatch_outcome = Some(outcome);
}

#[then("the dispatch should succeed")]
fn dispatch_succeeds(world: &mut WatchWorld) {
    let outcome = world.dispatch_outcome.as_ref().expect("no dispatch");
    assert!(outcome.success, "dispatch failed: {}", outcome.detail);
}

#[then(expr = "the dispatch should fail with a detail mentioning {string}")]
fn dispatch_fails(world: &mut WatchWorld, expected: String) {
    let outcome = world.dispatch_outcome.as_ref().expect("no dispatch");
    assert!(!outcome.success, "dispatch unexpectedly succeeded");
    assert!(
        outcome.detail.contains(&expected),
        "Expected detail to mention '{}', got '{}'",
        expected,
        outcome.detail
    );
}

#[then(expr = "{int} request(s) should have been made to the provider")]
fn provider_requests(world: &mut WatchWorld, expected: usize) {
    assert_eq!(world.http.provider_requests.load(Ordering::SeqCst), expected);
}
