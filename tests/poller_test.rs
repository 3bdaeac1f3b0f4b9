// Bounded-retry polling behavior, observed through element waits under a
// paused tokio clock.

mod common;

use std::time::Duration;
use storefront_e2e::drivers::fake::FakePage;

#[tokio::test(start_paused = true)]
async fn wait_samples_on_a_fixed_cadence_until_deadline() {
    common::init_tracing();
    let page = FakePage::new();
    page.insert("#spinner", storefront_e2e::drivers::fake::FakeElement::new().hidden());
    let session = common::session(&page);

    let element = session.resolve("#spinner").await.expect("resolve");
    let calls_before = page.driver_calls();

    let visible = element
        .wait_visible(true, Some(Duration::from_millis(300)))
        .await;
    assert!(!visible, "element never became visible");

    // Immediate sample plus one per 100ms interval up to the deadline
    let samples = page.driver_calls() - calls_before;
    assert!(
        (3..=5).contains(&samples),
        "expected 3-5 samples in a 300ms budget, saw {samples}"
    );
}

#[tokio::test(start_paused = true)]
async fn outcome_flips_with_the_budget_around_the_transition() {
    common::init_tracing();
    let page = FakePage::new();
    page.insert("#toast", storefront_e2e::drivers::fake::FakeElement::new().hidden());
    page.update_after(Duration::from_millis(200), "#toast", |e| e.visible = true);
    let session = common::session(&page);
    let element = session.resolve("#toast").await.expect("resolve");

    // Budget expires before the element appears
    assert!(!element.wait_visible(true, Some(Duration::from_millis(100))).await);

    // A larger budget on the same page observes the transition
    assert!(element.wait_visible(true, Some(Duration::from_millis(500))).await);
}

#[tokio::test(start_paused = true)]
async fn already_satisfied_condition_returns_without_waiting() {
    let page = FakePage::new();
    page.insert("#banner", storefront_e2e::drivers::fake::FakeElement::new());
    let session = common::session(&page);
    let element = session.resolve("#banner").await.expect("resolve");

    let start = tokio::time::Instant::now();
    assert!(element.wait_visible(true, Some(Duration::from_secs(5))).await);
    assert_eq!(start.elapsed(), Duration::ZERO, "no sleep before first sample");
}

#[tokio::test(start_paused = true)]
async fn absent_elements_read_as_not_visible() {
    let page = FakePage::new();
    let session = common::session(&page);
    let element = session.resolve("#late").await.expect("resolve");

    assert!(!element.wait_visible(true, Some(Duration::from_millis(100))).await);

    page.insert("#late", storefront_e2e::drivers::fake::FakeElement::new());
    assert!(element.wait_visible(true, Some(Duration::from_millis(100))).await);
}
