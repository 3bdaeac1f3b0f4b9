// Navigation: base-URL joining, settled click-navigations, and the
// navigation-timeout contract.

mod common;

use std::time::Duration;
use storefront_e2e::drivers::fake::{FakeElement, FakePage};
use storefront_e2e::Error;

#[tokio::test(start_paused = true)]
async fn goto_joins_paths_against_the_base_url() {
    common::init_tracing();
    let page = FakePage::new();
    let session = common::session(&page);

    session.goto("/cart").await.expect("goto");
    assert_eq!(page.current_url(), "http://localhost:8080/cart");
    assert_eq!(page.navigation_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn click_and_navigate_observes_the_triggered_navigation() {
    let page = FakePage::new();
    page.insert(
        "#checkout",
        FakeElement::new().navigates_to("http://localhost:8080/checkout"),
    );
    let session = common::session(&page);

    session
        .click_and_navigate("#checkout", None)
        .await
        .expect("click triggers a navigation");
    assert_eq!(page.current_url(), "http://localhost:8080/checkout");
    assert_eq!(page.click_count("#checkout"), 1);
}

#[tokio::test(start_paused = true)]
async fn click_without_navigation_times_out_with_the_budget() {
    let page = FakePage::new();
    page.insert("#like", FakeElement::new());
    let session = common::session(&page);

    let result = session
        .click_and_navigate("#like", Some(Duration::from_millis(2000)))
        .await;

    match result {
        Err(Error::NavigationTimeout { duration_ms, .. }) => {
            assert_eq!(duration_ms, 2000);
        }
        other => panic!("expected NavigationTimeout, got {other:?}"),
    }
    // The click itself dispatched; only the navigation never came
    assert_eq!(page.click_count("#like"), 1);
    // And nothing leaked into the soft-assertion list
    assert!(session.soft().is_empty());
}

#[tokio::test(start_paused = true)]
async fn absent_target_still_fails_within_the_budget() {
    let page = FakePage::new();
    let session = common::session(&page);

    // No such element: the click never dispatches and the budget elapses
    let result = session
        .click_and_navigate("#ghost", Some(Duration::from_secs(3)))
        .await;
    assert!(
        matches!(
            result,
            Err(Error::NavigationTimeout { .. }) | Err(Error::ActionTimeout { .. })
        ),
        "expected a timeout, got {result:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn go_back_restores_the_previous_url() {
    let page = FakePage::new();
    let session = common::session(&page);

    session.goto("/").await.expect("goto home");
    session.goto("/cart").await.expect("goto cart");
    session.go_back().await.expect("back");
    assert_eq!(page.current_url(), "http://localhost:8080/");
}

#[tokio::test(start_paused = true)]
async fn reload_commits_a_fresh_navigation() {
    let page = FakePage::new();
    let session = common::session(&page);

    session.goto("/sale").await.expect("goto");
    let before = page.navigation_count();
    session.reload().await.expect("reload");
    assert_eq!(page.navigation_count(), before + 1);
    assert_eq!(page.current_url(), "http://localhost:8080/sale");
}

#[tokio::test(start_paused = true)]
async fn handles_survive_navigation_by_re_resolving() {
    let page = FakePage::new();
    page.insert("#promo", FakeElement::new().text("before"));
    let session = common::session(&page);
    let element = session.resolve("#promo").await.expect("resolve");

    assert_eq!(element.inner_text().await.expect("text"), "before");

    // Navigation replaces the document content behind the same selector
    session.goto("/other").await.expect("goto");
    page.update("#promo", |e| e.text = "after".to_string());
    assert_eq!(element.inner_text().await.expect("text"), "after");
}
