// Locator resolution and action dispatch against the in-memory page.

mod common;

use std::time::Duration;
use storefront_e2e::drivers::fake::{FakeElement, FakePage};
use storefront_e2e::{Error, Query};

#[tokio::test(start_paused = true)]
async fn resolution_is_lazy_and_uncached() {
    common::init_tracing();
    let page = FakePage::new();
    let session = common::session(&page);

    // Resolving twice performs no document access at all
    let first = session.resolve("#search").await.expect("resolve");
    let second = session.resolve("#search").await.expect("resolve");
    assert_eq!(page.driver_calls(), 0, "resolution must not touch the page");
    assert_eq!(first.selector(), second.selector());
}

#[tokio::test(start_paused = true)]
async fn resolve_all_yields_one_handle_per_match() {
    let page = FakePage::new();
    page.insert(".result", FakeElement::new().count(3));
    let session = common::session(&page);

    let handles = session.resolve_all(".result").await.expect("resolve_all");
    assert_eq!(handles.len(), 3);
    assert_eq!(handles[2].selector().to_string(), ".result >> nth=2");
}

#[tokio::test(start_paused = true)]
async fn resolve_all_with_no_matches_is_empty_not_an_error() {
    let page = FakePage::new();
    let session = common::session(&page);

    let handles = session.resolve_all(".missing").await.expect("resolve_all");
    assert!(handles.is_empty());
}

#[tokio::test(start_paused = true)]
async fn frame_scoped_query_fails_fast_when_frame_is_absent() {
    let page = FakePage::new();
    let session = common::session(&page);

    let result = session
        .resolve(Query::within("iframe#payment", Query::test_id("card-number")))
        .await;
    assert!(matches!(result, Err(Error::FrameNotFound(frame)) if frame == "iframe#payment"));
}

#[tokio::test(start_paused = true)]
async fn click_waits_for_the_element_to_become_actionable() {
    common::init_tracing();
    let page = FakePage::new();
    page.insert("role=button[name=\"Add to cart\"]", FakeElement::new().disabled());
    page.update_after(
        Duration::from_millis(200),
        "role=button[name=\"Add to cart\"]",
        |e| e.enabled = true,
    );
    let session = common::session(&page);

    session
        .click(Query::role_named("button", "Add to cart"), None)
        .await
        .expect("click should succeed once the button enables");
    assert_eq!(page.click_count("role=button[name=\"Add to cart\"]"), 1);
}

#[tokio::test(start_paused = true)]
async fn click_times_out_when_the_element_never_becomes_actionable() {
    let page = FakePage::new();
    page.insert("#buy", FakeElement::new().hidden());
    let session = common::session(&page);

    let result = session.click("#buy", Some(Duration::from_millis(500))).await;
    match result {
        Err(Error::ActionTimeout {
            action,
            selector,
            duration_ms,
        }) => {
            assert_eq!(action, "click");
            assert_eq!(selector, "#buy");
            assert_eq!(duration_ms, 500);
        }
        other => panic!("expected ActionTimeout, got {other:?}"),
    }
    assert_eq!(page.click_count("#buy"), 0, "no dispatch after timeout");
}

#[tokio::test(start_paused = true)]
async fn fill_replaces_and_clear_empties_the_value() {
    let page = FakePage::new();
    page.insert("#email", FakeElement::new().value("old@example.com"));
    let session = common::session(&page);

    session.fill("#email", "new@example.com", None).await.expect("fill");
    let element = session.resolve("#email").await.expect("resolve");
    assert_eq!(element.input_value().await.expect("value"), "new@example.com");

    session.clear("#email", None).await.expect("clear");
    assert_eq!(element.input_value().await.expect("value"), "");
    assert_eq!(page.fills("#email"), vec!["new@example.com".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn filling_a_non_input_element_is_rejected() {
    let page = FakePage::new();
    page.insert("#heading", FakeElement::new().text("Welcome"));
    let session = common::session(&page);

    let result = session.fill("#heading", "nope", None).await;
    assert!(matches!(result, Err(Error::ActionFailure(_))));
}

#[tokio::test(start_paused = true)]
async fn check_and_uncheck_are_idempotent() {
    let page = FakePage::new();
    page.insert("#terms", FakeElement::new());
    let session = common::session(&page);
    let element = session.resolve("#terms").await.expect("resolve");

    session.check("#terms", None).await.expect("check");
    session.check("#terms", None).await.expect("second check");
    assert!(element.is_checked().await.expect("checked"));

    session.uncheck("#terms", None).await.expect("uncheck");
    assert!(!element.is_checked().await.expect("checked"));
}

#[tokio::test(start_paused = true)]
async fn select_matches_by_value_text_and_index() {
    let page = FakePage::new();
    page.insert(
        "#country",
        FakeElement::new()
            .option("us", "United States")
            .option("fr", "France")
            .option("de", "Germany"),
    );
    let session = common::session(&page);
    let element = session.resolve("#country").await.expect("resolve");

    session.select_by_value("#country", "fr").await.expect("by value");
    assert_eq!(element.input_value().await.expect("value"), "fr");

    session.select_by_text("#country", "Germany").await.expect("by text");
    assert_eq!(element.input_value().await.expect("value"), "de");

    session.select_by_index("#country", 0).await.expect("by index");
    assert_eq!(element.input_value().await.expect("value"), "us");
}

#[tokio::test(start_paused = true)]
async fn selecting_a_missing_option_fails() {
    let page = FakePage::new();
    page.insert("#size", FakeElement::new().option("m", "Medium"));
    let session = common::session(&page);

    let result = session.select_by_value("#size", "xxl").await;
    assert!(matches!(result, Err(Error::ActionFailure(_))));
}

#[tokio::test(start_paused = true)]
async fn frame_scoped_fill_reaches_into_the_frame() {
    let page = FakePage::new();
    page.insert_in_frame(
        "iframe#payment",
        "[data-testid=\"card-number\"]",
        FakeElement::new().input(),
    );
    let session = common::session(&page);

    session
        .fill(
            Query::within("iframe#payment", Query::test_id("card-number")),
            "4242 4242 4242 4242",
            None,
        )
        .await
        .expect("fill inside frame");
    assert_eq!(
        page.fills("[data-testid=\"card-number\"]"),
        vec!["4242 4242 4242 4242".to_string()]
    );
}
