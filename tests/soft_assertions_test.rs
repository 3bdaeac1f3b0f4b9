// Soft-assertion batching: failures accumulate instead of aborting, and
// surface together only through an explicit assert_all().

mod common;

use std::time::Duration;
use storefront_e2e::drivers::fake::{FakeElement, FakePage};
use storefront_e2e::Error;

#[tokio::test(start_paused = true)]
async fn failures_batch_and_drain_on_assert_all() {
    common::init_tracing();
    let page = FakePage::new();
    page.insert("#total", FakeElement::new().text("$41.00"));
    page.insert("#badge", FakeElement::new().hidden());
    let session = common::session(&page);
    let budget = Duration::from_millis(200);

    // Both checks fail but return Ok - execution continues
    session
        .expect("#total")
        .await
        .expect("resolve")
        .soft(session.soft())
        .with_timeout(budget)
        .to_have_text("$42.00")
        .await
        .expect("soft failure must not abort");
    session
        .expect("#badge")
        .await
        .expect("resolve")
        .soft(session.soft())
        .with_timeout(budget)
        .to_be_visible()
        .await
        .expect("soft failure must not abort");

    assert_eq!(session.soft().len(), 2);

    let error = session.soft().assert_all().expect_err("two failures pending");
    match error {
        Error::SoftAssertionsFailed(failures) => {
            assert_eq!(failures.len(), 2);
            let rendered = failures.to_string();
            assert!(rendered.contains("#total"));
            assert!(rendered.contains("#badge"));
        }
        other => panic!("expected SoftAssertionsFailed, got {other}"),
    }

    // Drained: finalizing again passes
    session.soft().assert_all().expect("list drained");
}

#[tokio::test(start_paused = true)]
async fn passing_soft_checks_record_nothing() {
    let page = FakePage::new();
    page.insert("#total", FakeElement::new().text("$42.00"));
    let session = common::session(&page);

    session
        .expect("#total")
        .await
        .expect("resolve")
        .soft(session.soft())
        .to_have_text("$42.00")
        .await
        .expect("passes");

    assert!(session.soft().is_empty());
    session.soft().assert_all().expect("nothing recorded");
}

#[tokio::test(start_paused = true)]
async fn hard_assertions_are_unaffected_by_pending_soft_failures() {
    let page = FakePage::new();
    page.insert("#badge", FakeElement::new().hidden());
    let session = common::session(&page);
    let budget = Duration::from_millis(200);

    session
        .expect("#badge")
        .await
        .expect("resolve")
        .soft(session.soft())
        .with_timeout(budget)
        .to_be_visible()
        .await
        .expect("soft failure continues");

    // A hard check still aborts immediately, leaving the soft list intact
    let result = session
        .expect("#badge")
        .await
        .expect("resolve")
        .with_timeout(budget)
        .to_be_visible()
        .await;
    assert!(matches!(result, Err(Error::Assertion(_))));
    assert_eq!(session.soft().len(), 1);
}
