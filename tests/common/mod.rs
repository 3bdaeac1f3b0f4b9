// Shared helpers for the integration tests.

use std::sync::Arc;
use std::sync::Once;
use storefront_e2e::drivers::fake::FakePage;
use storefront_e2e::{Config, Driver, Session};

static TRACING: Once = Once::new();

/// Initializes tracing for test debugging. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// Session over a fake page with the default configuration.
#[allow(dead_code)]
pub fn session(page: &Arc<FakePage>) -> Session {
    let driver: Arc<dyn Driver> = Arc::clone(page) as Arc<dyn Driver>;
    Session::new(driver, Config::default()).expect("default config is valid")
}
