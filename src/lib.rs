//! storefront-e2e: end-to-end UI test suite for the storefront website.
//!
//! A thin, auto-retrying abstraction over a browser-automation backend:
//! tagged locator queries, a session-scoped action dispatcher, a polling
//! `expect()` assertion layer with soft-failure batching, page objects for
//! the storefront flows, and a lifecycle reporter for the test run.
//!
//! # Examples
//!
//! ## Resolving, acting, asserting
//!
//! ```ignore
//! use storefront_e2e::{Config, Query, Session};
//! use storefront_e2e::drivers::webdriver::WebDriverPage;
//!
//! #[tokio::main]
//! async fn main() -> storefront_e2e::Result<()> {
//!     let driver = WebDriverPage::connect("http://localhost:4444").await?;
//!     let session = Session::new(driver, Config::from_env()?)?;
//!
//!     session.goto("/").await?;
//!     session.fill(Query::placeholder("Search products"), "boots", None).await?;
//!     session.click_and_navigate(Query::role_named("button", "Search"), None).await?;
//!
//!     session
//!         .expect(Query::test_id("product-card"))
//!         .await?
//!         .to_be_visible()
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Soft assertions
//!
//! ```ignore
//! // Failures accumulate instead of aborting; assert_all() reports them
//! // together at the end of the block.
//! session
//!     .expect(Query::test_id("cart-total"))
//!     .await?
//!     .soft(session.soft())
//!     .to_have_text("$42.00")
//!     .await?;
//! session
//!     .expect(Query::test_id("cart-badge"))
//!     .await?
//!     .soft(session.soft())
//!     .to_have_text("2")
//!     .await?;
//! session.soft().assert_all()?;
//! ```

pub mod assertions;
pub mod config;
pub mod driver;
pub mod drivers;
pub mod element;
pub mod error;
pub mod pages;
pub mod poll;
pub mod query;
pub mod report;
pub mod session;

// Re-export error types
pub use error::{Error, Result};

// Re-export the session context and configuration
pub use config::{Config, Timeouts};
pub use session::Session;

// Re-export locator and element APIs
pub use element::Element;
pub use query::{Query, Selector};

// Re-export the driver seam
pub use driver::{Driver, LoadState, SelectBy};

// Re-export assertions API
pub use assertions::{expect, Expectation, Match, PageExpectation, SoftAssertions};

// Re-export reporter types
pub use report::{LogReporter, LogSink, Reporter, TestCase, TestResult, TestStatus};
