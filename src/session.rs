// Session - the explicit per-test context.
//
// One Session per test case: it owns the driver handle, the timeout
// configuration, and the soft-assertion accumulator. Parallel test workers
// each build their own Session; nothing here is process-global, so
// co-located tests cannot cross-contaminate.

use crate::assertions::{Expectation, PageExpectation, SoftAssertions};
use crate::config::Config;
use crate::driver::{Driver, SelectBy};
use crate::element::Element;
use crate::error::{Error, Result};
use crate::query::Query;
use std::sync::Arc;
use std::time::Duration;

/// Per-test context tying a driver to configuration and soft assertions.
pub struct Session {
    driver: Arc<dyn Driver>,
    config: Config,
    soft: SoftAssertions,
}

impl Session {
    /// Creates a session over `driver`, validating the timeout ordering.
    pub fn new(driver: Arc<dyn Driver>, config: Config) -> Result<Self> {
        config.timeouts.validate()?;
        Ok(Self {
            driver,
            config,
            soft: SoftAssertions::default(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    /// The session-scoped soft-assertion accumulator.
    ///
    /// Finalize a batch with [`SoftAssertions::assert_all`]; nothing checks
    /// the list automatically.
    pub fn soft(&self) -> &SoftAssertions {
        &self.soft
    }

    // Locator resolution

    /// Resolves a query into an element handle.
    ///
    /// Lazy and uncached: resolving the same query twice yields two
    /// independent handles that each re-query the live document. The only
    /// eager work is the frame-boundary check for `Query::Within`, which
    /// fails with [`Error::FrameNotFound`] when the iframe is absent.
    pub async fn resolve(&self, query: impl Into<Query>) -> Result<Element> {
        let query = query.into();
        if let Query::Handle(handle) = query {
            return Ok(handle);
        }

        let selector = query.compile();
        if let Some(frame) = &selector.frame
            && !self.driver.frame_exists(frame).await?
        {
            return Err(Error::FrameNotFound(frame.clone()));
        }
        Ok(Element::new(
            Arc::clone(&self.driver),
            selector,
            self.config.timeouts,
        ))
    }

    /// Resolves a query into one handle per matching node, document order.
    ///
    /// Zero matches yield an empty vec, not an error.
    pub async fn resolve_all(&self, query: impl Into<Query>) -> Result<Vec<Element>> {
        let base = self.resolve(query).await?;
        let count = base.count().await?;
        Ok((0..count).map(|i| base.nth(i)).collect())
    }

    // Action dispatch - resolve, then act with an optional budget override

    pub async fn click(&self, query: impl Into<Query>, timeout: Option<Duration>) -> Result<()> {
        self.resolve(query).await?.click(timeout).await
    }

    pub async fn fill(
        &self,
        query: impl Into<Query>,
        text: &str,
        timeout: Option<Duration>,
    ) -> Result<()> {
        self.resolve(query).await?.fill(text, timeout).await
    }

    pub async fn clear(&self, query: impl Into<Query>, timeout: Option<Duration>) -> Result<()> {
        self.resolve(query).await?.clear(timeout).await
    }

    pub async fn check(&self, query: impl Into<Query>, timeout: Option<Duration>) -> Result<()> {
        self.resolve(query).await?.check(timeout).await
    }

    pub async fn uncheck(&self, query: impl Into<Query>, timeout: Option<Duration>) -> Result<()> {
        self.resolve(query).await?.uncheck(timeout).await
    }

    pub async fn select_by_value(&self, query: impl Into<Query>, value: &str) -> Result<()> {
        self.resolve(query)
            .await?
            .select(SelectBy::Value(value.to_string()), None)
            .await
    }

    pub async fn select_by_text(&self, query: impl Into<Query>, text: &str) -> Result<()> {
        self.resolve(query)
            .await?
            .select(SelectBy::Text(text.to_string()), None)
            .await
    }

    pub async fn select_by_index(&self, query: impl Into<Query>, index: usize) -> Result<()> {
        self.resolve(query)
            .await?
            .select(SelectBy::Index(index), None)
            .await
    }

    // Navigation

    /// Navigates to `path` (joined against the base URL) and waits for the
    /// configured load state.
    pub async fn goto(&self, path: &str) -> Result<()> {
        let url = self.config.page_url(path)?;
        let budget = self.config.timeouts.navigation;

        let outcome = tokio::time::timeout(budget, async {
            self.driver.goto(url.as_str()).await?;
            self.driver.wait_for_load_state(self.config.load_state).await
        })
        .await;

        match outcome {
            Ok(result) => result,
            Err(_) => Err(Error::NavigationTimeout {
                url: url.to_string(),
                duration_ms: budget.as_millis() as u64,
            }),
        }
    }

    /// Reloads the page, observing a settled DOM before returning.
    pub async fn reload(&self) -> Result<()> {
        let budget = self.config.timeouts.navigation;
        self.settled_navigation(self.driver.reload(), budget).await
    }

    /// History-back, observing a settled DOM before returning.
    pub async fn go_back(&self) -> Result<()> {
        let budget = self.config.timeouts.navigation;
        self.settled_navigation(self.driver.go_back(), budget).await
    }

    /// Clicks and waits for the resulting full navigation plus load state.
    ///
    /// A click that dispatches but never triggers a navigation within the
    /// budget fails with [`Error::NavigationTimeout`]; a click that cannot
    /// dispatch at all keeps its own error.
    pub async fn click_and_navigate(
        &self,
        query: impl Into<Query>,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let element = self.resolve(query).await?;
        let budget = timeout.unwrap_or(self.config.timeouts.navigation);
        self.settled_navigation(element.click(Some(budget)), budget)
            .await
    }

    /// Runs `op` joined with the next frame-navigated event, then awaits the
    /// configured load state, all raced against `budget`.
    ///
    /// The event subscription is polled before `op` so a navigation that
    /// commits during the operation itself is not missed; both branches
    /// settle before this returns.
    async fn settled_navigation<F>(&self, op: F, budget: Duration) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        let nav = self.driver.wait_for_navigation();
        tokio::pin!(nav);
        tokio::pin!(op);

        let settled = async {
            tokio::select! {
                biased;
                nav_res = &mut nav => {
                    nav_res?;
                    op.await?;
                }
                op_res = &mut op => {
                    op_res?;
                    (&mut nav).await?;
                }
            }
            self.driver.wait_for_load_state(self.config.load_state).await
        };

        match tokio::time::timeout(budget, settled).await {
            Ok(result) => result,
            Err(_) => Err(Error::NavigationTimeout {
                url: self.driver.url().await.unwrap_or_default(),
                duration_ms: budget.as_millis() as u64,
            }),
        }
    }

    // Assertion entry points

    /// Expectation over the element a query resolves to.
    pub async fn expect(&self, query: impl Into<Query>) -> Result<Expectation> {
        Ok(crate::assertions::expect(self.resolve(query).await?))
    }

    /// Expectation over page-level state (URL, title).
    pub fn expect_page(&self) -> PageExpectation {
        PageExpectation::new(Arc::clone(&self.driver), self.config.timeouts)
    }
}
