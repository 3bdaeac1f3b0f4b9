// Element handle - a live, re-resolvable view of the node(s) matching a
// selector.
//
// Handles are lightweight: a compiled selector plus the driver to evaluate
// it against. Every state sample and action re-queries the live document,
// so a handle held across a navigation simply starts observing the new
// document (or stops matching) instead of going stale.

use crate::config::Timeouts;
use crate::driver::{Driver, SelectBy};
use crate::error::{Error, Result};
use crate::poll;
use crate::query::Selector;
use std::sync::Arc;
use std::time::Duration;

/// A resolved element reference.
///
/// Actions auto-wait for the element to become actionable (visible and
/// enabled) within the action budget before dispatching; an element that
/// never gets there surfaces [`Error::ActionTimeout`].
#[derive(Clone)]
pub struct Element {
    driver: Arc<dyn Driver>,
    selector: Selector,
    timeouts: Timeouts,
}

impl Element {
    pub(crate) fn new(driver: Arc<dyn Driver>, selector: Selector, timeouts: Timeouts) -> Self {
        Self {
            driver,
            selector,
            timeouts,
        }
    }

    /// The compiled selector backing this handle.
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub(crate) fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Handle narrowed to the `index`-th matching node (document order).
    pub fn nth(&self, index: usize) -> Element {
        Element {
            driver: Arc::clone(&self.driver),
            selector: self.selector.nth(index),
            timeouts: self.timeouts,
        }
    }

    // State sampling - single reads against the live document

    pub async fn count(&self) -> Result<usize> {
        self.driver.count(&self.selector).await
    }

    pub async fn is_visible(&self) -> Result<bool> {
        self.driver.is_visible(&self.selector).await
    }

    pub async fn is_enabled(&self) -> Result<bool> {
        self.driver.is_enabled(&self.selector).await
    }

    pub async fn is_checked(&self) -> Result<bool> {
        self.driver.is_checked(&self.selector).await
    }

    pub async fn inner_text(&self) -> Result<String> {
        self.driver.inner_text(&self.selector).await
    }

    pub async fn input_value(&self) -> Result<String> {
        self.driver.input_value(&self.selector).await
    }

    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.driver.attribute(&self.selector, name).await
    }

    /// Waits until the element is visible (or not) within `timeout`,
    /// defaulting to the standard budget. Returns the final observation;
    /// never errors.
    pub async fn wait_visible(&self, visible: bool, timeout: Option<Duration>) -> bool {
        let budget = timeout.unwrap_or(self.timeouts.standard);
        poll::wait_for_condition(
            async || Ok(self.driver.is_visible(&self.selector).await? == visible),
            budget,
        )
        .await
    }

    // Actions

    pub async fn click(&self, timeout: Option<Duration>) -> Result<()> {
        self.actionable("click", timeout).await?;
        self.driver.click(&self.selector).await
    }

    pub async fn fill(&self, text: &str, timeout: Option<Duration>) -> Result<()> {
        self.actionable("fill", timeout).await?;
        self.driver.fill(&self.selector, text).await
    }

    pub async fn clear(&self, timeout: Option<Duration>) -> Result<()> {
        self.actionable("clear", timeout).await?;
        self.driver.clear(&self.selector).await
    }

    /// Ensures the checkbox is checked. Idempotent.
    pub async fn check(&self, timeout: Option<Duration>) -> Result<()> {
        self.actionable("check", timeout).await?;
        self.driver.set_checked(&self.selector, true).await
    }

    /// Ensures the checkbox is unchecked. Idempotent.
    pub async fn uncheck(&self, timeout: Option<Duration>) -> Result<()> {
        self.actionable("uncheck", timeout).await?;
        self.driver.set_checked(&self.selector, false).await
    }

    pub async fn select(&self, by: impl Into<SelectBy>, timeout: Option<Duration>) -> Result<()> {
        self.actionable("select", timeout).await?;
        self.driver.select(&self.selector, &by.into()).await
    }

    /// Polls actionability (visible and enabled) within the action budget.
    async fn actionable(&self, action: &'static str, timeout: Option<Duration>) -> Result<()> {
        let budget = timeout.unwrap_or(self.timeouts.action);
        let ready = poll::wait_for_condition(
            async || {
                Ok(self.driver.is_visible(&self.selector).await?
                    && self.driver.is_enabled(&self.selector).await?)
            },
            budget,
        )
        .await;

        if ready {
            tracing::debug!(selector = %self.selector, action, "dispatching action");
            Ok(())
        } else {
            Err(Error::ActionTimeout {
                action,
                selector: self.selector.to_string(),
                duration_ms: budget.as_millis() as u64,
            })
        }
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("selector", &self.selector.to_string())
            .finish()
    }
}
