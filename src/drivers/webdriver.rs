// WebDriver backend (feature "webdriver").
//
// Maps the driver seam onto a live browser through thirtyfour. Frame
// switching is session-global in WebDriver, so every call that touches the
// document takes an internal lock, switches into the target frame if the
// selector is frame-scoped, and always switches back before returning.

use crate::driver::{Driver, LoadState, SelectBy};
use crate::error::{Error, Result};
use crate::query::{Selector, SelectorBase};
use async_trait::async_trait;
use std::sync::Arc;
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;

/// A live browser page behind a WebDriver session.
pub struct WebDriverPage {
    driver: WebDriver,
    // Serializes document access so frame switches cannot interleave
    lock: tokio::sync::Mutex<()>,
}

impl WebDriverPage {
    pub fn new(driver: WebDriver) -> Arc<Self> {
        Arc::new(Self {
            driver,
            lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Connects to a WebDriver server and opens a Chrome session.
    pub async fn connect(server_url: &str) -> Result<Arc<Self>> {
        let caps = DesiredCapabilities::chrome();
        let driver = WebDriver::new(server_url, caps)
            .await
            .map_err(backend)?;
        Ok(Self::new(driver))
    }

    pub async fn quit(self: Arc<Self>) -> Result<()> {
        match Arc::try_unwrap(self) {
            Ok(page) => page.driver.quit().await.map_err(backend),
            Err(_) => Err(Error::Backend(
                "cannot quit: session still shared".into(),
            )),
        }
    }

    async fn enter_scope(&self, target: &Selector) -> Result<()> {
        if let Some(frame) = &target.frame {
            let iframe = self
                .driver
                .find(By::Css(frame.clone()))
                .await
                .map_err(|_| Error::FrameNotFound(frame.clone()))?;
            iframe.enter_frame().await.map_err(backend)?;
        }
        Ok(())
    }

    async fn leave_scope(&self, target: &Selector) -> Result<()> {
        if target.frame.is_some() {
            self.driver.enter_default_frame().await.map_err(backend)?;
        }
        Ok(())
    }

    /// Finds all nodes matching `target` in the current scope.
    async fn find_all_scoped(&self, target: &Selector) -> Result<Vec<WebElement>> {
        self.driver
            .find_all(by_of(&target.base))
            .await
            .map_err(backend)
    }

    /// Finds the node `target` addresses, honoring its match index.
    async fn find_scoped(&self, target: &Selector) -> Result<WebElement> {
        let matches = self.find_all_scoped(target).await?;
        let index = target.nth.unwrap_or(0);
        matches
            .into_iter()
            .nth(index)
            .ok_or_else(|| Error::NotFound(target.to_string()))
    }

    /// Runs `op` against the resolved element inside its frame scope.
    async fn with_element<T, F>(&self, target: &Selector, op: F) -> Result<T>
    where
        F: AsyncFnOnce(WebElement) -> Result<T>,
    {
        let _guard = self.lock.lock().await;
        self.enter_scope(target).await?;
        let outcome = match self.find_scoped(target).await {
            Ok(element) => op(element).await,
            Err(error) => Err(error),
        };
        self.leave_scope(target).await?;
        outcome
    }

    async fn ready_state(&self) -> Result<String> {
        let ret = self
            .driver
            .execute("return document.readyState;", Vec::new())
            .await
            .map_err(backend)?;
        Ok(ret.json().as_str().unwrap_or_default().to_string())
    }
}

fn backend(error: WebDriverError) -> Error {
    Error::Backend(error.to_string())
}

fn quoted(text: &str) -> String {
    // XPath 1.0 has no escaping; reject the pathological case up front
    text.replace('"', "")
}

/// Lowers a selector base into a thirtyfour locator.
fn by_of(base: &SelectorBase) -> By {
    match base {
        SelectorBase::Css(css) => By::Css(css.clone()),
        SelectorBase::TestId(id) => By::Css(format!("[data-testid=\"{id}\"]")),
        SelectorBase::Placeholder(text) => By::Css(format!("[placeholder=\"{text}\"]")),
        SelectorBase::Label(text) => {
            let text = quoted(text);
            By::XPath(format!(
                "//*[@id=//label[normalize-space(.)=\"{text}\"]/@for] \
                 | //label[normalize-space(.)=\"{text}\"]//input"
            ))
        }
        SelectorBase::Text { text, exact: true } => {
            let text = quoted(text);
            By::XPath(format!("//*[normalize-space(text())=\"{text}\"]"))
        }
        SelectorBase::Text { text, exact: false } => {
            let text = quoted(text);
            By::XPath(format!("//*[contains(normalize-space(text()),\"{text}\")]"))
        }
        SelectorBase::Role { role, name: None } => {
            By::Css(format!("{role}, [role=\"{role}\"]"))
        }
        SelectorBase::Role {
            role,
            name: Some(name),
        } => {
            let name = quoted(name);
            By::XPath(format!(
                "//{role}[normalize-space(.)=\"{name}\" or @aria-label=\"{name}\"] \
                 | //*[@role=\"{role}\"][normalize-space(.)=\"{name}\" or @aria-label=\"{name}\"]"
            ))
        }
    }
}

const NAV_SENTINEL: &str = "window.__storefrontNavSentinel = true;";
const NAV_SENTINEL_PROBE: &str = "return window.__storefrontNavSentinel === true;";

#[async_trait]
impl Driver for WebDriverPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.driver.goto(url).await.map_err(backend)
    }

    async fn reload(&self) -> Result<()> {
        self.driver.refresh().await.map_err(backend)
    }

    async fn go_back(&self) -> Result<()> {
        self.driver.back().await.map_err(backend)
    }

    async fn wait_for_navigation(&self) -> Result<()> {
        // Plant a sentinel on the current document; a committed navigation
        // replaces the document and drops it.
        self.driver
            .execute(NAV_SENTINEL, Vec::new())
            .await
            .map_err(backend)?;
        loop {
            let ret = self
                .driver
                .execute(NAV_SENTINEL_PROBE, Vec::new())
                .await
                .map_err(backend)?;
            if ret.json().as_bool() != Some(true) {
                return Ok(());
            }
            tokio::time::sleep(crate::poll::POLL_INTERVAL).await;
        }
    }

    async fn wait_for_load_state(&self, state: LoadState) -> Result<()> {
        let accepted: &[&str] = match state {
            LoadState::DomContentLoaded => &["interactive", "complete"],
            // No network instrumentation over plain WebDriver; treat idle
            // as document-complete
            LoadState::Load | LoadState::NetworkIdle => &["complete"],
        };
        loop {
            let ready = self.ready_state().await?;
            if accepted.contains(&ready.as_str()) {
                return Ok(());
            }
            tokio::time::sleep(crate::poll::POLL_INTERVAL).await;
        }
    }

    async fn url(&self) -> Result<String> {
        Ok(self.driver.current_url().await.map_err(backend)?.to_string())
    }

    async fn title(&self) -> Result<String> {
        self.driver.title().await.map_err(backend)
    }

    async fn frame_exists(&self, frame: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let matches = self
            .driver
            .find_all(By::Css(frame.to_string()))
            .await
            .map_err(backend)?;
        Ok(!matches.is_empty())
    }

    async fn count(&self, target: &Selector) -> Result<usize> {
        let _guard = self.lock.lock().await;
        self.enter_scope(target).await?;
        let outcome = self.find_all_scoped(target).await;
        self.leave_scope(target).await?;
        let matches = outcome?;
        Ok(match target.nth {
            Some(nth) => usize::from(nth < matches.len()),
            None => matches.len(),
        })
    }

    async fn is_visible(&self, target: &Selector) -> Result<bool> {
        let _guard = self.lock.lock().await;
        self.enter_scope(target).await?;
        let outcome = self.find_all_scoped(target).await;
        let visible = match outcome {
            Ok(matches) => {
                let index = target.nth.unwrap_or(0);
                match matches.into_iter().nth(index) {
                    Some(element) => element.is_displayed().await.map_err(backend),
                    None => Ok(false),
                }
            }
            Err(error) => Err(error),
        };
        self.leave_scope(target).await?;
        visible
    }

    async fn is_enabled(&self, target: &Selector) -> Result<bool> {
        self.with_element(target, async |element| {
            element.is_enabled().await.map_err(backend)
        })
        .await
    }

    async fn is_checked(&self, target: &Selector) -> Result<bool> {
        self.with_element(target, async |element| {
            element.is_selected().await.map_err(backend)
        })
        .await
    }

    async fn inner_text(&self, target: &Selector) -> Result<String> {
        self.with_element(target, async |element| {
            element.text().await.map_err(backend)
        })
        .await
    }

    async fn input_value(&self, target: &Selector) -> Result<String> {
        self.with_element(target, async |element| {
            Ok(element
                .prop("value")
                .await
                .map_err(backend)?
                .unwrap_or_default())
        })
        .await
    }

    async fn attribute(&self, target: &Selector, name: &str) -> Result<Option<String>> {
        self.with_element(target, async |element| {
            element.attr(name).await.map_err(backend)
        })
        .await
    }

    async fn click(&self, target: &Selector) -> Result<()> {
        self.with_element(target, async |element| {
            element.click().await.map_err(backend)
        })
        .await
    }

    async fn fill(&self, target: &Selector, text: &str) -> Result<()> {
        self.with_element(target, async |element| {
            element.clear().await.map_err(backend)?;
            element.send_keys(text).await.map_err(backend)
        })
        .await
    }

    async fn clear(&self, target: &Selector) -> Result<()> {
        self.with_element(target, async |element| {
            element.clear().await.map_err(backend)
        })
        .await
    }

    async fn set_checked(&self, target: &Selector, checked: bool) -> Result<()> {
        self.with_element(target, async |element| {
            let current = element.is_selected().await.map_err(backend)?;
            if current != checked {
                element.click().await.map_err(backend)?;
            }
            Ok(())
        })
        .await
    }

    async fn select(&self, target: &Selector, by: &SelectBy) -> Result<()> {
        self.with_element(target, async |element| {
            let options = element
                .find_all(By::Css("option".to_string()))
                .await
                .map_err(backend)?;
            let mut chosen = None;
            match by {
                SelectBy::Index(index) => chosen = options.into_iter().nth(*index),
                SelectBy::Value(value) => {
                    for option in options {
                        if option.attr("value").await.map_err(backend)?.as_deref()
                            == Some(value.as_str())
                        {
                            chosen = Some(option);
                            break;
                        }
                    }
                }
                SelectBy::Text(text) => {
                    for option in options {
                        if option.text().await.map_err(backend)?.trim() == text {
                            chosen = Some(option);
                            break;
                        }
                    }
                }
            }
            match chosen {
                Some(option) => option.click().await.map_err(backend),
                None => Err(Error::ActionFailure(format!(
                    "no option {by:?} in '{target}'"
                ))),
            }
        })
        .await
    }
}
