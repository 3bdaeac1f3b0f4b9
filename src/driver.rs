// Driver seam - the boundary between the suite and the browser-automation
// runtime.
//
// Everything above this trait (poller, resolver, actions, assertions, page
// objects) is runtime-agnostic. `drivers::fake` implements it in memory for
// the suite's own tests; `drivers::webdriver` (feature "webdriver") maps it
// onto a live WebDriver session.

use crate::error::Result;
use crate::query::Selector;
use async_trait::async_trait;

/// Named milestone in page-navigation completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// The `load` event has fired
    #[default]
    Load,
    /// The `DOMContentLoaded` event has fired
    DomContentLoaded,
    /// No network connections for at least 500ms
    NetworkIdle,
}

impl LoadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadState::Load => "load",
            LoadState::DomContentLoaded => "domcontentloaded",
            LoadState::NetworkIdle => "networkidle",
        }
    }
}

/// How to pick an option inside a `<select>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectBy {
    /// By the option's value attribute
    Value(String),
    /// By the option's visible text
    Text(String),
    /// By the option's index (0-based)
    Index(usize),
}

impl From<&str> for SelectBy {
    fn from(value: &str) -> Self {
        SelectBy::Value(value.to_string())
    }
}

impl From<String> for SelectBy {
    fn from(value: String) -> Self {
        SelectBy::Value(value)
    }
}

/// Page/element/frame primitives supplied by the automation runtime.
///
/// Selectors are re-evaluated against the live document on every call;
/// implementations must not cache element lookups across calls.
#[async_trait]
pub trait Driver: Send + Sync {
    // Navigation

    async fn goto(&self, url: &str) -> Result<()>;
    async fn reload(&self) -> Result<()>;
    async fn go_back(&self) -> Result<()>;

    /// Resolves when the next full navigation commits.
    ///
    /// The subscription takes effect when the returned future is first
    /// polled; callers racing an action against this event must create and
    /// poll this future before dispatching the action.
    async fn wait_for_navigation(&self) -> Result<()>;

    /// Resolves when the current document reaches `state`.
    async fn wait_for_load_state(&self, state: LoadState) -> Result<()>;

    async fn url(&self) -> Result<String>;
    async fn title(&self) -> Result<String>;

    // Frame boundaries

    /// Whether the iframe named by `frame` exists in the current document.
    async fn frame_exists(&self, frame: &str) -> Result<bool>;

    // Element state

    async fn count(&self, target: &Selector) -> Result<usize>;
    async fn is_visible(&self, target: &Selector) -> Result<bool>;
    async fn is_enabled(&self, target: &Selector) -> Result<bool>;
    async fn is_checked(&self, target: &Selector) -> Result<bool>;
    async fn inner_text(&self, target: &Selector) -> Result<String>;
    async fn input_value(&self, target: &Selector) -> Result<String>;
    async fn attribute(&self, target: &Selector, name: &str) -> Result<Option<String>>;

    // Actions

    async fn click(&self, target: &Selector) -> Result<()>;
    async fn fill(&self, target: &Selector, text: &str) -> Result<()>;
    async fn clear(&self, target: &Selector) -> Result<()>;
    async fn set_checked(&self, target: &Selector, checked: bool) -> Result<()>;
    async fn select(&self, target: &Selector, by: &SelectBy) -> Result<()>;
}
