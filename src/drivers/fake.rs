// In-memory page driver.
//
// Backs the suite's own tests: a deterministic DOM-ish store with scripted
// time-based mutations (evaluated lazily against the tokio clock, so tests
// running under paused time stay exact), recorded interactions, and
// navigation events carried on a watch-channel epoch.

use crate::driver::{Driver, LoadState, SelectBy};
use crate::error::{Error, Result};
use crate::query::Selector;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// One fake DOM entry, keyed by the selector that matches it.
#[derive(Debug, Clone)]
pub struct FakeElement {
    pub visible: bool,
    pub enabled: bool,
    pub checked: bool,
    pub editable: bool,
    pub text: String,
    pub value: String,
    pub attrs: HashMap<String, String>,
    /// Number of nodes the selector matches
    pub count: usize,
    /// (value, label) pairs for `<select>` elements
    pub options: Vec<(String, String)>,
    /// Clicking triggers a navigation to this URL
    pub navigates_to: Option<String>,
}

impl Default for FakeElement {
    fn default() -> Self {
        Self {
            visible: true,
            enabled: true,
            checked: false,
            editable: false,
            text: String::new(),
            value: String::new(),
            attrs: HashMap::new(),
            count: 1,
            options: Vec::new(),
            navigates_to: None,
        }
    }
}

impl FakeElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    /// Marks the element fillable/clearable.
    pub fn input(mut self) -> Self {
        self.editable = true;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.editable = true;
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push((value.into(), label.into()));
        self
    }

    pub fn navigates_to(mut self, url: impl Into<String>) -> Self {
        self.navigates_to = Some(url.into());
        self
    }
}

type ElementKey = (Option<String>, String);
type Mutation = Box<dyn FnOnce(&mut FakeElement) + Send>;

struct Scheduled {
    due: Instant,
    key: ElementKey,
    mutate: Mutation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub kind: &'static str,
    pub selector: String,
    pub detail: String,
}

struct Store {
    url: String,
    title: String,
    history: Vec<String>,
    frames: Vec<String>,
    elements: HashMap<ElementKey, FakeElement>,
    scheduled: Vec<Scheduled>,
    interactions: Vec<Interaction>,
    driver_calls: usize,
}

/// The fake page. Construct with [`FakePage::new`], seed elements, hand the
/// `Arc` to a `Session`.
pub struct FakePage {
    store: Mutex<Store>,
    nav: watch::Sender<u64>,
}

impl FakePage {
    pub fn new() -> Arc<Self> {
        let (nav, _) = watch::channel(0);
        Arc::new(Self {
            store: Mutex::new(Store {
                url: "http://localhost:8080/".to_string(),
                title: "Storefront".to_string(),
                history: Vec::new(),
                frames: Vec::new(),
                elements: HashMap::new(),
                scheduled: Vec::new(),
                interactions: Vec::new(),
                driver_calls: 0,
            }),
            nav,
        })
    }

    // Seeding

    pub fn set_title(&self, title: impl Into<String>) {
        self.store.lock().title = title.into();
    }

    pub fn register_frame(&self, frame_css: impl Into<String>) {
        self.store.lock().frames.push(frame_css.into());
    }

    /// Inserts an element into the main document, keyed by the selector
    /// string a query compiles to (e.g. `#cart-badge`,
    /// `role=button[name="Add to cart"]`, `[data-testid="price"]`).
    pub fn insert(&self, selector: impl Into<String>, element: FakeElement) {
        self.store
            .lock()
            .elements
            .insert((None, selector.into()), element);
    }

    /// Inserts an element inside an iframe, registering the frame boundary.
    pub fn insert_in_frame(
        &self,
        frame_css: impl Into<String>,
        selector: impl Into<String>,
        element: FakeElement,
    ) {
        let frame = frame_css.into();
        let mut store = self.store.lock();
        if !store.frames.contains(&frame) {
            store.frames.push(frame.clone());
        }
        store
            .elements
            .insert((Some(frame), selector.into()), element);
    }

    /// Applies `mutate` to an element immediately.
    pub fn update(&self, selector: &str, mutate: impl FnOnce(&mut FakeElement)) {
        let mut store = self.store.lock();
        if let Some(element) = store.elements.get_mut(&(None, selector.to_string())) {
            mutate(element);
        }
    }

    /// Applies `mutate` to an element once `after` has elapsed on the tokio
    /// clock. Evaluated lazily on the next driver call at or past the
    /// deadline, so paused-clock tests see exact timing.
    pub fn update_after(
        &self,
        after: Duration,
        selector: &str,
        mutate: impl FnOnce(&mut FakeElement) + Send + 'static,
    ) {
        self.store.lock().scheduled.push(Scheduled {
            due: Instant::now() + after,
            key: (None, selector.to_string()),
            mutate: Box::new(mutate),
        });
    }

    // Observation helpers for tests

    pub fn current_url(&self) -> String {
        self.store.lock().url.clone()
    }

    pub fn interactions(&self) -> Vec<Interaction> {
        self.store.lock().interactions.clone()
    }

    pub fn click_count(&self, selector: &str) -> usize {
        self.store
            .lock()
            .interactions
            .iter()
            .filter(|i| i.kind == "click" && i.selector == selector)
            .count()
    }

    pub fn fills(&self, selector: &str) -> Vec<String> {
        self.store
            .lock()
            .interactions
            .iter()
            .filter(|i| i.kind == "fill" && i.selector == selector)
            .map(|i| i.detail.clone())
            .collect()
    }

    /// Total number of Driver trait calls observed.
    pub fn driver_calls(&self) -> usize {
        self.store.lock().driver_calls
    }

    /// Number of navigations committed so far.
    pub fn navigation_count(&self) -> u64 {
        *self.nav.borrow()
    }

    // Internals

    fn touch(&self) -> parking_lot::MutexGuard<'_, Store> {
        let mut store = self.store.lock();
        store.driver_calls += 1;
        let now = Instant::now();
        let due: Vec<Scheduled> = {
            let mut held = Vec::new();
            let scheduled = std::mem::take(&mut store.scheduled);
            let mut ready = Vec::new();
            for entry in scheduled {
                if entry.due <= now {
                    ready.push(entry);
                } else {
                    held.push(entry);
                }
            }
            store.scheduled = held;
            ready
        };
        for entry in due {
            if let Some(element) = store.elements.get_mut(&entry.key) {
                (entry.mutate)(element);
            }
        }
        store
    }

    fn commit_navigation(&self, store: &mut Store, url: String) {
        store.history.push(store.url.clone());
        store.url = url;
        self.nav.send_modify(|epoch| *epoch += 1);
    }
}

fn key_of(selector: &Selector) -> ElementKey {
    (selector.frame.clone(), selector.base.to_string())
}

fn present(element: &FakeElement, selector: &Selector) -> bool {
    match selector.nth {
        Some(nth) => nth < element.count,
        None => element.count > 0,
    }
}

fn record(store: &mut Store, kind: &'static str, selector: &Selector, detail: impl Into<String>) {
    store.interactions.push(Interaction {
        kind,
        selector: selector.base.to_string(),
        detail: detail.into(),
    });
}

#[async_trait]
impl Driver for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut store = self.touch();
        self.commit_navigation(&mut store, url.to_string());
        Ok(())
    }

    async fn reload(&self) -> Result<()> {
        let mut store = self.touch();
        let url = store.url.clone();
        self.commit_navigation(&mut store, url);
        Ok(())
    }

    async fn go_back(&self) -> Result<()> {
        let mut store = self.touch();
        match store.history.pop() {
            Some(previous) => {
                store.url = previous;
                self.nav.send_modify(|epoch| *epoch += 1);
                Ok(())
            }
            None => Err(Error::Backend("no history to go back to".into())),
        }
    }

    async fn wait_for_navigation(&self) -> Result<()> {
        let mut rx = self.nav.subscribe();
        rx.changed()
            .await
            .map_err(|_| Error::Backend("navigation channel closed".into()))
    }

    async fn wait_for_load_state(&self, _state: LoadState) -> Result<()> {
        // The fake document settles instantly
        Ok(())
    }

    async fn url(&self) -> Result<String> {
        Ok(self.touch().url.clone())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.touch().title.clone())
    }

    async fn frame_exists(&self, frame: &str) -> Result<bool> {
        Ok(self.touch().frames.iter().any(|f| f == frame))
    }

    async fn count(&self, target: &Selector) -> Result<usize> {
        let store = self.touch();
        Ok(store
            .elements
            .get(&key_of(target))
            .map(|element| match target.nth {
                Some(nth) => usize::from(nth < element.count),
                None => element.count,
            })
            .unwrap_or(0))
    }

    async fn is_visible(&self, target: &Selector) -> Result<bool> {
        let store = self.touch();
        Ok(store
            .elements
            .get(&key_of(target))
            .map(|element| present(element, target) && element.visible)
            .unwrap_or(false))
    }

    async fn is_enabled(&self, target: &Selector) -> Result<bool> {
        let store = self.touch();
        match store.elements.get(&key_of(target)) {
            Some(element) if present(element, target) => Ok(element.enabled),
            _ => Err(Error::NotFound(target.to_string())),
        }
    }

    async fn is_checked(&self, target: &Selector) -> Result<bool> {
        let store = self.touch();
        match store.elements.get(&key_of(target)) {
            Some(element) if present(element, target) => Ok(element.checked),
            _ => Err(Error::NotFound(target.to_string())),
        }
    }

    async fn inner_text(&self, target: &Selector) -> Result<String> {
        let store = self.touch();
        match store.elements.get(&key_of(target)) {
            Some(element) if present(element, target) => Ok(element.text.clone()),
            _ => Err(Error::NotFound(target.to_string())),
        }
    }

    async fn input_value(&self, target: &Selector) -> Result<String> {
        let store = self.touch();
        match store.elements.get(&key_of(target)) {
            Some(element) if present(element, target) => Ok(element.value.clone()),
            _ => Err(Error::NotFound(target.to_string())),
        }
    }

    async fn attribute(&self, target: &Selector, name: &str) -> Result<Option<String>> {
        let store = self.touch();
        match store.elements.get(&key_of(target)) {
            Some(element) if present(element, target) => Ok(element.attrs.get(name).cloned()),
            _ => Err(Error::NotFound(target.to_string())),
        }
    }

    async fn click(&self, target: &Selector) -> Result<()> {
        let mut store = self.touch();
        let key = key_of(target);
        let element = match store.elements.get(&key) {
            Some(element) if present(element, target) => element.clone(),
            _ => return Err(Error::NotFound(target.to_string())),
        };
        if !element.enabled {
            return Err(Error::ActionFailure(format!(
                "element '{target}' is disabled"
            )));
        }
        record(&mut store, "click", target, "");
        if let Some(url) = element.navigates_to {
            self.commit_navigation(&mut store, url);
        }
        Ok(())
    }

    async fn fill(&self, target: &Selector, text: &str) -> Result<()> {
        let mut store = self.touch();
        let key = key_of(target);
        match store.elements.get_mut(&key) {
            Some(element) if present(element, target) => {
                if !element.editable {
                    return Err(Error::ActionFailure(format!(
                        "element '{target}' is not a text input"
                    )));
                }
                element.value = text.to_string();
            }
            _ => return Err(Error::NotFound(target.to_string())),
        }
        record(&mut store, "fill", target, text);
        Ok(())
    }

    async fn clear(&self, target: &Selector) -> Result<()> {
        let mut store = self.touch();
        let key = key_of(target);
        match store.elements.get_mut(&key) {
            Some(element) if present(element, target) => {
                if !element.editable {
                    return Err(Error::ActionFailure(format!(
                        "element '{target}' is not a text input"
                    )));
                }
                element.value.clear();
            }
            _ => return Err(Error::NotFound(target.to_string())),
        }
        record(&mut store, "clear", target, "");
        Ok(())
    }

    async fn set_checked(&self, target: &Selector, checked: bool) -> Result<()> {
        let mut store = self.touch();
        let key = key_of(target);
        match store.elements.get_mut(&key) {
            Some(element) if present(element, target) => {
                element.checked = checked;
            }
            _ => return Err(Error::NotFound(target.to_string())),
        }
        record(&mut store, "set_checked", target, checked.to_string());
        Ok(())
    }

    async fn select(&self, target: &Selector, by: &SelectBy) -> Result<()> {
        let mut store = self.touch();
        let key = key_of(target);
        let element = match store.elements.get_mut(&key) {
            Some(element) if present(element, target) => element,
            _ => return Err(Error::NotFound(target.to_string())),
        };
        let chosen = match by {
            SelectBy::Value(value) => element.options.iter().find(|(v, _)| v == value),
            SelectBy::Text(text) => element.options.iter().find(|(_, label)| label == text),
            SelectBy::Index(index) => element.options.get(*index),
        };
        let Some((value, label)) = chosen.cloned() else {
            return Err(Error::ActionFailure(format!(
                "no option {by:?} in '{target}'"
            )));
        };
        element.value = value.clone();
        element.text = label;
        record(&mut store, "select", target, value);
        Ok(())
    }
}
