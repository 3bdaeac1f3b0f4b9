// Locator queries - the tagged-variant form of "how to find an element".
//
// A Query is compiled exactly once, at the resolver boundary, into a
// structured Selector that drivers interpret. Compilation is pure: no
// document access happens until an action or state sample runs against the
// resulting handle.

use crate::element::Element;
use std::fmt;

/// One way of locating element(s) on the page.
#[derive(Debug, Clone)]
pub enum Query {
    /// Raw CSS selector
    Css(String),
    /// ARIA role, optionally narrowed by accessible name
    Role { role: String, name: Option<String> },
    /// Visible text, substring by default
    Text { text: String, exact: bool },
    /// Associated `<label>` text
    Label(String),
    /// Placeholder attribute
    Placeholder(String),
    /// `data-testid` attribute
    TestId(String),
    /// Query scoped to an iframe boundary
    Within { frame: String, inner: Box<Query> },
    /// Already-resolved handle, passed through unchanged
    Handle(Element),
}

impl Query {
    pub fn css(selector: impl Into<String>) -> Self {
        Query::Css(selector.into())
    }

    pub fn role(role: impl Into<String>) -> Self {
        Query::Role {
            role: role.into(),
            name: None,
        }
    }

    pub fn role_named(role: impl Into<String>, name: impl Into<String>) -> Self {
        Query::Role {
            role: role.into(),
            name: Some(name.into()),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Query::Text {
            text: text.into(),
            exact: false,
        }
    }

    pub fn text_exact(text: impl Into<String>) -> Self {
        Query::Text {
            text: text.into(),
            exact: true,
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Query::Label(text.into())
    }

    pub fn placeholder(text: impl Into<String>) -> Self {
        Query::Placeholder(text.into())
    }

    pub fn test_id(id: impl Into<String>) -> Self {
        Query::TestId(id.into())
    }

    /// Scopes `inner` to the iframe located by the CSS selector `frame`.
    pub fn within(frame: impl Into<String>, inner: Query) -> Self {
        Query::Within {
            frame: frame.into(),
            inner: Box::new(inner),
        }
    }

    /// Compiles this query into its structured selector form.
    ///
    /// Pure: no document access. A `Handle` compiles to the selector it
    /// already carries.
    pub(crate) fn compile(&self) -> Selector {
        let base = match self {
            Query::Css(css) => SelectorBase::Css(css.clone()),
            Query::Role { role, name } => SelectorBase::Role {
                role: role.clone(),
                name: name.clone(),
            },
            Query::Text { text, exact } => SelectorBase::Text {
                text: text.clone(),
                exact: *exact,
            },
            Query::Label(text) => SelectorBase::Label(text.clone()),
            Query::Placeholder(text) => SelectorBase::Placeholder(text.clone()),
            Query::TestId(id) => SelectorBase::TestId(id.clone()),
            Query::Within { frame, inner } => {
                let mut selector = inner.compile();
                selector.frame = Some(frame.clone());
                return selector;
            }
            Query::Handle(handle) => return handle.selector().clone(),
        };
        Selector {
            frame: None,
            base,
            nth: None,
        }
    }
}

impl From<&str> for Query {
    fn from(selector: &str) -> Self {
        Query::Css(selector.to_string())
    }
}

impl From<String> for Query {
    fn from(selector: String) -> Self {
        Query::Css(selector)
    }
}

impl From<Element> for Query {
    fn from(handle: Element) -> Self {
        Query::Handle(handle)
    }
}

/// The locating strategy a driver interprets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectorBase {
    Css(String),
    Role { role: String, name: Option<String> },
    Text { text: String, exact: bool },
    Label(String),
    Placeholder(String),
    TestId(String),
}

/// Compiled selector: strategy plus optional frame scope and match index.
///
/// Drivers re-evaluate this against the live document on every call; a
/// Selector never holds a node reference and so cannot go stale, though the
/// nodes it matches may change across navigations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    /// CSS selector of the iframe boundary, if frame-scoped
    pub frame: Option<String>,
    /// Locating strategy
    pub base: SelectorBase,
    /// Index among matches, in document order
    pub nth: Option<usize>,
}

impl Selector {
    /// Copy of this selector narrowed to the `index`-th match.
    pub fn nth(&self, index: usize) -> Selector {
        Selector {
            nth: Some(index),
            ..self.clone()
        }
    }
}

impl fmt::Display for SelectorBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorBase::Css(css) => write!(f, "{css}"),
            SelectorBase::Role { role, name: None } => write!(f, "role={role}"),
            SelectorBase::Role {
                role,
                name: Some(name),
            } => write!(f, "role={role}[name=\"{name}\"]"),
            SelectorBase::Text { text, exact: true } => write!(f, "text=\"{text}\""),
            SelectorBase::Text { text, exact: false } => write!(f, "text={text}"),
            SelectorBase::Label(text) => write!(f, "label=\"{text}\""),
            SelectorBase::Placeholder(text) => write!(f, "placeholder=\"{text}\""),
            SelectorBase::TestId(id) => write!(f, "[data-testid=\"{id}\"]"),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(frame) = &self.frame {
            write!(f, "{frame} >>> ")?;
        }
        write!(f, "{}", self.base)?;
        if let Some(nth) = self.nth {
            write!(f, " >> nth={nth}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_query_compiles_unscoped() {
        let selector = Query::css("#cart-badge").compile();
        assert_eq!(selector.frame, None);
        assert_eq!(selector.nth, None);
        assert_eq!(selector.to_string(), "#cart-badge");
    }

    #[test]
    fn role_and_text_render_engine_syntax() {
        let role = Query::role_named("button", "Add to cart").compile();
        assert_eq!(role.to_string(), "role=button[name=\"Add to cart\"]");

        let text = Query::text_exact("Checkout").compile();
        assert_eq!(text.to_string(), "text=\"Checkout\"");
    }

    #[test]
    fn within_attaches_frame_scope() {
        let selector = Query::within("iframe#payment", Query::test_id("card-number")).compile();
        assert_eq!(selector.frame.as_deref(), Some("iframe#payment"));
        assert_eq!(
            selector.to_string(),
            "iframe#payment >>> [data-testid=\"card-number\"]"
        );
    }

    #[test]
    fn nth_narrows_without_mutating() {
        let base = Query::css(".result").compile();
        let third = base.nth(2);
        assert_eq!(base.nth, None);
        assert_eq!(third.nth, Some(2));
        assert_eq!(third.to_string(), ".result >> nth=2");
    }

    #[test]
    fn string_queries_are_css() {
        let query: Query = "#search".into();
        assert!(matches!(query, Query::Css(ref s) if s == "#search"));
    }
}
