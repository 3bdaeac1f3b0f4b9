// Assertions - auto-retrying expect() API with soft-failure support.
//
// Every check polls with the same bounded-retry semantics as the
// element-state poller: immediate first sample, fixed interval, overall
// timeout. A hard failure raises a structured AssertionError; a soft
// failure is appended to the session's SoftAssertions list and surfaced
// only by an explicit assert_all().

use crate::config::Timeouts;
use crate::driver::Driver;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::poll;
use parking_lot::Mutex;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Creates an expectation for an element with auto-retry behavior.
pub fn expect(element: Element) -> Expectation {
    Expectation::new(element)
}

/// Expected-value form for text, value, and attribute checks.
///
/// Plain strings convert to `Exact`; containment checks coerce `Exact` to
/// `Substring` so `to_contain_text("Sale")` reads naturally.
#[derive(Debug, Clone)]
pub enum Match {
    /// Exact string equality (after trimming the observed text)
    Exact(String),
    /// Substring containment
    Substring(String),
    /// Regular-expression match
    Pattern(Regex),
    /// Passes if any alternative matches
    AnyOf(Vec<Match>),
}

impl Match {
    pub fn exact(value: impl Into<String>) -> Self {
        Match::Exact(value.into())
    }

    pub fn substring(value: impl Into<String>) -> Self {
        Match::Substring(value.into())
    }

    /// Compiles `pattern` as a regular expression.
    pub fn pattern(pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern)
            .map_err(|e| Error::InvalidArgument(format!("Invalid regex: {e}")))?;
        Ok(Match::Pattern(re))
    }

    pub fn any_of(alternatives: impl IntoIterator<Item = Match>) -> Self {
        Match::AnyOf(alternatives.into_iter().collect())
    }

    /// Whether `actual` satisfies this matcher.
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            Match::Exact(expected) => actual == expected,
            Match::Substring(expected) => actual.contains(expected.as_str()),
            Match::Pattern(re) => re.is_match(actual),
            Match::AnyOf(alternatives) => alternatives.iter().any(|m| m.matches(actual)),
        }
    }

    /// Containment form: exact alternatives become substring alternatives.
    fn containment(self) -> Match {
        match self {
            Match::Exact(s) => Match::Substring(s),
            Match::AnyOf(alternatives) => {
                Match::AnyOf(alternatives.into_iter().map(Match::containment).collect())
            }
            other => other,
        }
    }
}

impl From<&str> for Match {
    fn from(value: &str) -> Self {
        Match::Exact(value.to_string())
    }
}

impl From<String> for Match {
    fn from(value: String) -> Self {
        Match::Exact(value)
    }
}

impl From<Regex> for Match {
    fn from(re: Regex) -> Self {
        Match::Pattern(re)
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Match::Exact(s) => write!(f, "'{s}'"),
            Match::Substring(s) => write!(f, "containing '{s}'"),
            Match::Pattern(re) => write!(f, "matching /{re}/"),
            Match::AnyOf(alternatives) => {
                write!(f, "any of [")?;
                for (i, m) in alternatives.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{m}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Structured record of one failed assertion.
#[derive(Debug, Clone)]
pub struct AssertionError {
    /// Selector (or "page") the check ran against
    pub subject: String,
    /// The check, e.g. "to be visible" or "to have text"
    pub check: String,
    /// Rendered expected value, when the check carries one
    pub expected: Option<String>,
    /// Last observed value; None when no sample ever produced one
    pub actual: Option<String>,
    pub negated: bool,
    pub timeout: Duration,
}

impl fmt::Display for AssertionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expected '{}' ", self.subject)?;
        if self.negated {
            write!(f, "NOT ")?;
        }
        write!(f, "{}", self.check)?;
        if let Some(expected) = &self.expected {
            write!(f, " {expected}")?;
        }
        match &self.actual {
            Some(actual) => write!(f, ", but observed '{actual}'")?,
            None => write!(f, ", but no value was observed")?,
        }
        write!(f, " after {:?}", self.timeout)
    }
}

/// The accumulated failures surfaced by [`SoftAssertions::assert_all`].
#[derive(Debug)]
pub struct SoftFailures(pub Vec<AssertionError>);

impl SoftFailures {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SoftFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} soft assertion(s) failed:", self.0.len())?;
        for (i, error) in self.0.iter().enumerate() {
            writeln!(f, "  {}. {error}", i + 1)?;
        }
        Ok(())
    }
}

/// Test-scoped accumulator of assertion failures that did not abort
/// execution.
///
/// Cheap to clone; clones share the same list.
#[derive(Clone, Default)]
pub struct SoftAssertions {
    errors: Arc<Mutex<Vec<AssertionError>>>,
}

impl SoftAssertions {
    pub(crate) fn record(&self, error: AssertionError) {
        tracing::debug!(%error, "soft assertion failure recorded");
        self.errors.lock().push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.lock().is_empty()
    }

    /// Fails once with every accumulated failure, draining the list.
    ///
    /// Must be called explicitly to finalize a batch of soft checks; an
    /// empty list passes.
    pub fn assert_all(&self) -> Result<()> {
        let drained: Vec<AssertionError> = std::mem::take(&mut *self.errors.lock());
        if drained.is_empty() {
            Ok(())
        } else {
            Err(Error::SoftAssertionsFailed(SoftFailures(drained)))
        }
    }
}

/// Shared verify loop for element and page expectations.
///
/// `sample` yields (matched, observed-value); sampling errors count as
/// unmatched, mirroring the poller contract.
async fn verify<S>(
    subject: String,
    check: &str,
    expected: Option<String>,
    timeout: Duration,
    negate: bool,
    soft: Option<&SoftAssertions>,
    mut sample: S,
) -> Result<()>
where
    S: AsyncFnMut() -> Result<(bool, Option<String>)>,
{
    let mut last: Option<String> = None;
    let satisfied = poll::wait_for_condition(
        async || {
            let (matched, observed) = sample().await?;
            last = observed;
            Ok(matched != negate)
        },
        timeout,
    )
    .await;

    if satisfied {
        return Ok(());
    }

    let error = AssertionError {
        subject,
        check: check.to_string(),
        expected,
        actual: last,
        negated: negate,
        timeout,
    };
    match soft {
        Some(soft) => {
            soft.record(error);
            Ok(())
        }
        None => Err(Error::Assertion(error)),
    }
}

/// Expectation wraps an element handle and provides assertion methods with
/// auto-retry.
pub struct Expectation {
    element: Element,
    timeout: Duration,
    negate: bool,
    soft: Option<SoftAssertions>,
}

// to_* methods consume self; this matches the upstream expect() chaining
// convention rather than Rust's is_/to_ self conventions
#[allow(clippy::wrong_self_convention)]
impl Expectation {
    pub(crate) fn new(element: Element) -> Self {
        let timeout = element.timeouts().standard;
        Self {
            element,
            timeout,
            negate: false,
            soft: None,
        }
    }

    /// Sets a custom timeout for this assertion.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Negates the assertion.
    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        self.negate = true;
        self
    }

    /// Records a failure into `soft` instead of aborting the test.
    pub fn soft(mut self, soft: &SoftAssertions) -> Self {
        self.soft = Some(soft.clone());
        self
    }

    async fn verify<S>(self, check: &str, expected: Option<String>, sample: S) -> Result<()>
    where
        S: AsyncFnMut() -> Result<(bool, Option<String>)>,
    {
        verify(
            self.element.selector().to_string(),
            check,
            expected,
            self.timeout,
            self.negate,
            self.soft.as_ref(),
            sample,
        )
        .await
    }

    /// Asserts that the element is visible.
    pub async fn to_be_visible(self) -> Result<()> {
        let element = self.element.clone();
        self.verify("to be visible", None, async || {
            let visible = element.is_visible().await?;
            Ok((visible, Some(visible.to_string())))
        })
        .await
    }

    /// Asserts that the element is hidden (not visible).
    pub async fn to_be_hidden(self) -> Result<()> {
        // Opposite of to_be_visible; flip the negation and reuse it
        let negated = Expectation {
            negate: !self.negate,
            ..self
        };
        negated.to_be_visible().await
    }

    /// Asserts that the element is enabled.
    pub async fn to_be_enabled(self) -> Result<()> {
        let element = self.element.clone();
        self.verify("to be enabled", None, async || {
            let enabled = element.is_enabled().await?;
            Ok((enabled, Some(enabled.to_string())))
        })
        .await
    }

    /// Asserts that the element is disabled.
    pub async fn to_be_disabled(self) -> Result<()> {
        let negated = Expectation {
            negate: !self.negate,
            ..self
        };
        negated.to_be_enabled().await
    }

    /// Asserts that the checkbox or radio button is checked.
    pub async fn to_be_checked(self) -> Result<()> {
        let element = self.element.clone();
        self.verify("to be checked", None, async || {
            let checked = element.is_checked().await?;
            Ok((checked, Some(checked.to_string())))
        })
        .await
    }

    /// Asserts that the checkbox or radio button is unchecked.
    pub async fn to_be_unchecked(self) -> Result<()> {
        let negated = Expectation {
            negate: !self.negate,
            ..self
        };
        negated.to_be_checked().await
    }

    /// Asserts on the element's visible text. Text is trimmed before
    /// comparison.
    pub async fn to_have_text(self, expected: impl Into<Match>) -> Result<()> {
        let matcher = expected.into();
        let element = self.element.clone();
        self.verify("to have text", Some(matcher.to_string()), async || {
            let text = element.inner_text().await?;
            let trimmed = text.trim();
            Ok((matcher.matches(trimmed), Some(trimmed.to_string())))
        })
        .await
    }

    /// Asserts that the element's text contains the expected form.
    ///
    /// Exact strings (and exact alternatives inside `Match::any_of`) are
    /// treated as substrings here.
    pub async fn to_contain_text(self, expected: impl Into<Match>) -> Result<()> {
        let matcher = expected.into().containment();
        let element = self.element.clone();
        self.verify("to have text", Some(matcher.to_string()), async || {
            let text = element.inner_text().await?;
            let trimmed = text.trim();
            Ok((matcher.matches(trimmed), Some(trimmed.to_string())))
        })
        .await
    }

    /// Asserts on the input element's value.
    pub async fn to_have_value(self, expected: impl Into<Match>) -> Result<()> {
        let matcher = expected.into();
        let element = self.element.clone();
        self.verify("to have value", Some(matcher.to_string()), async || {
            let value = element.input_value().await?;
            Ok((matcher.matches(&value), Some(value)))
        })
        .await
    }

    /// Asserts on an attribute value. A missing attribute never matches.
    pub async fn to_have_attribute(
        self,
        name: &str,
        expected: impl Into<Match>,
    ) -> Result<()> {
        let matcher = expected.into();
        let element = self.element.clone();
        let check = format!("to have attribute '{name}'");
        let name = name.to_string();
        self.verify(&check, Some(matcher.to_string()), async || {
            match element.attribute(&name).await? {
                Some(value) => Ok((matcher.matches(&value), Some(value))),
                None => Ok((false, None)),
            }
        })
        .await
    }

    /// Asserts on the number of matching nodes.
    pub async fn to_have_count(self, expected: usize) -> Result<()> {
        let element = self.element.clone();
        self.verify("to have count", Some(expected.to_string()), async || {
            let count = element.count().await?;
            Ok((count == expected, Some(count.to_string())))
        })
        .await
    }
}

/// Page-level expectation (URL, title).
pub struct PageExpectation {
    driver: Arc<dyn Driver>,
    timeout: Duration,
    negate: bool,
    soft: Option<SoftAssertions>,
}

#[allow(clippy::wrong_self_convention)]
impl PageExpectation {
    pub(crate) fn new(driver: Arc<dyn Driver>, timeouts: Timeouts) -> Self {
        Self {
            driver,
            timeout: timeouts.standard,
            negate: false,
            soft: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        self.negate = true;
        self
    }

    pub fn soft(mut self, soft: &SoftAssertions) -> Self {
        self.soft = Some(soft.clone());
        self
    }

    /// Asserts on the page URL.
    pub async fn to_have_url(self, expected: impl Into<Match>) -> Result<()> {
        let matcher = expected.into();
        let driver = Arc::clone(&self.driver);
        verify(
            "page".to_string(),
            "to have URL",
            Some(matcher.to_string()),
            self.timeout,
            self.negate,
            self.soft.as_ref(),
            async || {
                let url = driver.url().await?;
                Ok((matcher.matches(&url), Some(url)))
            },
        )
        .await
    }

    /// Asserts on the page title.
    pub async fn to_have_title(self, expected: impl Into<Match>) -> Result<()> {
        let matcher = expected.into();
        let driver = Arc::clone(&self.driver);
        verify(
            "page".to_string(),
            "to have title",
            Some(matcher.to_string()),
            self.timeout,
            self.negate,
            self.soft.as_ref(),
            async || {
                let title = driver.title().await?;
                Ok((matcher.matches(&title), Some(title)))
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_substring_and_pattern_forms() {
        assert!(Match::exact("Checkout").matches("Checkout"));
        assert!(!Match::exact("Checkout").matches("Checkout now"));
        assert!(Match::substring("out").matches("Checkout"));
        assert!(Match::pattern(r"^\d+ items?$").unwrap().matches("3 items"));
        assert!(!Match::pattern(r"^\d+ items?$").unwrap().matches("items"));
    }

    #[test]
    fn any_of_passes_when_one_alternative_matches() {
        let matcher = Match::any_of([Match::exact("In stock"), Match::exact("Low stock")]);
        assert!(matcher.matches("Low stock"));
        assert!(!matcher.matches("Out of stock"));
    }

    #[test]
    fn containment_coerces_exact_to_substring_recursively() {
        let matcher = Match::any_of([Match::exact("Sale"), Match::substring("off")]).containment();
        assert!(matcher.matches("Summer Sale!"));
        assert!(matcher.matches("20% off"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(matches!(
            Match::pattern("("),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn assertion_error_message_includes_subject_expected_and_actual() {
        let error = AssertionError {
            subject: "#total".to_string(),
            check: "to have text".to_string(),
            expected: Some("'$42.00'".to_string()),
            actual: Some("$41.00".to_string()),
            negated: false,
            timeout: Duration::from_secs(5),
        };
        let message = error.to_string();
        assert!(message.contains("#total"));
        assert!(message.contains("$42.00"));
        assert!(message.contains("observed '$41.00'"));
    }

    #[test]
    fn soft_list_drains_on_assert_all() {
        let soft = SoftAssertions::default();
        assert!(soft.assert_all().is_ok());

        for _ in 0..2 {
            soft.record(AssertionError {
                subject: "#badge".to_string(),
                check: "to be visible".to_string(),
                expected: None,
                actual: Some("false".to_string()),
                negated: false,
                timeout: Duration::from_secs(1),
            });
        }
        let error = soft.assert_all().unwrap_err();
        match error {
            Error::SoftAssertionsFailed(failures) => assert_eq!(failures.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        // Drained: a second finalize passes
        assert!(soft.assert_all().is_ok());
    }
}
