// Error types for storefront-e2e

use thiserror::Error;

/// Result type alias for storefront-e2e operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the storefront UI
#[derive(Debug, Error)]
pub enum Error {
    /// Element not found by selector
    ///
    /// Includes the selector that was used to locate the element.
    #[error("Element not found: selector '{0}'")]
    NotFound(String),

    /// Frame boundary could not be located
    ///
    /// Raised when a frame-scoped query names an iframe that is not
    /// present in the current document.
    #[error("Frame not found: selector '{0}'")]
    FrameNotFound(String),

    /// Element never became actionable within the action budget
    #[error("Action timeout: '{action}' on '{selector}' after {duration_ms}ms")]
    ActionTimeout {
        action: &'static str,
        selector: String,
        duration_ms: u64,
    },

    /// Navigation never occurred within the navigation budget
    ///
    /// Distinct from a plain action failure: the action itself may have
    /// succeeded while the expected navigation never fired.
    #[error("Navigation timeout after {duration_ms}ms at '{url}'")]
    NavigationTimeout { url: String, duration_ms: u64 },

    /// Test body exceeded its test-wide budget
    #[error("Test timed out after {duration_ms}ms")]
    TestTimeout { duration_ms: u64 },

    /// Action rejected by the target (e.g. filling a non-input element)
    #[error("Action failure: {0}")]
    ActionFailure(String),

    /// Hard assertion failure (expect API)
    #[error("{0}")]
    Assertion(crate::assertions::AssertionError),

    /// One or more soft assertion failures, surfaced by `assert_all`
    #[error("{0}")]
    SoftAssertionsFailed(crate::assertions::SoftFailures),

    /// Invalid argument provided to method
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Log sink unwritable. Not caught anywhere; a broken sink fails the run.
    #[error("Logger error: {0}")]
    Logger(#[from] std::io::Error),

    /// Configuration error (bad base URL, inverted timeout ordering)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error reported by the underlying browser-automation runtime
    #[error("Backend error: {0}")]
    Backend(String),
}
