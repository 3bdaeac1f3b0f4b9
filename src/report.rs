// Test-run reporter - forwards runner lifecycle events to a logging sink.
//
// Pass-through by design: no buffering, no retries, each event logged
// synchronously and independently. A failed result is deliberately NOT
// logged on test end; the runner's own failure output already covers it and
// a second copy would only duplicate it.

use crate::error::Result;
use parking_lot::Mutex;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Error => "error",
        }
    }
}

/// Final status of one test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
    TimedOut,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Skipped => "skipped",
            TestStatus::TimedOut => "timed-out",
        }
    }
}

/// Runner-owned test metadata, read-only to the reporter.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub title: String,
}

impl TestCase {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Result record produced once per test case.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub status: TestStatus,
    pub error: Option<String>,
}

impl TestResult {
    pub fn passed() -> Self {
        Self {
            status: TestStatus::Passed,
            error: None,
        }
    }

    pub fn failed(error: impl fmt::Display) -> Self {
        Self {
            status: TestStatus::Failed,
            error: Some(error.to_string()),
        }
    }

    pub fn skipped() -> Self {
        Self {
            status: TestStatus::Skipped,
            error: None,
        }
    }

    pub fn timed_out(budget: Duration) -> Self {
        Self {
            status: TestStatus::TimedOut,
            error: Some(format!("test exceeded its {budget:?} budget")),
        }
    }
}

/// Subscriber for test lifecycle events emitted by the runner.
///
/// Sink failures are not caught here and will propagate.
pub trait Reporter: Send + Sync {
    fn on_test_begin(&self, test: &TestCase) -> Result<()>;
    fn on_test_end(&self, test: &TestCase, result: &TestResult) -> Result<()>;
    fn on_error(&self, message: &str) -> Result<()>;
}

/// Formats `"<ISO-ish timestamp> [<level>]: <message>"` lines to the console
/// and, optionally, a file.
///
/// Color codes go to the console only; the file gets plain text. Write
/// errors (e.g. an unwritable log file) propagate as `Error::Logger`.
pub struct LogSink {
    console: bool,
    file: Option<Mutex<File>>,
}

impl LogSink {
    /// Console-only sink.
    pub fn console() -> Self {
        Self {
            console: true,
            file: None,
        }
    }

    /// Sink appending to `path` in addition to the console.
    pub fn with_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            console: true,
            file: Some(Mutex::new(file)),
        })
    }

    /// File-only sink (used by reporter tests to capture output).
    pub fn file_only(path: impl AsRef<Path>) -> Result<Self> {
        let mut sink = Self::with_file(path)?;
        sink.console = false;
        Ok(sink)
    }

    /// Writes one line. `color` wraps the message on the console only.
    pub fn log(&self, level: LogLevel, message: &str, color: Option<&str>) -> Result<()> {
        let line = format!(
            "{} [{}]: {message}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
            level.as_str()
        );

        if self.console {
            let mut stdout = std::io::stdout().lock();
            match color {
                Some(color) => {
                    let colored = format!(
                        "{} [{}]: {color}{message}{RESET}",
                        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                        level.as_str()
                    );
                    writeln!(stdout, "{colored}")?;
                }
                None => writeln!(stdout, "{line}")?,
            }
        }
        if let Some(file) = &self.file {
            writeln!(file.lock(), "{line}")?;
        }
        Ok(())
    }
}

/// Reporter forwarding lifecycle events to a [`LogSink`].
pub struct LogReporter {
    sink: LogSink,
}

impl LogReporter {
    pub fn new(sink: LogSink) -> Self {
        Self { sink }
    }
}

impl Reporter for LogReporter {
    fn on_test_begin(&self, test: &TestCase) -> Result<()> {
        self.sink
            .log(LogLevel::Info, &format!("starting {}", test.title), None)
    }

    fn on_test_end(&self, test: &TestCase, result: &TestResult) -> Result<()> {
        match result.status {
            TestStatus::Passed => self.sink.log(
                LogLevel::Info,
                &format!("passed {}", test.title),
                Some(GREEN),
            ),
            TestStatus::Skipped => self.sink.log(
                LogLevel::Info,
                &format!("skipped {}", test.title),
                Some(YELLOW),
            ),
            // Failures stay with the runner's own reporting
            TestStatus::Failed | TestStatus::TimedOut => Ok(()),
        }
    }

    fn on_error(&self, message: &str) -> Result<()> {
        self.sink.log(LogLevel::Error, message, Some(RED))
    }
}

/// Brackets an async test body with begin/end events.
///
/// `budget` (usually the test-wide timeout) turns a slow body into a
/// `TimedOut` result. The body's own error is returned to the caller after
/// the end event is emitted, so the runner still sees the failure.
pub async fn run_case<R, F>(
    reporter: &R,
    title: &str,
    budget: Option<Duration>,
    body: F,
) -> Result<()>
where
    R: Reporter,
    F: Future<Output = Result<()>>,
{
    let test = TestCase::new(title);
    reporter.on_test_begin(&test)?;

    let outcome = match budget {
        Some(budget) => tokio::time::timeout(budget, body).await,
        None => Ok(body.await),
    };

    match outcome {
        Ok(Ok(())) => {
            reporter.on_test_end(&test, &TestResult::passed())?;
            Ok(())
        }
        Ok(Err(error)) => {
            reporter.on_test_end(&test, &TestResult::failed(&error))?;
            Err(error)
        }
        Err(_) => {
            let budget = budget.unwrap_or_default();
            reporter.on_test_end(&test, &TestResult::timed_out(budget))?;
            Err(crate::error::Error::TestTimeout {
                duration_ms: budget.as_millis() as u64,
            })
        }
    }
}
