// Driver backends.
//
// `fake` is the in-memory page the suite's own tests run against.
// `webdriver` (feature "webdriver") drives a live browser through a
// WebDriver server.

pub mod fake;

#[cfg(feature = "webdriver")]
pub mod webdriver;
