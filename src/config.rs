// Suite configuration: named timeout budgets and the storefront base URL.
//
// Resolution order: built-in defaults, then an optional JSON config file
// (path in STOREFRONT_CONFIG), then individual environment variables.

use crate::driver::LoadState;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Named millisecond budgets for every wait in the suite.
///
/// Each wait operation picks the contextually appropriate budget; any of
/// them can be overridden per call. The ordering
/// `instant < small < standard < action <= navigation <= test_wide`
/// is enforced by [`Timeouts::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Single-sample checks that should not wait at all
    pub instant: Duration,
    /// Short settle waits (dropdown open, spinner fade)
    pub small: Duration,
    /// Default assertion budget
    pub standard: Duration,
    /// Budget for an element to become actionable
    pub action: Duration,
    /// Full-navigation budget
    pub navigation: Duration,
    /// Whole-test budget used by `report::run_case`
    pub test_wide: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            instant: Duration::from_millis(100),
            small: Duration::from_secs(1),
            standard: Duration::from_secs(5),
            action: Duration::from_secs(10),
            navigation: Duration::from_secs(30),
            test_wide: Duration::from_secs(60),
        }
    }
}

impl Timeouts {
    /// Validates the strict budget ordering.
    pub fn validate(&self) -> Result<()> {
        let ordered = self.instant < self.small
            && self.small < self.standard
            && self.standard < self.action
            && self.action <= self.navigation
            && self.navigation <= self.test_wide;
        if !ordered {
            return Err(Error::Config(format!(
                "timeout budgets must satisfy instant < small < standard < action <= \
                 navigation <= test_wide, got {self:?}"
            )));
        }
        Ok(())
    }
}

/// Configuration consumed by a [`crate::Session`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the storefront under test
    pub base_url: Url,
    /// Named timeout budgets
    pub timeouts: Timeouts,
    /// Load state awaited after navigations
    pub load_state: LoadState,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Url::parse of a literal cannot fail
            base_url: Url::parse(DEFAULT_BASE_URL).unwrap(),
            timeouts: Timeouts::default(),
            load_state: LoadState::Load,
        }
    }
}

const DEFAULT_BASE_URL: &str = "http://localhost:8080/";

/// On-disk shape of the optional JSON config file.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    base_url: Option<String>,
    #[serde(default)]
    timeouts_ms: TimeoutsMs,
}

#[derive(Debug, Default, Deserialize)]
struct TimeoutsMs {
    instant: Option<u64>,
    small: Option<u64>,
    standard: Option<u64>,
    action: Option<u64>,
    navigation: Option<u64>,
    test_wide: Option<u64>,
}

impl Config {
    /// Builds a config from defaults, the optional JSON file named by
    /// `STOREFRONT_CONFIG`, and `STOREFRONT_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(path) = std::env::var("STOREFRONT_CONFIG") {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("cannot read '{path}': {e}")))?;
            let file: ConfigFile = serde_json::from_str(&raw)
                .map_err(|e| Error::Config(format!("invalid config '{path}': {e}")))?;
            config.apply_file(file)?;
        }

        if let Ok(base) = std::env::var("STOREFRONT_BASE_URL") {
            config.base_url = parse_base_url(&base)?;
        }

        config.timeouts.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) -> Result<()> {
        if let Some(base) = file.base_url {
            self.base_url = parse_base_url(&base)?;
        }
        let ms = file.timeouts_ms;
        let t = &mut self.timeouts;
        for (slot, value) in [
            (&mut t.instant, ms.instant),
            (&mut t.small, ms.small),
            (&mut t.standard, ms.standard),
            (&mut t.action, ms.action),
            (&mut t.navigation, ms.navigation),
            (&mut t.test_wide, ms.test_wide),
        ] {
            if let Some(v) = value {
                *slot = Duration::from_millis(v);
            }
        }
        Ok(())
    }

    /// Resolves a path (or absolute URL) against the base URL.
    pub fn page_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::InvalidArgument(format!("bad page path '{path}': {e}")))
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| Error::Config(format!("invalid base URL '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeouts_are_ordered() {
        Timeouts::default().validate().expect("defaults must order");
    }

    #[test]
    fn inverted_ordering_is_rejected() {
        let mut t = Timeouts::default();
        t.action = Duration::from_millis(1);
        assert!(t.validate().is_err());
    }

    #[test]
    fn equal_action_and_navigation_is_allowed() {
        let mut t = Timeouts::default();
        t.navigation = t.action;
        t.test_wide = t.action;
        t.validate().expect("action == navigation == test_wide is legal");
    }

    #[test]
    fn config_file_overrides_timeouts() {
        let file: ConfigFile = serde_json::from_str(
            r#"{"base_url": "https://shop.example/", "timeouts_ms": {"standard": 2000}}"#,
        )
        .unwrap();
        let mut config = Config::default();
        config.apply_file(file).unwrap();
        assert_eq!(config.base_url.as_str(), "https://shop.example/");
        assert_eq!(config.timeouts.standard, Duration::from_secs(2));
        assert_eq!(config.timeouts.action, Duration::from_secs(10));
    }

    #[test]
    fn page_url_joins_against_base() {
        let config = Config::default();
        let url = config.page_url("cart").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/cart");
    }
}
