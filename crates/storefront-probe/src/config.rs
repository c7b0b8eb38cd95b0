//! Probe configuration
//!
//! Values come from, in order: built-in defaults, an optional YAML file named
//! by `STOREFRONT_CONFIG`, then individual environment overrides.

use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Storefront the suite targets by default
pub const DEFAULT_BASE_URL: &str = "https://www.mercadolibre.com.ar";

/// Env var naming a YAML config file
pub const CONFIG_FILE_ENV: &str = "STOREFRONT_CONFIG";
/// Env var overriding the base URL
pub const BASE_URL_ENV: &str = "STOREFRONT_BASE_URL";
/// Env var overriding headless mode
pub const HEADLESS_ENV: &str = "STOREFRONT_HEADLESS";
/// Env var overriding the default element timeout
pub const TIMEOUT_ENV: &str = "STOREFRONT_TIMEOUT_MS";
/// Env var pointing at a Chromium binary
pub const CHROMIUM_PATH_ENV: &str = "CHROMIUM_PATH";

/// Runtime configuration shared by every page object of a test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Origin relative navigations are joined onto
    pub base_url: String,
    /// Run the browser without a window
    pub headless: bool,
    /// Explicit Chromium executable
    pub chromium_path: Option<PathBuf>,
    /// Keep the Chromium sandbox enabled
    pub sandbox: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Default element wait / action timeout
    pub timeout_ms: u64,
    /// Navigation and URL-change timeout
    pub navigation_timeout_ms: u64,
    /// Wait for the first search result row
    pub results_timeout_ms: u64,
    /// Single visibility probe for third-party overlays
    pub overlay_probe_timeout_ms: u64,
    /// Wait for an overlay to disappear after Escape
    pub overlay_dismiss_timeout_ms: u64,
    /// Polling interval for every wait
    pub poll_interval_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headless: true,
            chromium_path: None,
            sandbox: true,
            viewport_width: 1280,
            viewport_height: 720,
            timeout_ms: 5_000,
            navigation_timeout_ms: 30_000,
            results_timeout_ms: 10_000,
            overlay_probe_timeout_ms: 2_000,
            overlay_dismiss_timeout_ms: 5_000,
            poll_interval_ms: 50,
        }
    }
}

impl ProbeConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the Chromium executable
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable the Chromium sandbox (needed in most containers)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set the viewport size
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set the default element timeout
    #[must_use]
    pub const fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    /// Set the navigation timeout
    #[must_use]
    pub const fn with_navigation_timeout_ms(mut self, ms: u64) -> Self {
        self.navigation_timeout_ms = ms;
        self
    }

    /// Set the search results timeout
    #[must_use]
    pub const fn with_results_timeout_ms(mut self, ms: u64) -> Self {
        self.results_timeout_ms = ms;
        self
    }

    /// Set both overlay timeouts
    #[must_use]
    pub const fn with_overlay_timeouts_ms(mut self, probe: u64, dismiss: u64) -> Self {
        self.overlay_probe_timeout_ms = probe;
        self.overlay_dismiss_timeout_ms = dismiss;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Default element timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Navigation timeout
    #[must_use]
    pub const fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// Search results timeout
    #[must_use]
    pub const fn results_timeout(&self) -> Duration {
        Duration::from_millis(self.results_timeout_ms)
    }

    /// Overlay probe timeout
    #[must_use]
    pub const fn overlay_probe_timeout(&self) -> Duration {
        Duration::from_millis(self.overlay_probe_timeout_ms)
    }

    /// Overlay dismissal timeout
    #[must_use]
    pub const fn overlay_dismiss_timeout(&self) -> Duration {
        Duration::from_millis(self.overlay_dismiss_timeout_ms)
    }

    /// Polling interval
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Load a YAML file. Missing keys fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not valid YAML
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml_ng::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns error if the config file or an override is invalid
    pub fn from_env() -> ProbeResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns error if the config file or an override is invalid
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ProbeResult<Self> {
        let base = match lookup(CONFIG_FILE_ENV) {
            Some(path) if !path.trim().is_empty() => Self::from_yaml_file(path.trim())?,
            _ => Self::default(),
        };
        base.apply_overrides(lookup)
    }

    /// Apply the single-value environment overrides on top of `self`.
    ///
    /// # Errors
    ///
    /// Returns error if an override cannot be parsed
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> ProbeResult<Self> {
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            self.base_url = base_url.trim().to_string();
        }
        if let Some(headless) = lookup(HEADLESS_ENV) {
            self.headless = parse_bool(HEADLESS_ENV, &headless)?;
        }
        if let Some(timeout) = lookup(TIMEOUT_ENV) {
            self.timeout_ms = timeout
                .trim()
                .parse()
                .map_err(|_| ProbeError::ConfigError {
                    message: format!("{TIMEOUT_ENV} must be milliseconds, got {timeout:?}"),
                })?;
        }
        if let Some(path) = lookup(CHROMIUM_PATH_ENV) {
            if !path.trim().is_empty() {
                self.chromium_path = Some(PathBuf::from(path.trim()));
            }
        }
        self.validate()?;
        Ok(self)
    }

    /// Check the values are usable.
    ///
    /// # Errors
    ///
    /// Returns error on an unparsable base URL or a zero poll interval
    pub fn validate(&self) -> ProbeResult<()> {
        let base = Url::parse(&self.base_url).map_err(|e| ProbeError::ConfigError {
            message: format!("base_url {:?}: {e}", self.base_url),
        })?;
        if base.cannot_be_a_base() {
            return Err(ProbeError::ConfigError {
                message: format!("base_url {:?} cannot be a base", self.base_url),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(ProbeError::ConfigError {
                message: "poll_interval_ms must be positive".into(),
            });
        }
        Ok(())
    }

    /// Resolve a path against the base URL. Absolute URLs pass through.
    ///
    /// # Errors
    ///
    /// Returns error if the result is not a valid URL
    pub fn resolve_url(&self, path: &str) -> ProbeResult<Url> {
        if let Ok(absolute) = Url::parse(path) {
            return Ok(absolute);
        }
        Ok(Url::parse(&self.base_url)?.join(path)?)
    }
}

fn parse_bool(key: &str, raw: &str) -> ProbeResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ProbeError::ConfigError {
            message: format!("{key} must be a boolean, got {raw:?}"),
        }),
    }
}
