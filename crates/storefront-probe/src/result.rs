//! Result and error types for storefront probes.

use thiserror::Error;

/// Result type for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// Page or driver level error
    #[error("Page error: {message}")]
    PageError {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A bounded wait ran out
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// What was being awaited
        waited_for: String,
    },

    /// A strict locator resolved to more than one element
    #[error("Strict mode violation: {locator} resolved to {count} elements")]
    StrictModeViolation {
        /// Locator description
        locator: String,
        /// Number of matched elements
        count: usize,
    },

    /// Click, fill or key press could not be performed
    #[error("{action} on {locator} failed: {message}")]
    InteractionError {
        /// Action name
        action: String,
        /// Locator description
        locator: String,
        /// Error message
        message: String,
    },

    /// Selector could not be parsed or evaluated
    #[error("Invalid selector {selector}: {message}")]
    SelectorError {
        /// The offending selector
        selector: String,
        /// Error message
        message: String,
    },

    /// Expectation did not hold
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Displayed price text had no numeric content
    #[error("Cannot parse price from {raw:?}")]
    PriceParse {
        /// Raw text as displayed
        raw: String,
    },

    /// Fixture resolution error
    #[error("Fixture error: {message}")]
    FixtureError {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// URL parse error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl ProbeError {
    /// Shorthand for an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Whether a polling wait may retry after this error.
    ///
    /// Strict-mode violations, bad selectors and failed assertions are
    /// deterministic, so retrying them only burns the timeout.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        !matches!(
            self,
            Self::StrictModeViolation { .. }
                | Self::SelectorError { .. }
                | Self::AssertionFailed { .. }
                | Self::PriceParse { .. }
                | Self::ConfigError { .. }
        )
    }
}
