//! Assertions over values already read from the page.

use crate::result::{ProbeError, ProbeResult};
use std::fmt::Debug;

/// Result of an assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// Human-readable message
    pub message: String,
}

impl AssertionResult {
    /// Create a passing assertion result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing assertion result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    /// Prefix a failure message with context
    #[must_use]
    pub fn context(self, context: &str) -> Self {
        if self.passed {
            self
        } else {
            Self::fail(format!("{context}: {}", self.message))
        }
    }

    /// Convert to a result, failing with [`ProbeError::AssertionFailed`]
    ///
    /// # Errors
    ///
    /// Returns error if the assertion did not pass
    pub fn into_result(self) -> ProbeResult<()> {
        if self.passed {
            Ok(())
        } else {
            Err(ProbeError::assertion(self.message))
        }
    }
}

/// Assertion helpers
#[derive(Debug)]
pub struct Assertion;

impl Assertion {
    /// Assert two values differ
    #[must_use]
    pub fn not_equals<T: PartialEq + Debug>(unexpected: &T, actual: &T) -> AssertionResult {
        if unexpected == actual {
            AssertionResult::fail(format!("expected a value other than {actual:?}"))
        } else {
            AssertionResult::pass()
        }
    }

    /// Assert a string contains a substring
    #[must_use]
    pub fn contains(haystack: &str, needle: &str) -> AssertionResult {
        if haystack.contains(needle) {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected '{haystack}' to contain '{needle}'"))
        }
    }

    /// Assert a value is in an inclusive range
    #[must_use]
    pub fn in_range(value: f64, min: f64, max: f64) -> AssertionResult {
        if value >= min && value <= max {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected {value} to be in range [{min}, {max}]"))
        }
    }

    /// Assert a string is not empty; `message` is the failure text
    #[must_use]
    pub fn not_empty(value: &str, message: &str) -> AssertionResult {
        if value.is_empty() {
            AssertionResult::fail(message)
        } else {
            AssertionResult::pass()
        }
    }

    /// Assert a condition is true
    #[must_use]
    pub fn is_true(condition: bool, message: &str) -> AssertionResult {
        if condition {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(message)
        }
    }
}
