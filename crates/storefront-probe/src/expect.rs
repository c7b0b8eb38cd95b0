//! Web-first expectations.
//!
//! Unlike [`Assertion`](crate::assertion::Assertion), these re-read the page
//! until the condition holds or the timeout passes, then fail with
//! [`ProbeError::AssertionFailed`] carrying expected and last-seen values.

use crate::locator::{normalize_whitespace, Locator};
use crate::result::{ProbeError, ProbeResult};
use crate::session::Session;
use crate::wait::{observe_until, Observed, WaitOptions};
use regex::Regex;
use std::time::Duration;

/// Start an expectation on a locator
#[must_use]
pub fn expect(locator: &Locator) -> LocatorExpectation {
    LocatorExpectation {
        locator: locator.clone(),
        options: locator.options(),
    }
}

/// Start an expectation on the session URL
#[must_use]
pub fn expect_url(session: &Session) -> UrlExpectation<'_> {
    UrlExpectation {
        session,
        options: session.wait_options(),
    }
}

/// Polling expectation on a locator
#[derive(Debug, Clone)]
pub struct LocatorExpectation {
    locator: Locator,
    options: WaitOptions,
}

fn expired<T: std::fmt::Debug>(
    options: WaitOptions,
    subject: &str,
    expected: &str,
    last: Option<T>,
) -> ProbeError {
    let actual = last.map_or_else(|| "nothing".to_string(), |v| format!("{v:?}"));
    ProbeError::assertion(format!(
        "expected {subject} {expected}, got {actual} (after {}ms)",
        options.timeout_ms()
    ))
}

impl LocatorExpectation {
    /// Override the timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options = self.options.with_timeout(timeout);
        self
    }

    /// The single match is rendered
    ///
    /// # Errors
    ///
    /// Returns an assertion failure, or a strict-mode violation
    pub async fn to_be_visible(&self) -> ProbeResult<()> {
        self.visibility(true).await
    }

    /// The match is absent or not rendered
    ///
    /// # Errors
    ///
    /// Returns an assertion failure, or a strict-mode violation
    pub async fn to_be_hidden(&self) -> ProbeResult<()> {
        self.visibility(false).await
    }

    async fn visibility(&self, wanted: bool) -> ProbeResult<()> {
        let locator = &self.locator;
        let outcome = observe_until(
            self.options,
            move || locator.is_visible(),
            move |visible| *visible == wanted,
        )
        .await?;
        match outcome {
            Observed::Accepted(_) => Ok(()),
            Observed::Expired(last) => Err(expired(
                self.options,
                &self.locator.to_string(),
                if wanted { "to be visible" } else { "to be hidden" },
                last.map(|v| if v { "visible" } else { "hidden" }),
            )),
        }
    }

    /// Exactly `expected` matches
    ///
    /// # Errors
    ///
    /// Returns an assertion failure naming the last count seen
    pub async fn to_have_count(&self, expected: usize) -> ProbeResult<()> {
        let locator = &self.locator;
        let outcome = observe_until(
            self.options,
            move || locator.count(),
            move |count| *count == expected,
        )
        .await?;
        match outcome {
            Observed::Accepted(_) => Ok(()),
            Observed::Expired(last) => Err(expired(
                self.options,
                &self.locator.to_string(),
                &format!("to have count {expected}"),
                last,
            )),
        }
    }

    /// The single match's rendered text contains `expected`
    ///
    /// # Errors
    ///
    /// Returns an assertion failure naming the last text seen
    pub async fn to_contain_text(&self, expected: &str) -> ProbeResult<()> {
        let locator = &self.locator;
        let needle = normalize_whitespace(expected);
        let outcome = observe_until(
            self.options,
            move || async move {
                if locator.is_visible().await? {
                    Ok(Some(locator.inner_text().await?))
                } else {
                    Ok(None)
                }
            },
            |text: &Option<String>| text.as_ref().is_some_and(|t| t.contains(&needle)),
        )
        .await?;
        match outcome {
            Observed::Accepted(_) => Ok(()),
            Observed::Expired(last) => Err(expired(
                self.options,
                &self.locator.to_string(),
                &format!("to contain text {expected:?}"),
                last.flatten(),
            )),
        }
    }
}

/// Polling expectation on the session URL
#[derive(Debug, Clone)]
pub struct UrlExpectation<'s> {
    session: &'s Session,
    options: WaitOptions,
}

impl UrlExpectation<'_> {
    /// Override the timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options = self.options.with_timeout(timeout);
        self
    }

    /// The URL matches `pattern` (a regular expression, unanchored)
    ///
    /// # Errors
    ///
    /// Returns an assertion failure, or a selector error for a bad pattern
    pub async fn to_match(&self, pattern: &str) -> ProbeResult<()> {
        let re = Regex::new(pattern).map_err(|e| ProbeError::SelectorError {
            selector: pattern.to_string(),
            message: e.to_string(),
        })?;
        let session = self.session;
        let outcome =
            observe_until(self.options, move || session.url(), |url| re.is_match(url)).await?;
        match outcome {
            Observed::Accepted(_) => Ok(()),
            Observed::Expired(last) => Err(expired(
                self.options,
                "URL",
                &format!("to match /{pattern}/"),
                last,
            )),
        }
    }
}
