//! Locator Abstraction
//!
//! A [`Locator`] is a query plus the driver it resolves through. It holds no
//! element handle: every read or action resolves the query again against the
//! current document, so a locator built before a navigation keeps working
//! after it.
//!
//! Locators are strict. Reads and actions that target one element fail with
//! [`ProbeError::StrictModeViolation`] when the query matches several; use
//! [`Locator::first`], [`Locator::nth`] or [`Locator::all`] to disambiguate.

mod query;

pub use query::{
    escape_css_string, normalize_whitespace, text_matches, Query, Selector, Step, StepOp,
};

use crate::driver::{ElementSnapshot, SharedDriver};
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{poll_until, ElementState, WaitOptions};
use std::fmt;
use std::time::Duration;

/// Lazily resolved reference to zero or more elements
#[derive(Clone)]
pub struct Locator {
    driver: SharedDriver,
    query: Query,
    options: WaitOptions,
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locator")
            .field("query", &self.query.to_string())
            .field("timeout", &self.options.timeout)
            .finish()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.query)
    }
}

impl Locator {
    /// Create a locator over `query`
    #[must_use]
    pub const fn new(driver: SharedDriver, query: Query, options: WaitOptions) -> Self {
        Self {
            driver,
            query,
            options,
        }
    }

    /// The underlying query
    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Wait options used by auto-waiting calls
    #[must_use]
    pub const fn options(&self) -> WaitOptions {
        self.options
    }

    /// Default timeout of this locator
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.options.timeout
    }

    fn derive(&self, query: Query) -> Self {
        Self {
            driver: self.driver.clone(),
            query,
            options: self.options,
        }
    }

    // ---------------------------------------------------------------------
    // Building
    // ---------------------------------------------------------------------

    /// Descendants of every match
    #[must_use]
    pub fn locator(&self, selector: impl Into<Selector>) -> Self {
        self.derive(self.query.clone().then(selector))
    }

    /// First match only
    #[must_use]
    pub fn first(&self) -> Self {
        self.derive(self.query.clone().narrow(StepOp::First))
    }

    /// Last match only
    #[must_use]
    pub fn last(&self) -> Self {
        self.derive(self.query.clone().narrow(StepOp::Last))
    }

    /// Match at `index`
    #[must_use]
    pub fn nth(&self, index: usize) -> Self {
        self.derive(self.query.clone().narrow(StepOp::Nth { index }))
    }

    /// Matches whose text contains `text` (case-insensitive)
    #[must_use]
    pub fn filter_has_text(&self, text: impl Into<String>) -> Self {
        self.derive(
            self.query
                .clone()
                .narrow(StepOp::HasText { text: text.into() }),
        )
    }

    /// Matches containing an element `inner` matches
    #[must_use]
    pub fn filter_has(&self, inner: &Self) -> Self {
        self.derive(self.query.clone().narrow(StepOp::Has {
            query: inner.query.clone(),
        }))
    }

    /// Override the auto-wait timeout
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            options: self.options.with_timeout(timeout),
            ..self.clone()
        }
    }

    // ---------------------------------------------------------------------
    // Immediate reads (no waiting)
    // ---------------------------------------------------------------------

    /// Number of current matches
    ///
    /// # Errors
    ///
    /// Returns driver errors
    pub async fn count(&self) -> ProbeResult<usize> {
        Ok(self.driver.query(&self.query).await?.len())
    }

    /// Whether the single match is rendered right now; `false` when absent
    ///
    /// # Errors
    ///
    /// Returns error on a strict-mode violation or driver failure
    pub async fn is_visible(&self) -> ProbeResult<bool> {
        Ok(self.resolve_one().await?.is_some_and(|el| el.visible))
    }

    /// One locator per current match, by position
    ///
    /// # Errors
    ///
    /// Returns driver errors
    pub async fn all(&self) -> ProbeResult<Vec<Self>> {
        let count = self.count().await?;
        Ok((0..count).map(|i| self.nth(i)).collect())
    }

    async fn resolve_one(&self) -> ProbeResult<Option<ElementSnapshot>> {
        let mut found = self.driver.query(&self.query).await?;
        match found.len() {
            0 => Ok(None),
            1 => Ok(found.pop()),
            count => Err(ProbeError::StrictModeViolation {
                locator: self.query.to_string(),
                count,
            }),
        }
    }

    // ---------------------------------------------------------------------
    // Auto-waiting reads
    // ---------------------------------------------------------------------

    /// Wait until the single match reaches `state`
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`] or a strict-mode violation
    pub async fn wait_for(&self, state: ElementState) -> ProbeResult<()> {
        self.wait_for_within(state, self.options.timeout).await
    }

    /// [`Locator::wait_for`] with an explicit timeout
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`] or a strict-mode violation
    pub async fn wait_for_within(&self, state: ElementState, timeout: Duration) -> ProbeResult<()> {
        let waited_for = format!("{} to be {state}", self.query);
        poll_until(&waited_for, self.options.with_timeout(timeout), move || async move {
            let found = self.resolve_one().await?;
            Ok(state.is_satisfied_by(found.as_ref()).then_some(()))
        })
        .await
    }

    async fn attached(&self) -> ProbeResult<ElementSnapshot> {
        let waited_for = format!("{} to be attached", self.query);
        poll_until(&waited_for, self.options, move || self.resolve_one()).await
    }

    /// Raw text content; waits for the element to be attached
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`] or a strict-mode violation
    pub async fn text_content(&self) -> ProbeResult<String> {
        Ok(self.attached().await?.text_content)
    }

    /// Rendered text; waits for the element to be attached
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`] or a strict-mode violation
    pub async fn inner_text(&self) -> ProbeResult<String> {
        Ok(self.attached().await?.inner_text)
    }

    /// Attribute value; waits for the element to be attached
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`] or a strict-mode violation
    pub async fn get_attribute(&self, name: &str) -> ProbeResult<Option<String>> {
        Ok(self.attached().await?.attributes.remove(name))
    }

    /// Form value; waits for the element to be attached
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`], a strict-mode violation, or an
    /// interaction error when the element has no value
    pub async fn input_value(&self) -> ProbeResult<String> {
        let el = self.attached().await?;
        el.value.ok_or_else(|| ProbeError::InteractionError {
            action: "input_value".into(),
            locator: self.query.to_string(),
            message: format!("<{}> has no value", el.tag),
        })
    }

    // ---------------------------------------------------------------------
    // Actions (wait for visible, then act)
    // ---------------------------------------------------------------------

    async fn actionable(&self, action: &str) -> ProbeResult<()> {
        let waited_for = format!("{} to be visible before {action}", self.query);
        poll_until(&waited_for, self.options, move || async move {
            let found = self.resolve_one().await?;
            Ok(ElementState::Visible
                .is_satisfied_by(found.as_ref())
                .then_some(()))
        })
        .await
    }

    /// Click the single match
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`] when it never becomes visible
    pub async fn click(&self) -> ProbeResult<()> {
        tracing::debug!(locator = %self.query, "click");
        self.actionable("click").await?;
        self.driver.click(&self.query).await
    }

    /// Replace the single match's value
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`] when it never becomes visible
    pub async fn fill(&self, value: &str) -> ProbeResult<()> {
        tracing::debug!(locator = %self.query, value, "fill");
        self.actionable("fill").await?;
        self.driver.fill(&self.query, value).await
    }

    /// Focus the single match and press `key`
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`] when it never becomes visible
    pub async fn press(&self, key: &str) -> ProbeResult<()> {
        tracing::debug!(locator = %self.query, key, "press");
        self.actionable("press").await?;
        self.driver.press(&self.query, key).await
    }
}
