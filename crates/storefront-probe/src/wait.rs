//! Wait Mechanisms
//!
//! Bounded polling used by locators, expectations and URL waits. A wait
//! checks at least once, retries transient failures until its deadline and
//! gives up immediately on deterministic ones (see
//! [`ProbeError::is_transient`]).

use crate::driver::ElementSnapshot;
use crate::result::{ProbeError, ProbeResult};
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

/// Default timeout for element waits (5 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Element states a locator can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementState {
    /// Present in the DOM
    Attached,
    /// Absent from the DOM
    Detached,
    /// Present and rendered
    #[default]
    Visible,
    /// Absent or not rendered
    Hidden,
}

impl ElementState {
    /// Whether a resolved element (or its absence) satisfies this state
    #[must_use]
    pub const fn is_satisfied_by(self, element: Option<&ElementSnapshot>) -> bool {
        match (self, element) {
            (Self::Attached, found) => found.is_some(),
            (Self::Detached, found) => found.is_none(),
            (Self::Visible, Some(el)) => el.visible,
            (Self::Visible, None) => false,
            (Self::Hidden, Some(el)) => !el.visible,
            (Self::Hidden, None) => true,
        }
    }
}

impl fmt::Display for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Attached => "attached",
            Self::Detached => "detached",
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        };
        f.write_str(name)
    }
}

/// Timeout and polling cadence for one wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Give up after this long
    pub timeout: Duration,
    /// Sleep between checks
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl WaitOptions {
    /// Create options
    #[must_use]
    pub const fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Replace the timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Timeout in whole milliseconds
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Poll `check` until it yields `Some`.
///
/// # Errors
///
/// Returns the first non-transient error from `check`, or
/// [`ProbeError::Timeout`] naming `waited_for` (and the last transient
/// error, if any) once the deadline passes
pub async fn poll_until<T, F, Fut>(
    waited_for: &str,
    options: WaitOptions,
    mut check: F,
) -> ProbeResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProbeResult<Option<T>>>,
{
    let started = Instant::now();
    let mut last_error: Option<ProbeError> = None;
    loop {
        match check().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(err) if err.is_transient() => {
                tracing::trace!(waited_for, error = %err, "transient failure while polling");
                last_error = Some(err);
            }
            Err(err) => return Err(err),
        }

        let elapsed = started.elapsed();
        if elapsed >= options.timeout {
            let waited_for = match last_error {
                Some(err) => format!("{waited_for} (last error: {err})"),
                None => waited_for.to_string(),
            };
            return Err(ProbeError::Timeout {
                ms: options.timeout_ms(),
                waited_for,
            });
        }
        let remaining = options.timeout - elapsed;
        tokio::time::sleep(options.poll_interval.min(remaining)).await;
    }
}

/// Outcome of [`observe_until`]
#[derive(Debug, Clone, PartialEq)]
pub enum Observed<T> {
    /// The predicate accepted this value
    Accepted(T),
    /// Deadline passed; carries the last value seen, if any
    Expired(Option<T>),
}

/// Poll `observe` until `accept` holds, keeping the last observation so
/// callers can report expected vs actual.
///
/// # Errors
///
/// Returns the first non-transient error from `observe`
pub async fn observe_until<T, F, Fut, P>(
    options: WaitOptions,
    mut observe: F,
    accept: P,
) -> ProbeResult<Observed<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProbeResult<T>>,
    P: Fn(&T) -> bool,
{
    let started = Instant::now();
    let mut last = None;
    loop {
        match observe().await {
            Ok(value) if accept(&value) => return Ok(Observed::Accepted(value)),
            Ok(value) => last = Some(value),
            Err(err) if err.is_transient() => {}
            Err(err) => return Err(err),
        }
        let elapsed = started.elapsed();
        if elapsed >= options.timeout {
            return Ok(Observed::Expired(last));
        }
        tokio::time::sleep(options.poll_interval.min(options.timeout - elapsed)).await;
    }
}
