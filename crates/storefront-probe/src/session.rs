//! Per-test browser session.
//!
//! Every page object of a test holds a clone of the same [`Session`]; they
//! all drive one document.

use crate::config::ProbeConfig;
use crate::driver::{Driver, SharedDriver};
use crate::locator::{Locator, Query, Selector};
use crate::network::{MockResponse, Route, UrlPattern};
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{poll_until, WaitOptions};
use std::sync::Arc;

/// Shared driver plus configuration
#[derive(Debug, Clone)]
pub struct Session {
    driver: SharedDriver,
    config: Arc<ProbeConfig>,
}

impl Session {
    /// Wrap a driver
    #[must_use]
    pub fn new(driver: impl Driver + 'static, config: ProbeConfig) -> Self {
        Self::from_shared(Arc::new(driver), config)
    }

    /// Wrap an already shared driver
    #[must_use]
    pub fn from_shared(driver: SharedDriver, config: ProbeConfig) -> Self {
        Self {
            driver,
            config: Arc::new(config),
        }
    }

    /// Session configuration
    #[must_use]
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Underlying driver
    #[must_use]
    pub fn driver(&self) -> &SharedDriver {
        &self.driver
    }

    /// Default wait options from the configuration
    #[must_use]
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions::new(self.config.timeout(), self.config.poll_interval())
    }

    /// Page-level locator
    #[must_use]
    pub fn locator(&self, selector: impl Into<Selector>) -> Locator {
        Locator::new(self.driver.clone(), Query::new(selector), self.wait_options())
    }

    /// Navigate to `path` (joined onto the base URL when relative)
    ///
    /// # Errors
    ///
    /// Returns a navigation error, or [`ProbeError::Timeout`] after the
    /// navigation timeout
    pub async fn goto(&self, path: &str) -> ProbeResult<()> {
        let url = self.config.resolve_url(path)?;
        tracing::info!(url = %url, "navigate");
        let timeout = self.config.navigation_timeout();
        match tokio::time::timeout(timeout, self.driver.goto(url.as_str())).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout {
                ms: self.config.navigation_timeout_ms,
                waited_for: format!("navigation to {url}"),
            }),
        }
    }

    /// Current URL
    ///
    /// # Errors
    ///
    /// Returns driver errors
    pub async fn url(&self) -> ProbeResult<String> {
        self.driver.current_url().await
    }

    /// Wait until the URL satisfies `predicate`, within the navigation timeout
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`] naming `description`
    pub async fn wait_for_url<P>(&self, description: &str, predicate: P) -> ProbeResult<String>
    where
        P: Fn(&str) -> bool + Send + Sync,
    {
        let options =
            WaitOptions::new(self.config.navigation_timeout(), self.config.poll_interval());
        let predicate = &predicate;
        poll_until(&format!("URL {description}"), options, move || async move {
            let url = self.driver.current_url().await?;
            Ok(predicate(&url).then_some(url))
        })
        .await
    }

    /// Wait until the URL contains `fragment`
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`]
    pub async fn wait_for_url_containing(&self, fragment: &str) -> ProbeResult<String> {
        self.wait_for_url(&format!("to contain {fragment:?}"), |url| url.contains(fragment))
            .await
    }

    /// Press `key` on the page keyboard
    ///
    /// # Errors
    ///
    /// Returns driver errors
    pub async fn keyboard_press(&self, key: &str) -> ProbeResult<()> {
        tracing::debug!(key, "keyboard press");
        self.driver.keyboard_press(key).await
    }

    /// Serve `response` for every request matching `pattern`
    ///
    /// # Errors
    ///
    /// Returns driver errors
    pub async fn route(&self, pattern: UrlPattern, response: MockResponse) -> ProbeResult<()> {
        tracing::debug!(?pattern, status = response.status, "route registered");
        self.driver.route(Route::new(pattern, response)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::StaticDriver;

    fn session() -> Session {
        let driver = StaticDriver::new("https://shop.test")
            .unwrap()
            .with_page("/", "<a id=\"go\" href=\"/next-azul\">go</a>")
            .unwrap()
            .with_page("/next-azul", "<h1>next</h1>")
            .unwrap();
        let config = ProbeConfig::default()
            .with_base_url("https://shop.test")
            .with_timeout_ms(100)
            .with_navigation_timeout_ms(100)
            .with_poll_interval_ms(5);
        Session::new(driver, config)
    }

    #[tokio::test]
    async fn test_goto_resolves_relative_path() {
        let session = session();
        session.goto("/").await.unwrap();
        assert_eq!(session.url().await.unwrap(), "https://shop.test/");
    }

    #[tokio::test]
    async fn test_goto_unknown_page_fails() {
        let session = session();
        let err = session.goto("/missing").await.unwrap_err();
        assert!(matches!(err, ProbeError::NavigationError { .. }));
    }

    #[tokio::test]
    async fn test_wait_for_url_together_with_click() {
        let session = session();
        session.goto("/").await.unwrap();
        let link = session.locator("#go");
        let (url, ()) =
            tokio::try_join!(session.wait_for_url_containing("azul"), link.click()).unwrap();
        assert!(url.ends_with("/next-azul"));
    }

    #[tokio::test]
    async fn test_wait_for_url_times_out() {
        let session = session();
        session.goto("/").await.unwrap();
        let err = session.wait_for_url_containing("rojo").await.unwrap_err();
        match err {
            ProbeError::Timeout { waited_for, .. } => {
                assert_eq!(waited_for, "URL to contain \"rojo\"");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_route_serves_mock() {
        let session = session();
        session
            .route(UrlPattern::glob("**/mocked"), MockResponse::html("<h2>Mock</h2>"))
            .await
            .unwrap();
        session.goto("/mocked").await.unwrap();
        assert_eq!(session.locator("h2").inner_text().await.unwrap(), "Mock");
    }
}
