//! Chromium process management (`browser` feature).

use crate::config::ProbeConfig;
use crate::driver::CdpDriver;
use crate::result::{ProbeError, ProbeResult};
use crate::session::Session;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Running Chromium instance
#[derive(Debug)]
pub struct Browser {
    config: ProbeConfig,
    inner: Arc<Mutex<CdpBrowser>>,
    handle: tokio::task::JoinHandle<()>,
}

impl Browser {
    /// Launch Chromium as configured
    ///
    /// # Errors
    ///
    /// Returns error if the browser cannot be launched
    pub async fn launch(config: ProbeConfig) -> ProbeResult<Self> {
        config.validate()?;
        let mut builder = CdpConfig::builder()
            .window_size(config.viewport_width, config.viewport_height);

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder
            .build()
            .map_err(|message| ProbeError::BrowserLaunchError { message })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| ProbeError::BrowserLaunchError {
                    message: e.to_string(),
                })?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        tracing::info!(headless = config.headless, "chromium launched");
        Ok(Self {
            config,
            inner: Arc::new(Mutex::new(browser)),
            handle,
        })
    }

    /// Launch with [`ProbeConfig::from_env`]
    ///
    /// # Errors
    ///
    /// Returns configuration or launch errors
    pub async fn launch_from_env() -> ProbeResult<Self> {
        Self::launch(ProbeConfig::from_env()?).await
    }

    /// Open a fresh tab and wrap it in a session
    ///
    /// # Errors
    ///
    /// Returns error if the tab cannot be created
    pub async fn new_session(&self) -> ProbeResult<Session> {
        let page = self
            .inner
            .lock()
            .await
            .new_page("about:blank")
            .await
            .map_err(|e| ProbeError::PageError {
                message: e.to_string(),
            })?;
        Ok(Session::new(CdpDriver::new(page), self.config.clone()))
    }

    /// Configuration the browser was launched with
    #[must_use]
    pub const fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Close the browser and stop its event handler
    ///
    /// # Errors
    ///
    /// Returns error if Chromium does not shut down cleanly
    pub async fn close(self) -> ProbeResult<()> {
        let result = self.inner.lock().await.close().await;
        self.handle.abort();
        result.map_err(|e| ProbeError::BrowserLaunchError {
            message: e.to_string(),
        })?;
        Ok(())
    }
}
