//! Shared page contract.

use crate::result::ProbeResult;
use crate::session::Session;
use crate::wait::ElementState;
use async_trait::async_trait;

/// Google One Tap iframe; intercepts clicks on the page beneath it
pub const ONE_TAP_OVERLAY: &str = "#credential_picker_container iframe";

/// Capabilities every page object shares
#[async_trait]
pub trait PageObject: Send + Sync {
    /// Session this page drives
    fn session(&self) -> &Session;

    /// Name used in logs
    fn page_name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Path [`PageObject::open`] navigates to
    fn default_path(&self) -> &str {
        "/"
    }

    /// Navigate to `path`. Repeating it is safe: locators re-resolve on use.
    ///
    /// # Errors
    ///
    /// Returns navigation errors
    async fn navigate(&self, path: &str) -> ProbeResult<()> {
        tracing::debug!(page = self.page_name(), path, "navigate");
        self.session().goto(path).await
    }

    /// Standard entry navigation for this page
    ///
    /// # Errors
    ///
    /// Returns navigation errors
    async fn open(&self) -> ProbeResult<()> {
        self.navigate(self.default_path()).await
    }

    /// Dismiss the Google One Tap overlay if it is showing.
    ///
    /// Probes visibility once (bounded by the overlay probe timeout), presses
    /// Escape, then waits for the iframe to hide. Never fails: every error
    /// on this path is logged and dropped.
    async fn handle_third_party_overlays(&self) {
        let session = self.session();
        let config = session.config();
        let overlay = session.locator(ONE_TAP_OVERLAY);

        let visible =
            match tokio::time::timeout(config.overlay_probe_timeout(), overlay.is_visible()).await {
                Ok(Ok(visible)) => visible,
                Ok(Err(err)) => {
                    tracing::debug!(page = self.page_name(), error = %err, "overlay probe failed");
                    false
                }
                Err(_) => {
                    tracing::debug!(page = self.page_name(), "overlay probe timed out");
                    false
                }
            };
        if !visible {
            return;
        }

        tracing::debug!(page = self.page_name(), "dismissing One Tap overlay");
        if let Err(err) = session.keyboard_press("Escape").await {
            tracing::debug!(page = self.page_name(), error = %err, "escape press failed");
            return;
        }
        if let Err(err) = overlay
            .wait_for_within(ElementState::Hidden, config.overlay_dismiss_timeout())
            .await
        {
            tracing::debug!(page = self.page_name(), error = %err, "overlay did not close");
        }
    }
}
