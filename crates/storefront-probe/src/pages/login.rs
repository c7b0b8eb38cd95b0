use super::base::PageObject;
use super::locators::LoginLocators;
use crate::expect::expect;
use crate::result::ProbeResult;
use crate::session::Session;
use async_trait::async_trait;

/// Identification step of the login flow
#[derive(Debug, Clone)]
pub struct LoginPage {
    session: Session,
    locators: LoginLocators,
}

impl LoginPage {
    /// Bind to a session
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            locators: LoginLocators::new(session.clone()),
            session,
        }
    }

    /// Locator set
    #[must_use]
    pub const fn locators(&self) -> &LoginLocators {
        &self.locators
    }

    /// Fill the username / e-mail and continue
    ///
    /// # Errors
    ///
    /// Returns error if the form never becomes usable
    pub async fn submit_username(&self, username: &str) -> ProbeResult<()> {
        self.locators.username_input().fill(username).await?;
        self.locators.continue_button().click().await
    }

    /// The identification error is showing, optionally containing `expected`
    ///
    /// # Errors
    ///
    /// Returns an assertion failure when it is missing or says something else
    pub async fn expect_identification_error(&self, expected: Option<&str>) -> ProbeResult<()> {
        let message = self.locators.error_message();
        expect(&message).to_be_visible().await?;
        if let Some(text) = expected.filter(|t| !t.is_empty()) {
            expect(&message).to_contain_text(text).await?;
        }
        Ok(())
    }

    /// Follow the "Crear cuenta" link
    ///
    /// # Errors
    ///
    /// Returns error if the link never becomes clickable
    pub async fn go_to_create_account(&self) -> ProbeResult<()> {
        self.locators.create_account_button().click().await
    }

    /// Clear a Google SSO overlay that may cover the form
    pub async fn handle_sso_overlay(&self) {
        self.handle_third_party_overlays().await;
    }
}

#[async_trait]
impl PageObject for LoginPage {
    fn session(&self) -> &Session {
        &self.session
    }
}
