use crate::locator::{Locator, Selector};
use crate::session::Session;

/// Identification step of the login flow
#[derive(Debug, Clone)]
pub struct LoginLocators {
    session: Session,
}

impl LoginLocators {
    /// Bind to a session
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Username / e-mail input
    #[must_use]
    pub fn username_input(&self) -> Locator {
        self.session.locator(Selector::test_id("user_id"))
    }

    /// Submits the username
    #[must_use]
    pub fn continue_button(&self) -> Locator {
        self.session.locator("form button").filter_has_text("Continuar")
    }

    /// Starts account creation
    #[must_use]
    pub fn create_account_button(&self) -> Locator {
        self.session.locator("form a").filter_has_text("Crear cuenta")
    }

    /// Identification error message
    #[must_use]
    pub fn error_message(&self) -> Locator {
        self.session.locator("#identification-message")
    }

    /// Google SSO entry point
    #[must_use]
    pub fn sso_button(&self) -> Locator {
        self.session.locator("form .google-button")
    }
}
