use crate::locator::{Locator, Selector};
use crate::session::Session;

/// Home page header and consent banner
#[derive(Debug, Clone)]
pub struct HomeLocators {
    session: Session,
}

impl HomeLocators {
    /// Bind to a session
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Cookie consent accept button shown on first visit
    #[must_use]
    pub fn accept_cookies_button(&self) -> Locator {
        self.session.locator(Selector::test_id("action:understood-button"))
    }

    /// Global search input in the header
    #[must_use]
    pub fn search_input(&self) -> Locator {
        self.session.locator("input.nav-search-input")
    }

    /// Cart button in the top navigation
    #[must_use]
    pub fn cart_button(&self) -> Locator {
        self.session.locator("#nav-cart")
    }

    /// Login link in the top navigation
    #[must_use]
    pub fn login_button(&self) -> Locator {
        self.session.locator("[data-link-id=\"login\"]")
    }
}
