use crate::locator::{Locator, Selector};
use crate::session::Session;

/// Cart line item
#[derive(Debug, Clone)]
pub struct CartLocators {
    session: Session,
}

impl CartLocators {
    /// Bind to a session
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Product title of the line item
    #[must_use]
    pub fn product_title(&self) -> Locator {
        self.session.locator("h1.ui-pdp-title")
    }

    /// Product price of the line item
    #[must_use]
    pub fn product_price(&self) -> Locator {
        self.session
            .locator(".ui-pdp-price__second-line")
            .locator(Selector::test_id("price-part"))
    }

    /// Remove button, matched by its label
    #[must_use]
    pub fn remove_button(&self) -> Locator {
        self.session.locator("button").filter_has_text("eliminar")
    }
}
