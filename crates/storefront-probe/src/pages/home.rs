use super::base::PageObject;
use super::locators::HomeLocators;
use crate::result::ProbeResult;
use crate::session::Session;
use async_trait::async_trait;

/// Storefront home: header search, cart and login entry points
#[derive(Debug, Clone)]
pub struct HomePage {
    session: Session,
    locators: HomeLocators,
}

impl HomePage {
    /// Bind to a session
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            locators: HomeLocators::new(session.clone()),
            session,
        }
    }

    /// Locator set
    #[must_use]
    pub const fn locators(&self) -> &HomeLocators {
        &self.locators
    }

    /// Accept the cookie banner if it is showing right now
    ///
    /// # Errors
    ///
    /// Returns error if the visible button cannot be clicked
    pub async fn accept_cookies_if_present(&self) -> ProbeResult<()> {
        let button = self.locators.accept_cookies_button();
        if button.is_visible().await? {
            tracing::debug!("accepting cookie banner");
            button.click().await?;
        }
        Ok(())
    }

    /// Type `term` into the header search and submit with Enter
    ///
    /// # Errors
    ///
    /// Returns error if the search input never becomes usable
    pub async fn search_for(&self, term: &str) -> ProbeResult<()> {
        tracing::info!(term, "search");
        let input = self.locators.search_input();
        input.fill(term).await?;
        input.press("Enter").await
    }

    /// Open the cart from the top navigation
    ///
    /// # Errors
    ///
    /// Returns error if the cart button never becomes clickable
    pub async fn open_cart(&self) -> ProbeResult<()> {
        self.locators.cart_button().click().await
    }

    /// Open the login flow from the top navigation
    ///
    /// # Errors
    ///
    /// Returns error if the login link never becomes clickable
    pub async fn open_login(&self) -> ProbeResult<()> {
        self.locators.login_button().click().await
    }
}

#[async_trait]
impl PageObject for HomePage {
    fn session(&self) -> &Session {
        &self.session
    }

    /// Navigate home, then clear the cookie banner
    async fn open(&self) -> ProbeResult<()> {
        self.navigate(self.default_path()).await?;
        self.accept_cookies_if_present().await
    }
}
