use super::base::PageObject;
use super::locators::CartLocators;
use crate::assertion::Assertion;
use crate::result::ProbeResult;
use crate::session::Session;
use crate::wait::ElementState;
use async_trait::async_trait;

/// Cart page. Reads and removes the line item; cart business rules are out
/// of scope.
#[derive(Debug, Clone)]
pub struct CartPage {
    session: Session,
    locators: CartLocators,
}

impl CartPage {
    /// Bind to a session
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            locators: CartLocators::new(session.clone()),
            session,
        }
    }

    /// Locator set
    #[must_use]
    pub const fn locators(&self) -> &CartLocators {
        &self.locators
    }

    /// Product name once it is visible
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`](crate::ProbeError::Timeout) if it never shows
    pub async fn get_product_name(&self) -> ProbeResult<String> {
        let title = self.locators.product_title();
        title.wait_for(ElementState::Visible).await?;
        title.text_content().await
    }

    /// Product price once it is visible
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`](crate::ProbeError::Timeout) if it never shows
    pub async fn get_product_price(&self) -> ProbeResult<String> {
        let price = self.locators.product_price();
        price.wait_for(ElementState::Visible).await?;
        price.text_content().await
    }

    /// The cart shows `expected_name` and `expected_price` (substring match)
    ///
    /// # Errors
    ///
    /// Returns an assertion failure on mismatch
    pub async fn expect_product_in_cart(
        &self,
        expected_name: &str,
        expected_price: &str,
    ) -> ProbeResult<()> {
        let actual_name = self.get_product_name().await?;
        let actual_price = self.get_product_price().await?;
        Assertion::contains(&actual_name, expected_name)
            .context("cart product name")
            .into_result()?;
        Assertion::contains(&actual_price, expected_price)
            .context("cart product price")
            .into_result()
    }

    /// Remove the line item
    ///
    /// # Errors
    ///
    /// Returns error if the remove button never becomes clickable
    pub async fn remove_product(&self) -> ProbeResult<()> {
        self.handle_third_party_overlays().await;
        let remove = self.locators.remove_button();
        remove.wait_for(ElementState::Visible).await?;
        remove.click().await
    }
}

#[async_trait]
impl PageObject for CartPage {
    fn session(&self) -> &Session {
        &self.session
    }
}
