use super::base::PageObject;
use super::locators::{PdpAction, ProductDetailLocators};
use crate::assertion::Assertion;
use crate::expect::{expect, expect_url};
use crate::locator::Locator;
use crate::result::ProbeResult;
use crate::session::Session;
use crate::wait::ElementState;
use async_trait::async_trait;

/// Product detail page: metadata, variants and purchase actions.
///
/// Actions never assert; expectations never act.
#[derive(Debug, Clone)]
pub struct ProductDetailPage {
    session: Session,
    locators: ProductDetailLocators,
}

impl ProductDetailPage {
    /// Bind to a session
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            locators: ProductDetailLocators::new(session.clone()),
            session,
        }
    }

    /// Locator set
    #[must_use]
    pub const fn locators(&self) -> &ProductDetailLocators {
        &self.locators
    }

    async fn perform(&self, action: PdpAction) -> ProbeResult<()> {
        tracing::info!(?action, "pdp action");
        self.handle_third_party_overlays().await;
        self.locators.action_button(action).click().await
    }

    /// Add the selected variant to the cart
    ///
    /// # Errors
    ///
    /// Returns error if the button never becomes clickable
    pub async fn add_to_cart(&self) -> ProbeResult<()> {
        self.perform(PdpAction::AddToCart).await
    }

    /// Start checkout with "Comprar ahora"
    ///
    /// # Errors
    ///
    /// Returns error if the button never becomes clickable
    pub async fn buy_now(&self) -> ProbeResult<()> {
        self.perform(PdpAction::BuyNow).await
    }

    async fn visible_text(locator: &Locator) -> ProbeResult<String> {
        locator.wait_for(ElementState::Visible).await?;
        locator.text_content().await
    }

    /// Product title once it is visible
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`](crate::ProbeError::Timeout) if it never shows
    pub async fn get_product_title(&self) -> ProbeResult<String> {
        Self::visible_text(&self.locators.product_title()).await
    }

    /// Product price once it is visible
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`](crate::ProbeError::Timeout) if it never shows
    pub async fn get_product_price(&self) -> ProbeResult<String> {
        Self::visible_text(&self.locators.product_price()).await
    }

    /// Title and price are present and non-empty
    ///
    /// # Errors
    ///
    /// Returns an assertion failure naming the empty field
    pub async fn expect_product_details_to_be_visible(&self) -> ProbeResult<()> {
        let title = self.get_product_title().await?;
        let price = self.get_product_price().await?;
        Assertion::not_empty(title.trim(), "Product title should not be empty").into_result()?;
        Assertion::not_empty(price.trim(), "Product price should not be empty").into_result()
    }

    /// Click the option whose label matches `slug` (first `-` read as a
    /// space) and require a URL change to one containing `slug`
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`](crate::ProbeError::Timeout) or an
    /// assertion failure if the URL did not change
    pub async fn select_variant_and_expect_url_change(&self, slug: &str) -> ProbeResult<()> {
        let before = self.session.url().await?;
        let option = self
            .locators
            .variation_option_by_label(&slug.replacen('-', " ", 1));
        let (after, ()) = tokio::try_join!(
            self.session.wait_for_url_containing(slug),
            option.click()
        )?;
        Assertion::not_equals(&before, &after)
            .context("variant URL")
            .into_result()
    }

    /// Click the option linking to `fragment`; returns once the URL contains it
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`](crate::ProbeError::Timeout) if the option
    /// is missing or the navigation never happens
    pub async fn select_variant_by_url_fragment(&self, fragment: &str) -> ProbeResult<()> {
        tracing::info!(fragment, "select variant");
        let option = self.locators.variation_option_by_url_fragment(fragment);
        tokio::try_join!(
            self.session.wait_for_url_containing(fragment),
            option.click()
        )?;
        Ok(())
    }

    /// The URL reflects the variant (matched as a regular expression)
    ///
    /// # Errors
    ///
    /// Returns an assertion failure if it does not
    pub async fn expect_variant_applied(&self, fragment: &str) -> ProbeResult<()> {
        expect_url(&self.session)
            .with_timeout(self.session.config().navigation_timeout())
            .to_match(fragment)
            .await
    }

    /// Exactly one option links to `fragment`
    ///
    /// # Errors
    ///
    /// Returns an assertion failure naming the count seen
    pub async fn expect_variant_option_to_exist(&self, fragment: &str) -> ProbeResult<()> {
        expect(&self.locators.variation_option_by_url_fragment(fragment))
            .to_have_count(1)
            .await
    }
}

#[async_trait]
impl PageObject for ProductDetailPage {
    fn session(&self) -> &Session {
        &self.session
    }
}
