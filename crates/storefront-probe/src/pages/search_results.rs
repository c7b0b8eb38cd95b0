use super::base::PageObject;
use super::locators::{SearchResultsLocators, SortOption};
use super::price::{check_price_range, check_sort_trend, check_titles, parse_price, SortOrder};
use crate::expect::expect;
use crate::result::ProbeResult;
use crate::session::Session;
use crate::wait::ElementState;
use async_trait::async_trait;

/// Search results listing
#[derive(Debug, Clone)]
pub struct SearchResultsPage {
    session: Session,
    locators: SearchResultsLocators,
}

impl SearchResultsPage {
    /// Bind to a session
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            locators: SearchResultsLocators::new(session.clone()),
            session,
        }
    }

    /// Locator set
    #[must_use]
    pub const fn locators(&self) -> &SearchResultsLocators {
        &self.locators
    }

    /// The first result row is visible within the results timeout
    ///
    /// # Errors
    ///
    /// Returns an assertion failure if no row shows up
    pub async fn expect_results_to_be_visible(&self) -> ProbeResult<()> {
        expect(&self.locators.results_items().first())
            .with_timeout(self.session.config().results_timeout())
            .to_be_visible()
            .await
    }

    /// Exactly `expected` rows are rendered
    ///
    /// # Errors
    ///
    /// Returns an assertion failure naming the last count seen
    pub async fn expect_results_count(&self, expected: usize) -> ProbeResult<()> {
        expect(&self.locators.results_items())
            .with_timeout(self.session.config().results_timeout())
            .to_have_count(expected)
            .await
    }

    /// Titles of the current rows, in order
    ///
    /// # Errors
    ///
    /// Returns error if a row has no title
    pub async fn result_titles(&self) -> ProbeResult<Vec<String>> {
        let mut titles = Vec::new();
        for item in self.locators.results_items().all().await? {
            titles.push(self.locators.item_title(&item).inner_text().await?);
        }
        Ok(titles)
    }

    /// Displayed price text of the current rows, in order
    ///
    /// # Errors
    ///
    /// Returns error if a row has no price
    pub async fn result_prices(&self) -> ProbeResult<Vec<String>> {
        let mut prices = Vec::new();
        for item in self.locators.results_items().all().await? {
            prices.push(self.locators.item_price(&item).inner_text().await?);
        }
        Ok(prices)
    }

    /// Rendered titles contain `expected`, position by position
    ///
    /// # Errors
    ///
    /// Returns an assertion failure on the first mismatch
    pub async fn expect_result_titles(&self, expected: &[&str]) -> ProbeResult<()> {
        self.wait_for_first_result().await?;
        check_titles(&self.result_titles().await?, expected)
    }

    async fn wait_for_first_result(&self) -> ProbeResult<()> {
        self.locators
            .results_items()
            .first()
            .wait_for_within(ElementState::Visible, self.session.config().results_timeout())
            .await
    }

    /// Open the sort dropdown and pick `option`
    ///
    /// # Errors
    ///
    /// Returns error if the dropdown or the option never becomes usable
    pub async fn select_sort_by(&self, option: SortOption) -> ProbeResult<()> {
        tracing::info!(%option, "sort results");
        self.locators.sort_by_dropdown().click().await?;
        let choice = self.locators.sort_option(option);
        choice.wait_for(ElementState::Visible).await?;
        choice.click().await
    }

    /// First and last of the first five prices follow `order`
    ///
    /// # Errors
    ///
    /// Returns an assertion failure when the trend is wrong
    pub async fn expect_results_to_be_sorted_by_price(&self, order: SortOrder) -> ProbeResult<()> {
        self.wait_for_first_result().await?;
        check_sort_trend(&self.result_prices().await?, order)
    }

    /// Fill the price range, apply it, and check the filter tag appears
    ///
    /// # Errors
    ///
    /// Returns error if the filter controls are unusable or no tag appears
    pub async fn apply_price_filter(&self, min: &str, max: &str) -> ProbeResult<()> {
        tracing::info!(min, max, "apply price filter");
        self.locators.min_price_range().fill(min).await?;
        self.locators.max_price_range().fill(max).await?;
        self.locators.price_filter_button().click().await?;
        self.validate_price_filter().await
    }

    /// The applied-price tag is visible
    ///
    /// # Errors
    ///
    /// Returns an assertion failure if it is not
    pub async fn validate_price_filter(&self) -> ProbeResult<()> {
        expect(&self.locators.price_filter_tag()).to_be_visible().await
    }

    /// Every current row is priced within `[min, max]`
    ///
    /// # Errors
    ///
    /// Returns an assertion failure naming the first row out of range
    pub async fn validate_price_range_filtering(&self, min: &str, max: &str) -> ProbeResult<()> {
        let min = parse_price(min)?;
        let max = parse_price(max)?;
        self.wait_for_first_result().await?;
        check_price_range(&self.result_prices().await?, min, max)
    }

    /// Toggle the free shipping switch
    ///
    /// # Errors
    ///
    /// Returns error if the switch never becomes clickable
    pub async fn toggle_free_shipping(&self) -> ProbeResult<()> {
        self.locators.free_shipping_switch().click().await
    }

    /// Open the first result's product page
    ///
    /// # Errors
    ///
    /// Returns error if the first row's link never becomes clickable
    pub async fn click_first_result(&self) -> ProbeResult<()> {
        self.handle_third_party_overlays().await;
        let first = self.locators.results_items().first();
        self.locators.item_link(&first).click().await
    }
}

#[async_trait]
impl PageObject for SearchResultsPage {
    fn session(&self) -> &Session {
        &self.session
    }
}
