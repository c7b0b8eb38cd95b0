use crate::locator::{Locator, Selector};
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Keys of the sort dropdown options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Más relevantes
    Relevance,
    /// Menor precio
    PriceAsc,
    /// Mayor precio
    PriceDesc,
}

impl SortOption {
    /// `data-key` of the option
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Search results listing: rows, per-row fields, filters and sorting.
///
/// Per-row accessors take a row locator (from [`Self::results_items`]) and
/// chain from it.
#[derive(Debug, Clone)]
pub struct SearchResultsLocators {
    session: Session,
}

impl SearchResultsLocators {
    /// Bind to a session
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Every result row
    #[must_use]
    pub fn results_items(&self) -> Locator {
        self.session.locator("li.ui-search-layout__item")
    }

    /// Row title. Mocked listings render a bare `h2`.
    #[must_use]
    pub fn item_title(&self, item: &Locator) -> Locator {
        item.locator(".poly-component__title, h2").first()
    }

    /// Row current price
    #[must_use]
    pub fn item_price(&self, item: &Locator) -> Locator {
        item.locator(".poly-price__current .andes-money-amount").first()
    }

    /// Row picture
    #[must_use]
    pub fn item_image(&self, item: &Locator) -> Locator {
        item.locator(Selector::test_id("picture"))
    }

    /// Row link to the product page
    #[must_use]
    pub fn item_link(&self, item: &Locator) -> Locator {
        item.locator("a.poly-component__title")
    }

    /// Row rating label
    #[must_use]
    pub fn item_rating(&self, item: &Locator) -> Locator {
        item.locator(".poly-phrase-label").first()
    }

    /// Row sold-quantity label
    #[must_use]
    pub fn item_sold_quantity(&self, item: &Locator) -> Locator {
        item.locator(".poly-phrase-label").last()
    }

    /// Row shipping badge
    #[must_use]
    pub fn item_shipping(&self, item: &Locator) -> Locator {
        item.locator(".poly-component__shipping")
    }

    // filters

    /// Minimum price input
    #[must_use]
    pub fn min_price_range(&self) -> Locator {
        self.session.locator(Selector::test_id("Minimum-price"))
    }

    /// Maximum price input
    #[must_use]
    pub fn max_price_range(&self) -> Locator {
        self.session.locator(Selector::test_id("Maximum-price"))
    }

    /// Enabled apply button of the price range filter
    #[must_use]
    pub fn price_filter_button(&self) -> Locator {
        self.session.locator(".ui-search-range-filter--price button:not([disabled])")
    }

    /// Sort dropdown trigger
    #[must_use]
    pub fn sort_by_dropdown(&self) -> Locator {
        self.session.locator(".ui-search-sort-filter button")
    }

    /// Sort option in the open dropdown
    #[must_use]
    pub fn sort_option(&self, option: SortOption) -> Locator {
        self.session.locator(format!("li[data-key=\"{}\"]", option.key()))
    }

    /// Free shipping switch
    #[must_use]
    pub fn free_shipping_switch(&self) -> Locator {
        self.session.locator("input#shipping_cost_highlighted_free")
    }

    // applied filter tags

    /// Tag shown once a price filter is applied
    #[must_use]
    pub fn price_filter_tag(&self) -> Locator {
        self.session
            .locator(".andes-tag")
            .filter_has(&self.session.locator("button[aria-label*=\"Precio\" i]"))
    }
}
