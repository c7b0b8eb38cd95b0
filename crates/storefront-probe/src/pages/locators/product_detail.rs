use crate::locator::{Locator, Selector};
use crate::session::Session;
use serde::{Deserialize, Serialize};

/// Primary purchase actions on a product detail page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PdpAction {
    /// "Comprar ahora"
    BuyNow,
    /// "Agregar al carrito"
    AddToCart,
}

impl PdpAction {
    /// Fragment of the button's `formaction`; steadier than ids or classes
    #[must_use]
    pub const fn form_action(self) -> &'static str {
        match self {
            Self::BuyNow => "/gz/checkout/buy",
            Self::AddToCart => "/add-to-cart",
        }
    }
}

/// Product detail page
#[derive(Debug, Clone)]
pub struct ProductDetailLocators {
    session: Session,
}

impl ProductDetailLocators {
    /// Bind to a session
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Product title
    #[must_use]
    pub fn product_title(&self) -> Locator {
        self.session.locator("h1.ui-pdp-title")
    }

    /// Current price
    #[must_use]
    pub fn product_price(&self) -> Locator {
        self.session
            .locator(".ui-pdp-price__second-line")
            .locator(Selector::test_id("price-part"))
    }

    /// Button for `action`
    #[must_use]
    pub fn action_button(&self, action: PdpAction) -> Locator {
        self.session.locator(Selector::attr_contains(
            "button",
            "formaction",
            action.form_action(),
        ))
    }

    /// Variation groups (color, storage, ...)
    #[must_use]
    pub fn variation_pickers(&self) -> Locator {
        self.session.locator(".ui-pdp-outside_variations__picker")
    }

    /// Every variation option
    #[must_use]
    pub fn variation_options(&self) -> Locator {
        self.session.locator(Selector::test_id("thumbnail-item"))
    }

    /// Option whose visible label contains `label`.
    /// Prefer [`Self::variation_option_by_url_fragment`] when the slug is known.
    #[must_use]
    pub fn variation_option_by_label(&self, label: &str) -> Locator {
        self.variation_options().filter_has_text(label)
    }

    /// Option whose `href` contains `fragment`. Selecting a variant is a full
    /// navigation, so the link target identifies it.
    #[must_use]
    pub fn variation_option_by_url_fragment(&self, fragment: &str) -> Locator {
        self.session.locator(Selector::attr_contains(
            "[data-testid=\"thumbnail-item\"]",
            "href",
            fragment,
        ))
    }
}
