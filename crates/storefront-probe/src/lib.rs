//! storefront-probe: page-object end-to-end tests for the MercadoLibre storefront
//!
//! The crate models each storefront surface (home, search results, product
//! detail, cart, login) as a page object over lazily resolved locators, and
//! composes them per test through [`Fixtures`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  Scenario    │──►│  Fixtures    │──►│ Page objects │──►│  Locators    │
//! │  (tokio test)│   │ (dep order)  │   │ + PageObject │   │  (Query)     │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                                                 │
//!                                      ┌──────────────────────────▼───────┐
//!                                      │ Session ─► dyn Driver            │
//!                                      │   StaticDriver (scraper)         │
//!                                      │   CdpDriver (chromiumoxide)      │
//!                                      └──────────────────────────────────┘
//! ```
//!
//! The `browser` feature enables [`Browser`] and the CDP driver. Without it
//! every scenario runs against [`StaticDriver`] and local HTML fixtures.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod assertion;
#[cfg(feature = "browser")]
mod browser;
mod config;
pub mod driver;
mod expect;
mod fixture;
mod locator;
mod logging;
mod mock_data;
mod network;
pub mod pages;
mod result;
mod session;
mod wait;

pub use assertion::{Assertion, AssertionResult};
#[cfg(feature = "browser")]
pub use browser::Browser;
pub use config::{
    ProbeConfig, BASE_URL_ENV, CHROMIUM_PATH_ENV, CONFIG_FILE_ENV, DEFAULT_BASE_URL,
    HEADLESS_ENV, TIMEOUT_ENV,
};
#[cfg(feature = "browser")]
pub use driver::CdpDriver;
pub use driver::{Driver, ElementSnapshot, SharedDriver, StaticDriver};
pub use expect::{expect, expect_url, LocatorExpectation, UrlExpectation};
pub use fixture::{resolve_order, FixtureContext, FixtureName, FixtureState, Fixtures};
pub use locator::{
    escape_css_string, normalize_whitespace, text_matches, Locator, Query, Selector, Step,
    StepOp,
};
pub use logging::{init_tracing, DEFAULT_FILTER};
pub use mock_data::{build_search_html_from_mock, SearchMock, SearchMockItem, DEFAULT_MOCK_LIMIT};
pub use network::{MockResponse, Route, RouteTable, UrlPattern};
pub use pages::price::{parse_price, SortOrder};
pub use pages::{
    CartPage, HomePage, LoginPage, PageObject, ProductDetailPage, SearchResultsPage,
    ONE_TAP_OVERLAY,
};
pub use result::{ProbeError, ProbeResult};
pub use session::Session;
pub use wait::{
    observe_until, poll_until, ElementState, Observed, WaitOptions, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_WAIT_TIMEOUT_MS,
};

/// Prelude for scenario code
pub mod prelude {
    pub use super::assertion::*;
    #[cfg(feature = "browser")]
    pub use super::browser::*;
    pub use super::config::ProbeConfig;
    pub use super::driver::{Driver, ElementSnapshot, StaticDriver};
    pub use super::expect::{expect, expect_url};
    pub use super::fixture::{FixtureContext, FixtureName, FixtureState, Fixtures};
    pub use super::locator::Locator;
    pub use super::mock_data::*;
    pub use super::network::{MockResponse, UrlPattern};
    pub use super::pages::locators::SortOption;
    pub use super::pages::price::SortOrder;
    pub use super::pages::*;
    pub use super::result::*;
    pub use super::session::Session;
    pub use super::wait::ElementState;
}
