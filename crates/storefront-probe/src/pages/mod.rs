//! Page objects.
//!
//! One type per storefront surface. Each holds a clone of the test's
//! [`Session`](crate::session::Session) and its own locator set, and shares
//! navigation and overlay handling through [`PageObject`].
//!
//! Actions perform one user-intent step and do not assert. Methods named
//! `expect_*` verify a postcondition and do not change page state.

mod base;
mod cart;
mod home;
pub mod locators;
mod login;
pub mod price;
mod product_detail;
mod search_results;

pub use base::{PageObject, ONE_TAP_OVERLAY};
pub use cart::CartPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use product_detail::ProductDetailPage;
pub use search_results::SearchResultsPage;
