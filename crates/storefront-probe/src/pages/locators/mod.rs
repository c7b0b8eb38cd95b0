//! Locator sets: semantic name to [`Locator`](crate::locator::Locator), one
//! struct per page. They never click, wait or assert.
//!
//! Attribute selectors (`data-testid`, `formaction`, `href` fragments) are
//! preferred over class names wherever the storefront exposes one.

mod cart;
mod home;
mod login;
mod product_detail;
mod search_results;

pub use cart::CartLocators;
pub use home::HomeLocators;
pub use login::LoginLocators;
pub use product_detail::{PdpAction, ProductDetailLocators};
pub use search_results::{SearchResultsLocators, SortOption};
