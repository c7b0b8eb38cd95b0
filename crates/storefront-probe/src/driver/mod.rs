//! Browser engine abstraction.
//!
//! Page objects never talk to an engine directly. They build
//! [`Query`] values through locators and hand them to a [`Driver`], which
//! resolves them against whatever document is loaded right now.

use crate::locator::Query;
use crate::network::Route;
use crate::result::ProbeResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

#[cfg(feature = "browser")]
pub mod cdp;
pub mod static_html;

#[cfg(feature = "browser")]
pub use cdp::CdpDriver;
pub use static_html::StaticDriver;

/// What a driver reports about one matched element at one instant
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// Lower-case tag name
    pub tag: String,
    /// Rendered (not hidden by itself or an ancestor)
    pub visible: bool,
    /// All descendant text
    pub text_content: String,
    /// Rendered text, whitespace collapsed
    pub inner_text: String,
    /// Current form value for inputs
    pub value: Option<String>,
    /// Attributes as written in the DOM
    pub attributes: HashMap<String, String>,
}

impl ElementSnapshot {
    /// Attribute lookup
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Browser engine seam.
///
/// Element-targeted calls act on the first element the query resolves to;
/// strictness and actionability are checked by the caller beforehand.
#[async_trait]
pub trait Driver: Send + Sync + std::fmt::Debug {
    /// Navigate and wait for the document to load
    async fn goto(&self, url: &str) -> ProbeResult<()>;

    /// URL of the loaded document
    async fn current_url(&self) -> ProbeResult<String>;

    /// Resolve a query to snapshots, in document order
    async fn query(&self, query: &Query) -> ProbeResult<Vec<ElementSnapshot>>;

    /// Click the target
    async fn click(&self, query: &Query) -> ProbeResult<()>;

    /// Replace the target's value
    async fn fill(&self, query: &Query, value: &str) -> ProbeResult<()>;

    /// Focus the target and press `key`
    async fn press(&self, query: &Query, key: &str) -> ProbeResult<()>;

    /// Press `key` on whatever has focus
    async fn keyboard_press(&self, key: &str) -> ProbeResult<()>;

    /// Register a network interception
    async fn route(&self, route: Route) -> ProbeResult<()>;
}

/// Driver shared by every page object of a test
pub type SharedDriver = Arc<dyn Driver>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_lookup() {
        let mut snapshot = ElementSnapshot::default();
        snapshot
            .attributes
            .insert("href".into(), "/p/MLA1".into());
        assert_eq!(snapshot.attribute("href"), Some("/p/MLA1"));
        assert_eq!(snapshot.attribute("id"), None);
    }
}
