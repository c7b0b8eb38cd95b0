//! Network mocking
//!
//! Routes pair a URL pattern with a canned response. Both drivers consult
//! the same [`RouteTable`], so a mocked search page renders identically
//! offline and in Chromium.

use crate::result::ProbeResult;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A canned response served instead of the network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Response body
    pub body: Vec<u8>,
    /// Content type
    pub content_type: String,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self {
            status: 200,
            headers: HashMap::new(),
            body: Vec::new(),
            content_type: "text/html; charset=utf-8".to_string(),
        }
    }
}

impl MockResponse {
    /// Create an empty 200 HTML response
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an HTML response
    #[must_use]
    pub fn html(document: &str) -> Self {
        Self {
            body: document.as_bytes().to_vec(),
            ..Self::default()
        }
    }

    /// Create a JSON response
    ///
    /// # Errors
    ///
    /// Returns error if `data` cannot be serialized
    pub fn json<T: Serialize>(data: &T) -> ProbeResult<Self> {
        Ok(Self {
            body: serde_json::to_vec(data)?,
            content_type: "application/json".to_string(),
            ..Self::default()
        })
    }

    /// Create a text response
    #[must_use]
    pub fn text(content: &str) -> Self {
        Self {
            body: content.as_bytes().to_vec(),
            content_type: "text/plain".to_string(),
            ..Self::default()
        }
    }

    /// Whether the body is HTML
    #[must_use]
    pub fn is_html(&self) -> bool {
        self.content_type.starts_with("text/html")
    }

    /// Get body as string
    #[must_use]
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

/// Pattern for matching request URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrlPattern {
    /// Exact URL match
    Exact(String),
    /// Prefix match
    Prefix(String),
    /// Contains substring
    Contains(String),
    /// Regex match
    Regex(String),
    /// Glob pattern: `**` spans path segments, `*` stays inside one
    Glob(String),
    /// Match any URL
    Any,
}

impl UrlPattern {
    /// Glob shorthand
    #[must_use]
    pub fn glob(pattern: &str) -> Self {
        Self::Glob(pattern.to_string())
    }

    /// Check if a URL matches this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Exact(pattern) => url == pattern,
            Self::Prefix(pattern) => url.starts_with(pattern),
            Self::Contains(pattern) => url.contains(pattern),
            Self::Regex(pattern) => Regex::new(pattern)
                .map(|re| re.is_match(url))
                .unwrap_or(false),
            Self::Glob(pattern) => Regex::new(&glob_to_regex(pattern))
                .map(|re| re.is_match(url))
                .unwrap_or(false),
            Self::Any => true,
        }
    }
}

fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::from("^");
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '*' {
            if chars.peek() == Some(&'*') {
                chars.next();
                out.push_str(".*");
            } else {
                out.push_str("[^/]*");
            }
        } else {
            out.push_str(&regex::escape(&c.to_string()));
        }
    }
    out.push('$');
    out
}

/// A registered interception
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// URL pattern to match
    pub pattern: UrlPattern,
    /// Response to return
    pub response: MockResponse,
    /// Number of times this route should be used (None = unlimited)
    pub times: Option<usize>,
    /// Number of times this route has been matched
    pub match_count: usize,
}

impl Route {
    /// Create a new route
    #[must_use]
    pub const fn new(pattern: UrlPattern, response: MockResponse) -> Self {
        Self {
            pattern,
            response,
            times: None,
            match_count: 0,
        }
    }

    /// Set how many times this route should match
    #[must_use]
    pub const fn times(mut self, n: usize) -> Self {
        self.times = Some(n);
        self
    }

    /// Check if this route matches a request
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        !self.is_exhausted() && self.pattern.matches(url)
    }

    /// Check if route is exhausted
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.times.is_some_and(|max| self.match_count >= max)
    }
}

/// Ordered set of routes; the most recently added route wins
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route
    pub fn add(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Find the response for `url`, counting the match
    pub fn fulfill(&mut self, url: &str) -> Option<MockResponse> {
        let route = self.routes.iter_mut().rev().find(|r| r.matches(url))?;
        route.match_count += 1;
        tracing::debug!(url, pattern = ?route.pattern, "route fulfilled");
        Some(route.response.clone())
    }

    /// Number of registered routes
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no routes are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod url_pattern_tests {
        use super::*;

        #[test]
        fn test_listing_glob() {
            let pattern = UrlPattern::glob("**/listado.mercadolibre.com.ar/*");
            assert!(pattern.matches("https://listado.mercadolibre.com.ar/macbook"));
            assert!(pattern.matches("https://listado.mercadolibre.com.ar/search?as_word=macbook"));
            assert!(!pattern.matches("https://www.mercadolibre.com.ar/"));
            assert!(!pattern.matches("https://listado.mercadolibre.com.ar/a/b"));
        }

        #[test]
        fn test_glob_dots_are_literal() {
            let pattern = UrlPattern::glob("**/shop.test/*");
            assert!(!pattern.matches("https://shopXtest/item"));
        }

        #[test]
        fn test_contains_and_prefix() {
            assert!(UrlPattern::Contains("/p/MLA".into()).matches("https://x/p/MLA123"));
            assert!(UrlPattern::Prefix("https://x".into()).matches("https://x/y"));
            assert!(!UrlPattern::Exact("https://x".into()).matches("https://x/"));
        }

        #[test]
        fn test_invalid_regex_never_matches() {
            assert!(!UrlPattern::Regex("(".into()).matches("anything"));
        }
    }

    mod route_table_tests {
        use super::*;

        #[test]
        fn test_latest_route_wins() {
            let mut table = RouteTable::new();
            table.add(Route::new(UrlPattern::Any, MockResponse::text("old")));
            table.add(Route::new(UrlPattern::Any, MockResponse::text("new")));
            assert_eq!(table.fulfill("https://a/").unwrap().body_string(), "new");
        }

        #[test]
        fn test_times_exhausts_route() {
            let mut table = RouteTable::new();
            table.add(Route::new(UrlPattern::Any, MockResponse::html("<p>1</p>")).times(1));
            assert!(table.fulfill("https://a/").is_some());
            assert!(table.fulfill("https://a/").is_none());
        }

        #[test]
        fn test_json_response_content_type() {
            let response = MockResponse::json(&serde_json::json!({"results": []})).unwrap();
            assert!(!response.is_html());
            assert_eq!(response.content_type, "application/json");
            assert!(MockResponse::html("<p/>").is_html());
        }
    }
}
