//! Canned search responses.
//!
//! A search mock is the JSON document the mocked-search scenario serves in
//! place of the live listing:
//!
//! ```json
//! { "results": [ { "title": "Mock MacBook Air M1 256GB" } ] }
//! ```

use crate::result::ProbeResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rows rendered when no limit is given
pub const DEFAULT_MOCK_LIMIT: usize = 3;

/// One mocked result row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMockItem {
    /// Title rendered in the row heading
    pub title: String,
}

/// Mocked search payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMock {
    /// Results in display order
    #[serde(default)]
    pub results: Vec<SearchMockItem>,
}

impl SearchMock {
    /// Parse a mock from JSON text
    ///
    /// # Errors
    ///
    /// Returns error if the JSON does not describe a search mock
    pub fn from_json(json: &str) -> ProbeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a mock from a JSON file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> ProbeResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Titles in display order
    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.title.as_str()).collect()
    }
}

fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the first `limit` mock results as a search listing document.
///
/// Rows use the live listing classes, so the results page locators resolve
/// against it unchanged.
#[must_use]
pub fn build_search_html_from_mock(mock: &SearchMock, limit: usize) -> String {
    let items: String = mock
        .results
        .iter()
        .take(limit)
        .map(|item| {
            format!(
                "\n        <li class=\"ui-search-layout__item\">\n          <h2>{}</h2>\n        </li>",
                escape_text(&item.title)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="es">
  <head>
    <meta charset="UTF-8" />
    <title>Mocked Search</title>
  </head>
  <body>
    <ol class="ui-search-layout">{items}
    </ol>
  </body>
</html>
"#
    )
}
