//! Chrome DevTools Protocol driver.
//!
//! Queries are resolved in the page by a small script that walks the same
//! step/op chain the static driver evaluates. Interactions mark the resolved
//! element with a one-off attribute and then go through chromiumoxide's
//! element API so they produce trusted input events.

use super::{Driver, ElementSnapshot};
use crate::locator::Query;
use crate::network::{MockResponse, Route, RouteTable};
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use base64::Engine as _;
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EnableParams, EventRequestPaused, FulfillRequestParams, HeaderEntry,
};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

const TARGET_ATTR: &str = "data-probe-target";

/// `(query, token) => snapshots`; marks the first match when `token` is set
const RESOLVER_JS: &str = r"(query, token) => {
  const norm = (s) => (s || '').replace(/\s+/g, ' ').trim().toLowerCase();
  const order = (a, b) =>
    a === b ? 0 : (a.compareDocumentPosition(b) & Node.DOCUMENT_POSITION_FOLLOWING ? -1 : 1);
  const resolve = (scopes, q) => {
    let current = scopes;
    for (const step of q.steps) {
      const seen = new Set();
      for (const root of current === null ? [document] : current) {
        for (const el of root.querySelectorAll(step.css)) seen.add(el);
      }
      let matched = Array.from(seen).sort(order);
      for (const op of step.ops) {
        if (op.op === 'has_text') matched = matched.filter((el) => norm(el.textContent).includes(norm(op.text)));
        else if (op.op === 'has') matched = matched.filter((el) => resolve([el], op.query).length > 0);
        else if (op.op === 'first') matched = matched.slice(0, 1);
        else if (op.op === 'last') matched = matched.slice(-1);
        else if (op.op === 'nth') matched = op.index < matched.length ? [matched[op.index]] : [];
      }
      current = matched;
    }
    return current || [];
  };
  const visible = (el) => {
    const style = window.getComputedStyle(el);
    if (style.visibility === 'hidden' || style.display === 'none') return false;
    return el.getClientRects().length > 0;
  };
  const editable = ['INPUT', 'TEXTAREA', 'SELECT'];
  const found = resolve(null, query);
  if (token && found.length > 0) {
    document.querySelectorAll('[data-probe-target]').forEach((el) => el.removeAttribute('data-probe-target'));
    found[0].setAttribute('data-probe-target', token);
  }
  return found.map((el) => {
    const attributes = Object.fromEntries(Array.from(el.attributes, (a) => [a.name, a.value]));
    if (el.checked) attributes.checked = '';
    return {
      tag: el.tagName.toLowerCase(),
      visible: visible(el),
      text_content: el.textContent || '',
      inner_text: (el.innerText || '').replace(/\s+/g, ' ').trim(),
      value: editable.includes(el.tagName) ? el.value : null,
      attributes,
    };
  });
}";

fn page_error(err: impl std::fmt::Display) -> ProbeError {
    ProbeError::PageError {
        message: err.to_string(),
    }
}

fn interaction_error(action: &str, query: &Query, err: impl std::fmt::Display) -> ProbeError {
    ProbeError::InteractionError {
        action: action.to_string(),
        locator: query.to_string(),
        message: err.to_string(),
    }
}

/// Driver over one chromiumoxide page
#[derive(Debug, Clone)]
pub struct CdpDriver {
    page: Page,
    routes: Arc<Mutex<RouteTable>>,
    interception: Arc<OnceCell<()>>,
}

impl CdpDriver {
    /// Drive an already opened page
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self {
            page,
            routes: Arc::new(Mutex::new(RouteTable::new())),
            interception: Arc::new(OnceCell::new()),
        }
    }

    /// Underlying chromiumoxide page
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    async fn evaluate(
        &self,
        query: &Query,
        token: Option<&str>,
    ) -> ProbeResult<Vec<ElementSnapshot>> {
        let token = serde_json::to_string(&token)?;
        let expression = format!("({RESOLVER_JS})({}, {token})", query.to_wire());
        let result = self.page.evaluate(expression).await.map_err(page_error)?;
        result.into_value().map_err(|e| ProbeError::PageError {
            message: format!("resolving {query}: {e}"),
        })
    }

    /// Mark the first match of `query` and return it as a chromiumoxide element
    async fn target(&self, query: &Query, action: &str) -> ProbeResult<Element> {
        let token = uuid::Uuid::new_v4().to_string();
        if self.evaluate(query, Some(&token)).await?.is_empty() {
            return Err(interaction_error(action, query, "element is not attached"));
        }
        self.page
            .find_element(format!("[{TARGET_ATTR}=\"{token}\"]"))
            .await
            .map_err(|e| interaction_error(action, query, e))
    }

    async fn enable_interception(&self) -> ProbeResult<()> {
        let mut paused = self
            .page
            .event_listener::<EventRequestPaused>()
            .await
            .map_err(page_error)?;
        self.page
            .execute(EnableParams::default())
            .await
            .map_err(page_error)?;

        let page = self.page.clone();
        let routes = Arc::clone(&self.routes);
        tokio::spawn(async move {
            while let Some(event) = paused.next().await {
                let response = routes
                    .lock()
                    .ok()
                    .and_then(|mut table| table.fulfill(&event.request.url));
                let outcome = match response {
                    Some(response) => fulfill(&page, &event, &response).await,
                    None => page
                        .execute(ContinueRequestParams::new(event.request_id.clone()))
                        .await
                        .map(|_| ())
                        .map_err(page_error),
                };
                if let Err(err) = outcome {
                    tracing::debug!(
                        url = %event.request.url,
                        error = %err,
                        "request interception failed"
                    );
                }
            }
        });
        tracing::debug!("fetch interception enabled");
        Ok(())
    }
}

async fn fulfill(
    page: &Page,
    event: &EventRequestPaused,
    response: &MockResponse,
) -> ProbeResult<()> {
    let mut headers = vec![HeaderEntry::new("Content-Type", response.content_type.clone())];
    headers.extend(
        response
            .headers
            .iter()
            .map(|(name, value)| HeaderEntry::new(name.clone(), value.clone())),
    );
    let params = FulfillRequestParams::builder()
        .request_id(event.request_id.clone())
        .response_code(i64::from(response.status))
        .response_headers(headers)
        .body(base64::engine::general_purpose::STANDARD.encode(&response.body))
        .build()
        .map_err(page_error)?;
    page.execute(params).await.map_err(page_error)?;
    Ok(())
}

#[async_trait]
impl Driver for CdpDriver {
    async fn goto(&self, url: &str) -> ProbeResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| ProbeError::NavigationError {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> ProbeResult<String> {
        let url = self.page.url().await.map_err(page_error)?;
        Ok(url.unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn query(&self, query: &Query) -> ProbeResult<Vec<ElementSnapshot>> {
        self.evaluate(query, None).await
    }

    async fn click(&self, query: &Query) -> ProbeResult<()> {
        let element = self.target(query, "click").await?;
        element
            .click()
            .await
            .map_err(|e| interaction_error("click", query, e))?;
        Ok(())
    }

    async fn fill(&self, query: &Query, value: &str) -> ProbeResult<()> {
        let element = self.target(query, "fill").await?;
        element
            .call_js_fn(
                "function() { this.value = ''; this.dispatchEvent(new Event('input', { bubbles: true })); }",
                false,
            )
            .await
            .map_err(|e| interaction_error("fill", query, e))?;
        element
            .focus()
            .await
            .map_err(|e| interaction_error("fill", query, e))?
            .type_str(value)
            .await
            .map_err(|e| interaction_error("fill", query, e))?;
        Ok(())
    }

    async fn press(&self, query: &Query, key: &str) -> ProbeResult<()> {
        let element = self.target(query, "press").await?;
        element
            .focus()
            .await
            .map_err(|e| interaction_error("press", query, e))?
            .press_key(key)
            .await
            .map_err(|e| interaction_error("press", query, e))?;
        Ok(())
    }

    async fn keyboard_press(&self, key: &str) -> ProbeResult<()> {
        let body = self.page.find_element("body").await.map_err(page_error)?;
        body.press_key(key).await.map_err(page_error)?;
        Ok(())
    }

    async fn route(&self, route: Route) -> ProbeResult<()> {
        self.routes
            .lock()
            .map_err(|_| page_error("route table poisoned"))?
            .add(route);
        self.interception
            .get_or_try_init(|| self.enable_interception())
            .await?;
        Ok(())
    }
}
