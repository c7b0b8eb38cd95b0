//! In-process driver over static HTML documents.
//!
//! Pages are registered by URL and parsed with `scraper` on every query, so
//! each call sees the current document exactly like a live page would. The
//! engine implements the slice of browser behaviour the storefront pages
//! rely on:
//!
//! - links, `formaction` buttons and GET form submission navigate
//! - `hidden`, `display:none`, `visibility:hidden` hide a subtree
//! - clicking an element with `aria-controls` reveals the controlled element
//! - pressing a key hides elements whose `data-dismiss-key` names that key
//! - registered [`Route`]s answer navigations before the page registry

use super::{Driver, ElementSnapshot};
use crate::locator::{text_matches, Query, StepOp};
use crate::network::{Route, RouteTable};
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use url::Url;

const NON_RENDERED_TAGS: &[&str] = &[
    "head", "script", "style", "template", "title", "meta", "link", "noscript",
];

/// Per-element state that differs from the served markup
#[derive(Debug, Clone, Default)]
struct ElementOverride {
    hidden: Option<bool>,
    value: Option<String>,
    checked: Option<bool>,
}

#[derive(Debug, Clone)]
struct LoadedDocument {
    url: String,
    source: String,
    // keyed by the element's position in document order
    overrides: HashMap<usize, ElementOverride>,
}

#[derive(Debug, Default)]
struct DriverState {
    pages: HashMap<String, String>,
    routes: RouteTable,
    document: Option<LoadedDocument>,
    call_history: Vec<String>,
}

/// Scraper-backed driver for offline runs
#[derive(Debug)]
pub struct StaticDriver {
    base_url: Url,
    state: Mutex<DriverState>,
}

impl StaticDriver {
    /// Create a driver resolving relative page URLs against `base_url`
    ///
    /// # Errors
    ///
    /// Returns error if `base_url` is not an absolute URL
    pub fn new(base_url: &str) -> ProbeResult<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            state: Mutex::new(DriverState::default()),
        })
    }

    /// Register a page (builder form)
    ///
    /// # Errors
    ///
    /// Returns error if `url` cannot be resolved
    pub fn with_page(self, url: &str, html: &str) -> ProbeResult<Self> {
        self.add_page(url, html)?;
        Ok(self)
    }

    /// Register a page
    ///
    /// # Errors
    ///
    /// Returns error if `url` cannot be resolved
    pub fn add_page(&self, url: &str, html: &str) -> ProbeResult<()> {
        let key = self.base_url.join(url)?.to_string();
        self.lock()?.pages.insert(key, html.to_string());
        Ok(())
    }

    /// Every URL navigated to, in order
    #[must_use]
    pub fn visits(&self) -> Vec<String> {
        self.entries_with("goto:")
    }

    /// Every clicked query, in order
    #[must_use]
    pub fn clicks(&self) -> Vec<String> {
        self.entries_with("click:")
    }

    /// Every key pressed, element-targeted or not
    #[must_use]
    pub fn keys_pressed(&self) -> Vec<String> {
        self.entries_with("key:")
    }

    /// Full call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock()
            .map(|state| state.call_history.clone())
            .unwrap_or_default()
    }

    /// Check if a call with this prefix was made
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.history().iter().any(|c| c.starts_with(prefix))
    }

    fn entries_with(&self, prefix: &str) -> Vec<String> {
        self.history()
            .iter()
            .filter_map(|c| c.strip_prefix(prefix).map(str::to_string))
            .collect()
    }

    fn lock(&self) -> ProbeResult<MutexGuard<'_, DriverState>> {
        self.state.lock().map_err(|_| ProbeError::PageError {
            message: "static driver state poisoned".into(),
        })
    }

    fn navigate(&self, state: &mut DriverState, url: &str) -> ProbeResult<()> {
        let target = self.base_url.join(url)?;
        state.call_history.push(format!("goto:{target}"));

        let source = if let Some(response) = state.routes.fulfill(target.as_str()) {
            if response.is_html() {
                response.body_string()
            } else {
                format!(
                    "<html><body><pre>{}</pre></body></html>",
                    escape_html(&response.body_string())
                )
            }
        } else if let Some(page) = state.pages.get(target.as_str()) {
            page.clone()
        } else {
            let mut bare = target.clone();
            bare.set_query(None);
            bare.set_fragment(None);
            state
                .pages
                .get(bare.as_str())
                .cloned()
                .ok_or_else(|| ProbeError::NavigationError {
                    url: target.to_string(),
                    message: "no page registered for this URL".into(),
                })?
        };

        tracing::debug!(url = %target, "static document loaded");
        state.document = Some(LoadedDocument {
            url: target.to_string(),
            source,
            overrides: HashMap::new(),
        });
        Ok(())
    }
}

fn loaded(state: &DriverState) -> ProbeResult<&LoadedDocument> {
    state.document.as_ref().ok_or_else(|| ProbeError::PageError {
        message: "no document loaded".into(),
    })
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn parse_selector(css: &str) -> ProbeResult<Selector> {
    Selector::parse(css).map_err(|e| ProbeError::SelectorError {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// One parse of the loaded document plus its overrides
struct Dom<'d> {
    html: Html,
    doc: &'d LoadedDocument,
}

impl<'d> Dom<'d> {
    fn parse(doc: &'d LoadedDocument) -> Self {
        Self {
            html: Html::parse_document(&doc.source),
            doc,
        }
    }

    fn ordinal(&self, el: ElementRef<'_>) -> Option<usize> {
        self.html
            .root_element()
            .descendants()
            .filter(|n| n.value().is_element())
            .position(|n| n.id() == el.id())
    }

    fn override_for(&self, el: ElementRef<'_>) -> Option<&'d ElementOverride> {
        if self.doc.overrides.is_empty() {
            return None;
        }
        self.ordinal(el).and_then(|i| self.doc.overrides.get(&i))
    }

    fn resolve<'a>(
        &'a self,
        scope: Option<ElementRef<'a>>,
        query: &Query,
    ) -> ProbeResult<Vec<ElementRef<'a>>> {
        let mut current: Option<Vec<ElementRef<'a>>> = scope.map(|el| vec![el]);
        for step in &query.steps {
            let selector = parse_selector(&step.css)?;
            let mut matched: Vec<ElementRef<'a>> = match &current {
                None => self.html.select(&selector).collect(),
                Some(parents) => {
                    let parent_ids: HashSet<_> = parents.iter().map(|p| p.id()).collect();
                    self.html
                        .select(&selector)
                        .filter(|el| el.ancestors().any(|a| parent_ids.contains(&a.id())))
                        .collect()
                }
            };
            for op in &step.ops {
                matched = self.apply(matched, op)?;
            }
            current = Some(matched);
        }
        Ok(current.unwrap_or_default())
    }

    fn apply<'a>(
        &'a self,
        matched: Vec<ElementRef<'a>>,
        op: &StepOp,
    ) -> ProbeResult<Vec<ElementRef<'a>>> {
        if let Some(pick) = op.pick_index(matched.len()) {
            return Ok(pick.map(|i| vec![matched[i]]).unwrap_or_default());
        }
        match op {
            StepOp::HasText { text } => Ok(matched
                .into_iter()
                .filter(|el| text_matches(&el.text().collect::<String>(), text))
                .collect()),
            StepOp::Has { query } => {
                let mut kept = Vec::new();
                for el in matched {
                    if !self.resolve(Some(el), query)?.is_empty() {
                        kept.push(el);
                    }
                }
                Ok(kept)
            }
            StepOp::First | StepOp::Last | StepOp::Nth { .. } => Ok(matched),
        }
    }

    fn self_hidden(&self, el: ElementRef<'_>) -> bool {
        let node = el.value();
        if NON_RENDERED_TAGS.contains(&node.name()) {
            return true;
        }
        if let Some(hidden) = self.override_for(el).and_then(|o| o.hidden) {
            return hidden;
        }
        if node.attr("hidden").is_some() {
            return true;
        }
        if node.name() == "input" && node.attr("type") == Some("hidden") {
            return true;
        }
        node.attr("style").is_some_and(|style| {
            let style: String = style
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase();
            style.contains("display:none") || style.contains("visibility:hidden")
        })
    }

    fn is_rendered(&self, el: ElementRef<'_>) -> bool {
        !self.self_hidden(el)
            && el
                .ancestors()
                .filter_map(ElementRef::wrap)
                .all(|a| !self.self_hidden(a))
    }

    fn rendered_text(&self, el: ElementRef<'_>, out: &mut String) {
        for child in el.children() {
            match child.value() {
                Node::Text(text) => out.push_str(text),
                Node::Element(_) => {
                    if let Some(child_el) = ElementRef::wrap(child) {
                        if !self.self_hidden(child_el) {
                            self.rendered_text(child_el, out);
                            if matches!(child_el.value().name(), "br" | "p" | "div" | "li") {
                                out.push(' ');
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn value_of(&self, el: ElementRef<'_>) -> Option<String> {
        let node = el.value();
        match node.name() {
            "input" | "textarea" | "select" => {
                if let Some(value) = self.override_for(el).and_then(|o| o.value.clone()) {
                    return Some(value);
                }
                if node.name() == "textarea" {
                    return Some(el.text().collect());
                }
                Some(node.attr("value").unwrap_or_default().to_string())
            }
            _ => None,
        }
    }

    fn is_checked(&self, el: ElementRef<'_>) -> bool {
        self.override_for(el)
            .and_then(|o| o.checked)
            .unwrap_or_else(|| el.value().attr("checked").is_some())
    }

    fn snapshot(&self, el: ElementRef<'_>) -> ElementSnapshot {
        let node = el.value();
        let mut attributes: HashMap<String, String> = node
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if self.is_checked(el) {
            attributes.insert("checked".into(), String::new());
        } else {
            attributes.remove("checked");
        }
        let mut inner = String::new();
        self.rendered_text(el, &mut inner);
        ElementSnapshot {
            tag: node.name().to_string(),
            visible: self.is_rendered(el),
            text_content: el.text().collect(),
            inner_text: crate::locator::normalize_whitespace(&inner),
            value: self.value_of(el),
            attributes,
        }
    }

    fn first_target(&self, query: &Query, action: &str) -> ProbeResult<ElementRef<'_>> {
        self.resolve(None, query)?
            .into_iter()
            .next()
            .ok_or_else(|| ProbeError::InteractionError {
                action: action.to_string(),
                locator: query.to_string(),
                message: "element is not attached".into(),
            })
    }

    fn base(&self) -> ProbeResult<Url> {
        Ok(Url::parse(&self.doc.url)?)
    }

    fn form_of<'a>(&self, el: ElementRef<'a>) -> Option<ElementRef<'a>> {
        el.ancestors()
            .filter_map(ElementRef::wrap)
            .find(|a| a.value().name() == "form")
    }

    /// GET submission URL for `form`
    fn submission_url(&self, form: ElementRef<'_>) -> ProbeResult<String> {
        let base = self.base()?;
        let mut target = match form.value().attr("action") {
            Some(action) if !action.is_empty() => base.join(action)?,
            _ => base,
        };
        let fields = parse_selector("input[name], textarea[name], select[name]")?;
        let mut pairs = Vec::new();
        for field in form.select(&fields) {
            let node = field.value();
            let kind = node.attr("type").unwrap_or("text");
            if matches!(kind, "submit" | "button" | "image" | "reset") {
                continue;
            }
            if matches!(kind, "checkbox" | "radio") && !self.is_checked(field) {
                continue;
            }
            let name = node.attr("name").unwrap_or_default().to_string();
            pairs.push((name, self.value_of(field).unwrap_or_default()));
        }
        target.set_query(None);
        target.set_fragment(None);
        if !pairs.is_empty() {
            let mut query = target.query_pairs_mut();
            for (name, value) in &pairs {
                query.append_pair(name, value);
            }
        }
        Ok(target.to_string())
    }
}

/// What a click or key press did to the document
enum Effect {
    None,
    Navigate(String),
    Override(usize, ElementOverride),
}

fn click_effect(dom: &Dom<'_>, query: &Query) -> ProbeResult<Effect> {
    let el = dom.first_target(query, "click")?;
    let node = el.value();

    if let Some(controls) = node.attr("aria-controls") {
        let target = parse_selector(&format!(
            "[id=\"{}\"]",
            crate::locator::escape_css_string(controls)
        ))?;
        if let Some(controlled) = dom.html.select(&target).next() {
            if let Some(i) = dom.ordinal(controlled) {
                let mut o = dom.override_for(controlled).cloned().unwrap_or_default();
                o.hidden = Some(false);
                return Ok(Effect::Override(i, o));
            }
        }
        return Ok(Effect::None);
    }

    if node.name() == "input" && matches!(node.attr("type"), Some("checkbox" | "radio")) {
        if let Some(i) = dom.ordinal(el) {
            let mut o = dom.override_for(el).cloned().unwrap_or_default();
            o.checked = Some(!dom.is_checked(el));
            return Ok(Effect::Override(i, o));
        }
        return Ok(Effect::None);
    }

    if let Some(formaction) = node.attr("formaction") {
        return Ok(Effect::Navigate(dom.base()?.join(formaction)?.to_string()));
    }

    let link = std::iter::once(el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .find(|a| a.value().name() == "a" && a.value().attr("href").is_some());
    if let Some(href) = link.and_then(|a| a.value().attr("href")) {
        return Ok(Effect::Navigate(dom.base()?.join(href)?.to_string()));
    }

    let submits = match node.name() {
        "button" => !matches!(node.attr("type"), Some("button" | "reset")),
        "input" => matches!(node.attr("type"), Some("submit" | "image")),
        _ => false,
    };
    if submits {
        if let Some(form) = dom.form_of(el) {
            return Ok(Effect::Navigate(dom.submission_url(form)?));
        }
    }

    let anchors = parse_selector("a[href]")?;
    if let Some(href) = el.select(&anchors).next().and_then(|a| a.value().attr("href")) {
        return Ok(Effect::Navigate(dom.base()?.join(href)?.to_string()));
    }

    Ok(Effect::None)
}

fn dismiss_effects(dom: &Dom<'_>, key: &str) -> ProbeResult<Vec<(usize, ElementOverride)>> {
    let dismissable = parse_selector("[data-dismiss-key]")?;
    let mut effects = Vec::new();
    for el in dom.html.select(&dismissable) {
        let matches_key = el
            .value()
            .attr("data-dismiss-key")
            .is_some_and(|k| k.eq_ignore_ascii_case(key));
        if matches_key && dom.is_rendered(el) {
            if let Some(i) = dom.ordinal(el) {
                let mut o = dom.override_for(el).cloned().unwrap_or_default();
                o.hidden = Some(true);
                effects.push((i, o));
            }
        }
    }
    Ok(effects)
}

fn apply_effect(driver: &StaticDriver, state: &mut DriverState, effect: Effect) -> ProbeResult<()> {
    match effect {
        Effect::None => Ok(()),
        Effect::Navigate(url) => driver.navigate(state, &url),
        Effect::Override(i, o) => {
            if let Some(doc) = state.document.as_mut() {
                doc.overrides.insert(i, o);
            }
            Ok(())
        }
    }
}

fn apply_dismissals(state: &mut DriverState, key: &str) -> ProbeResult<()> {
    let effects = {
        let doc = loaded(state)?;
        dismiss_effects(&Dom::parse(doc), key)?
    };
    if let Some(doc) = state.document.as_mut() {
        doc.overrides.extend(effects);
    }
    Ok(())
}

#[async_trait]
impl Driver for StaticDriver {
    async fn goto(&self, url: &str) -> ProbeResult<()> {
        let mut state = self.lock()?;
        self.navigate(&mut state, url)
    }

    async fn current_url(&self) -> ProbeResult<String> {
        let state = self.lock()?;
        Ok(state
            .document
            .as_ref()
            .map_or_else(|| "about:blank".to_string(), |d| d.url.clone()))
    }

    async fn query(&self, query: &Query) -> ProbeResult<Vec<ElementSnapshot>> {
        let state = self.lock()?;
        let Some(doc) = state.document.as_ref() else {
            return Ok(Vec::new());
        };
        let dom = Dom::parse(doc);
        let snapshots = dom
            .resolve(None, query)?
            .into_iter()
            .map(|el| dom.snapshot(el))
            .collect();
        Ok(snapshots)
    }

    async fn click(&self, query: &Query) -> ProbeResult<()> {
        let mut state = self.lock()?;
        state.call_history.push(format!("click:{query}"));
        let effect = {
            let doc = loaded(&state)?;
            click_effect(&Dom::parse(doc), query)?
        };
        apply_effect(self, &mut state, effect)
    }

    async fn fill(&self, query: &Query, value: &str) -> ProbeResult<()> {
        let mut state = self.lock()?;
        state.call_history.push(format!("fill:{query}={value}"));
        let (index, mut o) = {
            let doc = loaded(&state)?;
            let dom = Dom::parse(doc);
            let el = dom.first_target(query, "fill")?;
            if !matches!(el.value().name(), "input" | "textarea") {
                return Err(ProbeError::InteractionError {
                    action: "fill".into(),
                    locator: query.to_string(),
                    message: format!("<{}> is not editable", el.value().name()),
                });
            }
            let index = dom.ordinal(el).ok_or_else(|| ProbeError::PageError {
                message: "element outside document root".into(),
            })?;
            (index, dom.override_for(el).cloned().unwrap_or_default())
        };
        o.value = Some(value.to_string());
        if let Some(doc) = state.document.as_mut() {
            doc.overrides.insert(index, o);
        }
        Ok(())
    }

    async fn press(&self, query: &Query, key: &str) -> ProbeResult<()> {
        let mut state = self.lock()?;
        state.call_history.push(format!("key:{key}"));
        let submission = {
            let doc = loaded(&state)?;
            let dom = Dom::parse(doc);
            let el = dom.first_target(query, "press")?;
            if key == "Enter" && matches!(el.value().name(), "input") {
                dom.form_of(el)
                    .map(|form| dom.submission_url(form))
                    .transpose()?
            } else {
                None
            }
        };
        match submission {
            Some(url) => self.navigate(&mut state, &url),
            None => apply_dismissals(&mut state, key),
        }
    }

    async fn keyboard_press(&self, key: &str) -> ProbeResult<()> {
        let mut state = self.lock()?;
        state.call_history.push(format!("key:{key}"));
        if state.document.is_none() {
            return Ok(());
        }
        apply_dismissals(&mut state, key)
    }

    async fn route(&self, route: Route) -> ProbeResult<()> {
        let mut state = self.lock()?;
        state.call_history.push(format!("route:{:?}", route.pattern));
        state.routes.add(route);
        Ok(())
    }
}
