//! Serialisable query chains.
//!
//! A [`Query`] is what a [`Locator`](super::Locator) carries around. Drivers
//! evaluate it against the live document every time it is used:
//!
//! 1. Each [`Step`] selects CSS matches inside the elements produced by the
//!    previous step (the whole document for the first step), in document
//!    order, without duplicates.
//! 2. The step's [`StepOp`]s then narrow that set in order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How an element is first selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// Raw CSS selector
    Css(String),
    /// `[data-testid="..."]`
    TestId(String),
    /// `css[attr*="fragment"]`
    AttrContains {
        /// Base CSS selector
        css: String,
        /// Attribute name
        attr: String,
        /// Substring the attribute must contain
        fragment: String,
    },
}

impl Selector {
    /// CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Test id selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Attribute substring selector
    #[must_use]
    pub fn attr_contains(
        css: impl Into<String>,
        attr: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        Self::AttrContains {
            css: css.into(),
            attr: attr.into(),
            fragment: fragment.into(),
        }
    }

    /// Render as a CSS selector string
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Css(css) => css.clone(),
            Self::TestId(id) => format!("[data-testid=\"{}\"]", escape_css_string(id)),
            Self::AttrContains {
                css,
                attr,
                fragment,
            } => format!("{css}[{attr}*=\"{}\"]", escape_css_string(fragment)),
        }
    }
}

impl From<&str> for Selector {
    fn from(css: &str) -> Self {
        Self::Css(css.to_string())
    }
}

impl From<String> for Selector {
    fn from(css: String) -> Self {
        Self::Css(css)
    }
}

/// Escape a value for a double-quoted CSS string
#[must_use]
pub fn escape_css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Narrowing applied to a step's matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StepOp {
    /// Keep elements whose text contains `text`, case-insensitively,
    /// after collapsing whitespace on both sides
    HasText {
        /// Needle
        text: String,
    },
    /// Keep elements with a descendant matching `query`
    Has {
        /// Nested query, evaluated relative to each element
        query: Query,
    },
    /// Keep only the first element
    First,
    /// Keep only the last element
    Last,
    /// Keep only the element at `index`
    Nth {
        /// Zero-based index
        index: usize,
    },
}

impl StepOp {
    /// Apply a positional pick to a slice length, returning the kept index
    #[must_use]
    pub const fn pick_index(&self, len: usize) -> Option<Option<usize>> {
        match self {
            Self::First => Some(if len > 0 { Some(0) } else { None }),
            Self::Last => Some(if len > 0 { Some(len - 1) } else { None }),
            Self::Nth { index } => Some(if *index < len { Some(*index) } else { None }),
            Self::HasText { .. } | Self::Has { .. } => None,
        }
    }
}

impl fmt::Display for StepOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HasText { text } => write!(f, "has-text={text:?}"),
            Self::Has { query } => write!(f, "has=({query})"),
            Self::First => write!(f, "first"),
            Self::Last => write!(f, "last"),
            Self::Nth { index } => write!(f, "nth={index}"),
        }
    }
}

/// One CSS hop plus its narrowing ops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// CSS selector evaluated inside the previous step's matches
    pub css: String,
    /// Narrowing ops, applied in order
    pub ops: Vec<StepOp>,
}

/// A chain of steps
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Query {
    /// Steps, outermost first
    pub steps: Vec<Step>,
}

impl Query {
    /// Single-step query
    #[must_use]
    pub fn new(selector: impl Into<Selector>) -> Self {
        Self::default().then(selector)
    }

    /// Append a descendant step
    #[must_use]
    pub fn then(mut self, selector: impl Into<Selector>) -> Self {
        self.steps.push(Step {
            css: selector.into().to_css(),
            ops: Vec::new(),
        });
        self
    }

    /// Narrow the last step
    #[must_use]
    pub fn narrow(mut self, op: StepOp) -> Self {
        match self.steps.last_mut() {
            Some(step) => step.ops.push(op),
            None => self.steps.push(Step {
                css: ":root".to_string(),
                ops: vec![op],
            }),
        }
        self
    }

    /// JSON form handed to browser-side resolvers
    #[must_use]
    pub fn to_wire(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{\"steps\":[]}"))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " >> ")?;
            }
            write!(f, "{}", step.css)?;
            for op in &step.ops {
                write!(f, " >> {op}")?;
            }
        }
        Ok(())
    }
}

/// Collapse runs of whitespace and trim; used by text matching on both
/// drivers so `has-text` behaves the same everywhere
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive, whitespace-normalized containment
#[must_use]
pub fn text_matches(haystack: &str, needle: &str) -> bool {
    normalize_whitespace(haystack)
        .to_lowercase()
        .contains(&normalize_whitespace(needle).to_lowercase())
}
