//! Price text parsing and the checks built on it.
//!
//! Prices are displayed in the es-AR convention: `.` groups thousands and
//! `,` separates decimals (`$ 1.234.567`, `$ 123,45`).

use crate::assertion::Assertion;
use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Results considered by the sort-trend check
pub const SORT_SAMPLE_SIZE: usize = 5;

/// Parse displayed price text.
///
/// Every `.` is dropped, the first `,` becomes the decimal point, and any
/// remaining character that is not a digit or `.` is discarded.
///
/// # Errors
///
/// Returns [`ProbeError::PriceParse`] when no number is left
pub fn parse_price(raw: &str) -> ProbeResult<f64> {
    let without_grouping = raw.replace('.', "");
    let with_decimal_point = without_grouping.replacen(',', ".", 1);
    let cleaned: String = with_decimal_point
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ProbeError::PriceParse {
            raw: raw.to_string(),
        })
}

/// Every price within `[min, max]`; reports the first offender
///
/// # Errors
///
/// Returns an assertion failure naming the index and raw text
pub fn check_price_range(raw_prices: &[String], min: f64, max: f64) -> ProbeResult<()> {
    for (index, raw) in raw_prices.iter().enumerate() {
        Assertion::in_range(parse_price(raw)?, min, max)
            .context(&format!("result {index} priced {raw:?}"))
            .into_result()?;
    }
    Ok(())
}

/// Sort direction for price checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Cheapest first
    Asc,
    /// Most expensive first
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "ascending",
            Self::Desc => "descending",
        })
    }
}

/// Compare only the first and last of the first [`SORT_SAMPLE_SIZE`] prices.
///
/// Interior ordering is not checked: sponsored rows can break strict
/// monotonicity on the live site.
///
/// # Errors
///
/// Returns an assertion failure when there are no prices or the trend is
/// wrong, or a parse error for unreadable text
pub fn check_sort_trend(raw_prices: &[String], order: SortOrder) -> ProbeResult<()> {
    let sample: Vec<f64> = raw_prices
        .iter()
        .take(SORT_SAMPLE_SIZE)
        .map(|raw| parse_price(raw))
        .collect::<ProbeResult<_>>()?;
    let (Some(first), Some(last)) = (sample.first(), sample.last()) else {
        return Err(ProbeError::assertion("no prices to check sort order against"));
    };
    let holds = match order {
        SortOrder::Asc => first <= last,
        SortOrder::Desc => first >= last,
    };
    Assertion::is_true(
        holds,
        &format!("expected {order} prices, first {first} vs last {last} over {sample:?}"),
    )
    .into_result()
}

/// `rendered` is at least as long as `expected` and each rendered title
/// contains the expected one at the same position
///
/// # Errors
///
/// Returns an assertion failure naming the first mismatch
pub fn check_titles(rendered: &[String], expected: &[&str]) -> ProbeResult<()> {
    if rendered.len() < expected.len() {
        return Err(ProbeError::assertion(format!(
            "expected at least {} titles, got {}: {rendered:?}",
            expected.len(),
            rendered.len()
        )));
    }
    for (index, (actual, wanted)) in rendered.iter().zip(expected).enumerate() {
        if !actual.contains(wanted) {
            return Err(ProbeError::assertion(format!(
                "title {index} {actual:?} does not contain {wanted:?}"
            )));
        }
    }
    Ok(())
}
