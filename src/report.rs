// Aggregation Engine - per-month sums and summary statistics
//
// Pure reduction over already-fetched sale rows. Nothing in here does
// I/O, fails, or mutates its inputs; empty inputs produce a zeroed
// report, never an error.

use serde::{Deserialize, Serialize};

use crate::entities::Sale;
use crate::scope::BrandScope;

/// Default reporting window: the first four months of the year.
pub const DEFAULT_MONTH_WINDOW: [u8; 4] = [1, 2, 3, 4];

/// Display-ready sales statistics for one scope and window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    /// Sum of values per window month, positionally aligned with the
    /// window passed to `aggregate`.
    pub per_month: Vec<f64>,

    /// Sum over ALL scope-filtered sales, windowed months or not. The
    /// summary statistics intentionally cover the full filtered set while
    /// `per_month` only covers the requested window.
    pub total: f64,

    /// `total` divided by the number of filtered sale rows; 0 when there
    /// are none.
    pub average: f64,

    /// Largest single sale value in the filtered set; 0 when empty.
    pub max: f64,

    /// Smallest single sale value in the filtered set; 0 when empty.
    pub min: f64,
}

impl SalesReport {
    /// Zeroed report for a window of the given length.
    pub fn empty(window_len: usize) -> Self {
        SalesReport {
            per_month: vec![0.0; window_len],
            total: 0.0,
            average: 0.0,
            max: 0.0,
            min: 0.0,
        }
    }
}

/// Reduce sale rows to a report for the given scope and month window.
///
/// Rows are kept when their normalized brand id is inside `scope` (all
/// rows when the scope is `Unfiltered`). Duplicate rows for the same
/// brand/month/year are summed, not collapsed. `per_month[i]` is the sum
/// for `month_window[i]`; the summary statistics cover every kept row
/// regardless of window membership.
pub fn aggregate(sales: &[Sale], scope: &BrandScope, month_window: &[u8]) -> SalesReport {
    let filtered: Vec<&Sale> = sales
        .iter()
        .filter(|sale| scope.contains(sale.brand_key()))
        .collect();

    if filtered.is_empty() {
        return SalesReport::empty(month_window.len());
    }

    let per_month = month_window
        .iter()
        .map(|&month| {
            filtered
                .iter()
                .filter(|sale| sale.month == month)
                .map(|sale| sale.value)
                .sum()
        })
        .collect();

    let total: f64 = filtered.iter().map(|sale| sale.value).sum();
    let average = total / filtered.len() as f64;
    let max = filtered.iter().map(|sale| sale.value).fold(f64::MIN, f64::max);
    let min = filtered.iter().map(|sale| sale.value).fold(f64::MAX, f64::min);

    SalesReport {
        per_month,
        total,
        average,
        max,
        min,
    }
}

/// Parse a comma-separated months parameter (e.g. `"1,2,3,4"`).
///
/// Empty or missing input falls back to the default window. Entries that
/// are not months in 1..=12 are dropped rather than rejected, matching
/// the forgiving query-parameter handling of the API layer.
pub fn parse_month_window(raw: Option<&str>) -> Vec<u8> {
    let Some(raw) = raw else {
        return DEFAULT_MONTH_WINDOW.to_vec();
    };

    let months: Vec<u8> = raw
        .split(',')
        .filter_map(|part| part.trim().parse::<u8>().ok())
        .filter(|month| (1..=12).contains(month))
        .collect();

    if months.is_empty() {
        DEFAULT_MONTH_WINDOW.to_vec()
    } else {
        months
    }
}
