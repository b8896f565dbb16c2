//! Orders instruments by their deviation from the daily MA20.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_utils::percent_change;

/// An instrument's place in today's ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub code: String,
    pub deviation_pct: Decimal,
    /// 1 = furthest above its average
    pub rank: u32,
}

/// Signed distance of `close` from `ma20`, in percent.
///
/// A zero average yields zero rather than a division error; `None` when the
/// distance overflows a `Decimal`.
pub fn deviation_pct(close: Decimal, ma20: Decimal) -> Option<Decimal> {
    percent_change(close, ma20)
}

/// Rank instruments by deviation, highest first.
///
/// Entries without a deviation (no defined daily MA20) are left out, so the
/// ranks are a dense 1..=N over the remaining instruments. Exact ties fall back
/// to ascending code.
pub fn rank_by_deviation<'a, I>(entries: I) -> Vec<RankedEntry>
where
    I: IntoIterator<Item = (&'a str, Option<Decimal>)>,
{
    let mut ranked: Vec<(&str, Decimal)> = entries
        .into_iter()
        .filter_map(|(code, deviation)| deviation.map(|d| (code, d)))
        .collect();

    ranked.sort_by(|(code_a, dev_a), (code_b, dev_b)| match dev_b.cmp(dev_a) {
        Ordering::Equal => code_a.cmp(code_b),
        other => other,
    });

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, (code, deviation_pct))| RankedEntry {
            code: code.to_string(),
            deviation_pct,
            rank: i as u32 + 1,
        })
        .collect()
}
