//! Statistics Calculator Module
//! Grouped means, denial rates, threshold splits and Pearson correlation.

use crate::data::ClaimRecord;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Insurance types compared in the denial-rate analysis.
pub const DEFAULT_INSURANCE_TYPES: [&str; 2] = ["Commercial", "Medicare"];

/// Billed amount that splits claims into high and low buckets.
pub const DEFAULT_BILLED_THRESHOLD: f64 = 200.0;

/// Percentage of flagged rows on each side of a threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSplit {
    pub threshold: f64,
    /// Percentage flagged among rows with `value > threshold`. NaN when empty.
    pub above: f64,
    pub above_count: usize,
    /// Percentage flagged among rows with `value <= threshold`. NaN when empty.
    pub at_or_below: f64,
    pub at_or_below_count: usize,
}

/// Running sum and count for one group.
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Handles the aggregate computations over typed records.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Mean of `value` per distinct `key`, in key order.
    ///
    /// One pass accumulates sum and count per key; a second pass turns them
    /// into means. Keys that never occur have no entry.
    pub fn mean_by_group<T, K, FK, FV>(records: &[T], key: FK, value: FV) -> BTreeMap<K, f64>
    where
        K: Ord,
        FK: Fn(&T) -> K,
        FV: Fn(&T) -> f64,
    {
        let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
        for record in records {
            groups.entry(key(record)).or_default().push(value(record));
        }

        groups
            .into_iter()
            .filter_map(|(k, acc)| acc.mean().map(|m| (k, m)))
            .collect()
    }

    /// Percentage of denied claims per insurance type.
    ///
    /// Only types listed in `allowed_types` are counted. A type that occurs
    /// with no denials maps to 0.0; a type that never occurs has no entry.
    pub fn denial_rate_by_type<S: AsRef<str>>(
        records: &[ClaimRecord],
        allowed_types: &[S],
    ) -> BTreeMap<String, f64> {
        let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for claim in records {
            let itype = claim.insurance_type.as_str();
            if !allowed_types.iter().any(|t| t.as_ref() == itype) {
                continue;
            }
            let entry = counts.entry(itype).or_default();
            entry.0 += 1;
            if claim.is_denied() {
                entry.1 += 1;
            }
        }

        counts
            .into_iter()
            .map(|(itype, (total, denied))| {
                (itype.to_string(), 100.0 * denied as f64 / total as f64)
            })
            .collect()
    }

    /// Pearson correlation coefficient of two equally long samples.
    ///
    /// NaN when there are fewer than two pairs, the lengths differ, or
    /// either sample has zero variance. The coefficient is symmetric in its
    /// arguments.
    pub fn correlation(xs: &[f64], ys: &[f64]) -> f64 {
        if xs.len() != ys.len() || xs.len() < 2 {
            return f64::NAN;
        }

        let sd_x = xs.std_dev();
        let sd_y = ys.std_dev();
        if !(sd_x > 0.0 && sd_y > 0.0) {
            return f64::NAN;
        }

        xs.covariance(ys) / (sd_x * sd_y)
    }

    /// Correlation between a 0/1 flag and a numeric field across all rows.
    pub fn flag_correlation<T, FB, FV>(records: &[T], flag: FB, value: FV) -> f64
    where
        FB: Fn(&T) -> bool,
        FV: Fn(&T) -> f64,
    {
        let flags: Vec<f64> = records
            .iter()
            .map(|r| if flag(r) { 1.0 } else { 0.0 })
            .collect();
        let values: Vec<f64> = records.iter().map(value).collect();
        Self::correlation(&flags, &values)
    }

    /// Percentage of rows with `flag` set on each side of `threshold`.
    ///
    /// Every row lands in exactly one bucket: `value > threshold` or
    /// `value <= threshold`.
    pub fn threshold_split_rate<T, FV, FB>(
        records: &[T],
        value: FV,
        threshold: f64,
        flag: FB,
    ) -> ThresholdSplit
    where
        FV: Fn(&T) -> f64,
        FB: Fn(&T) -> bool,
    {
        let mut above = Accumulator::default();
        let mut at_or_below = Accumulator::default();

        for record in records {
            let hit = if flag(record) { 1.0 } else { 0.0 };
            if value(record) > threshold {
                above.push(hit);
            } else {
                at_or_below.push(hit);
            }
        }

        let pct = |acc: &Accumulator| acc.mean().map_or(f64::NAN, |m| m * 100.0);
        ThresholdSplit {
            threshold,
            above: pct(&above),
            above_count: above.count,
            at_or_below: pct(&at_or_below),
            at_or_below_count: at_or_below.count,
        }
    }

    /// Group with the largest value.
    ///
    /// Ties keep the first group in iteration order; NaN never wins.
    pub fn highest<'a, K, I>(groups: I) -> Option<(&'a K, f64)>
    where
        K: 'a,
        I: IntoIterator<Item = (&'a K, &'a f64)>,
    {
        let mut best: Option<(&K, f64)> = None;
        for (key, &value) in groups {
            if value.is_nan() {
                continue;
            }
            match best {
                Some((_, current)) if value <= current => {}
                _ => best = Some((key, value)),
            }
        }
        best
    }

    /// Groups ordered by ascending value; equal values keep key order.
    pub fn sorted_by_value<K: Clone>(groups: &BTreeMap<K, f64>) -> Vec<(K, f64)> {
        let mut sorted: Vec<(K, f64)> = groups.iter().map(|(k, v)| (k.clone(), *v)).collect();
        sorted.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }
}
