//! Result lines written to standard output.

use crate::distance::{LeafDistance, LeafDistanceStats};
use std::fmt;

/// Summary of one successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceReport {
    pub label: String,
    pub median_length: f64,
    pub mean: f64,
    pub adjusted_mean: f64,
    pub adjusted_mean_per_site100: f64,
    /// Number of leaves in the tree
    pub effective_n: usize,
    /// Number of input sequences before duplicate deletion
    pub nominal_taxa: usize,
}

impl DistanceReport {
    pub fn new(label: &str, median_length: f64, stats: &LeafDistanceStats, nominal_taxa: usize) -> Self {
        Self {
            label: label.to_string(),
            median_length,
            mean: stats.mean,
            adjusted_mean: stats.adjusted_mean,
            adjusted_mean_per_site100: stats.adjusted_mean_per_site100,
            effective_n: stats.effective_n,
            nominal_taxa,
        }
    }
}

impl fmt::Display for DistanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\tMedLen {:.2}\tMean {}\tAdjmean {}\tAdj_mean_per_site100 {:.5}\tN {}\tNTaxa {}",
            self.label,
            self.median_length,
            format_general(self.mean, 5),
            format_general(self.adjusted_mean, 5),
            self.adjusted_mean_per_site100,
            self.effective_n,
            self.nominal_taxa
        )
    }
}

/// Per-sequence line of the per-sequence statistic mode.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDistance {
    pub label: String,
    pub identifier: String,
    pub value: f64,
    pub copies: usize,
}

impl SequenceDistance {
    pub fn new(label: &str, leaf: &LeafDistance) -> Self {
        Self {
            label: label.to_string(),
            identifier: leaf.label.clone(),
            value: leaf.value,
            copies: leaf.multiplicity,
        }
    }
}

impl fmt::Display for SequenceDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\tMean {}\tCopies {}",
            self.label,
            self.identifier,
            format_general(self.value, 5),
            self.copies
        )
    }
}

/// Formats `value` like C's `%.<precision>g`.
///
/// Uses fixed notation when the decimal exponent is in `-4..precision`,
/// scientific notation otherwise; trailing zeros are removed either way.
pub fn format_general(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    // Exponent after rounding to `precision` significant digits
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => (scientific.clone(), 0),
    };

    if exponent >= -4 && exponent < precision as i32 {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}"))
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(&mantissa), exponent.abs())
    }
}

fn trim_fraction(number: &str) -> String {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        number.to_string()
    }
}
