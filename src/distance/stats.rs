use crate::distance::DistanceMatrix;
use crate::sequence::length::median_f64;
use std::collections::HashMap;

/// How the distances of one leaf to all others are aggregated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Aggregation {
    #[default]
    Mean,
    Median,
}

impl Aggregation {
    fn apply(&self, values: &[f64]) -> f64 {
        match self {
            Aggregation::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Aggregation::Median => median_f64(values).unwrap_or(f64::NAN),
        }
    }
}

/// Aggregate distance of one leaf to all other leaves.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafDistance {
    pub label: String,
    pub value: f64,
    /// Number of input sequences the leaf stands for
    pub multiplicity: usize,
}

/// Summary statistics of a [DistanceMatrix].
#[derive(Debug, Clone, PartialEq)]
pub struct LeafDistanceStats {
    /// Per-leaf aggregates in matrix order
    pub leaves: Vec<LeafDistance>,
    /// Mean of the per-leaf aggregates
    pub mean: f64,
    /// Like `mean`, but over all input sequences: each leaf is repeated by
    /// its multiplicity, copies being at distance 0 from each other
    pub adjusted_mean: f64,
    /// `adjusted_mean` divided by the median sequence length, times 100
    pub adjusted_mean_per_site100: f64,
    /// Number of leaves
    pub effective_n: usize,
}

impl LeafDistanceStats {
    /// Computes the statistics of `matrix`.
    ///
    /// # Arguments
    /// * `multiplicities` - input sequences per leaf label; absent labels count once
    /// * `aggregation` - how one leaf's distances to the others are combined
    /// * `median_length` - median sequence length used for the per-site value
    ///
    /// # Returns
    /// `None` if the matrix has fewer than two leaves.
    pub fn compute(
        matrix: &DistanceMatrix,
        multiplicities: &HashMap<String, usize>,
        aggregation: Aggregation,
        median_length: f64,
    ) -> Option<Self> {
        let n = matrix.len();
        if n < 2 {
            return None;
        }

        let counts: Vec<usize> = matrix
            .labels()
            .iter()
            .map(|label| multiplicities.get(label).copied().unwrap_or(1).max(1))
            .collect();
        let total: usize = counts.iter().sum();

        let mut leaves = Vec::with_capacity(n);
        let mut adjusted_sum = 0.0;
        let mut others = Vec::with_capacity(total);

        for i in 0..n {
            others.clear();
            others.extend((0..n).filter(|&j| j != i).map(|j| matrix.get(i, j)));
            let value = aggregation.apply(&others);

            // Copies of leaf i see the other copies at 0 and every other
            // leaf j as many times as j is multiplied
            if total > 1 {
                others.clear();
                others.extend(std::iter::repeat_n(0.0, counts[i] - 1));
                for j in (0..n).filter(|&j| j != i) {
                    others.extend(std::iter::repeat_n(matrix.get(i, j), counts[j]));
                }
                adjusted_sum += counts[i] as f64 * aggregation.apply(&others);
            }

            leaves.push(LeafDistance {
                label: matrix.labels()[i].clone(),
                value,
                multiplicity: counts[i],
            });
        }

        let mean = leaves.iter().map(|leaf| leaf.value).sum::<f64>() / n as f64;
        let adjusted_mean = adjusted_sum / total as f64;
        let adjusted_mean_per_site100 = if median_length > 0.0 {
            adjusted_mean / median_length * 100.0
        } else {
            f64::NAN
        };

        log::debug!(
            "Distances of {n} leaves ({total} sequences): mean {mean}, adjusted {adjusted_mean}"
        );

        Some(Self {
            leaves,
            mean,
            adjusted_mean,
            adjusted_mean_per_site100,
            effective_n: n,
        })
    }
}
