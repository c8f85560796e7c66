use serde::{Deserialize, Serialize};

use crate::models::AggregatedAbundance;

/// Incidence frequency counts over the populated cells of one grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyFrequencies {
    /// Number of populated cells (sampling units)
    pub n: usize,
    /// Species occurring in at least one cell
    pub s_obs: usize,
    /// `frequencies[k]` = species occurring in exactly `k` cells, `k = 0..=n`
    pub frequencies: Vec<usize>,
}

impl OccupancyFrequencies {
    /// Species occurring in exactly `k` cells; zero when `k > n`.
    pub fn f(&self, k: usize) -> usize {
        self.frequencies.get(k).copied().unwrap_or(0)
    }

    pub fn f1(&self) -> usize {
        self.f(1)
    }

    pub fn f2(&self) -> usize {
        self.f(2)
    }

    pub fn f3(&self) -> usize {
        self.f(3)
    }

    pub fn f4(&self) -> usize {
        self.f(4)
    }
}

/// Reduce per-cell abundances to incidence frequencies.
pub fn summarize(aggregated: &AggregatedAbundance) -> OccupancyFrequencies {
    let n = aggregated.num_cells();
    let mut frequencies = vec![0usize; n + 1];
    for occ in aggregated.occurrences() {
        frequencies[occ] += 1;
    }
    let s_obs = frequencies.iter().skip(1).sum();
    OccupancyFrequencies {
        n,
        s_obs,
        frequencies,
    }
}
