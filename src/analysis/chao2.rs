use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{estimate_singletons, OccupancyFrequencies, SingletonFormula};

/// Bias-corrected incidence richness estimate (Chao2).
///
/// `n` is the number of sampling units, `s_obs` the observed richness, `f1`
/// the singleton count (observed or estimated) and `f2` the doubleton count.
/// Branches exactly on `f2 > 0`. Returns NaN when `n == 0`; a NaN `f1`
/// propagates.
///
/// # Examples
///
/// ```
/// use richness_aggregation::analysis::chao2;
///
/// let richness = chao2(10, 5, 2.0, 1);
/// assert!((richness - 6.8).abs() < 1e-12);
/// ```
pub fn chao2(n: usize, s_obs: usize, f1: f64, f2: usize) -> f64 {
    if n == 0 {
        return f64::NAN;
    }
    let scale = (n as f64 - 1.0) / n as f64;
    let s_obs = s_obs as f64;
    if f2 > 0 {
        s_obs + scale * f1.powi(2) / (2.0 * f2 as f64)
    } else {
        s_obs + scale * f1 * (f1 - 1.0) / 2.0
    }
}

/// Caller policy for the singleton count fed into Chao2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EstimatorOptions {
    /// Replace the observed f1 with the Turing estimate
    pub turing_f1: bool,
    pub formula: SingletonFormula,
}

/// A Chao2 estimate together with the frequencies that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichnessEstimate {
    pub grid_size: f64,
    pub n: usize,
    pub s_obs: usize,
    /// Observed singletons
    pub f1_observed: usize,
    /// Singleton count used in Chao2
    pub f1_used: f64,
    pub f2: usize,
    pub f3: usize,
    pub f4: usize,
    /// Turing estimate of the singletons; `None` without populated cells
    pub singleton_estimate: Option<f64>,
    pub richness: f64,
}

impl RichnessEstimate {
    /// Estimate richness from the occupancy frequencies of one grid.
    pub fn from_occupancy(
        grid_size: f64,
        occ: &OccupancyFrequencies,
        options: &EstimatorOptions,
    ) -> Self {
        let singleton_estimate = (occ.n > 0)
            .then(|| estimate_singletons(occ.n, occ.f2(), occ.f3(), occ.f4(), options.formula));

        let f1_used = match (options.turing_f1, singleton_estimate) {
            (true, Some(est)) => est,
            (true, None) => f64::NAN,
            (false, _) => occ.f1() as f64,
        };
        let richness = chao2(occ.n, occ.s_obs, f1_used, occ.f2());
        if !richness.is_finite() {
            warn!(
                grid_size,
                n = occ.n,
                f1 = f1_used,
                "richness estimate is not finite"
            );
        }

        Self {
            grid_size,
            n: occ.n,
            s_obs: occ.s_obs,
            f1_observed: occ.f1(),
            f1_used,
            f2: occ.f2(),
            f3: occ.f3(),
            f4: occ.f4(),
            singleton_estimate,
            richness,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.richness.is_finite()
    }
}
