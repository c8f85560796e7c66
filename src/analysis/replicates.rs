use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;
use tracing::info;

use crate::error::RichnessError;
use crate::models::Community;

use super::{
    aggregate, sample_inventory, summarize, EstimatorOptions, Grid, RichnessEstimate,
    SamplingPlan,
};

/// Confidence interval for a replicated quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub mean: f64,
    pub std_error: f64,
    pub lower: f64,
    pub upper: f64,
    pub confidence_level: f64,
    pub sample_size: usize,
}

/// How many replicates to run and how to seed them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplicateSettings {
    pub count: usize,
    /// Replicate `i` is seeded with `seed + i`
    pub seed: u64,
    /// Confidence level of the reported interval (e.g. 0.95)
    pub confidence: f64,
}

/// Result of one resampling trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicateOutcome {
    pub replicate: usize,
    pub seed: u64,
    /// Individuals counted across the replicate's plots
    pub individuals: u64,
    pub excluded_plots: usize,
    pub estimate: RichnessEstimate,
}

/// Aggregate view of a replicate run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicateSummary {
    pub replicates: usize,
    /// Replicates with a finite richness estimate
    pub valid: usize,
    pub invalid: usize,
    /// Species in the community being sampled
    pub true_richness: usize,
    pub richness: ConfidenceInterval,
    /// `richness.mean - true_richness`
    pub bias: f64,
    pub mean_s_obs: f64,
    pub mean_f1_observed: f64,
    /// Mean of the finite Turing singleton estimates
    pub mean_singleton_estimate: f64,
    pub finite_singleton_estimates: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicateReport {
    pub grid_size: f64,
    pub plan: SamplingPlan,
    pub options: EstimatorOptions,
    pub outcomes: Vec<ReplicateOutcome>,
    pub summary: ReplicateSummary,
}

/// Repeat plot sampling and estimation over independent seeded replicates.
///
/// The Turing singleton estimate is only meaningful as an average over many
/// replicates; comparing `mean_singleton_estimate` with `mean_f1_observed`
/// is the intended check, not any individual replicate.
pub fn run_replicates(
    community: &Community,
    plan: &SamplingPlan,
    grid_size: f64,
    options: &EstimatorOptions,
    settings: &ReplicateSettings,
) -> Result<ReplicateReport, RichnessError> {
    plan.validate(&community.window)?;
    if !(settings.confidence > 0.0 && settings.confidence < 1.0) {
        return Err(RichnessError::ValidationError(format!(
            "Confidence level must be in (0, 1), got {}",
            settings.confidence
        )));
    }
    let grid = Grid::new(community.window.extent(), grid_size)?;

    info!(
        replicates = settings.count,
        grid_size,
        plots = plan.plot_count,
        "running replicates"
    );

    let outcomes = (0..settings.count)
        .into_par_iter()
        .map(|replicate| {
            let seed = settings.seed.wrapping_add(replicate as u64);
            let mut rng = StdRng::seed_from_u64(seed);
            let inventory = sample_inventory(
                format!("replicate {replicate}"),
                community,
                plan,
                &mut rng,
            )?;
            let aggregated = aggregate(&inventory.table, &inventory.plot_coords(), &grid);
            let occupancy = summarize(&aggregated);
            Ok(ReplicateOutcome {
                replicate,
                seed,
                individuals: inventory.num_individuals(),
                excluded_plots: aggregated.excluded.len(),
                estimate: RichnessEstimate::from_occupancy(grid_size, &occupancy, options),
            })
        })
        .collect::<Result<Vec<_>, RichnessError>>()?;

    let summary = summarize_outcomes(&outcomes, community.richness(), settings.confidence)?;
    info!(
        valid = summary.valid,
        mean = summary.richness.mean,
        bias = summary.bias,
        "replicates finished"
    );

    Ok(ReplicateReport {
        grid_size,
        plan: *plan,
        options: *options,
        outcomes,
        summary,
    })
}

fn summarize_outcomes(
    outcomes: &[ReplicateOutcome],
    true_richness: usize,
    confidence: f64,
) -> Result<ReplicateSummary, RichnessError> {
    let richness: Vec<f64> = outcomes
        .iter()
        .map(|o| o.estimate.richness)
        .filter(|r| r.is_finite())
        .collect();
    let ci = compute_ci(&richness, confidence)?;

    let singletons: Vec<f64> = outcomes
        .iter()
        .filter_map(|o| o.estimate.singleton_estimate)
        .filter(|f| f.is_finite())
        .collect();

    Ok(ReplicateSummary {
        replicates: outcomes.len(),
        valid: richness.len(),
        invalid: outcomes.len() - richness.len(),
        true_richness,
        bias: ci.mean - true_richness as f64,
        richness: ci,
        mean_s_obs: outcomes.iter().map(|o| o.estimate.s_obs as f64).mean(),
        mean_f1_observed: outcomes
            .iter()
            .map(|o| o.estimate.f1_observed as f64)
            .mean(),
        finite_singleton_estimates: singletons.len(),
        mean_singleton_estimate: singletons.iter().mean(),
    })
}

/// Student-t confidence interval of the mean.
fn compute_ci(values: &[f64], confidence: f64) -> Result<ConfidenceInterval, RichnessError> {
    let n = values.len();
    if n < 2 {
        return Err(RichnessError::InsufficientData(format!(
            "Need at least 2 replicates with a finite estimate, got {n}"
        )));
    }

    let mean = values.iter().mean();
    let std_error = values.iter().std_dev() / (n as f64).sqrt();

    let alpha = 1.0 - confidence;
    let t_dist = StudentsT::new(0.0, 1.0, (n - 1) as f64)
        .map_err(|e| RichnessError::ValidationError(e.to_string()))?;
    let margin = t_dist.inverse_cdf(1.0 - alpha / 2.0) * std_error;

    Ok(ConfidenceInterval {
        mean,
        std_error,
        lower: mean - margin,
        upper: mean + margin,
        confidence_level: confidence,
        sample_size: n,
    })
}
