mod spatial_index;
mod aggregation;
mod occupancy;
mod singleton;
mod chao2;
mod sensitivity;
mod sampling;
mod replicates;
mod analyzer;

pub use spatial_index::SpatialIndex;
pub use aggregation::{aggregate, aggregate_at, build_abundance_table, Grid};
pub use occupancy::{summarize, OccupancyFrequencies};
pub use singleton::{estimate_singletons, SingletonFormula};
pub use chao2::{chao2, EstimatorOptions, RichnessEstimate};
pub use sensitivity::{estimate_at, sweep, GridSweep, SweepPoint, SweepSummary};
pub use sampling::{draw_plots, sample_inventory, SamplingPlan};
pub use replicates::{
    run_replicates, ConfidenceInterval, ReplicateOutcome, ReplicateReport, ReplicateSettings,
    ReplicateSummary,
};
pub use analyzer::Analyzer;
