use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::debug;

use crate::error::RichnessError;
use crate::models::{AbundanceTable, AggregatedAbundance, Extent, PlotCoord};

use super::{aggregate_at, summarize, EstimatorOptions, OccupancyFrequencies, RichnessEstimate};

/// Aggregate at one grid size, summarize, and estimate richness.
pub fn estimate_at(
    table: &AbundanceTable,
    coords: &[PlotCoord],
    extent: Extent,
    grid_size: f64,
    options: &EstimatorOptions,
) -> Result<(AggregatedAbundance, OccupancyFrequencies, RichnessEstimate), RichnessError> {
    let aggregated = aggregate_at(table, coords, extent, grid_size)?;
    let occupancy = summarize(&aggregated);
    let estimate = RichnessEstimate::from_occupancy(grid_size, &occupancy, options);
    Ok((aggregated, occupancy, estimate))
}

/// One resolution level of a grid sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Halving level, starting at 1
    pub level: u32,
    pub grid_size: f64,
    pub excluded_plots: usize,
    pub estimate: RichnessEstimate,
}

/// Richness estimates over a geometric sequence of grid sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSweep {
    pub base_grid_size: f64,
    pub options: EstimatorOptions,
    /// Points in order of increasing resolution
    pub points: Vec<SweepPoint>,
}

/// Spread of the finite richness values of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub valid: usize,
    pub invalid: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl GridSweep {
    pub fn richness_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.estimate.richness).collect()
    }

    /// Summary statistics over the finite richness values.
    ///
    /// `std_dev` is the sample standard deviation and is NaN with fewer than
    /// two finite values.
    pub fn summary(&self) -> SweepSummary {
        let finite: Vec<f64> = self
            .richness_values()
            .into_iter()
            .filter(|r| r.is_finite())
            .collect();
        let (min, max) = finite
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
                (lo.min(r), hi.max(r))
            });
        SweepSummary {
            valid: finite.len(),
            invalid: self.points.len() - finite.len(),
            mean: finite.iter().mean(),
            std_dev: finite.iter().std_dev(),
            min,
            max,
        }
    }
}

/// Estimate richness at `base_grid_size / 2^i` for `i = 1..=levels`.
///
/// Each level is computed independently from the same inputs, so the result
/// depends only on the arguments.
pub fn sweep(
    table: &AbundanceTable,
    coords: &[PlotCoord],
    extent: Extent,
    base_grid_size: f64,
    levels: u32,
    options: &EstimatorOptions,
) -> Result<GridSweep, RichnessError> {
    let points = (1..=levels)
        .map(|level| {
            let grid_size = base_grid_size / 2f64.powi(level as i32);
            let (aggregated, _, estimate) = estimate_at(table, coords, extent, grid_size, options)?;
            debug!(
                level,
                grid_size,
                n = estimate.n,
                richness = estimate.richness,
                "sweep level"
            );
            Ok(SweepPoint {
                level,
                grid_size,
                excluded_plots: aggregated.excluded.len(),
                estimate,
            })
        })
        .collect::<Result<Vec<_>, RichnessError>>()?;

    Ok(GridSweep {
        base_grid_size,
        options: *options,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AbundanceRow;
    use assert_approx_eq::assert_approx_eq;

    fn extent() -> Extent {
        Extent {
            x_min: 0.0,
            x_max: 64.0,
            y_min: 0.0,
            y_max: 64.0,
        }
    }

    /// Eight plots along the diagonal; species "a" everywhere, "b" in half.
    fn layout() -> (AbundanceTable, Vec<PlotCoord>) {
        let rows = (0..8u32)
            .map(|i| AbundanceRow {
                plot_id: i + 1,
                counts: vec![3, u64::from(i % 2 == 0), u64::from(i == 3)],
            })
            .collect();
        let coords = (0..8u32)
            .map(|i| PlotCoord {
                plot_id: i + 1,
                x: 8.0 * i as f64 + 1.0,
                y: 8.0 * i as f64 + 1.0,
            })
            .collect();
        (
            AbundanceTable {
                species: vec!["a".into(), "b".into(), "c".into()],
                rows,
            },
            coords,
        )
    }

    #[test]
    fn test_sweep_grid_sizes_halve() {
        let (table, coords) = layout();
        let result = sweep(&table, &coords, extent(), 64.0, 4, &EstimatorOptions::default()).unwrap();
        let sizes: Vec<f64> = result.points.iter().map(|p| p.grid_size).collect();
        assert_eq!(sizes, vec![32.0, 16.0, 8.0, 4.0]);
        assert_eq!(result.points[0].level, 1);
        assert_eq!(result.richness_values().len(), 4);
    }

    #[test]
    fn test_sweep_cells_grow_with_resolution() {
        let (table, coords) = layout();
        let result = sweep(&table, &coords, extent(), 64.0, 3, &EstimatorOptions::default()).unwrap();
        let cells: Vec<usize> = result.points.iter().map(|p| p.estimate.n).collect();
        assert_eq!(cells, vec![2, 4, 8]);
    }

    #[test]
    fn test_sweep_matches_single_estimates() {
        let (table, coords) = layout();
        let options = EstimatorOptions::default();
        let result = sweep(&table, &coords, extent(), 64.0, 3, &options).unwrap();
        for point in &result.points {
            let (_, _, est) = estimate_at(&table, &coords, extent(), point.grid_size, &options).unwrap();
            assert_eq!(est, point.estimate);
        }
    }

    #[test]
    fn test_sweep_is_repeatable() {
        let (table, coords) = layout();
        let options = EstimatorOptions::default();
        let first = sweep(&table, &coords, extent(), 64.0, 5, &options).unwrap();
        let second = sweep(&table, &coords, extent(), 64.0, 5, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sweep_zero_levels() {
        let (table, coords) = layout();
        let result = sweep(&table, &coords, extent(), 64.0, 0, &EstimatorOptions::default()).unwrap();
        assert!(result.points.is_empty());
        assert_eq!(result.summary().valid, 0);
    }

    #[test]
    fn test_sweep_rejects_bad_base() {
        let (table, coords) = layout();
        assert!(sweep(&table, &coords, extent(), -1.0, 3, &EstimatorOptions::default()).is_err());
    }

    #[test]
    fn test_summary() {
        let (table, coords) = layout();
        let result = sweep(&table, &coords, extent(), 64.0, 3, &EstimatorOptions::default()).unwrap();
        let summary = result.summary();
        let values = result.richness_values();
        assert_eq!(summary.valid, 3);
        assert_eq!(summary.invalid, 0);
        assert_approx_eq!(summary.mean, values.iter().sum::<f64>() / 3.0, 1e-12);
        assert!(summary.min <= summary.mean && summary.mean <= summary.max);
        assert!(summary.std_dev >= 0.0);
    }
}
