use crate::analysis::{
    aggregate_at, estimate_at, summarize, sweep, EstimatorOptions, GridSweep,
    OccupancyFrequencies, RichnessEstimate,
};
use crate::error::RichnessError;
use crate::models::{AggregatedAbundance, Inventory, PlotCoord};

/// Unified analysis API over one sampled inventory and one estimator policy.
pub struct Analyzer<'a> {
    inventory: &'a Inventory,
    options: EstimatorOptions,
    coords: Vec<PlotCoord>,
}

impl<'a> Analyzer<'a> {
    /// Create a new Analyzer for the given inventory.
    pub fn new(inventory: &'a Inventory, options: EstimatorOptions) -> Self {
        Self {
            inventory,
            options,
            coords: inventory.plot_coords(),
        }
    }

    pub fn options(&self) -> &EstimatorOptions {
        &self.options
    }

    /// Per-cell summed abundances at `grid_size`.
    pub fn aggregate(&self, grid_size: f64) -> Result<AggregatedAbundance, RichnessError> {
        aggregate_at(
            &self.inventory.table,
            &self.coords,
            self.inventory.extent,
            grid_size,
        )
    }

    /// Incidence frequencies at `grid_size`.
    pub fn occupancy(&self, grid_size: f64) -> Result<OccupancyFrequencies, RichnessError> {
        Ok(summarize(&self.aggregate(grid_size)?))
    }

    /// Chao2 richness at `grid_size`.
    pub fn estimate(&self, grid_size: f64) -> Result<RichnessEstimate, RichnessError> {
        let (_, _, estimate) = estimate_at(
            &self.inventory.table,
            &self.coords,
            self.inventory.extent,
            grid_size,
            &self.options,
        )?;
        Ok(estimate)
    }

    /// Chao2 richness at `base_grid_size / 2^i` for `i = 1..=levels`.
    pub fn sweep(&self, base_grid_size: f64, levels: u32) -> Result<GridSweep, RichnessError> {
        sweep(
            &self.inventory.table,
            &self.coords,
            self.inventory.extent,
            base_grid_size,
            levels,
            &self.options,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{build_abundance_table, SingletonFormula};
    use crate::models::{Community, PlotWindow, Point, Window};

    fn sample_inventory() -> Inventory {
        let window = Window::square(40.0, "m").unwrap();
        let community = Community::new(
            window.clone(),
            vec![
                Point::new(2.0, 2.0, "a"),
                Point::new(3.0, 2.0, "b"),
                Point::new(22.0, 2.0, "a"),
                Point::new(22.0, 22.0, "c"),
                Point::new(2.0, 22.0, "a"),
            ],
        )
        .unwrap();
        let plots = vec![
            PlotWindow::clamped(1, 1.0, 1.0, 5.0, &window).unwrap(),
            PlotWindow::clamped(2, 21.0, 1.0, 5.0, &window).unwrap(),
            PlotWindow::clamped(3, 21.0, 21.0, 5.0, &window).unwrap(),
            PlotWindow::clamped(4, 1.0, 21.0, 5.0, &window).unwrap(),
        ];
        let table = build_abundance_table(&community, &plots);
        Inventory::new("Analyzer Test", window.extent(), 3, plots, table)
    }

    #[test]
    fn test_aggregate_four_quadrants() {
        let inv = sample_inventory();
        let analyzer = Analyzer::new(&inv, EstimatorOptions::default());
        assert_eq!(analyzer.aggregate(20.0).unwrap().num_cells(), 4);
        assert_eq!(analyzer.aggregate(40.0).unwrap().num_cells(), 1);
    }

    #[test]
    fn test_occupancy_matches_layout() {
        let inv = sample_inventory();
        let analyzer = Analyzer::new(&inv, EstimatorOptions::default());
        let occ = analyzer.occupancy(20.0).unwrap();
        // a in 3 cells, b and c in one each
        assert_eq!(occ.n, 4);
        assert_eq!(occ.s_obs, 3);
        assert_eq!(occ.f1(), 2);
        assert_eq!(occ.f3(), 1);
    }

    #[test]
    fn test_estimate_matches_chao2() {
        let inv = sample_inventory();
        let analyzer = Analyzer::new(&inv, EstimatorOptions::default());
        let est = analyzer.estimate(20.0).unwrap();
        // f2 = 0: 3 + 3/4 * 2 * 1 / 2
        assert!((est.richness - 3.75).abs() < 1e-12);
    }

    #[test]
    fn test_sweep_matches_standalone() {
        let inv = sample_inventory();
        let options = EstimatorOptions {
            turing_f1: false,
            formula: SingletonFormula::Cazzola2022,
        };
        let analyzer = Analyzer::new(&inv, options);
        let from_analyzer = analyzer.sweep(40.0, 3).unwrap();
        let from_standalone = sweep(
            &inv.table,
            &inv.plot_coords(),
            inv.extent,
            40.0,
            3,
            &options,
        )
        .unwrap();
        assert_eq!(from_analyzer, from_standalone);
        assert_eq!(analyzer.options().formula, SingletonFormula::Cazzola2022);
    }

    #[test]
    fn test_invalid_grid_size() {
        let inv = sample_inventory();
        let analyzer = Analyzer::new(&inv, EstimatorOptions::default());
        assert!(analyzer.estimate(0.0).is_err());
    }
}
