use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RichnessError;
use crate::models::{Community, Inventory, PlotWindow, Window};

use super::build_abundance_table;

/// How sample plots are laid out over a community.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingPlan {
    /// Side length of each square plot, in window units
    pub plot_side: f64,
    /// Number of plots to draw
    pub plot_count: usize,
}

impl SamplingPlan {
    pub fn validate(&self, window: &Window) -> Result<(), RichnessError> {
        if !self.plot_side.is_finite() || self.plot_side <= 0.0 {
            return Err(RichnessError::ValidationError(format!(
                "Plot side must be positive and finite, got {}",
                self.plot_side
            )));
        }
        if self.plot_side > window.width() || self.plot_side > window.height() {
            return Err(RichnessError::ValidationError(format!(
                "Plot side {} does not fit in a {} x {} window",
                self.plot_side,
                window.width(),
                window.height()
            )));
        }
        if self.plot_count == 0 {
            return Err(RichnessError::ValidationError(
                "Plot count must be at least 1".to_string(),
            ));
        }
        if self.plot_count > u32::MAX as usize {
            return Err(RichnessError::ValidationError(format!(
                "Plot count {} exceeds the plot id range",
                self.plot_count
            )));
        }
        Ok(())
    }
}

/// Draw plots with uniformly random origins, clamped inside the window.
///
/// Plot ids run from 1 to `plan.plot_count`. Plots may overlap.
pub fn draw_plots<R: Rng + ?Sized>(
    window: &Window,
    plan: &SamplingPlan,
    rng: &mut R,
) -> Result<Vec<PlotWindow>, RichnessError> {
    plan.validate(window)?;
    (1..=plan.plot_count as u32)
        .map(|plot_id| {
            let x = rng.gen_range(window.xmin..window.xmax);
            let y = rng.gen_range(window.ymin..window.ymax);
            PlotWindow::clamped(plot_id, x, y, plan.plot_side, window)
        })
        .collect()
}

/// Draw plots over a community and count the species in each.
pub fn sample_inventory<R: Rng + ?Sized>(
    name: impl Into<String>,
    community: &Community,
    plan: &SamplingPlan,
    rng: &mut R,
) -> Result<Inventory, RichnessError> {
    let plots = draw_plots(&community.window, plan, rng)?;
    let table = build_abundance_table(community, &plots);
    debug!(
        plots = plots.len(),
        individuals = table.total_individuals(),
        "sampled inventory"
    );
    Ok(Inventory::new(
        name,
        community.window.extent(),
        community.richness(),
        plots,
        table,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn window() -> Window {
        Window::square(100.0, "m").unwrap()
    }

    fn plan(plot_side: f64, plot_count: usize) -> SamplingPlan {
        SamplingPlan {
            plot_side,
            plot_count,
        }
    }

    #[test]
    fn test_plots_inside_window() {
        let mut rng = StdRng::seed_from_u64(7);
        let plots = draw_plots(&window(), &plan(15.0, 200), &mut rng).unwrap();
        assert_eq!(plots.len(), 200);
        for p in &plots {
            assert!(p.xmin >= 0.0 && p.xmax <= 100.0);
            assert!(p.ymin >= 0.0 && p.ymax <= 100.0);
            assert!((p.side() - 15.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_plot_ids_sequential() {
        let mut rng = StdRng::seed_from_u64(1);
        let plots = draw_plots(&window(), &plan(5.0, 4), &mut rng).unwrap();
        let ids: Vec<u32> = plots.iter().map(|p| p.plot_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = draw_plots(&window(), &plan(5.0, 20), &mut StdRng::seed_from_u64(42)).unwrap();
        let b = draw_plots(&window(), &plan(5.0, 20), &mut StdRng::seed_from_u64(42)).unwrap();
        let c = draw_plots(&window(), &plan(5.0, 20), &mut StdRng::seed_from_u64(43)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_invalid_plans() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(draw_plots(&window(), &plan(0.0, 5), &mut rng).is_err());
        assert!(draw_plots(&window(), &plan(200.0, 5), &mut rng).is_err());
        assert!(draw_plots(&window(), &plan(5.0, 0), &mut rng).is_err());
    }

    #[test]
    fn test_sample_inventory_full_plot() {
        // A plot as large as the window sees every point
        let community = Community::new(
            window(),
            vec![
                Point::new(1.0, 1.0, "a"),
                Point::new(50.0, 50.0, "b"),
                Point::new(99.0, 2.0, "a"),
            ],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let inv = sample_inventory("full", &community, &plan(100.0, 2), &mut rng).unwrap();
        assert_eq!(inv.num_plots(), 2);
        assert_eq!(inv.community_richness, 2);
        for row in &inv.table.rows {
            assert_eq!(row.counts, vec![2, 1]);
        }
    }
}
