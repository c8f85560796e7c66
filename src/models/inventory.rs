use serde::{Deserialize, Serialize};

use super::{plot_coords, AbundanceTable, Extent, PlotCoord, PlotWindow};

/// One sampled inventory: the plot layout and the abundance table built from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    /// Name or identifier for this inventory
    pub name: String,
    /// Extent grid lines are laid over (the community window)
    pub extent: Extent,
    /// Distinct species in the sampled community
    pub community_richness: usize,
    /// Plot windows in plot-id order
    pub plots: Vec<PlotWindow>,
    pub table: AbundanceTable,
}

impl Inventory {
    pub fn new(
        name: impl Into<String>,
        extent: Extent,
        community_richness: usize,
        plots: Vec<PlotWindow>,
        table: AbundanceTable,
    ) -> Self {
        Self {
            name: name.into(),
            extent,
            community_richness,
            plots,
            table,
        }
    }

    pub fn num_plots(&self) -> usize {
        self.plots.len()
    }

    /// Total individuals counted across all plots.
    pub fn num_individuals(&self) -> u64 {
        self.table.total_individuals()
    }

    /// Species observed in at least one plot.
    pub fn observed_species(&self) -> usize {
        self.table
            .species_totals()
            .iter()
            .filter(|&&t| t > 0)
            .count()
    }

    pub fn plot_coords(&self) -> Vec<PlotCoord> {
        plot_coords(&self.plots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AbundanceRow, Window};

    fn sample_inventory() -> Inventory {
        let window = Window::square(20.0, "m").unwrap();
        let plots = vec![
            PlotWindow::clamped(1, 1.0, 1.0, 5.0, &window).unwrap(),
            PlotWindow::clamped(2, 11.0, 1.0, 5.0, &window).unwrap(),
        ];
        let table = AbundanceTable {
            species: vec!["a".into(), "b".into(), "c".into()],
            rows: vec![
                AbundanceRow {
                    plot_id: 1,
                    counts: vec![2, 1, 0],
                },
                AbundanceRow {
                    plot_id: 2,
                    counts: vec![4, 0, 0],
                },
            ],
        };
        Inventory::new("Test", window.extent(), 3, plots, table)
    }

    #[test]
    fn test_counts() {
        let inv = sample_inventory();
        assert_eq!(inv.name, "Test");
        assert_eq!(inv.num_plots(), 2);
        assert_eq!(inv.num_individuals(), 7);
        assert_eq!(inv.observed_species(), 2);
        assert_eq!(inv.community_richness, 3);
    }

    #[test]
    fn test_plot_coords_follow_plots() {
        let inv = sample_inventory();
        let coords = inv.plot_coords();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[1].plot_id, 2);
        assert_eq!(coords[1].x, 11.0);
    }

    #[test]
    fn test_inventory_json_roundtrip() {
        let inv = sample_inventory();
        let json = serde_json::to_string(&inv).unwrap();
        let back: Inventory = serde_json::from_str(&json).unwrap();
        assert_eq!(back.num_plots(), inv.num_plots());
        assert_eq!(back.table, inv.table);
    }
}
