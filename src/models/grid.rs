use serde::{Deserialize, Serialize};

use crate::error::RichnessError;

/// Bounding extent the grid lines are laid over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Extent {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn validate(&self) -> Result<(), RichnessError> {
        let finite = [self.x_min, self.x_max, self.y_min, self.y_max]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.x_min >= self.x_max || self.y_min >= self.y_max {
            return Err(RichnessError::ValidationError(format!(
                "Extent must be finite with min < max, got x [{}, {}], y [{}, {}]",
                self.x_min, self.x_max, self.y_min, self.y_max
            )));
        }
        Ok(())
    }
}

/// A grid cell, identified by its lower-left grid lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    /// Index of the x grid line
    pub ix: usize,
    /// Index of the y grid line
    pub iy: usize,
    pub x: f64,
    pub y: f64,
}

/// Summed abundances of all plots assigned to one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellAbundance {
    pub cell: GridCell,
    pub plot_ids: Vec<u32>,
    pub counts: Vec<u64>,
}

/// Why a plot did not contribute to any cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExclusionReason {
    /// No grid line lies strictly below the plot's coordinate.
    BelowGrid,
    /// The plot's coordinate lies past the extent.
    BeyondGrid,
    /// The abundance row has no matching plot coordinate.
    MissingCoordinates,
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExclusionReason::BelowGrid => write!(f, "below grid"),
            ExclusionReason::BeyondGrid => write!(f, "beyond grid"),
            ExclusionReason::MissingCoordinates => write!(f, "missing coordinates"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExcludedPlot {
    pub plot_id: u32,
    pub reason: ExclusionReason,
}

/// Per-cell abundance vectors for one grid size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedAbundance {
    pub grid_size: f64,
    /// Species column labels, same order as the source table
    pub species: Vec<String>,
    /// Populated cells ordered by `(ix, iy)`
    pub cells: Vec<CellAbundance>,
    /// Plots dropped from aggregation
    pub excluded: Vec<ExcludedPlot>,
}

impl AggregatedAbundance {
    /// Number of populated cells.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells each species occurs in (count > 0).
    pub fn occurrences(&self) -> Vec<usize> {
        let mut occ = vec![0usize; self.species.len()];
        for cell in &self.cells {
            for (o, &count) in occ.iter_mut().zip(&cell.counts) {
                if count > 0 {
                    *o += 1;
                }
            }
        }
        occ
    }

    pub fn num_assigned_plots(&self) -> usize {
        self.cells.iter().map(|c| c.plot_ids.len()).sum()
    }
}
