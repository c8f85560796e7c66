use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::error::RichnessError;
use crate::models::{
    AbundanceRow, AbundanceTable, AggregatedAbundance, CellAbundance, Community, ExcludedPlot,
    ExclusionReason, Extent, GridCell, PlotCoord, PlotWindow,
};

use super::SpatialIndex;

/// Upper bound on grid lines per axis.
const MAX_LINES_PER_AXIS: usize = 1_000_000;

/// Tolerance used when deciding whether the sequence lands on its endpoint.
const SEQ_EPS: f64 = 1e-10;

/// Count the community's species in every plot window.
///
/// Columns are the community's full species list, so species absent from a
/// plot appear as explicit zeros.
pub fn build_abundance_table(community: &Community, plots: &[PlotWindow]) -> AbundanceTable {
    let species = community.species();
    let column: HashMap<&str, usize> = species
        .iter()
        .enumerate()
        .map(|(i, s)| (s.as_str(), i))
        .collect();

    let index = SpatialIndex::new(&community.points);
    let rows = plots
        .iter()
        .map(|plot| {
            let mut counts = vec![0u64; species.len()];
            for i in index.points_in(plot) {
                // Every label is in `column`; it was built from the same points.
                if let Some(&c) = column.get(community.points[i].species.as_str()) {
                    counts[c] += 1;
                }
            }
            AbundanceRow {
                plot_id: plot.plot_id,
                counts,
            }
        })
        .collect::<Vec<_>>();

    debug!(
        plots = rows.len(),
        species = species.len(),
        "built abundance table"
    );
    AbundanceTable { species, rows }
}

/// Regular grid laid over an extent.
///
/// Grid lines on each axis run `min, min + g, min + 2g, ...` up to `max`,
/// including `max` when the sequence lands on it. Every line except such a
/// closing line is the lower-left corner of a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub extent: Extent,
    pub grid_size: f64,
    x_lines: Vec<f64>,
    y_lines: Vec<f64>,
}

impl Grid {
    pub fn new(extent: Extent, grid_size: f64) -> Result<Self, RichnessError> {
        extent.validate()?;
        if !grid_size.is_finite() || grid_size <= 0.0 {
            return Err(RichnessError::ValidationError(format!(
                "Grid size must be positive and finite, got {grid_size}"
            )));
        }
        let x_lines = grid_lines(extent.x_min, extent.x_max, grid_size)?;
        let y_lines = grid_lines(extent.y_min, extent.y_max, grid_size)?;
        Ok(Self {
            extent,
            grid_size,
            x_lines,
            y_lines,
        })
    }

    pub fn x_lines(&self) -> &[f64] {
        &self.x_lines
    }

    pub fn y_lines(&self) -> &[f64] {
        &self.y_lines
    }

    /// Cell containing a plot whose lower-left corner is `(x, y)`.
    ///
    /// On each axis the cell is the greatest grid line strictly below the
    /// coordinate. A coordinate at or below the first line, or past the
    /// extent, has no cell.
    pub fn cell_of(&self, x: f64, y: f64) -> Result<GridCell, ExclusionReason> {
        let ix = axis_index(&self.x_lines, self.extent.x_max, self.grid_size, x)?;
        let iy = axis_index(&self.y_lines, self.extent.y_max, self.grid_size, y)?;
        Ok(GridCell {
            ix,
            iy,
            x: self.x_lines[ix],
            y: self.y_lines[iy],
        })
    }
}

/// Closed-interval arithmetic sequence from `min` to `max` by `step`.
fn grid_lines(min: f64, max: f64, step: f64) -> Result<Vec<f64>, RichnessError> {
    let steps = ((max - min) / step + SEQ_EPS).floor();
    if steps >= MAX_LINES_PER_AXIS as f64 {
        return Err(RichnessError::ValidationError(format!(
            "Grid size {step} yields more than {MAX_LINES_PER_AXIS} lines over [{min}, {max}]"
        )));
    }
    let steps = steps as usize;
    Ok((0..=steps).map(|i| min + i as f64 * step).collect())
}

fn axis_index(lines: &[f64], max: f64, step: f64, coord: f64) -> Result<usize, ExclusionReason> {
    // Past the extent there is no cell, partial or not.
    if coord > max {
        return Err(ExclusionReason::BeyondGrid);
    }
    let below = lines.partition_point(|&line| line < coord);
    if below == 0 {
        return Err(ExclusionReason::BelowGrid);
    }
    let idx = below - 1;
    let closes_extent = lines
        .last()
        .is_some_and(|&last| last >= max - SEQ_EPS * step);
    if closes_extent && idx == lines.len() - 1 {
        return Err(ExclusionReason::BeyondGrid);
    }
    Ok(idx)
}

/// Sum plot abundance rows per grid cell.
///
/// Plots are matched to coordinates by plot id. A plot with no cell (see
/// [`Grid::cell_of`]) or no coordinates is left out of every cell and listed
/// in [`AggregatedAbundance::excluded`]; this is not an error.
pub fn aggregate(table: &AbundanceTable, coords: &[PlotCoord], grid: &Grid) -> AggregatedAbundance {
    let by_id: HashMap<u32, &PlotCoord> = coords.iter().map(|c| (c.plot_id, c)).collect();
    let mut cells: BTreeMap<(usize, usize), CellAbundance> = BTreeMap::new();
    let mut excluded = Vec::new();

    for row in &table.rows {
        let assignment = by_id
            .get(&row.plot_id)
            .ok_or(ExclusionReason::MissingCoordinates)
            .and_then(|c| grid.cell_of(c.x, c.y));

        let cell = match assignment {
            Ok(cell) => cell,
            Err(reason) => {
                excluded.push(ExcludedPlot {
                    plot_id: row.plot_id,
                    reason,
                });
                continue;
            }
        };

        let entry = cells
            .entry((cell.ix, cell.iy))
            .or_insert_with(|| CellAbundance {
                cell,
                plot_ids: Vec::new(),
                counts: vec![0; table.species.len()],
            });
        entry.plot_ids.push(row.plot_id);
        for (sum, count) in entry.counts.iter_mut().zip(&row.counts) {
            *sum += count;
        }
    }

    if !excluded.is_empty() {
        warn!(
            grid_size = grid.grid_size,
            excluded = excluded.len(),
            "plots excluded from grid aggregation"
        );
    }
    debug!(
        grid_size = grid.grid_size,
        cells = cells.len(),
        "aggregated plots into grid cells"
    );

    AggregatedAbundance {
        grid_size: grid.grid_size,
        species: table.species.clone(),
        cells: cells.into_values().collect(),
        excluded,
    }
}

/// Build the grid for `grid_size` over `extent` and aggregate onto it.
pub fn aggregate_at(
    table: &AbundanceTable,
    coords: &[PlotCoord],
    extent: Extent,
    grid_size: f64,
) -> Result<AggregatedAbundance, RichnessError> {
    let grid = Grid::new(extent, grid_size)?;
    Ok(aggregate(table, coords, &grid))
}
