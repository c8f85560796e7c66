mod community;
mod plot;
mod abundance;
mod grid;
mod inventory;

pub use community::{Community, Point, Window};
pub use plot::{plot_coords, PlotCoord, PlotWindow};
pub use abundance::{AbundanceRow, AbundanceTable};
pub use grid::{
    AggregatedAbundance, CellAbundance, ExcludedPlot, ExclusionReason, Extent, GridCell,
};
pub use inventory::Inventory;
