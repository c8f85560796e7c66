mod tables;
mod charts;

pub use tables::{
    format_inventory_summary, print_inventory_summary,
    format_occupancy_table, print_occupancy_table,
    format_estimate_table, print_estimate_table,
    format_sweep_table, print_sweep_table,
    format_replicate_table, print_replicate_table,
};
pub use charts::{format_sweep_chart, print_sweep_chart};
