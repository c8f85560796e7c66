use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::analysis::{GridSweep, OccupancyFrequencies, ReplicateReport, RichnessEstimate};
use crate::models::Inventory;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn heading(output: &mut String, title: &str, rule: usize) {
    output.push_str(&format!("\n{}\n", title.bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(rule)));
}

/// Non-finite estimates are shown as text rather than `NaN`/`inf`.
fn fmt_estimate(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.3}")
    } else if value.is_nan() {
        "undefined".to_string()
    } else if value > 0.0 {
        "+inf".to_string()
    } else {
        "-inf".to_string()
    }
}

/// Format an inventory overview as a string.
pub fn format_inventory_summary(inventory: &Inventory) -> String {
    let mut output = String::new();
    heading(&mut output, "Inventory Summary", 50);

    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Plots"), Cell::new(inventory.num_plots())]);
    table.add_row(vec![
        Cell::new("Individuals in plots"),
        Cell::new(inventory.num_individuals()),
    ]);
    table.add_row(vec![
        Cell::new("Species observed"),
        Cell::new(inventory.observed_species()),
    ]);
    table.add_row(vec![
        Cell::new("Species in community"),
        Cell::new(inventory.community_richness),
    ]);

    output.push_str(&format!("{table}"));
    output
}

/// Print an inventory overview.
pub fn print_inventory_summary(inventory: &Inventory) {
    print!("{}", format_inventory_summary(inventory));
}

/// Format the incidence frequency counts `f_k` as a string.
pub fn format_occupancy_table(occ: &OccupancyFrequencies) -> String {
    let mut output = String::new();
    heading(&mut output, "Occupancy Frequencies", 50);
    output.push_str(&format!(
        "{}\n",
        format!("Populated cells: {} | Observed species: {}", occ.n, occ.s_obs).dimmed()
    ));

    let mut table = new_table();
    table.set_header(vec!["Cells occupied (k)", "Species (f_k)"]);
    for (k, &f) in occ.frequencies.iter().enumerate().skip(1) {
        if f > 0 || k <= 4 {
            table.add_row(vec![Cell::new(k), Cell::new(f)]);
        }
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the incidence frequency counts.
pub fn print_occupancy_table(occ: &OccupancyFrequencies) {
    print!("{}", format_occupancy_table(occ));
}

/// Format a single richness estimate as a string.
pub fn format_estimate_table(est: &RichnessEstimate) -> String {
    let mut output = String::new();
    heading(&mut output, "Richness Estimate", 50);

    let mut table = new_table();
    table.set_header(vec!["Quantity", "Value"]);
    table.add_row(vec![Cell::new("Grid size"), Cell::new(format!("{}", est.grid_size))]);
    table.add_row(vec![Cell::new("Sampling units (n)"), Cell::new(est.n)]);
    table.add_row(vec![Cell::new("Observed richness"), Cell::new(est.s_obs)]);
    table.add_row(vec![Cell::new("Singletons (f1)"), Cell::new(est.f1_observed)]);
    table.add_row(vec![Cell::new("Doubletons (f2)"), Cell::new(est.f2)]);
    table.add_row(vec![
        Cell::new("Turing singleton estimate"),
        Cell::new(
            est.singleton_estimate
                .map(fmt_estimate)
                .unwrap_or_else(|| "-".to_string()),
        ),
    ]);
    table.add_row(vec![Cell::new("f1 used"), Cell::new(fmt_estimate(est.f1_used))]);
    table.add_row(vec![Cell::new("Chao2 richness"), Cell::new(fmt_estimate(est.richness))]);

    output.push_str(&format!("{table}"));
    if !est.is_valid() {
        output.push_str(&format!(
            "\n{}\n",
            "Estimate is not finite for this grid configuration.".yellow()
        ));
    }
    output
}

/// Print a single richness estimate.
pub fn print_estimate_table(est: &RichnessEstimate) {
    print!("{}", format_estimate_table(est));
}

/// Format a grid sweep as a string.
pub fn format_sweep_table(sweep: &GridSweep) -> String {
    let mut output = String::new();
    heading(&mut output, "Grid Sensitivity", 70);
    output.push_str(&format!(
        "{}\n",
        format!(
            "Base grid size: {} | Turing f1: {} | Formula: {}",
            sweep.base_grid_size, sweep.options.turing_f1, sweep.options.formula
        )
        .dimmed()
    ));

    let mut table = new_table();
    table.set_header(vec![
        "Level", "Grid size", "n", "S_obs", "f1", "f2", "f1 used", "Chao2", "Excluded",
    ]);
    for point in &sweep.points {
        let est = &point.estimate;
        table.add_row(vec![
            Cell::new(point.level),
            Cell::new(format!("{}", point.grid_size)),
            Cell::new(est.n),
            Cell::new(est.s_obs),
            Cell::new(est.f1_observed),
            Cell::new(est.f2),
            Cell::new(fmt_estimate(est.f1_used)),
            Cell::new(fmt_estimate(est.richness)),
            Cell::new(point.excluded_plots),
        ]);
    }
    output.push_str(&format!("{table}"));

    let summary = sweep.summary();
    if summary.valid > 0 {
        output.push_str(&format!(
            "\n  Mean {} | SD {} | Range {} - {}\n",
            fmt_estimate(summary.mean),
            fmt_estimate(summary.std_dev),
            fmt_estimate(summary.min),
            fmt_estimate(summary.max)
        ));
    }
    output
}

/// Print a grid sweep.
pub fn print_sweep_table(sweep: &GridSweep) {
    print!("{}", format_sweep_table(sweep));
}

/// Format a replicate run summary as a string.
pub fn format_replicate_table(report: &ReplicateReport) -> String {
    let summary = &report.summary;
    let mut output = String::new();
    heading(&mut output, "Replicate Summary", 60);
    output.push_str(&format!(
        "{}\n",
        format!(
            "Replicates: {} ({} valid) | Grid size: {} | Plots: {} x {}",
            summary.replicates,
            summary.valid,
            report.grid_size,
            report.plan.plot_count,
            report.plan.plot_side
        )
        .dimmed()
    ));

    let ci = &summary.richness;
    let mut table = new_table();
    table.set_header(vec!["Quantity", "Value"]);
    table.add_row(vec![Cell::new("True richness"), Cell::new(summary.true_richness)]);
    table.add_row(vec![Cell::new("Mean observed richness"), Cell::new(format!("{:.2}", summary.mean_s_obs))]);
    table.add_row(vec![Cell::new("Mean Chao2"), Cell::new(fmt_estimate(ci.mean))]);
    table.add_row(vec![
        Cell::new(format!("{:.0}% CI", ci.confidence_level * 100.0)),
        Cell::new(format!("{} - {}", fmt_estimate(ci.lower), fmt_estimate(ci.upper))),
    ]);
    table.add_row(vec![Cell::new("Bias"), Cell::new(fmt_estimate(summary.bias))]);
    table.add_row(vec![
        Cell::new("Mean observed f1"),
        Cell::new(format!("{:.2}", summary.mean_f1_observed)),
    ]);
    table.add_row(vec![
        Cell::new(format!(
            "Mean Turing f1 ({} finite)",
            summary.finite_singleton_estimates
        )),
        Cell::new(fmt_estimate(summary.mean_singleton_estimate)),
    ]);

    output.push_str(&format!("{table}"));
    output
}

/// Print a replicate run summary.
pub fn print_replicate_table(report: &ReplicateReport) {
    print!("{}", format_replicate_table(report));
}
