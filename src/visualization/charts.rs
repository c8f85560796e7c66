use colored::Colorize;

use crate::analysis::GridSweep;

/// Format a text bar chart of richness against grid size as a string.
pub fn format_sweep_chart(sweep: &GridSweep) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Richness vs Grid Size".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    if sweep.points.is_empty() {
        output.push_str("  No data available.\n");
        return output;
    }

    let max_richness = sweep
        .points
        .iter()
        .map(|p| p.estimate.richness)
        .filter(|r| r.is_finite())
        .fold(0.0f64, f64::max);

    let bar_width = 40;

    output.push_str(&format!("  {:>10}  {:>10}  Richness\n", "Grid size", "Chao2"));
    output.push_str(&format!("  {}\n", "-".repeat(70)));

    for point in &sweep.points {
        let richness = point.estimate.richness;
        if !richness.is_finite() {
            output.push_str(&format!(
                "  {:>10.3}  {:>10}  {}\n",
                point.grid_size,
                "-",
                "not finite".yellow()
            ));
            continue;
        }

        let bar_len = if max_richness > 0.0 {
            ((richness.max(0.0) / max_richness) * bar_width as f64).round() as usize
        } else {
            0
        };
        let bar = "\u{2588}".repeat(bar_len);

        output.push_str(&format!(
            "  {:>10.3}  {:>10.2}  {}\n",
            point.grid_size,
            richness,
            bar.green()
        ));
    }

    output.push('\n');
    output
}

/// Print a text bar chart of richness against grid size.
pub fn print_sweep_chart(sweep: &GridSweep) {
    print!("{}", format_sweep_chart(sweep));
}
