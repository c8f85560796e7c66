//! Grid sweep example: simulate a community, sample plots, and watch the
//! Chao2 estimate change as the aggregation grid is refined.
//!
//! Run from the project root:
//!   cargo run --example grid_sweep

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use richness_aggregation::analysis::{sample_inventory, Analyzer, EstimatorOptions, SamplingPlan};
use richness_aggregation::models::{Community, Point, Window};
use richness_aggregation::visualization::{
    print_estimate_table, print_inventory_summary, print_sweep_chart, print_sweep_table,
};

fn main() {
    let mut rng = StdRng::seed_from_u64(7);
    let window = Window::square(1000.0, "m").expect("valid window");

    // A few common species everywhere, plus rare ones in small patches.
    let mut points = Vec::new();
    for i in 0..20_000 {
        let x = rng.gen_range(0.0..1000.0);
        let y = rng.gen_range(0.0..1000.0);
        points.push(Point::new(x, y, format!("common{}", i % 8)));
    }
    for sp in 0..40 {
        let cx: f64 = rng.gen_range(50.0..950.0);
        let cy: f64 = rng.gen_range(50.0..950.0);
        for _ in 0..25 {
            let x = (cx + rng.gen_range(-40.0..40.0)).clamp(0.0, 1000.0);
            let y = (cy + rng.gen_range(-40.0..40.0)).clamp(0.0, 1000.0);
            points.push(Point::new(x, y, format!("rare{sp}")));
        }
    }
    let community = Community::new(window, points).expect("points inside window");
    println!(
        "Simulated {} individuals of {} species",
        community.len(),
        community.richness()
    );

    let plan = SamplingPlan {
        plot_side: 10.0,
        plot_count: 200,
    };
    let inventory = sample_inventory("simulated", &community, &plan, &mut rng)
        .expect("Failed to sample plots");
    print_inventory_summary(&inventory);

    let options = EstimatorOptions {
        turing_f1: true,
        ..EstimatorOptions::default()
    };
    let analyzer = Analyzer::new(&inventory, options);

    match analyzer.estimate(125.0) {
        Ok(estimate) => print_estimate_table(&estimate),
        Err(e) => eprintln!("Could not estimate richness: {e}"),
    }

    let sweep = analyzer.sweep(1000.0, 6).expect("Failed to run sweep");
    print_sweep_table(&sweep);
    print_sweep_chart(&sweep);
}
