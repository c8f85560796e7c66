use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use richness_aggregation::{
    analysis::{run_replicates, sample_inventory, Analyzer, SingletonFormula},
    config::AnalysisConfig,
    io,
    models::{Community, Inventory, Window},
    visualization::{
        print_estimate_table, print_inventory_summary, print_occupancy_table,
        print_replicate_table, print_sweep_chart, print_sweep_table,
    },
};

#[derive(Parser)]
#[command(
    name = "richness-analyzer",
    about = "Species richness estimation under spatial grid aggregation",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args)]
struct CommonArgs {
    /// Path to the community file (CSV with x,y,species columns, or JSON)
    #[arg(short, long)]
    community: PathBuf,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side of the square community window [0, size]^2
    #[arg(long)]
    window_size: Option<f64>,

    /// Seed for plot placement
    #[arg(short, long)]
    seed: Option<u64>,

    /// Side length of each sample plot
    #[arg(long)]
    plot_side: Option<f64>,

    /// Number of sample plots
    #[arg(long)]
    plot_count: Option<usize>,

    /// Replace the observed singleton count with Turing's estimate
    #[arg(long)]
    turing_f1: bool,

    /// Use the alternate (Cazzola 2022) singleton formula
    #[arg(long)]
    alt_formula: bool,

    /// Also write the result as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw sample plots and write the plot-by-species abundance table
    Sample {
        #[command(flatten)]
        common: CommonArgs,

        /// Output CSV for the abundance table
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Estimate richness at a single grid size
    Estimate {
        #[command(flatten)]
        common: CommonArgs,

        /// Grid cell side length
        #[arg(short, long)]
        grid_size: Option<f64>,

        /// Output CSV for the per-cell abundances
        #[arg(long)]
        cells: Option<PathBuf>,
    },

    /// Estimate richness over successively halved grid sizes
    Sweep {
        #[command(flatten)]
        common: CommonArgs,

        /// Grid size halved at each level (defaults to the window width)
        #[arg(short, long)]
        base_grid_size: Option<f64>,

        /// Number of halvings
        #[arg(short, long)]
        levels: Option<u32>,

        /// Output CSV for the sweep
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Repeat sampling over independent replicates and summarize the estimates
    Replicate {
        #[command(flatten)]
        common: CommonArgs,

        /// Grid cell side length
        #[arg(short, long)]
        grid_size: Option<f64>,

        /// Number of replicates
        #[arg(short, long)]
        replicates: Option<usize>,

        /// Confidence level for the richness interval (0.0-1.0)
        #[arg(long)]
        confidence: Option<f64>,
    },
}

/// Merge the configuration file with command-line overrides.
fn load_config(common: &CommonArgs) -> Result<AnalysisConfig> {
    let mut config = match &common.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(size) = common.window_size {
        config.community.window_size = Some(size);
    }
    if let Some(seed) = common.seed {
        config.sampling.seed = seed;
    }
    if let Some(side) = common.plot_side {
        config.sampling.plot_side = side;
    }
    if let Some(count) = common.plot_count {
        config.sampling.plot_count = count;
    }
    if common.turing_f1 {
        config.estimator.turing_f1 = true;
    }
    if common.alt_formula {
        config.estimator.singleton_formula = Some(SingletonFormula::Cazzola2022);
    }
    config.validate()?;
    Ok(config)
}

fn load_community(path: &Path, config: &AnalysisConfig) -> Result<Community> {
    let window = config
        .community
        .window_size
        .map(|size| Window::square(size, config.community.unit.clone()))
        .transpose()?;
    let csv = io::CsvFormat {
        window,
        unit: config.community.unit.clone(),
    };
    let reader = io::reader_for(path, csv)?;
    Ok(reader.read(path)?)
}

fn load_inventory(common: &CommonArgs) -> Result<(AnalysisConfig, Community, Inventory)> {
    let config = load_config(common)?;
    let community = load_community(&common.community, &config)?;
    println!(
        "  Loaded {} individuals of {} species",
        community.len(),
        community.richness()
    );

    let name = common
        .community
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "community".to_string());
    let mut rng = StdRng::seed_from_u64(config.sampling.seed);
    let inventory = sample_inventory(name, &community, &config.sampling_plan(), &mut rng)?;
    Ok((config, community, inventory))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sample { common, output } => {
            println!(
                "\n{}",
                format!("Plot Sampling: {}", common.community.display())
                    .bold()
                    .cyan()
            );
            let (_, _, inventory) = load_inventory(&common)?;
            print_inventory_summary(&inventory);

            io::write_abundance_csv(&inventory.table, &inventory.plots, &output)?;
            if let Some(path) = &common.json {
                io::write_json(&inventory, path, true)?;
            }
            println!(
                "\n{} Wrote abundance table -> {}",
                "Success:".green().bold(),
                output.display()
            );
        }

        Commands::Estimate {
            common,
            grid_size,
            cells,
        } => {
            println!(
                "\n{}",
                format!("Richness Estimate: {}", common.community.display())
                    .bold()
                    .cyan()
            );
            let (config, _, inventory) = load_inventory(&common)?;
            let grid_size = grid_size.unwrap_or(config.grid.grid_size);
            let analyzer = Analyzer::new(&inventory, config.estimator_options());

            let aggregated = analyzer.aggregate(grid_size)?;
            if !aggregated.excluded.is_empty() {
                eprintln!(
                    "{}: {} plot(s) fall outside the grid and were excluded",
                    "Warning".yellow(),
                    aggregated.excluded.len()
                );
            }
            print_inventory_summary(&inventory);
            print_occupancy_table(&analyzer.occupancy(grid_size)?);

            let estimate = analyzer.estimate(grid_size)?;
            print_estimate_table(&estimate);

            if let Some(path) = &cells {
                io::write_aggregated_csv(&aggregated, path)?;
            }
            if let Some(path) = &common.json {
                io::write_json(&estimate, path, true)?;
            }
        }

        Commands::Sweep {
            common,
            base_grid_size,
            levels,
            output,
        } => {
            println!(
                "\n{}",
                format!("Grid Sensitivity Sweep: {}", common.community.display())
                    .bold()
                    .cyan()
            );
            let (config, community, inventory) = load_inventory(&common)?;
            let base = match base_grid_size {
                Some(b) => b,
                None => config.base_grid_size(&community.window),
            };
            let levels = levels.unwrap_or(config.grid.levels);

            let analyzer = Analyzer::new(&inventory, config.estimator_options());
            let sweep = analyzer.sweep(base, levels)?;
            print_sweep_table(&sweep);
            print_sweep_chart(&sweep);

            if let Some(path) = &output {
                io::write_sweep_csv(&sweep, path)?;
            }
            if let Some(path) = &common.json {
                io::write_json(&sweep, path, true)?;
            }
        }

        Commands::Replicate {
            common,
            grid_size,
            replicates,
            confidence,
        } => {
            println!(
                "\n{}",
                format!("Replicate Validation: {}", common.community.display())
                    .bold()
                    .cyan()
            );
            let mut config = load_config(&common)?;
            if let Some(count) = replicates {
                config.replicates.count = count;
            }
            if let Some(c) = confidence {
                config.replicates.confidence = c;
            }
            config.validate()?;
            let community = load_community(&common.community, &config)?;
            let grid_size = grid_size.unwrap_or(config.grid.grid_size);

            let report = run_replicates(
                &community,
                &config.sampling_plan(),
                grid_size,
                &config.estimator_options(),
                &config.replicate_settings(),
            )?;
            print_replicate_table(&report);

            if let Some(path) = &common.json {
                io::write_json(&report, path, true)?;
            }
        }
    }

    Ok(())
}
