pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod visualization;

pub use analysis::{chao2, estimate_singletons, Analyzer, EstimatorOptions, SingletonFormula};
pub use config::AnalysisConfig;
pub use error::RichnessError;
pub use io::CommunityReader;
pub use models::{Community, Inventory, PlotWindow, Point, Window};
