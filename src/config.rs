use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{EstimatorOptions, ReplicateSettings, SamplingPlan, SingletonFormula};
use crate::error::RichnessError;
use crate::models::{Point, Window};

/// Analysis parameters, loaded from TOML. Every section and field is optional.
///
/// ```toml
/// [community]
/// window_size = 1000.0
/// unit = "m"
///
/// [sampling]
/// plot_side = 10.0
/// plot_count = 100
/// seed = 42
///
/// [grid]
/// grid_size = 250.0
/// levels = 5
///
/// [estimator]
/// turing_f1 = true
/// singleton_formula = "chiu2016"
///
/// [replicates]
/// count = 500
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub community: CommunityConfig,
    pub sampling: SamplingConfig,
    pub grid: GridConfig,
    pub estimator: EstimatorConfig,
    pub replicates: ReplicatesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommunityConfig {
    /// Side of the square window `[0, size]^2`; the points' bounding box when unset
    pub window_size: Option<f64>,
    pub unit: String,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            window_size: None,
            unit: "m".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplingConfig {
    pub plot_side: f64,
    pub plot_count: usize,
    pub seed: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            plot_side: 10.0,
            plot_count: 100,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    pub grid_size: f64,
    /// Starting size of a sweep; the window width when unset
    pub base_grid_size: Option<f64>,
    pub levels: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_size: 250.0,
            base_grid_size: None,
            levels: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorConfig {
    pub turing_f1: bool,
    /// Takes precedence over `use_alt_formula`
    pub singleton_formula: Option<SingletonFormula>,
    pub use_alt_formula: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplicatesConfig {
    pub count: usize,
    pub confidence: f64,
}

impl Default for ReplicatesConfig {
    fn default() -> Self {
        Self {
            count: 200,
            confidence: 0.95,
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, RichnessError> {
        let config: AnalysisConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RichnessError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Check parameter ranges that do not depend on the community.
    pub fn validate(&self) -> Result<(), RichnessError> {
        if let Some(size) = self.community.window_size {
            if !size.is_finite() || size <= 0.0 {
                return Err(RichnessError::ValidationError(format!(
                    "community.window_size must be positive, got {size}"
                )));
            }
        }
        if !self.sampling.plot_side.is_finite() || self.sampling.plot_side <= 0.0 {
            return Err(RichnessError::ValidationError(format!(
                "sampling.plot_side must be positive, got {}",
                self.sampling.plot_side
            )));
        }
        if self.sampling.plot_count == 0 {
            return Err(RichnessError::ValidationError(
                "sampling.plot_count must be at least 1".to_string(),
            ));
        }
        let sizes = std::iter::once(self.grid.grid_size).chain(self.grid.base_grid_size);
        for size in sizes {
            if !size.is_finite() || size <= 0.0 {
                return Err(RichnessError::ValidationError(format!(
                    "grid sizes must be positive, got {size}"
                )));
            }
        }
        if !(self.replicates.confidence > 0.0 && self.replicates.confidence < 1.0) {
            return Err(RichnessError::ValidationError(format!(
                "replicates.confidence must be in (0, 1), got {}",
                self.replicates.confidence
            )));
        }
        Ok(())
    }

    pub fn sampling_plan(&self) -> SamplingPlan {
        SamplingPlan {
            plot_side: self.sampling.plot_side,
            plot_count: self.sampling.plot_count,
        }
    }

    pub fn estimator_options(&self) -> EstimatorOptions {
        EstimatorOptions {
            turing_f1: self.estimator.turing_f1,
            formula: self
                .estimator
                .singleton_formula
                .unwrap_or_else(|| SingletonFormula::from_alt_flag(self.estimator.use_alt_formula)),
        }
    }

    pub fn replicate_settings(&self) -> ReplicateSettings {
        ReplicateSettings {
            count: self.replicates.count,
            seed: self.sampling.seed,
            confidence: self.replicates.confidence,
        }
    }

    /// Window for a point set: the configured square, else the bounding box.
    pub fn window_for(&self, points: &[Point]) -> Result<Window, RichnessError> {
        match self.community.window_size {
            Some(size) => Window::square(size, self.community.unit.clone()),
            None => Window::bounding(points, self.community.unit.clone()),
        }
    }

    /// Base size of a grid sweep over `window`.
    pub fn base_grid_size(&self, window: &Window) -> f64 {
        self.grid
            .base_grid_size
            .unwrap_or_else(|| window.width().max(window.height()))
    }
}
