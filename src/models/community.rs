use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::RichnessError;

use super::Extent;

/// A single mapped organism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    /// Species label (e.g. "sp12")
    pub species: String,
}

impl Point {
    pub fn new(x: f64, y: f64, species: impl Into<String>) -> Self {
        Self {
            x,
            y,
            species: species.into(),
        }
    }
}

/// Rectangular observation window of a community.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    /// Unit of the coordinates (e.g. "m")
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String {
    "m".to_string()
}

impl Window {
    /// Create a window, rejecting inverted or non-finite bounds.
    pub fn new(
        xmin: f64,
        xmax: f64,
        ymin: f64,
        ymax: f64,
        unit: impl Into<String>,
    ) -> Result<Self, RichnessError> {
        let window = Self {
            xmin,
            xmax,
            ymin,
            ymax,
            unit: unit.into(),
        };
        window.validate()?;
        Ok(window)
    }

    /// Square window `[0, size] x [0, size]`.
    pub fn square(size: f64, unit: impl Into<String>) -> Result<Self, RichnessError> {
        Self::new(0.0, size, 0.0, size, unit)
    }

    /// Smallest window containing every point.
    pub fn bounding(points: &[Point], unit: impl Into<String>) -> Result<Self, RichnessError> {
        if points.is_empty() {
            return Err(RichnessError::InsufficientData(
                "Cannot infer a window from zero points".to_string(),
            ));
        }
        let (xmin, xmax, ymin, ymax) = points.iter().fold(
            (
                f64::INFINITY,
                f64::NEG_INFINITY,
                f64::INFINITY,
                f64::NEG_INFINITY,
            ),
            |(x0, x1, y0, y1), p| (x0.min(p.x), x1.max(p.x), y0.min(p.y), y1.max(p.y)),
        );
        Self::new(xmin, xmax, ymin, ymax, unit)
    }

    pub fn validate(&self) -> Result<(), RichnessError> {
        let finite = [self.xmin, self.xmax, self.ymin, self.ymax]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.xmin >= self.xmax || self.ymin >= self.ymax {
            return Err(RichnessError::ValidationError(format!(
                "Window bounds must be finite with min < max, got x [{}, {}], y [{}, {}]",
                self.xmin, self.xmax, self.ymin, self.ymax
            )));
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Closed-interval containment on both axes.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }

    /// The window's bounds as a grid extent.
    pub fn extent(&self) -> Extent {
        Extent {
            x_min: self.xmin,
            x_max: self.xmax,
            y_min: self.ymin,
            y_max: self.ymax,
        }
    }
}

/// A mapped community: species-labelled points inside a window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    pub window: Window,
    pub points: Vec<Point>,
}

impl Community {
    /// Build a community, checking that every point lies in the window.
    pub fn new(window: Window, points: Vec<Point>) -> Result<Self, RichnessError> {
        let community = Self { window, points };
        community.validate()?;
        Ok(community)
    }

    pub fn validate(&self) -> Result<(), RichnessError> {
        self.window.validate()?;
        if let Some((i, p)) = self
            .points
            .iter()
            .enumerate()
            .find(|(_, p)| !self.window.contains(p.x, p.y))
        {
            return Err(RichnessError::ValidationError(format!(
                "Point {i} ({}, {}) of species '{}' lies outside the window",
                p.x, p.y, p.species
            )));
        }
        Ok(())
    }

    /// Distinct species labels, sorted.
    pub fn species(&self) -> Vec<String> {
        self.points
            .iter()
            .map(|p| p.species.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// True richness of the community.
    pub fn richness(&self) -> usize {
        self.points
            .iter()
            .map(|p| p.species.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
