use serde::{Deserialize, Serialize};

use crate::error::RichnessError;

use super::Window;

/// A square sample plot placed inside the community window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotWindow {
    /// Plot identifier
    pub plot_id: u32,
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

/// Lower-left corner of a plot, used to assign it to a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotCoord {
    pub plot_id: u32,
    pub x: f64,
    pub y: f64,
}

impl PlotWindow {
    /// Place a plot of side `side` with its lower-left corner at `(x, y)`.
    ///
    /// An origin that would push the plot past the upper edge of the window is
    /// shifted back so the plot ends exactly on that edge; an origin below the
    /// lower edge is moved up to it.
    pub fn clamped(
        plot_id: u32,
        x: f64,
        y: f64,
        side: f64,
        window: &Window,
    ) -> Result<Self, RichnessError> {
        if !(side > 0.0) || !side.is_finite() {
            return Err(RichnessError::ValidationError(format!(
                "Plot side must be positive and finite, got {side}"
            )));
        }
        if side > window.width() || side > window.height() {
            return Err(RichnessError::ValidationError(format!(
                "Plot side {side} does not fit in a {} x {} window",
                window.width(),
                window.height()
            )));
        }
        let xmin = x.max(window.xmin).min(window.xmax - side);
        let ymin = y.max(window.ymin).min(window.ymax - side);
        Ok(Self {
            plot_id,
            xmin,
            ymin,
            xmax: xmin + side,
            ymax: ymin + side,
        })
    }

    pub fn side(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn coord(&self) -> PlotCoord {
        PlotCoord {
            plot_id: self.plot_id,
            x: self.xmin,
            y: self.ymin,
        }
    }

    /// Inclusive containment on both axes.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }
}

/// Lower-left corners of a set of plots.
pub fn plot_coords(plots: &[PlotWindow]) -> Vec<PlotCoord> {
    plots.iter().map(PlotWindow::coord).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Window {
        Window::square(100.0, "m").unwrap()
    }

    #[test]
    fn test_plot_inside_window_unchanged() {
        let plot = PlotWindow::clamped(1, 20.0, 30.0, 10.0, &window()).unwrap();
        assert_eq!(plot.xmin, 20.0);
        assert_eq!(plot.ymin, 30.0);
        assert_eq!(plot.xmax, 30.0);
        assert_eq!(plot.ymax, 40.0);
        assert_eq!(plot.side(), 10.0);
    }

    #[test]
    fn test_plot_clamped_at_upper_edge() {
        let plot = PlotWindow::clamped(1, 95.0, 99.0, 10.0, &window()).unwrap();
        assert_eq!(plot.xmin, 90.0);
        assert_eq!(plot.xmax, 100.0);
        assert_eq!(plot.ymin, 90.0);
        assert_eq!(plot.ymax, 100.0);
    }

    #[test]
    fn test_plot_clamped_at_lower_edge() {
        let plot = PlotWindow::clamped(1, -5.0, 3.0, 10.0, &window()).unwrap();
        assert_eq!(plot.xmin, 0.0);
        assert_eq!(plot.ymin, 3.0);
    }

    #[test]
    fn test_plot_side_too_large() {
        assert!(PlotWindow::clamped(1, 0.0, 0.0, 150.0, &window()).is_err());
    }

    #[test]
    fn test_plot_side_non_positive() {
        assert!(PlotWindow::clamped(1, 0.0, 0.0, 0.0, &window()).is_err());
        assert!(PlotWindow::clamped(1, 0.0, 0.0, -1.0, &window()).is_err());
        assert!(PlotWindow::clamped(1, 0.0, 0.0, f64::NAN, &window()).is_err());
    }

    #[test]
    fn test_coord_is_lower_left() {
        let plot = PlotWindow::clamped(7, 12.5, 40.0, 5.0, &window()).unwrap();
        let coord = plot.coord();
        assert_eq!(coord.plot_id, 7);
        assert_eq!(coord.x, 12.5);
        assert_eq!(coord.y, 40.0);
    }

    #[test]
    fn test_contains_boundary() {
        let plot = PlotWindow::clamped(1, 10.0, 10.0, 10.0, &window()).unwrap();
        assert!(plot.contains(10.0, 20.0));
        assert!(plot.contains(20.0, 10.0));
        assert!(!plot.contains(20.01, 15.0));
    }

    #[test]
    fn test_plot_coords() {
        let plots = vec![
            PlotWindow::clamped(1, 1.0, 2.0, 5.0, &window()).unwrap(),
            PlotWindow::clamped(2, 3.0, 4.0, 5.0, &window()).unwrap(),
        ];
        let coords = plot_coords(&plots);
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[1].plot_id, 2);
        assert_eq!(coords[1].x, 3.0);
    }
}
