use crate::models::{Point, PlotWindow};

/// Point-in-rectangle lookups over a community's points.
///
/// Points are kept sorted by x so a query only scans the x-slab of the
/// rectangle. Bounds are inclusive on both axes: a point on an edge shared by
/// two overlapping plots belongs to both.
pub struct SpatialIndex<'a> {
    points: &'a [Point],
    /// Point indices ordered by x
    order: Vec<usize>,
    /// x coordinates in `order` order
    xs: Vec<f64>,
}

impl<'a> SpatialIndex<'a> {
    pub fn new(points: &'a [Point]) -> Self {
        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by(|&a, &b| points[a].x.total_cmp(&points[b].x));
        let xs = order.iter().map(|&i| points[i].x).collect();
        Self { points, order, xs }
    }

    /// Indices of all points inside `window`, in ascending index order.
    pub fn points_in(&self, window: &PlotWindow) -> Vec<usize> {
        let lo = self.xs.partition_point(|&x| x < window.xmin);
        let hi = self.xs.partition_point(|&x| x <= window.xmax);
        if lo >= hi {
            return Vec::new();
        }
        let mut hits: Vec<usize> = self.order[lo..hi]
            .iter()
            .copied()
            .filter(|&i| {
                let y = self.points[i].y;
                y >= window.ymin && y <= window.ymax
            })
            .collect();
        hits.sort_unstable();
        hits
    }

    pub fn points(&self) -> &'a [Point] {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
