use crate::algorithm::{NearestCandidate, SpatialIndex};
use crate::bounds::BoundingBox;
use crate::error::{GraphError, check_query};
use crate::point::Point;

/// A spatial index based on a uniform grid over the bounding box of the points.
///
/// This structure divides the plane into a fixed number of bins. It is generally faster
/// than the k-d tree for uniform samples when the query radius is close to the bin size,
/// but degrades when the radius spans many bins.
#[derive(Clone, Debug)]
pub struct UniformGrid {
    points: Vec<Point>,
    /// Region covered by the bins: the points' bounding box with degenerate axes widened.
    bounds: BoundingBox,
    /// Number of bins along the X axis.
    grid_res_x: usize,
    /// Number of bins along the Y axis.
    grid_res_y: usize,
    /// Scale factor for X coordinate to grid index.
    grid_scale_x: f64,
    /// Scale factor for Y coordinate to grid index.
    grid_scale_y: f64,
    /// Maximum valid index for X.
    grid_limit_x: f64,
    /// Maximum valid index for Y.
    grid_limit_y: f64,
    /// The grid bins, each containing a list of point indices.
    grid_bins: Vec<Vec<usize>>,
    /// Tight box of the points in each bin, `None` for empty bins.
    bin_bounds: Vec<Option<BoundingBox>>,
    /// Precomputed search order for visiting neighboring bins, with the squared lower bound
    /// on the distance from anywhere in the centre bin to anywhere in the offset bin.
    bin_search_order: Vec<(isize, isize, f64)>,
}

impl UniformGrid {
    /// Creates a grid with `nx` x `ny` bins over the bounding box of `points`.
    pub fn with_resolution(points: Vec<Point>, nx: usize, ny: usize) -> Self {
        let nx = nx.max(1);
        let ny = ny.max(1);

        let mut bounds = BoundingBox::from_points(&points).unwrap_or_default();
        for axis in 0..2 {
            if bounds.max[axis] <= bounds.min[axis] {
                bounds.max[axis] = bounds.min[axis] + 1.0;
            }
        }

        let sx = (nx as f64) / bounds.width();
        let sy = (ny as f64) / bounds.height();
        let cell_size_x = 1.0 / sx;
        let cell_size_y = 1.0 / sy;

        // Rounding in bin assignment can push a point a hair across its nominal bin edge.
        let magnitude = bounds.min.iter().chain(bounds.max.iter()).fold(0.0_f64, |m, v| m.max(v.abs()));
        let pad = |cell: f64| cell * 1e-9 + magnitude * 4.0 * f64::EPSILON;
        let (pad_x, pad_y) = (pad(cell_size_x), pad(cell_size_y));

        let get_min_dist_sq = |dx: isize, dy: isize| {
            let mx = ((dx.unsigned_abs().saturating_sub(1)) as f64 * cell_size_x - pad_x).max(0.0);
            let my = ((dy.unsigned_abs().saturating_sub(1)) as f64 * cell_size_y - pad_y).max(0.0);
            mx * mx + my * my
        };

        let mut bin_search_order = Vec::with_capacity((2 * nx + 1) * (2 * ny + 1));
        let rx = nx as isize;
        let ry = ny as isize;
        for y in -ry..=ry {
            for x in -rx..=rx {
                bin_search_order.push((x, y, get_min_dist_sq(x, y)));
            }
        }
        bin_search_order.sort_unstable_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal));

        let mut grid = UniformGrid {
            points,
            bounds,
            grid_res_x: nx,
            grid_res_y: ny,
            grid_scale_x: sx,
            grid_scale_y: sy,
            grid_limit_x: (nx as f64) - 1e-5,
            grid_limit_y: (ny as f64) - 1e-5,
            grid_bins: vec![Vec::new(); nx * ny],
            bin_bounds: vec![None; nx * ny],
            bin_search_order,
        };

        for i in 0..grid.points.len() {
            let p = grid.points[i];
            let bin_idx = grid.get_bin_index(&p);
            grid.grid_bins[bin_idx].push(i);
            match &mut grid.bin_bounds[bin_idx] {
                Some(b) => b.expand_to(&p),
                slot => *slot = Some(BoundingBox::new([p.x, p.y], [p.x, p.y])),
            }
        }
        grid
    }

    pub fn resolution(&self) -> (usize, usize) {
        (self.grid_res_x, self.grid_res_y)
    }

    /// Bin coordinates of `p`, clamped onto the grid.
    fn get_bin_coords(&self, p: &Point) -> (usize, usize) {
        let ix = ((p.x - self.bounds.min[0]) * self.grid_scale_x).clamp(0.0, self.grid_limit_x) as usize;
        let iy = ((p.y - self.bounds.min[1]) * self.grid_scale_y).clamp(0.0, self.grid_limit_y) as usize;
        (ix, iy)
    }

    /// Calculates the linear index of the bin corresponding to the given coordinates.
    pub fn get_bin_index(&self, p: &Point) -> usize {
        let (ix, iy) = self.get_bin_coords(p);
        ix + iy * self.grid_res_x
    }

    /// Walk the bins outward from the bin of `query`, nearest first.
    ///
    /// The query is projected onto the grid region first. For a point inside that region the
    /// projection is no farther away than the query itself, so the precomputed bound stays valid.
    /// `visitor` is given each non-empty bin within `max_dist_sq` and returns the new
    /// squared search radius.
    fn visit_bins<F>(&self, query: &Point, mut max_dist_sq: f64, mut visitor: F)
    where
        F: FnMut(usize, &BoundingBox) -> f64,
    {
        let projected = Point::new(
            query.x.clamp(self.bounds.min[0], self.bounds.max[0]),
            query.y.clamp(self.bounds.min[1], self.bounds.max[1]),
        );
        let (idx_x, idx_y) = self.get_bin_coords(&projected);

        for &(dx, dy, min_d2) in &self.bin_search_order {
            if min_d2 > max_dist_sq {
                break;
            }

            let bx = idx_x as isize + dx;
            let by = idx_y as isize + dy;
            if bx < 0 || bx >= self.grid_res_x as isize || by < 0 || by >= self.grid_res_y as isize {
                continue;
            }

            let bin_index = (bx as usize) + (by as usize) * self.grid_res_x;
            if let Some(bin_box) = &self.bin_bounds[bin_index] {
                max_dist_sq = visitor(bin_index, bin_box);
            }
        }
    }
}

impl SpatialIndex for UniformGrid {
    /// Grid with `ceil(sqrt(n))` bins per axis, about one point per bin for uniform samples.
    fn build(points: Vec<Point>) -> Self {
        let res = (points.len() as f64).sqrt().ceil().max(1.0) as usize;
        Self::with_resolution(points, res, res)
    }

    fn points(&self) -> &[Point] {
        &self.points
    }

    fn visit_within<F>(&self, query: Point, radius: f64, mut visitor: F)
    where
        F: FnMut(usize, Point),
    {
        let radius_sq = radius * radius;
        // Compare against a slightly widened bound; the exact test happens per point.
        let reach_sq = radius_sq * (1.0 + 1e-9) + f64::MIN_POSITIVE;
        self.visit_bins(&query, reach_sq, |bin_index, bin_box| {
            if bin_box.distance_sq_to(&query).sqrt() <= radius {
                for &j in &self.grid_bins[bin_index] {
                    let p = self.points[j];
                    if query.distance(&p) <= radius {
                        visitor(j, p);
                    }
                }
            }
            reach_sq
        });
    }

    fn nearest(&self, query: Point) -> Result<(usize, Point), GraphError> {
        if self.points.is_empty() {
            return Err(GraphError::EmptyIndex);
        }
        check_query(&query)?;
        let mut best = NearestCandidate::none();
        self.visit_bins(&query, f64::INFINITY, |bin_index, bin_box| {
            // Equal distance is still scanned: a tied point with a lower index may be inside.
            if bin_box.distance_sq_to(&query) <= best.dist_sq {
                for &j in &self.grid_bins[bin_index] {
                    best.offer(j, query.distance_sq(&self.points[j]));
                }
            }
            best.dist_sq
        });
        best.resolve(&self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_indexing_2d() {
        let points = vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        let grid = UniformGrid::with_resolution(points, 10, 10); // 1x1 cells

        assert_eq!(grid.get_bin_index(&Point::new(0.5, 0.5)), 0);
        assert_eq!(grid.get_bin_index(&Point::new(1.5, 0.5)), 1);
        assert_eq!(grid.get_bin_index(&Point::new(0.5, 1.5)), 10);
        // Upper edge is clamped into the last bin
        assert_eq!(grid.get_bin_index(&Point::new(10.0, 10.0)), 99);
    }

    #[test]
    fn test_grid_neighbors_2d() {
        let points = vec![Point::new(0.5, 0.5), Point::new(1.5, 0.5), Point::new(2.9, 2.9)];
        let grid = UniformGrid::with_resolution(points, 3, 3);

        let mut neighbors = Vec::new();
        grid.visit_within(Point::new(0.5, 0.5), 1.0, |idx, _| neighbors.push(idx));
        neighbors.sort_unstable();
        assert_eq!(neighbors, vec![0, 1]);
        assert_eq!(grid.radius_pairs(1.0).unwrap(), vec![(0, 1)]);
    }

    #[test]
    fn test_grid_degenerate_extent() {
        // Collinear points give a zero-height bounding box.
        let points = vec![Point::new(0.0, 2.0), Point::new(1.0, 2.0), Point::new(3.0, 2.0)];
        let grid = UniformGrid::build(points);
        assert_eq!(grid.radius_pairs(1.0).unwrap(), vec![(0, 1)]);
        assert_eq!(grid.nearest(Point::new(2.2, -7.0)).unwrap().0, 2);
    }

    #[test]
    fn test_grid_nearest_outside() {
        let points = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0), Point::new(1.0, 1.0)];
        let grid = UniformGrid::with_resolution(points, 2, 2);
        assert_eq!(grid.nearest(Point::new(5.0, 5.0)).unwrap().0, 3);
        assert_eq!(grid.nearest(Point::new(-5.0, 0.4)).unwrap().0, 0);
        assert_eq!(grid.nearest(Point::new(0.5, 0.5)).unwrap().0, 0);
        assert_eq!(UniformGrid::build(Vec::new()).nearest(Point::new(0.0, 0.0)), Err(GraphError::EmptyIndex));
    }
}
