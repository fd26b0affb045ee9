use crate::bounds::BoundingBox;
use crate::error::GraphError;
use crate::point::Point;
use rand::Rng;

/// Draws point sets uniformly at random from a rectangle.
#[derive(Clone, Copy, Debug)]
pub struct PointSampler {
    bounds: BoundingBox,
}

impl PointSampler {
    /// Sampler over `bounds`. Fails unless the box has positive, finite extent on both axes.
    pub fn new(bounds: BoundingBox) -> Result<Self, GraphError> {
        let (w, h) = (bounds.width(), bounds.height());
        if !(w.is_finite() && w > 0.0 && h.is_finite() && h > 0.0) {
            return Err(GraphError::invalid(format!(
                "sampling region must have positive width and height, got {w} x {h}"
            )));
        }
        Ok(Self { bounds })
    }

    /// Sampler over the unit square.
    pub fn unit() -> Self {
        Self { bounds: BoundingBox::unit() }
    }

    /// Sampler over `[0, width) x [0, height)`.
    pub fn rect(width: f64, height: f64) -> Result<Self, GraphError> {
        Self::new(BoundingBox::from_size(width, height))
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Draw `n` points, each coordinate independently from `[min, max)`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Result<Vec<Point>, GraphError> {
        if n == 0 {
            return Err(GraphError::invalid("number of points must be positive"));
        }
        let b = &self.bounds;
        let points = (0..n)
            .map(|_| {
                let x = rng.gen_range(b.min[0]..b.max[0]);
                let y = rng.gen_range(b.min[1]..b.max[1]);
                Point::new(x, y)
            })
            .collect();
        Ok(points)
    }
}

/// Draw `n` points from `[0, width) x [0, height)`.
pub fn sample<R: Rng + ?Sized>(rng: &mut R, n: usize, width: f64, height: f64) -> Result<Vec<Point>, GraphError> {
    PointSampler::rect(width, height)?.sample(rng, n)
}
