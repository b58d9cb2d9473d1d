use super::PositionFilter;
use crate::{
    constants::{EXPONENTIAL_ALPHA_MAX, EXPONENTIAL_ALPHA_MIN},
    landmarks::Point2D,
    Error, Result,
};

/// Exponential smoothing filter
pub struct ExponentialFilter {
    alpha: f64,
    last: Option<Point2D>,
}

impl ExponentialFilter {
    /// Create a filter with smoothing factor `alpha` in (0, 1]
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if alpha is outside (0, 1].
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha > EXPONENTIAL_ALPHA_MIN && alpha <= EXPONENTIAL_ALPHA_MAX) {
            return Err(Error::FilterError(format!("Alpha must be in (0, 1], got {alpha}")));
        }
        Ok(Self { alpha, last: None })
    }
}

impl PositionFilter for ExponentialFilter {
    fn apply(&mut self, position: Point2D) -> Point2D {
        let filtered = match self.last {
            Some(last) => Point2D::new(
                self.alpha * position.x + (1.0 - self.alpha) * last.x,
                self.alpha * position.y + (1.0 - self.alpha) * last.y,
            ),
            None => position,
        };
        self.last = Some(filtered);
        filtered
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "ExponentialFilter"
    }
}
