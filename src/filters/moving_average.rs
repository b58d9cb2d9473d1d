use super::PositionFilter;
use crate::{constants::MAX_HISTORY_WINDOW, landmarks::Point2D, Error, Result};
use std::collections::VecDeque;

/// Moving average over the last few positions
pub struct MovingAverageFilter {
    window_size: usize,
    history: VecDeque<Point2D>,
}

impl MovingAverageFilter {
    /// Create a filter averaging up to `window_size` samples (1..=5)
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if the window size is zero or above five.
    pub fn new(window_size: usize) -> Result<Self> {
        if window_size == 0 || window_size > MAX_HISTORY_WINDOW {
            return Err(Error::FilterError(format!(
                "Window size must be between 1 and {MAX_HISTORY_WINDOW}, got {window_size}"
            )));
        }
        Ok(Self {
            window_size,
            history: VecDeque::with_capacity(window_size),
        })
    }

    /// Samples currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether no sample is held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl PositionFilter for MovingAverageFilter {
    fn apply(&mut self, position: Point2D) -> Point2D {
        if self.history.len() >= self.window_size {
            self.history.pop_front();
        }
        self.history.push_back(position);

        let n = self.history.len() as f64;
        let (sum_x, sum_y) = self
            .history
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point2D::new(sum_x / n, sum_y / n)
    }

    fn reset(&mut self) {
        self.history.clear();
    }

    fn name(&self) -> &str {
        "MovingAverageFilter"
    }
}
