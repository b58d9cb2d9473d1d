//! Position smoothing filters.
//!
//! Used by the smoothing jitter policy of the rotation role: every observed
//! index-tip position goes through one filter and rotation deltas are taken
//! between consecutive filtered positions.

/// Exponential moving average filter
pub mod exponential;

/// Moving average over a short position history
pub mod moving_average;

use crate::{
    constants::{DEFAULT_HISTORY_WINDOW, DEFAULT_SMOOTHING_FACTOR},
    landmarks::Point2D,
    Error, Result,
};

/// Trait for all position filters
pub trait PositionFilter: Send + Sync {
    /// Feed one raw position and get the filtered one back
    fn apply(&mut self, position: Point2D) -> Point2D;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes positions through unchanged
pub struct NoFilter;

impl PositionFilter for NoFilter {
    fn apply(&mut self, position: Point2D) -> Point2D {
        position
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

fn parse_param<T: std::str::FromStr>(filter_type: &str, raw: Option<&str>, default: T) -> Result<T> {
    match raw {
        None => Ok(default),
        Some(text) => text
            .parse()
            .map_err(|_| Error::FilterError(format!("Invalid parameter '{text}' for {filter_type}"))),
    }
}

/// Create a position filter from a spec such as `exponential:0.3` or `moving_average:5`
///
/// # Errors
///
/// Returns `FilterError` for unknown names or out-of-range parameters.
pub fn create_filter(spec: &str) -> Result<Box<dyn PositionFilter>> {
    let spec = spec.to_lowercase();
    let mut parts = spec.split(':');
    let name = parts.next().unwrap_or_default();
    let param = parts.next();

    match name {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "exponential" | "ema" => {
            let alpha = parse_param(name, param, DEFAULT_SMOOTHING_FACTOR)?;
            Ok(Box::new(exponential::ExponentialFilter::new(alpha)?))
        }
        "moving_average" | "movingaverage" => {
            let window = parse_param(name, param, DEFAULT_HISTORY_WINDOW)?;
            Ok(Box::new(moving_average::MovingAverageFilter::new(window)?))
        }
        _ => Err(Error::FilterError(format!("Unknown filter type: {spec}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filter() {
        let mut filter = NoFilter;
        let p = filter.apply(Point2D::new(0.1, 0.2));
        assert_eq!(p, Point2D::new(0.1, 0.2));
    }

    #[test]
    fn test_create_filter() {
        assert!(create_filter("none").is_ok());
        assert!(create_filter("exponential").is_ok());
        assert!(create_filter("exponential:0.5").is_ok());
        assert!(create_filter("moving_average:3").is_ok());
        assert!(create_filter("kalman").is_err());
    }

    #[test]
    fn test_create_filter_rejects_bad_parameters() {
        for spec in ["exponential:2.0", "exponential:0", "exponential:abc", "moving_average:0", "moving_average:9"] {
            match create_filter(spec) {
                Err(Error::FilterError(_)) => {}
                Err(other) => panic!("Expected FilterError for {spec}, got {other}"),
                Ok(_) => panic!("Expected error for {spec}"),
            }
        }
    }
}
