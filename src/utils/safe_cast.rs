//! Checked numeric conversions for pixel coordinates

use crate::{Error, Result};

/// Safely convert u32 to i32 with overflow checking
///
/// # Errors
///
/// Returns an error if the value exceeds i32::MAX
pub fn u32_to_i32(value: u32) -> Result<i32> {
    value
        .try_into()
        .map_err(|_| Error::InvalidInput(format!("Value {value} too large to fit in i32")))
}

/// Clamp and convert f64 to i32 for pixel coordinates
///
/// Non-finite input maps to `min`.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
pub fn f64_to_i32_clamp(value: f64, min: i32, max: i32) -> i32 {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    if !value.is_finite() {
        return min;
    }

    let clamped = value.clamp(f64::from(min), f64::from(max));
    (clamped as i32).clamp(min, max)
}

/// Scale a normalized coordinate onto `[0, extent - 1]` pixels
#[must_use]
pub fn normalized_to_pixel(value: f64, extent: u32) -> i32 {
    let max = u32_to_i32(extent.saturating_sub(1)).unwrap_or(i32::MAX);
    f64_to_i32_clamp((value * f64::from(extent)).floor(), 0, max)
}
