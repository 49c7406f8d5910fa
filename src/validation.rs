/// Parameter validation for model construction
///
/// Every builder checks its inputs here before allocating anything, so a
/// degenerate configuration fails eagerly instead of yielding an empty grid.
use crate::error::{NavError, Result};
use crate::mdp::core::Point;

/// Validate a bucket count (must be at least one)
///
/// # Arguments
/// * `count` - Number of buckets
/// * `field_name` - Name of the field for error messages
pub fn validate_division(count: usize, field_name: &str) -> Result<()> {
    if count == 0 {
        return Err(NavError::Configuration(format!(
            "{} must be greater than zero",
            field_name
        )));
    }

    Ok(())
}

/// Validate a strictly positive, finite real
pub fn validate_positive(value: f64, field_name: &str) -> Result<()> {
    if !value.is_finite() {
        return Err(NavError::Configuration(format!(
            "{} must be finite: {}",
            field_name, value
        )));
    }

    if value <= 0.0 {
        return Err(NavError::Configuration(format!(
            "{} must be positive: {}",
            field_name, value
        )));
    }

    Ok(())
}

/// Validate a doubling distance axis `[min, max)`
///
/// # Returns
/// * `Ok(())` if the axis yields at least one value
/// * `Err` if `min` is not positive or `min >= max`
pub fn validate_distance_range(min: f64, max: f64, field_name: &str) -> Result<()> {
    validate_positive(min, field_name)?;
    validate_positive(max, "max_distance")?;

    if min >= max {
        return Err(NavError::Configuration(format!(
            "{} ({}) must be less than max_distance ({})",
            field_name, min, max
        )));
    }

    Ok(())
}

/// Validate a planar point (both coordinates finite)
pub fn validate_point(point: &Point, field_name: &str) -> Result<()> {
    if !point.x.is_finite() || !point.y.is_finite() {
        return Err(NavError::Configuration(format!(
            "{} has non-finite coordinates: ({}, {})",
            field_name, point.x, point.y
        )));
    }

    Ok(())
}
