//! Action Space
//!
//! Actions are heading offsets: the center of one of `action_div` equal
//! angular buckets covering (-pi, pi).

use serde::{Deserialize, Serialize};

/// Heading change taken by the agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Bucket center in radians
    pub middle_degree: f64,
}

impl Action {
    pub fn new(middle_degree: f64) -> Self {
        Self { middle_degree }
    }

    /// Unit heading vector (cos, sin)
    pub fn heading(&self) -> (f64, f64) {
        (self.middle_degree.cos(), self.middle_degree.sin())
    }

    /// Heading in degrees, for display
    pub fn degrees(&self) -> f64 {
        self.middle_degree.to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_heading_unit_length() {
        let action = Action::new(PI / 3.0);
        let (c, s) = action.heading();
        assert!(((c * c + s * s) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degrees() {
        let action = Action::new(-PI / 2.0);
        assert!((action.degrees() + 90.0).abs() < 1e-9);
    }
}
