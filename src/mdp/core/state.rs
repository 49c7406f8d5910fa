//! State Representation
//!
//! The navigation state is four geometric quantities relative to the agent:
//! distance and bearing to the goal, distance and bearing to the human.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of axes in a state
pub const STATE_AXES: usize = 4;

/// Planar coordinate used to size the distance axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Agent state relative to goal and human
///
/// Equality is exact on all four fields. Grid states are only ever compared
/// against values copied out of the grid itself, never recomputed ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Distance to goal
    pub distance_goal: f64,
    /// Bearing to goal (radians)
    pub theta_goal: f64,
    /// Distance to human
    pub distance_human: f64,
    /// Bearing to human (radians, folded into [0, pi))
    pub theta_human: f64,
}

impl State {
    pub fn new(distance_goal: f64, theta_goal: f64, distance_human: f64, theta_human: f64) -> Self {
        Self {
            distance_goal,
            theta_goal,
            distance_human,
            theta_human,
        }
    }

    /// Fields in storage order: dg, tg, dh, th
    pub fn to_array(&self) -> [f64; STATE_AXES] {
        [
            self.distance_goal,
            self.theta_goal,
            self.distance_human,
            self.theta_human,
        ]
    }

    /// All four fields are finite
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }

    /// Goal offset in the agent frame
    pub fn goal_offset(&self) -> (f64, f64) {
        polar_to_cartesian(self.distance_goal, self.theta_goal)
    }

    /// Human offset in the agent frame
    pub fn human_offset(&self) -> (f64, f64) {
        polar_to_cartesian(self.distance_human, self.theta_human)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dg: {}, tg: {}, dh: {}, th: {}",
            self.distance_goal, self.theta_goal, self.distance_human, self.theta_human
        )
    }
}

fn polar_to_cartesian(distance: f64, theta: f64) -> (f64, f64) {
    (distance * theta.cos(), distance * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert!((b.distance_to(&a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_offsets() {
        let state = State::new(2.0, 0.0, 1.0, FRAC_PI_2);
        let (gx, gy) = state.goal_offset();
        assert!((gx - 2.0).abs() < 1e-12);
        assert!(gy.abs() < 1e-12);

        let (hx, hy) = state.human_offset();
        assert!(hx.abs() < 1e-12);
        assert!((hy - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_exact_equality() {
        let a = State::new(0.1, 0.2, 0.3, 0.4);
        let b = State::new(0.1, 0.2, 0.3, 0.4 + 1e-15);
        assert_eq!(a, a);
        assert_ne!(a, b);
    }

    #[test]
    fn test_non_finite_detection() {
        assert!(State::new(0.1, 0.2, 0.3, 0.4).is_finite());
        assert!(!State::new(f64::NAN, 0.2, 0.3, 0.4).is_finite());
    }
}
