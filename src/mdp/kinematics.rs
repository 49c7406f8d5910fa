//! Kinematic Step
//!
//! One deterministic move of the agent along an action heading. The goal
//! offset shrinks by half a step, the human offset by a full step.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::{NavError, Result};
use crate::mdp::core::{Action, State};
use crate::validation::validate_positive;

/// What to do when a bearing's x component is exactly zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegeneracyPolicy {
    /// Use +pi/2 or -pi/2 by the sign of y (zero counts as positive)
    #[default]
    Clamp,
    /// Fail with `NumericDegeneracy`
    Reject,
}

/// Deterministic one-step motion model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicStep {
    delta_distance: f64,
    policy: DegeneracyPolicy,
}

impl KinematicStep {
    pub fn new(delta_distance: f64, policy: DegeneracyPolicy) -> Result<Self> {
        validate_positive(delta_distance, "delta_distance")?;
        Ok(Self {
            delta_distance,
            policy,
        })
    }

    pub fn delta_distance(&self) -> f64 {
        self.delta_distance
    }

    pub fn policy(&self) -> DegeneracyPolicy {
        self.policy
    }

    /// Apply `action` to `state`, returning the continuous (off-grid) successor
    pub fn step(&self, state: &State, action: &Action) -> Result<State> {
        let (cos_a, sin_a) = action.heading();
        let (dgx, dgy) = state.goal_offset();
        let (dhx, dhy) = state.human_offset();

        let half = self.delta_distance / 2.0;
        let dgxn = dgx - half * cos_a;
        let dgyn = dgy - half * sin_a;

        let dhxn = dhx - self.delta_distance * cos_a;
        let dhyn = dhy - self.delta_distance * sin_a;

        let tgn = self.bearing(dgyn, dgxn, "goal")?;
        let dgn = dgxn.hypot(dgyn);

        let thn = fold_half_turn(self.bearing(dhyn, dhxn, "human")?);
        let dhn = dhxn.hypot(dhyn);

        let next = State::new(dgn, tgn, dhn, thn);
        trace!(from = %state, to = %next, action = action.middle_degree, "kinematic step");
        Ok(next)
    }

    /// Plain arctangent of y/x (not quadrant aware)
    fn bearing(&self, y: f64, x: f64, axis: &'static str) -> Result<f64> {
        if x != 0.0 {
            return Ok((y / x).atan());
        }

        match self.policy {
            DegeneracyPolicy::Clamp => {
                warn!(axis, y, "zero x component in bearing, clamping");
                Ok(if y < 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 })
            }
            DegeneracyPolicy::Reject => Err(NavError::NumericDegeneracy {
                axis,
                context: format!("x component is zero (y = {})", y),
            }),
        }
    }
}

/// Fold a bearing from atan's range into [0, pi)
pub fn fold_half_turn(theta: f64) -> f64 {
    let folded = if theta < 0.0 { theta + PI } else { theta };
    // theta + pi can round up to exactly pi for tiny negative theta
    if folded >= PI {
        folded - PI
    } else {
        folded
    }
}
