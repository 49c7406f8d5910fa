//! State and Action Grids
//!
//! Builds the discrete state set as a product of four axes:
//!
//! - goal distance: doubling from `min_goal_dist` while below `max_distance`
//! - goal bearing: `theta_goal_div` bucket centers over [0, pi)
//! - human distance: doubling from `min_human_dist` while below `max_distance`
//! - human bearing: `theta_human_div` bucket centers over [0, pi)
//!
//! States are stored with goal distance outermost, then human bearing, then
//! human distance, with goal bearing innermost. Every state field is copied
//! from the axis vectors, so any value taken from a state is bit-identical to
//! the axis entry it came from.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{NavError, Result};
use crate::mdp::core::{Action, State, STATE_AXES};
use crate::validation::{validate_distance_range, validate_division};

/// Axis identifiers in state field order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    GoalDistance,
    GoalBearing,
    HumanDistance,
    HumanBearing,
}

impl Axis {
    pub fn all() -> [Axis; STATE_AXES] {
        [
            Self::GoalDistance,
            Self::GoalBearing,
            Self::HumanDistance,
            Self::HumanBearing,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::GoalDistance => "goal_distance",
            Self::GoalBearing => "goal_bearing",
            Self::HumanDistance => "human_distance",
            Self::HumanBearing => "human_bearing",
        }
    }

    /// Read this axis from a state
    pub fn value(&self, state: &State) -> f64 {
        match self {
            Self::GoalDistance => state.distance_goal,
            Self::GoalBearing => state.theta_goal,
            Self::HumanDistance => state.distance_human,
            Self::HumanBearing => state.theta_human,
        }
    }
}

/// Inputs for building the state grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub theta_human_div: usize,
    pub theta_goal_div: usize,
    pub min_goal_dist: f64,
    pub min_human_dist: f64,
    /// Upper bound (exclusive) shared by both distance axes
    pub max_distance: f64,
}

impl GridSpec {
    pub fn validate(&self) -> Result<()> {
        validate_division(self.theta_human_div, "theta_human_div")?;
        validate_division(self.theta_goal_div, "theta_goal_div")?;
        validate_distance_range(self.min_goal_dist, self.max_distance, "min_goal_dist")?;
        validate_distance_range(self.min_human_dist, self.max_distance, "min_human_dist")?;
        Ok(())
    }
}

/// Sorted values of each axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAxes {
    pub goal_distances: Vec<f64>,
    pub goal_bearings: Vec<f64>,
    pub human_distances: Vec<f64>,
    pub human_bearings: Vec<f64>,
}

impl GridAxes {
    pub fn values(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::GoalDistance => &self.goal_distances,
            Axis::GoalBearing => &self.goal_bearings,
            Axis::HumanDistance => &self.human_distances,
            Axis::HumanBearing => &self.human_bearings,
        }
    }

    /// Number of states in the full product
    pub fn state_count(&self) -> usize {
        Axis::all().iter().map(|a| self.values(*a).len()).product()
    }
}

/// Immutable, fully enumerated state grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateGrid {
    axes: GridAxes,
    states: Vec<State>,
}

impl StateGrid {
    /// Assemble a grid from its axes and ordered states.
    ///
    /// Every axis must be non-empty and strictly ascending, there must be one
    /// state per axis combination, and every state field must be an axis value.
    pub fn from_parts(axes: GridAxes, states: Vec<State>) -> Result<Self> {
        for axis in Axis::all() {
            let values = axes.values(axis);
            if values.is_empty() {
                return Err(NavError::Configuration(format!(
                    "{} axis is empty",
                    axis.name()
                )));
            }
            if !values.windows(2).all(|w| w[0] < w[1]) {
                return Err(NavError::Configuration(format!(
                    "{} axis must be strictly ascending",
                    axis.name()
                )));
            }
        }

        if states.len() != axes.state_count() {
            return Err(NavError::Configuration(format!(
                "grid has {} states, axes describe {}",
                states.len(),
                axes.state_count()
            )));
        }

        for state in &states {
            if let Some(axis) = Axis::all()
                .into_iter()
                .find(|axis| !axes.values(*axis).contains(&axis.value(state)))
            {
                return Err(NavError::Configuration(format!(
                    "state ({}) has a {} outside its axis",
                    state,
                    axis.name()
                )));
            }
        }

        Ok(Self { axes, states })
    }

    pub fn axes(&self) -> &GridAxes {
        &self.axes
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&State> {
        self.states.get(index)
    }

    /// Compose per-axis indices into a grid index.
    ///
    /// `indices` is in state field order (dg, tg, dh, th); the result follows
    /// the storage nesting (dg, th, dh, tg).
    pub fn compose_index(&self, indices: [usize; STATE_AXES]) -> Result<usize> {
        let [dg, tg, dh, th] = indices;
        for (axis, index) in Axis::all().iter().zip(indices) {
            let len = self.axes.values(*axis).len();
            if index >= len {
                return Err(NavError::IndexOutOfRange {
                    kind: axis.name(),
                    index,
                    len,
                });
            }
        }

        let n_tg = self.axes.goal_bearings.len();
        let n_dh = self.axes.human_distances.len();
        let n_th = self.axes.human_bearings.len();
        Ok(((dg * n_th + th) * n_dh + dh) * n_tg + tg)
    }

    /// Inverse of [`compose_index`](Self::compose_index)
    pub fn decompose_index(&self, index: usize) -> Result<[usize; STATE_AXES]> {
        if index >= self.states.len() {
            return Err(NavError::IndexOutOfRange {
                kind: "state",
                index,
                len: self.states.len(),
            });
        }

        let n_tg = self.axes.goal_bearings.len();
        let n_dh = self.axes.human_distances.len();
        let n_th = self.axes.human_bearings.len();

        let tg = index % n_tg;
        let rest = index / n_tg;
        let dh = rest % n_dh;
        let rest = rest / n_dh;
        let th = rest % n_th;
        let dg = rest / n_th;
        Ok([dg, tg, dh, th])
    }

    /// Linear search for an exactly equal state
    pub fn position(&self, state: &State) -> Option<usize> {
        self.states.iter().position(|s| s == state)
    }
}

/// Center of bucket `i` of `n` equal buckets over [0, pi)
pub fn half_turn_center(i: usize, n: usize) -> f64 {
    let change = 1.0 / n as f64;
    (change / 2.0 + i as f64 * change) * PI
}

/// Center of bucket `i` of `n` equal buckets over (-pi, pi)
pub fn full_turn_center(i: usize, n: usize) -> f64 {
    let change = 2.0 / n as f64;
    (-1.0 + change / 2.0 + i as f64 * change) * PI
}

/// Doubling sequence `min, 2*min, 4*min, ...` strictly below `max`
pub fn doubling_axis(min: f64, max: f64) -> Vec<f64> {
    let mut values = Vec::new();
    let mut current = min;
    while current < max {
        values.push(current);
        current *= 2.0;
    }
    values
}

/// Build the ordered state grid
pub fn build_states(spec: &GridSpec) -> Result<StateGrid> {
    spec.validate()?;

    let axes = GridAxes {
        goal_distances: doubling_axis(spec.min_goal_dist, spec.max_distance),
        goal_bearings: (0..spec.theta_goal_div)
            .map(|j| half_turn_center(j, spec.theta_goal_div))
            .collect(),
        human_distances: doubling_axis(spec.min_human_dist, spec.max_distance),
        human_bearings: (0..spec.theta_human_div)
            .map(|i| half_turn_center(i, spec.theta_human_div))
            .collect(),
    };

    for axis in Axis::all() {
        debug!(axis = axis.name(), values = ?axes.values(axis), "grid axis");
    }

    let mut states = Vec::with_capacity(axes.state_count());
    for &dg in &axes.goal_distances {
        for &th in &axes.human_bearings {
            for &dh in &axes.human_distances {
                for &tg in &axes.goal_bearings {
                    states.push(State::new(dg, tg, dh, th));
                }
            }
        }
    }

    info!(
        states = states.len(),
        goal_distances = axes.goal_distances.len(),
        human_distances = axes.human_distances.len(),
        "Built state grid"
    );

    StateGrid::from_parts(axes, states)
}

/// Build the ordered action set
pub fn build_actions(action_div: usize) -> Result<Vec<Action>> {
    validate_division(action_div, "action_div")?;

    let actions: Vec<Action> = (0..action_div)
        .map(|i| Action::new(full_turn_center(i, action_div)))
        .collect();

    info!(actions = actions.len(), "Built action set");
    Ok(actions)
}
