//! Navigation Environment
//!
//! Owns the enumerated states and actions together with the motion model,
//! and exposes the discrete transition function used by the model builder.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{NavError, Result};
use crate::mdp::core::{Action, Point, State};
use crate::mdp::grid::{build_actions, build_states, GridSpec, StateGrid};
use crate::mdp::kinematics::{DegeneracyPolicy, KinematicStep};
use crate::mdp::quantizer::Quantizer;
use crate::validation::{validate_division, validate_point, validate_positive};

/// Default lower bound of the goal distance axis
pub const MIN_GOAL_DIST: f64 = 0.1;

/// Default lower bound of the human distance axis
pub const MIN_HUMAN_DIST: f64 = 0.15;

fn default_min_goal_dist() -> f64 {
    MIN_GOAL_DIST
}

fn default_min_human_dist() -> f64 {
    MIN_HUMAN_DIST
}

/// Navigation environment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavEnvConfig {
    /// Distance covered by one step
    pub delta_distance: f64,
    /// Number of heading buckets over (-pi, pi)
    pub action_div: usize,
    /// Number of human bearing buckets over [0, pi)
    pub theta_human_div: usize,
    /// Number of goal bearing buckets over [0, pi)
    pub theta_goal_div: usize,
    /// Agent start position, only used to size the distance axes
    pub start_point: Point,
    /// Goal position, only used to size the distance axes
    pub goal_point: Point,
    #[serde(default = "default_min_goal_dist")]
    pub min_goal_dist: f64,
    #[serde(default = "default_min_human_dist")]
    pub min_human_dist: f64,
}

impl Default for NavEnvConfig {
    fn default() -> Self {
        Self {
            delta_distance: 0.5,
            action_div: 8,
            theta_human_div: 4,
            theta_goal_div: 4,
            start_point: Point::new(0.0, 0.0),
            goal_point: Point::new(1.0, 0.0),
            min_goal_dist: MIN_GOAL_DIST,
            min_human_dist: MIN_HUMAN_DIST,
        }
    }
}

impl NavEnvConfig {
    /// Distance between start and goal, the exclusive bound of both distance axes
    pub fn max_distance(&self) -> f64 {
        self.start_point.distance_to(&self.goal_point)
    }

    pub fn grid_spec(&self) -> GridSpec {
        GridSpec {
            theta_human_div: self.theta_human_div,
            theta_goal_div: self.theta_goal_div,
            min_goal_dist: self.min_goal_dist,
            min_human_dist: self.min_human_dist,
            max_distance: self.max_distance(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_positive(self.delta_distance, "delta_distance")?;
        validate_division(self.action_div, "action_div")?;
        validate_point(&self.start_point, "start_point")?;
        validate_point(&self.goal_point, "goal_point")?;
        if self.max_distance() <= 0.0 {
            return Err(NavError::Configuration(
                "start_point and goal_point must differ".to_string(),
            ));
        }
        self.grid_spec().validate()
    }
}

/// Fully enumerated navigation MDP (without the transition tensor)
#[derive(Debug, Clone)]
pub struct NavigationEnvironment {
    config: NavEnvConfig,
    grid: StateGrid,
    actions: Vec<Action>,
    kinematics: KinematicStep,
}

impl NavigationEnvironment {
    /// Validate the configuration and enumerate states and actions
    pub fn new(config: NavEnvConfig, policy: DegeneracyPolicy) -> Result<Self> {
        config.validate()?;

        let kinematics = KinematicStep::new(config.delta_distance, policy)?;
        let grid = build_states(&config.grid_spec())?;
        let actions = build_actions(config.action_div)?;

        info!(
            states = grid.len(),
            actions = actions.len(),
            max_distance = config.max_distance(),
            "Initialized navigation environment"
        );

        Ok(Self {
            config,
            grid,
            actions,
            kinematics,
        })
    }

    pub fn config(&self) -> &NavEnvConfig {
        &self.config
    }

    pub fn grid(&self) -> &StateGrid {
        &self.grid
    }

    pub fn states(&self) -> &[State] {
        self.grid.states()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn kinematics(&self) -> &KinematicStep {
        &self.kinematics
    }

    pub fn state(&self, index: usize) -> Result<&State> {
        self.grid.get(index).ok_or(NavError::IndexOutOfRange {
            kind: "state",
            index,
            len: self.grid.len(),
        })
    }

    pub fn action(&self, index: usize) -> Result<&Action> {
        self.actions.get(index).ok_or(NavError::IndexOutOfRange {
            kind: "action",
            index,
            len: self.actions.len(),
        })
    }

    /// Continuous successor of `state` under `action`
    pub fn step(&self, state: &State, action: &Action) -> Result<State> {
        self.kinematics.step(state, action)
    }

    /// Grid successor of `state` under `action`
    pub fn transition(
        &self,
        state: &State,
        action: &Action,
        quantizer: &dyn Quantizer,
    ) -> Result<State> {
        let next = self.step(state, action)?;
        quantizer.quantize(&next, &self.grid)
    }

    /// Grid index of the successor of state `state_index` under action `action_index`
    pub fn transition_index(
        &self,
        state_index: usize,
        action_index: usize,
        quantizer: &dyn Quantizer,
    ) -> Result<usize> {
        let state = self.state(state_index)?;
        let action = self.action(action_index)?;
        let next = self.step(state, action)?;
        quantizer.quantize_index(&next, &self.grid)
    }

    /// Uniformly random grid state
    pub fn random_state<R: Rng>(&self, rng: &mut R) -> State {
        let index = rng.gen_range(0..self.grid.len());
        self.grid.states()[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdp::quantizer::{AxisQuantizer, LinearScanQuantizer};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn env() -> NavigationEnvironment {
        NavigationEnvironment::new(NavEnvConfig::default(), DegeneracyPolicy::Clamp).unwrap()
    }

    #[test]
    fn test_max_distance() {
        let config = NavEnvConfig {
            start_point: Point::new(1.0, 1.0),
            goal_point: Point::new(4.0, 5.0),
            ..NavEnvConfig::default()
        };
        assert!((config.max_distance() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_sizes() {
        let env = env();
        // goal: 0.1 0.2 0.4 0.8, human: 0.15 0.3 0.6
        assert_eq!(env.states().len(), 4 * 4 * 3 * 4);
        assert_eq!(env.actions().len(), 8);
    }

    #[test]
    fn test_coincident_points_rejected() {
        let config = NavEnvConfig {
            goal_point: Point::new(0.0, 0.0),
            ..NavEnvConfig::default()
        };
        let result = NavigationEnvironment::new(config, DegeneracyPolicy::Clamp);
        assert!(matches!(result, Err(NavError::Configuration(_))));
    }

    #[test]
    fn test_transition_is_grid_member() {
        let env = env();
        for state in env.states() {
            for action in env.actions() {
                let next = env.transition(state, action, &AxisQuantizer).unwrap();
                assert!(env.grid().position(&next).is_some());
            }
        }
    }

    #[test]
    fn test_quantizers_agree() {
        let env = env();
        for s in 0..env.states().len() {
            for a in 0..env.actions().len() {
                let axis = env.transition_index(s, a, &AxisQuantizer).unwrap();
                let scan = env.transition_index(s, a, &LinearScanQuantizer).unwrap();
                assert_eq!(axis, scan, "state {} action {}", s, a);
            }
        }
    }

    #[test]
    fn test_index_out_of_range() {
        let env = env();
        assert!(env.transition_index(env.states().len(), 0, &AxisQuantizer).is_err());
        assert!(env.transition_index(0, env.actions().len(), &AxisQuantizer).is_err());
    }

    #[test]
    fn test_random_state_is_member() {
        let env = env();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let state = env.random_state(&mut rng);
            assert!(env.grid().position(&state).is_some());
        }
    }
}
