//! Navigation MDP Module
//!
//! Discretized model of an agent moving toward a goal while tracking a
//! nearby human.
//!
//! # Pipeline
//!
//! - **Grid**: states as a product of log-spaced distances and bucketed bearings
//! - **Kinematics**: one deterministic step along an action heading
//! - **Quantization**: nearest grid state for a continuous successor
//! - **Transitions**: dense `T[s][a] = s'` table built in parallel

pub mod core;
pub mod environment;
pub mod grid;
pub mod kinematics;
pub mod quantizer;
pub mod transition;

// Core exports
pub use self::core::{Action, Point, State, STATE_AXES};

pub use environment::{NavEnvConfig, NavigationEnvironment, MIN_GOAL_DIST, MIN_HUMAN_DIST};
pub use grid::{build_actions, build_states, Axis, GridAxes, GridSpec, StateGrid};
pub use kinematics::{DegeneracyPolicy, KinematicStep};
pub use quantizer::{
    closest_index, AxisQuantizer, LinearScanQuantizer, Quantizer, QuantizerKind,
};
pub use transition::{TransitionModel, TransitionModelBuilder};
