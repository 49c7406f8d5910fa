//! Core MDP abstractions
//!
//! Value types for states and actions.

pub mod action;
pub mod state;

pub use action::Action;
pub use state::{Point, State, STATE_AXES};
