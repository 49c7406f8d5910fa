pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod mdp;
pub mod validation;

pub use config::AppConfig;
pub use error::{NavError, Result};
pub use export::{save_actions, save_model, save_states, save_transitions, ExportedModel};
pub use mdp::{
    Action, AxisQuantizer, DegeneracyPolicy, KinematicStep, LinearScanQuantizer, NavEnvConfig,
    NavigationEnvironment, Point, Quantizer, QuantizerKind, State, StateGrid, TransitionModel,
    TransitionModelBuilder,
};
