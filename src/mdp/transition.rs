//! Transition Model
//!
//! Dense successor table `T[s][a] = s'` over every grid state and action.
//! Rows are independent, so the build fans out over source states with rayon;
//! each worker reads the shared environment and owns its own output row.

use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info};

use crate::error::{NavError, Result};
use crate::mdp::environment::NavigationEnvironment;
use crate::mdp::quantizer::{Quantizer, QuantizerKind};

/// Deterministic transition table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionModel {
    num_states: usize,
    num_actions: usize,
    /// Row-major `[state][action]` successor indices
    successors: Vec<usize>,
}

impl TransitionModel {
    /// Build from per-state rows
    pub fn from_rows(rows: Vec<Vec<usize>>, num_actions: usize) -> Result<Self> {
        let num_states = rows.len();
        let mut successors = Vec::with_capacity(num_states * num_actions);
        for (state, row) in rows.into_iter().enumerate() {
            if row.len() != num_actions {
                return Err(NavError::Configuration(format!(
                    "row {} has {} actions, expected {}",
                    state,
                    row.len(),
                    num_actions
                )));
            }
            if let Some(&bad) = row.iter().find(|&&s| s >= num_states) {
                return Err(NavError::IndexOutOfRange {
                    kind: "successor",
                    index: bad,
                    len: num_states,
                });
            }
            successors.extend(row);
        }

        Ok(Self {
            num_states,
            num_actions,
            successors,
        })
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Shape of the equivalent one-hot tensor
    pub fn shape(&self) -> [usize; 3] {
        [self.num_states, self.num_actions, self.num_states]
    }

    /// Successor index of `state` under `action`
    pub fn successor(&self, state: usize, action: usize) -> Option<usize> {
        if state >= self.num_states || action >= self.num_actions {
            return None;
        }
        Some(self.successors[state * self.num_actions + action])
    }

    /// Successors of `state` for every action
    pub fn row(&self, state: usize) -> Option<&[usize]> {
        if state >= self.num_states {
            return None;
        }
        let start = state * self.num_actions;
        Some(&self.successors[start..start + self.num_actions])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[usize]> {
        self.successors.chunks(self.num_actions.max(1))
    }

    /// One-hot distribution over successors for `(state, action)`
    pub fn one_hot(&self, state: usize, action: usize) -> Option<Vec<f64>> {
        let next = self.successor(state, action)?;
        let mut probs = vec![0.0; self.num_states];
        probs[next] = 1.0;
        Some(probs)
    }

    /// Flattened `[S, A, S]` one-hot tensor
    pub fn dense_one_hot(&self) -> Vec<f64> {
        let n = self.num_states;
        let mut dense = vec![0.0; self.successors.len() * n];
        for (cell, &next) in self.successors.iter().enumerate() {
            dense[cell * n + next] = 1.0;
        }
        dense
    }

    /// Number of `(state, action)` pairs that stay in place
    pub fn self_loops(&self) -> usize {
        self.successors
            .iter()
            .enumerate()
            .filter(|&(cell, &next)| cell / self.num_actions == next)
            .count()
    }
}

/// Builds a [`TransitionModel`] from an environment
#[derive(Debug, Clone, Copy)]
pub struct TransitionModelBuilder {
    quantizer: QuantizerKind,
    parallel: bool,
}

impl Default for TransitionModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionModelBuilder {
    pub fn new() -> Self {
        Self {
            quantizer: QuantizerKind::default(),
            parallel: true,
        }
    }

    pub fn quantizer(mut self, quantizer: QuantizerKind) -> Self {
        self.quantizer = quantizer;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Step and quantize every `(state, action)` pair with the configured quantizer
    pub fn build(&self, env: &NavigationEnvironment) -> Result<TransitionModel> {
        let quantizer = self.quantizer.create();
        self.build_with(env, quantizer.as_ref())
    }

    /// Step and quantize every `(state, action)` pair with `quantizer`.
    ///
    /// Any error aborts the whole build.
    pub fn build_with(
        &self,
        env: &NavigationEnvironment,
        quantizer: &dyn Quantizer,
    ) -> Result<TransitionModel> {
        let started = Instant::now();
        let num_states = env.states().len();
        let num_actions = env.actions().len();

        info!(
            states = num_states,
            actions = num_actions,
            quantizer = quantizer.name(),
            parallel = self.parallel,
            "Building transition model"
        );

        let row = |state: usize| -> Result<Vec<usize>> {
            (0..num_actions)
                .map(|action| env.transition_index(state, action, quantizer))
                .collect()
        };

        let rows: Result<Vec<Vec<usize>>> = if self.parallel {
            (0..num_states).into_par_iter().map(row).collect()
        } else {
            (0..num_states).map(row).collect()
        };

        let rows = rows.map_err(|e| {
            error!(error = %e, "Transition model build aborted");
            e
        })?;
        let model = TransitionModel::from_rows(rows, num_actions)?;

        info!(
            self_loops = model.self_loops(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Built transition model"
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdp::core::State;
    use crate::mdp::environment::NavEnvConfig;
    use crate::mdp::grid::StateGrid;
    use crate::mdp::kinematics::DegeneracyPolicy;
    use crate::mdp::quantizer::LinearScanQuantizer;

    /// Rejects every state it is asked to place
    struct FailingQuantizer;

    impl Quantizer for FailingQuantizer {
        fn quantize_index(&self, state: &State, _grid: &StateGrid) -> Result<usize> {
            Err(NavError::Quantization {
                candidate: state.to_string(),
            })
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn env() -> NavigationEnvironment {
        NavigationEnvironment::new(NavEnvConfig::default(), DegeneracyPolicy::Clamp).unwrap()
    }

    #[test]
    fn test_model_shape() {
        let env = env();
        let model = TransitionModelBuilder::new().build(&env).unwrap();
        let n = env.states().len();
        assert_eq!(model.shape(), [n, env.actions().len(), n]);
        assert_eq!(model.rows().count(), n);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let env = env();
        let parallel = TransitionModelBuilder::new().build(&env).unwrap();
        let sequential = TransitionModelBuilder::new()
            .parallel(false)
            .quantizer(QuantizerKind::Scan)
            .build(&env)
            .unwrap();
        assert_eq!(parallel, sequential);
        let injected = TransitionModelBuilder::new()
            .parallel(false)
            .build_with(&env, &LinearScanQuantizer)
            .unwrap();
        assert_eq!(parallel, injected);
    }

    #[test]
    fn test_quantization_error_aborts_build() {
        let env = env();
        for parallel in [true, false] {
            let result = TransitionModelBuilder::new()
                .parallel(parallel)
                .build_with(&env, &FailingQuantizer);
            assert!(
                matches!(result, Err(NavError::Quantization { .. })),
                "parallel = {}",
                parallel
            );
        }
    }

    #[test]
    fn test_rejected_degeneracy_aborts_build() {
        // goal at (0.1, pi/2) under heading pi/2 with a half step of 0.1 lands on x == 0
        let config = NavEnvConfig {
            delta_distance: 0.2,
            action_div: 2,
            theta_goal_div: 1,
            ..NavEnvConfig::default()
        };
        let env = NavigationEnvironment::new(config, DegeneracyPolicy::Reject).unwrap();
        for parallel in [true, false] {
            let result = TransitionModelBuilder::new().parallel(parallel).build(&env);
            assert!(
                matches!(result, Err(NavError::NumericDegeneracy { .. })),
                "parallel = {}",
                parallel
            );
        }
    }

    #[test]
    fn test_dense_one_hot() {
        let model = TransitionModel::from_rows(vec![vec![1, 0], vec![1, 1]], 2).unwrap();
        let dense = model.dense_one_hot();
        assert_eq!(dense.len(), 2 * 2 * 2);
        assert_eq!(dense, vec![0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0]);
        assert_eq!(model.one_hot(0, 1), Some(vec![1.0, 0.0]));
        assert_eq!(model.self_loops(), 3);
    }

    #[test]
    fn test_from_rows_validates() {
        assert!(TransitionModel::from_rows(vec![vec![0, 5]], 2).is_err());
        // a single state whose successor points past the table
        assert!(matches!(
            TransitionModel::from_rows(vec![vec![5]], 1),
            Err(NavError::IndexOutOfRange { kind: "successor", index: 5, len: 1 })
        ));
        assert!(TransitionModel::from_rows(vec![vec![0]], 2).is_err());
    }

    #[test]
    fn test_lookup_bounds() {
        let model = TransitionModel::from_rows(vec![vec![0, 0]], 2).unwrap();
        assert_eq!(model.successor(0, 1), Some(0));
        assert_eq!(model.successor(1, 0), None);
        assert_eq!(model.successor(0, 2), None);
        assert!(model.row(1).is_none());
    }
}
