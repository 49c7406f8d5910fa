//! State Quantization
//!
//! Projects a continuous state back onto the grid. Each axis is resolved to
//! its nearest axis value independently and the four choices are recombined.
//!
//! Nearest-value rules shared by both quantizers:
//! - below the first axis value clamps to the first
//! - above the last axis value clamps to the last
//! - an exact midpoint resolves to the lower value

use tracing::{error, trace};

use crate::error::{NavError, Result};
use crate::mdp::core::{State, STATE_AXES};
use crate::mdp::grid::{Axis, StateGrid};

/// Maps continuous states to grid members
pub trait Quantizer: Send + Sync {
    /// Index of the grid state nearest to `state`
    fn quantize_index(&self, state: &State, grid: &StateGrid) -> Result<usize>;

    /// Grid state nearest to `state`
    fn quantize(&self, state: &State, grid: &StateGrid) -> Result<State> {
        let index = self.quantize_index(state, grid)?;
        grid.get(index).copied().ok_or(NavError::IndexOutOfRange {
            kind: "state",
            index,
            len: grid.len(),
        })
    }

    fn name(&self) -> &'static str;
}

/// Which quantizer a build uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantizerKind {
    /// Binary search per axis and direct index composition
    #[default]
    Axis,
    /// Synchronized linear scan with an exact-match confirmation pass
    Scan,
}

impl QuantizerKind {
    pub fn create(self) -> Box<dyn Quantizer> {
        match self {
            Self::Axis => Box::new(AxisQuantizer),
            Self::Scan => Box::new(LinearScanQuantizer),
        }
    }
}

impl std::str::FromStr for QuantizerKind {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "axis" => Ok(Self::Axis),
            "scan" => Ok(Self::Scan),
            other => Err(NavError::Configuration(format!(
                "unknown quantizer '{}', expected 'axis' or 'scan'",
                other
            ))),
        }
    }
}

/// Index of the element of `sorted` nearest to `value`
///
/// `sorted` must be ascending and non-empty.
pub fn closest_index(value: f64, sorted: &[f64]) -> usize {
    let pos = sorted.partition_point(|v| *v < value);
    if pos == 0 {
        return 0;
    }
    if pos == sorted.len() {
        return pos - 1;
    }

    let before = sorted[pos - 1];
    let after = sorted[pos];
    if after - value < value - before {
        pos
    } else {
        pos - 1
    }
}

fn ensure_quantizable(state: &State, grid: &StateGrid) -> Result<()> {
    if grid.is_empty() {
        return Err(NavError::Configuration(
            "cannot quantize against an empty grid".to_string(),
        ));
    }
    if !state.is_finite() {
        return Err(NavError::NumericDegeneracy {
            axis: "state",
            context: format!("non-finite state ({})", state),
        });
    }
    Ok(())
}

/// Binary search on each sorted axis, then compose the axis indices
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisQuantizer;

impl Quantizer for AxisQuantizer {
    fn quantize_index(&self, state: &State, grid: &StateGrid) -> Result<usize> {
        ensure_quantizable(state, grid)?;

        let mut indices = [0usize; STATE_AXES];
        for (slot, axis) in indices.iter_mut().zip(Axis::all()) {
            *slot = closest_index(axis.value(state), grid.axes().values(axis));
        }
        grid.compose_index(indices)
    }

    fn name(&self) -> &'static str {
        "axis"
    }
}

/// Single synchronized pass over the stored states
///
/// For each axis, the first stored state whose value is not less than the
/// target is compared with its predecessor in storage order. The recombined
/// candidate is then confirmed by an exact-match scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearScanQuantizer;

impl LinearScanQuantizer {
    /// Per-axis indices into the stored state list, in state field order
    pub fn axis_positions(&self, state: &State, grid: &StateGrid) -> [usize; STATE_AXES] {
        let states = grid.states();
        let axes = Axis::all();
        let target = state.to_array();
        let mut found: [Option<usize>; STATE_AXES] = [None; STATE_AXES];

        for (i, candidate) in states.iter().enumerate() {
            for (k, axis) in axes.iter().enumerate() {
                if found[k].is_some() || target[k] > axis.value(candidate) {
                    continue;
                }
                found[k] = Some(if i == 0 {
                    0
                } else {
                    let here = (target[k] - axis.value(candidate)).abs();
                    let prev = (target[k] - axis.value(&states[i - 1])).abs();
                    if here < prev {
                        i
                    } else {
                        i - 1
                    }
                });
            }

            if found.iter().all(Option::is_some) {
                break;
            }
        }

        // Anything never reached clamps to the last stored state
        let last = states.len() - 1;
        found.map(|f| f.unwrap_or(last))
    }
}

impl Quantizer for LinearScanQuantizer {
    fn quantize_index(&self, state: &State, grid: &StateGrid) -> Result<usize> {
        ensure_quantizable(state, grid)?;

        let [dg, tg, dh, th] = self.axis_positions(state, grid);
        let states = grid.states();
        let candidate = State::new(
            states[dg].distance_goal,
            states[tg].theta_goal,
            states[dh].distance_human,
            states[th].theta_human,
        );
        trace!(input = %state, %candidate, "scan quantizer candidate");

        match grid.position(&candidate) {
            Some(index) => Ok(index),
            None => {
                error!(%candidate, "no grid state matches quantization candidate");
                Err(NavError::Quantization {
                    candidate: candidate.to_string(),
                })
            }
        }
    }

    fn name(&self) -> &'static str {
        "scan"
    }
}
