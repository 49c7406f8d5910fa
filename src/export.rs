//! Model Export
//!
//! Writes states, actions and transitions as JSON for downstream learners.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::mdp::{Action, NavigationEnvironment, State, TransitionModel};

pub const STATES_FILE: &str = "states.json";
pub const ACTIONS_FILE: &str = "actions.json";
pub const TRANSITIONS_FILE: &str = "transitions.json";

/// On-disk layout of the transition table
#[derive(Debug, Serialize)]
struct TransitionsFile<'a> {
    /// `[states, actions, states]` shape of the one-hot tensor
    shape: [usize; 3],
    /// `successors[s][a]` is the successor state index
    successors: Vec<&'a [usize]>,
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
    }

    let file = fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Save the ordered state list
pub fn save_states(path: &Path, states: &[State]) -> Result<()> {
    write_json(path, states)?;
    info!(path = %path.display(), count = states.len(), "Saved states");
    Ok(())
}

/// Save the ordered action list
pub fn save_actions(path: &Path, actions: &[Action]) -> Result<()> {
    write_json(path, actions)?;
    info!(path = %path.display(), count = actions.len(), "Saved actions");
    Ok(())
}

/// Save the successor table
pub fn save_transitions(path: &Path, model: &TransitionModel) -> Result<()> {
    let file = TransitionsFile {
        shape: model.shape(),
        successors: model.rows().collect(),
    };
    write_json(path, &file)?;
    info!(path = %path.display(), shape = ?model.shape(), "Saved transitions");
    Ok(())
}

/// Paths written by [`save_model`]
#[derive(Debug, Clone)]
pub struct ExportedModel {
    pub states: PathBuf,
    pub actions: PathBuf,
    pub transitions: PathBuf,
}

/// Save states, actions and transitions into `dir`
pub fn save_model(
    dir: &Path,
    env: &NavigationEnvironment,
    model: &TransitionModel,
) -> Result<ExportedModel> {
    let exported = ExportedModel {
        states: dir.join(STATES_FILE),
        actions: dir.join(ACTIONS_FILE),
        transitions: dir.join(TRANSITIONS_FILE),
    };

    save_states(&exported.states, env.states())?;
    save_actions(&exported.actions, env.actions())?;
    save_transitions(&exported.transitions, model)?;
    Ok(exported)
}
