use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::error::{NavError, Result};
use crate::export::save_model;
use crate::mdp::{Axis, NavigationEnvironment, QuantizerKind, TransitionModelBuilder};

#[derive(Parser)]
#[command(name = "navmdp")]
#[command(version = "0.1.0")]
#[command(about = "Build a discretized goal/human navigation MDP", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file path (falls back to ./config and NAVMDP_* variables)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enumerate states and actions, build the transition table and export it
    Build {
        /// Output directory (overrides output.dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Quantizer to use (axis, scan)
        #[arg(short, long)]
        quantizer: Option<QuantizerKind>,
        /// Build on a single thread
        #[arg(long)]
        sequential: bool,
    },
    /// Print axis values and model sizes
    Inspect,
    /// Show the successor of one grid state under one action
    Step {
        /// Source state index
        #[arg(short, long)]
        state: usize,
        /// Action index
        #[arg(short, long)]
        action: usize,
        /// Quantizer to use (axis, scan)
        #[arg(short, long)]
        quantizer: Option<QuantizerKind>,
    },
}

impl Cli {
    /// Resolve configuration from the CLI flag or the layered sources
    pub fn load_config(&self) -> Result<AppConfig> {
        let config = match &self.config {
            Some(path) => AppConfig::load_file(path)?,
            None => AppConfig::load()?,
        };

        config
            .validate()
            .map_err(|errors| NavError::Configuration(errors.join("; ")))?;
        Ok(config)
    }
}

fn environment(config: &AppConfig) -> Result<NavigationEnvironment> {
    NavigationEnvironment::new(config.environment.clone(), config.kinematics.on_degenerate)
}

/// Build the full model and write it to disk
pub fn run_build(
    config: &AppConfig,
    output: Option<PathBuf>,
    quantizer: Option<QuantizerKind>,
    sequential: bool,
) -> Result<()> {
    let env = environment(config)?;
    let model = TransitionModelBuilder::new()
        .quantizer(quantizer.unwrap_or(config.build.quantizer))
        .parallel(config.build.parallel && !sequential)
        .build(&env)?;

    let dir = output.unwrap_or_else(|| config.output.dir.clone());
    let exported = save_model(&dir, &env, &model)?;

    println!("States:      {}", env.states().len());
    println!("Actions:     {}", env.actions().len());
    println!("Self loops:  {}", model.self_loops());
    println!("Wrote {}", exported.states.display());
    println!("Wrote {}", exported.actions.display());
    println!("Wrote {}", exported.transitions.display());
    Ok(())
}

/// Print the grid layout
pub fn run_inspect(config: &AppConfig) -> Result<()> {
    let env = environment(config)?;
    let axes = env.grid().axes();

    println!("Max distance: {:.4}", env.config().max_distance());
    for axis in Axis::all() {
        let values: Vec<String> = axes
            .values(axis)
            .iter()
            .map(|v| format!("{:.4}", v))
            .collect();
        println!("{:<15} [{}] {}", axis.name(), values.len(), values.join(", "));
    }

    let actions: Vec<String> = env
        .actions()
        .iter()
        .map(|a| format!("{:.1}", a.degrees()))
        .collect();
    println!("{:<15} [{}] {}", "actions (deg)", actions.len(), actions.join(", "));
    println!("States: {}", env.states().len());
    Ok(())
}

/// Print one transition
pub fn run_step(
    config: &AppConfig,
    state: usize,
    action: usize,
    quantizer: Option<QuantizerKind>,
) -> Result<()> {
    let env = environment(config)?;
    let quantizer = quantizer.unwrap_or(config.build.quantizer).create();

    let from = *env.state(state)?;
    let act = *env.action(action)?;
    let continuous = env.step(&from, &act)?;
    let next = env.transition_index(state, action, quantizer.as_ref())?;

    println!("From     [{}] {}", state, from);
    println!("Action   [{}] {:.1} deg", action, act.degrees());
    println!("Step         {}", continuous);
    println!("Grid     [{}] {}", next, env.grid().states()[next]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_build() {
        let cli = Cli::parse_from(["navmdp", "build", "--quantizer", "scan", "--sequential"]);
        match cli.command {
            Some(Commands::Build {
                quantizer,
                sequential,
                output,
            }) => {
                assert_eq!(quantizer, Some(QuantizerKind::Scan));
                assert!(sequential);
                assert!(output.is_none());
            }
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn test_load_config_failures_surface_before_logging() {
        let dir = tempfile::tempdir().unwrap();

        let missing = Cli::parse_from([
            "navmdp",
            "--config",
            dir.path().join("absent.toml").to_str().unwrap(),
            "inspect",
        ]);
        assert!(matches!(missing.load_config(), Err(NavError::Config(_))));

        let path = dir.path().join("invalid.toml");
        std::fs::write(
            &path,
            r#"
[environment]
delta_distance = 0.5
action_div = 0
theta_human_div = 4
theta_goal_div = 4
start_point = { x = 0.0, y = 0.0 }
goal_point = { x = 1.0, y = 0.0 }
"#,
        )
        .unwrap();
        let invalid = Cli::parse_from(["navmdp", "--config", path.to_str().unwrap(), "inspect"]);
        match invalid.load_config() {
            Err(NavError::Configuration(message)) => assert!(message.contains("action_div")),
            other => panic!("expected configuration error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_run_build_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default_config();
        config.environment.goal_point = crate::mdp::Point::new(1.0, 0.0);

        run_build(&config, Some(dir.path().to_path_buf()), None, true).unwrap();
        assert!(dir.path().join(crate::export::STATES_FILE).exists());
        assert!(dir.path().join(crate::export::ACTIONS_FILE).exists());
        assert!(dir.path().join(crate::export::TRANSITIONS_FILE).exists());
    }
}
