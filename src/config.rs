use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::mdp::{DegeneracyPolicy, NavEnvConfig, Point, QuantizerKind};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: NavEnvConfig,
    #[serde(default)]
    pub kinematics: KinematicsConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct KinematicsConfig {
    /// Handling of a zero x component when recomputing bearings
    #[serde(default)]
    pub on_degenerate: DegeneracyPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    /// Quantizer used for the transition build (axis, scan)
    #[serde(default)]
    pub quantizer: QuantizerKind,
    /// Fan the build out over worker threads
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_parallel() -> bool {
    true
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            quantizer: QuantizerKind::Axis,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory for exported states, actions and transitions
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./model")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Filter built from the configured level alone, applied to every target
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::new(&self.level)
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("environment.min_goal_dist", crate::mdp::MIN_GOAL_DIST)?
            .set_default("environment.min_human_dist", crate::mdp::MIN_HUMAN_DIST)?
            .set_default("kinematics.on_degenerate", "clamp")?
            .set_default("build.quantizer", "axis")?
            .set_default("build.parallel", true)?
            .set_default("output.dir", "./model")?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/large.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("NAVMDP_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (NAVMDP_ENVIRONMENT__ACTION_DIV, etc.)
            .add_source(
                Environment::with_prefix("NAVMDP")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Load a single TOML file, without environment overrides
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    /// Create a default configuration for CLI usage
    pub fn default_config() -> Self {
        Self {
            environment: NavEnvConfig {
                delta_distance: 0.5,
                action_div: 8,
                theta_human_div: 4,
                theta_goal_div: 4,
                start_point: Point::new(0.0, 0.0),
                goal_point: Point::new(3.0, 4.0),
                min_goal_dist: crate::mdp::MIN_GOAL_DIST,
                min_human_dist: crate::mdp::MIN_HUMAN_DIST,
            },
            kinematics: KinematicsConfig::default(),
            build: BuildConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let env = &self.environment;

        if !(env.delta_distance.is_finite() && env.delta_distance > 0.0) {
            errors.push(format!("delta_distance must be positive: {}", env.delta_distance));
        }

        for (name, count) in [
            ("action_div", env.action_div),
            ("theta_human_div", env.theta_human_div),
            ("theta_goal_div", env.theta_goal_div),
        ] {
            if count == 0 {
                errors.push(format!("{name} must be greater than zero"));
            }
        }

        let max_distance = env.max_distance();
        if !(max_distance.is_finite() && max_distance > 0.0) {
            errors.push("start_point and goal_point must be distinct finite points".to_string());
        }

        for (name, min) in [
            ("min_goal_dist", env.min_goal_dist),
            ("min_human_dist", env.min_human_dist),
        ] {
            if !(min.is_finite() && min > 0.0) {
                errors.push(format!("{name} must be positive: {min}"));
            } else if min >= max_distance {
                errors.push(format!(
                    "{name} ({min}) must be less than max_distance ({max_distance}), the axis would be empty"
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
