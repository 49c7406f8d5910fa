use clap::Parser;
use navmdp::cli::{self, Cli, Commands};
use navmdp::config::LoggingConfig;
use navmdp::error::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            // no configured level to honor yet, report through the defaults
            init_logging(&LoggingConfig::default());
            return Err(e);
        }
    };
    init_logging(&config.logging);

    match cli.command {
        Some(Commands::Build {
            output,
            quantizer,
            sequential,
        }) => {
            cli::run_build(&config, output, quantizer, sequential)?;
        }
        Some(Commands::Inspect) => {
            cli::run_inspect(&config)?;
        }
        Some(Commands::Step {
            state,
            action,
            quantizer,
        }) => {
            cli::run_step(&config, state, action, quantizer)?;
        }
        None => {
            info!("No command given, building with configured defaults");
            cli::run_build(&config, None, None, false)?;
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| logging.env_filter());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
