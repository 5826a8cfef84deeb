//! canopy-replay: run a scripted session against a headless view.
//!
//! Prints one JSON line per step with the messages the view sent to the
//! remote side, so controller behavior can be checked without a window
//! system or a renderer process.

mod cli;
mod runner;
mod script;

use std::process::ExitCode;

use canopy_common::CanopyError;
use canopy_config::ViewConfig;
use tracing_subscriber::EnvFilter;

use crate::runner::{Replay, StepReport};

fn load_config(args: &cli::Args) -> Result<ViewConfig, CanopyError> {
    let Some(path) = &args.config else {
        return Ok(ViewConfig::default());
    };
    let config = canopy_config::load_from_path(path)?;
    canopy_config::validation::validate(&config)?;
    Ok(config)
}

fn init_logging(args: &cli::Args, config: Option<&ViewConfig>) {
    let fallback = config
        .map(|c| format!("canopy={}", c.logging.level.as_directive()))
        .unwrap_or_else(|| "canopy=info".to_owned());
    let filter = match &args.log_level {
        Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|e| {
            eprintln!("ignoring invalid --log-level {directive:?}: {e}");
            EnvFilter::new(&fallback)
        }),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&fallback)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(report: &StepReport) -> Result<(), CanopyError> {
    let line = serde_json::to_string(report).map_err(|e| CanopyError::Other(e.to_string()))?;
    println!("{line}");
    Ok(())
}

fn run(args: &cli::Args, config: ViewConfig) -> Result<(), CanopyError> {
    let script = script::load(&args.script)?;
    tracing::info!(
        script = %args.script.display(),
        steps = script.steps.len(),
        "replaying script"
    );

    let mut replay = Replay::new(&script, config, args.ops)?;
    print_report(&replay.setup_report())?;
    for report in replay.run(&script.steps)? {
        print_report(&report)?;
    }

    if let Some(path) = &args.frame {
        replay
            .frame()
            .save(path)
            .map_err(|e| CanopyError::Other(format!("{}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), "frame written");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = cli::parse();
    let config = load_config(&args);
    init_logging(&args, config.as_ref().ok());

    let result = config.and_then(|config| run(&args, config));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("replay failed: {e}");
            eprintln!("canopy-replay: {e}");
            ExitCode::FAILURE
        }
    }
}
