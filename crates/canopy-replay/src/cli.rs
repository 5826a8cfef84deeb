use std::path::PathBuf;

use clap::Parser;

/// Drive a headless view controller from a JSON script and print what it
/// sends to the remote side.
#[derive(Parser, Debug)]
#[command(name = "canopy-replay", version, about)]
pub struct Args {
    /// Script to replay.
    pub script: PathBuf,

    /// Config file path (TOML). Built-in defaults when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter override (e.g. debug, canopy_view=trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Include platform calls in every step report.
    #[arg(long)]
    pub ops: bool,

    /// Write the last painted frame to this PNG file.
    #[arg(long)]
    pub frame: Option<PathBuf>,
}

pub fn parse() -> Args {
    Args::parse()
}
