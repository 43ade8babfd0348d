use clap::Parser;

use std::path::PathBuf;

use crate::config::Config;
use crate::pipeline::{self, RunOptions};

/// Concatenates the audio tracks in a directory into one stream, packs it
/// with a static cover image into a video, and prints the tracklist
#[derive(Parser)]
#[command(name = "videopack")]
#[command(version = "0.1")]
pub struct Cli {
    /// Directory containing the audio tracks
    pub directory: PathBuf,

    /// Cover image path (default: <directory>/cover.jpg)
    #[arg(short, long)]
    pub cover: Option<PathBuf>,

    /// Skip video composition; the concatenated audio is the final artifact
    #[arg(short, long)]
    pub disable_cover: bool,

    /// Trim leading and trailing silence from every track
    #[arg(short, long)]
    pub trim_silence: bool,

    /// Path of the composed video; the audio artifact lands next to it
    #[arg(short, long, default_value = "output.mp4")]
    pub output: PathBuf,

    /// How many tracks to normalize in parallel
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Per-invocation media engine timeout, in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Path to an optional config TOML file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load(cli.config.as_deref())?;
    if let Some(timeout) = cli.timeout {
        cfg.engine.timeout_secs = Some(timeout);
    }

    let options = RunOptions {
        directory: cli.directory,
        cover: cli.cover,
        disable_cover: cli.disable_cover,
        trim_silence: cli.trim_silence,
        output: cli.output,
        jobs: cli.jobs.max(1),
    };

    let report = pipeline::run(&options, &cfg)?;

    // stdout carries the tracklist and nothing else
    for entry in &report.tracklist {
        println!("{entry}");
    }

    Ok(())
}
