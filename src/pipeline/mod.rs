//! The run itself: discover, order, normalize, concatenate, compose, report.
//!
//! Input validation happens up front, before the media engine does any
//! work; every intermediate lives in a temp workspace that is removed when
//! the run ends, on every path.

pub mod compose;
pub mod concat;
pub mod error;
pub mod fs;
pub mod normalize;
pub mod report;

use std::path::PathBuf;

use crate::{
    config::Config,
    engine::Engine,
    pipeline::{
        error::PipelineError,
        normalize::Mode,
        report::TracklistEntry,
    },
};

/// Per-run knobs coming from the command line
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub directory: PathBuf,
    /// Cover image; defaults to `<directory>/cover.jpg`
    pub cover: Option<PathBuf>,
    /// Skip video composition, keep only the concatenated audio
    pub disable_cover: bool,
    pub trim_silence: bool,
    /// Path of the composed video; the audio artifact lands next to it
    pub output: PathBuf,
    /// Tracks normalized in parallel (1 = sequential)
    pub jobs: usize,
}

/// What a successful run produced
#[derive(Debug)]
pub struct RunReport {
    pub tracklist: Vec<TracklistEntry>,
    pub audio: PathBuf,
    pub video: Option<PathBuf>,
}

pub fn run(options: &RunOptions, config: &Config) -> Result<RunReport, PipelineError> {
    let files = fs::scan_files(&options.directory, config.tracks.follow_symlinks)?;
    let sources = fs::audio_tracks(&files, &config.tracks.extensions);
    if sources.is_empty() {
        return Err(PipelineError::NoAudioTracks(options.directory.clone()));
    }
    log::info!("found {} audio tracks under {}", sources.len(), options.directory.display());

    // fail on a missing cover now, not after minutes of normalization
    let cover = options
        .cover
        .clone()
        .unwrap_or_else(|| options.directory.join("cover.jpg"));
    if !options.disable_cover && !cover.exists() {
        return Err(PipelineError::CoverNotFound(cover));
    }

    let engine = Engine::new(&config.engine);
    // dropped with its contents when the run ends, success or failure
    let workspace = tempfile::TempDir::new()?;

    let mode = if options.trim_silence {
        Mode::TrimSilence
    } else {
        Mode::Reencode
    };
    let tracks = normalize::normalize_all(
        &engine,
        &sources,
        workspace.path(),
        mode,
        &config.silence,
        options.jobs,
    )?;

    let audio = options.output.with_extension("flac");
    concat::concat(
        &engine,
        &tracks,
        &workspace.path().join("concat.txt"),
        &audio,
    )?;

    let video = if options.disable_cover {
        None
    } else {
        compose::compose(&engine, &cover, &audio, &options.output)?;
        Some(options.output.clone())
    };

    Ok(RunReport {
        tracklist: report::tracklist(&tracks),
        audio,
        video,
    })
}
