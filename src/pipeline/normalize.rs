//! Per-track normalization: every track is rewritten to the canonical
//! intermediate (FLAC, 44.1 kHz, stereo) so concat-by-copy is safe later,
//! optionally trimming leading and trailing silence on the way.

use rayon::prelude::*;

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{
    config::SilenceConfig,
    domain::track::{self, Track},
    engine::Engine,
    pipeline::error::PipelineError,
};

/// Which transformation the run applies to every track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Reencode to the canonical intermediate, nothing else
    Reencode,
    /// Reencode and strip leading/trailing silence
    TrimSilence,
}

/// The silenceremove chain, applied twice around a stream reversal: the
/// first pass strips leading silence, the reversed second pass strips what
/// was originally the trailing silence, and the final areverse restores
/// playback order.
fn silence_filter(silence: &SilenceConfig) -> String {
    let pass = format!(
        "silenceremove=start_periods=1:start_duration={}:start_threshold={}dB:detection=peak,\
         aformat=sample_fmts=dblp,areverse",
        silence.min_duration_secs, silence.threshold_db
    );
    format!("{pass},{pass}")
}

/// ffmpeg arguments for one normalization: input, optional silence filter,
/// then the canonical audio-only FLAC parameters and the destination.
fn normalize_args(
    source: &Path,
    dest: &Path,
    mode: Mode,
    silence: &SilenceConfig,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-i".into(), source.as_os_str().to_os_string()];
    if mode == Mode::TrimSilence {
        args.push("-af".into());
        args.push(silence_filter(silence).into());
    }
    for arg in ["-vn", "-acodec", "flac", "-ar", "44100", "-ac", "2"] {
        args.push(arg.into());
    }
    args.push(dest.as_os_str().to_os_string());
    args
}

/// Normalizes one track and probes the result.
///
/// `position` is the 1-based index in playback order, used both for the
/// normalized file name upstream and the placeholder title.
fn normalize_track(
    engine: &Engine,
    source: &Path,
    dest: &Path,
    mode: Mode,
    silence: &SilenceConfig,
    position: usize,
) -> Result<Track, PipelineError> {
    let wrap = |source_err| PipelineError::Normalization {
        path: source.to_path_buf(),
        source: source_err,
    };

    engine
        .ffmpeg(normalize_args(source, dest, mode, silence))
        .map_err(wrap)?;

    // duration must come from the normalized file: trimming changed it
    let format = engine.probe(dest).map_err(wrap)?;
    let duration_secs = format.duration_secs().map_err(wrap)?;
    let title = track::resolve_title(&format.tags, position);

    log::info!(
        "normalized {} ({duration_secs:.1}s, {title:?})",
        source.display()
    );

    Ok(Track {
        source: source.to_path_buf(),
        normalized: dest.to_path_buf(),
        duration_secs,
        title,
    })
}

/// Normalizes every source track into `workspace`, returning tracks in the
/// same order as `sources`.
///
/// With `jobs` > 1 normalization runs on a bounded worker pool; results are
/// still collected in input order, never completion order. The first failure
/// aborts the whole batch.
pub fn normalize_all(
    engine: &Engine,
    sources: &[PathBuf],
    workspace: &Path,
    mode: Mode,
    silence: &SilenceConfig,
    jobs: usize,
) -> Result<Vec<Track>, PipelineError> {
    let planned: Vec<(usize, &PathBuf, PathBuf)> = sources
        .iter()
        .enumerate()
        .map(|(index, source)| (index + 1, source, workspace.join(format!("{index:03}.flac"))))
        .collect();

    if jobs <= 1 {
        return planned
            .iter()
            .map(|(position, source, dest)| {
                normalize_track(engine, source, dest, mode, silence, *position)
            })
            .collect();
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|err| PipelineError::Internal(err.into()))?;

    pool.install(|| {
        planned
            .par_iter()
            .map(|(position, source, dest)| {
                normalize_track(engine, source, dest, mode, silence, *position)
            })
            .collect()
    })
}
