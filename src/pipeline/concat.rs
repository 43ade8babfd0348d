//! Joins the normalized tracks into one audio stream with ffmpeg's concat
//! demuxer. Copy-concat is safe because every input went through the same
//! canonical intermediate first.

use std::{ffi::OsStr, fs::File, path::Path};

use crate::{domain::track::Track, engine::Engine, pipeline::error::PipelineError};

/// Concatenates `tracks` in order into `dest`, using `list_path` (inside the
/// temp workspace) for the demuxer's list file.
pub fn concat(
    engine: &Engine,
    tracks: &[Track],
    list_path: &Path,
    dest: &Path,
) -> Result<(), PipelineError> {
    if tracks.is_empty() {
        return Err(PipelineError::Concatenation {
            reason: "no input tracks".to_string(),
        });
    }
    // catch a missing intermediate here, with a useful path, instead of
    // letting ffmpeg fail on the list file
    for track in tracks {
        File::open(&track.normalized).map_err(|err| PipelineError::Concatenation {
            reason: format!("cannot read {}: {err}", track.normalized.display()),
        })?;
    }

    std::fs::write(list_path, render_list(tracks))?;

    log::info!("concatenating {} tracks into {}", tracks.len(), dest.display());
    engine.ffmpeg([
        OsStr::new("-f"),
        OsStr::new("concat"),
        OsStr::new("-safe"),
        OsStr::new("0"),
        OsStr::new("-i"),
        list_path.as_os_str(),
        OsStr::new("-c"),
        OsStr::new("copy"),
        dest.as_os_str(),
    ])?;
    Ok(())
}

/// Renders the concat demuxer list: one `file '<path>'` line per track, in
/// track order.
fn render_list(tracks: &[Track]) -> String {
    let mut list = String::new();
    for track in tracks {
        let path = track.normalized.to_string_lossy();
        list.push_str(&format!("file '{}'\n", escape_path(&path)));
    }
    list
}

/// The demuxer reads single-quoted strings; a quote inside the path has to
/// close the string, emit an escaped quote, and reopen it.
fn escape_path(path: &str) -> String {
    path.replace('\'', r"'\''")
}
