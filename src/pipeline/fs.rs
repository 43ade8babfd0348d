//! Finds the files under the input directory and picks out the audio tracks

use walkdir::WalkDir;

use std::path::{Path, PathBuf};

use crate::pipeline::error::PipelineError;

/// Recursively collects every regular file under `root`, as absolute paths.
///
/// Fails when `root` does not resolve to a directory or when the walk finds
/// no files at all. Entries that cannot be read mid-walk are logged and
/// skipped.
pub fn scan_files(root: &Path, follow_symlinks: bool) -> Result<Vec<PathBuf>, PipelineError> {
    if !root.is_dir() {
        return Err(PipelineError::NotADirectory(root.to_path_buf()));
    }
    // absolute paths keep the ordering stable no matter how the directory
    // was spelled on the command line
    let base = root.canonicalize()?;

    let files = WalkDir::new(&base)
        .follow_links(follow_symlinks)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("skipping an entry under {}: {err}", base.display());
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .collect::<Vec<_>>();

    if files.is_empty() {
        return Err(PipelineError::EmptyDirectory(root.to_path_buf()));
    }
    Ok(files)
}

/// Whether the file name ends with one of the recognized audio extensions.
/// The comparison is byte-exact: ".MP3" only counts if configured.
pub fn is_audio_file(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

/// Filters the discovered files down to audio tracks, sorted ascending by
/// the full path string. This order decides both the concatenation order
/// and the tracklist, so it must not depend on filesystem enumeration.
pub fn audio_tracks(files: &[PathBuf], extensions: &[String]) -> Vec<PathBuf> {
    let mut tracks: Vec<PathBuf> = files
        .iter()
        .filter(|path| is_audio_file(path, extensions))
        .cloned()
        .collect();
    tracks.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    tracks
}
