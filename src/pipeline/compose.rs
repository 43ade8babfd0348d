//! Muxes the concatenated audio with a looped still image into a video.

use std::{ffi::OsStr, path::Path};

use crate::{engine::Engine, pipeline::error::PipelineError};

/// Produces `dest` from a still image and an audio file. The image loop is
/// unbounded, so `-shortest` bounds the output to the audio length.
pub fn compose(
    engine: &Engine,
    image: &Path,
    audio: &Path,
    dest: &Path,
) -> Result<(), PipelineError> {
    if !image.exists() {
        return Err(PipelineError::CoverNotFound(image.to_path_buf()));
    }

    log::info!("composing {} + {} into {}", image.display(), audio.display(), dest.display());
    engine.ffmpeg([
        OsStr::new("-loop"),
        OsStr::new("1"),
        OsStr::new("-i"),
        image.as_os_str(),
        OsStr::new("-i"),
        audio.as_os_str(),
        OsStr::new("-shortest"),
        dest.as_os_str(),
    ])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn test_missing_cover_is_rejected_without_running_ffmpeg() {
        // a broken binary path proves the engine is never reached
        let engine = Engine::new(&EngineConfig {
            ffmpeg: "/definitely/not/a/binary".to_string(),
            ffprobe: "/definitely/not/a/binary".to_string(),
            timeout_secs: None,
        });

        let err = compose(
            &engine,
            Path::new("/definitely/not/here/cover.jpg"),
            Path::new("/tmp/audio.flac"),
            Path::new("/tmp/out.mp4"),
        )
        .unwrap_err();

        match err {
            PipelineError::CoverNotFound(path) => {
                assert_eq!(path, Path::new("/definitely/not/here/cover.jpg"));
            }
            other => panic!("expected CoverNotFound, got {other:?}"),
        }
    }

    #[cfg(unix)]
    mod scripted {
        use super::*;
        use std::path::PathBuf;
        use tempfile::tempdir;

        fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
            use std::os::unix::fs::PermissionsExt;

            let path = dir.join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path
        }

        #[test]
        fn test_compose_creates_the_video() {
            let bin = tempdir().unwrap();
            let workspace = tempdir().unwrap();

            let ffmpeg = write_script(bin.path(), "ffmpeg", "for last; do :; done\n: > \"$last\"");
            let engine = Engine::new(&EngineConfig {
                ffmpeg: ffmpeg.to_string_lossy().into_owned(),
                ffprobe: ffmpeg.to_string_lossy().into_owned(),
                timeout_secs: None,
            });

            let cover = workspace.path().join("cover.jpg");
            std::fs::write(&cover, b"jpeg").unwrap();
            let dest = workspace.path().join("out.mp4");

            compose(&engine, &cover, Path::new("/tmp/audio.flac"), &dest).unwrap();

            assert!(dest.exists());
        }
    }
}
