use thiserror::Error;

use std::path::PathBuf;

use crate::engine::EngineError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("no files found under {}", .0.display())]
    EmptyDirectory(PathBuf),

    #[error("no audio tracks found under {}", .0.display())]
    NoAudioTracks(PathBuf),

    #[error("failed to normalize {}: {source}", .path.display())]
    Normalization {
        path: PathBuf,
        source: EngineError,
    },

    #[error("concatenation failed: {reason}")]
    Concatenation { reason: String },

    #[error("cover image not found: {}", .0.display())]
    CoverNotFound(PathBuf),

    #[error("media engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
