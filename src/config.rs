use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub tracks: TracksConfig,
    #[serde(default)]
    pub silence: SilenceConfig,
}

impl Config {
    /// Loads the config TOML, or built-in defaults when no file is given
    pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
        let Some(path) = path else {
            return Ok(Config::default());
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| "failed to parse config TOML")
    }
}

/// Which binaries to call for media work, and how long to wait for them
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub ffmpeg: String,
    pub ffprobe: String,
    pub timeout_secs: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TracksConfig {
    /// File name suffixes treated as audio tracks (matched case-sensitively)
    pub extensions: Vec<String>,
    pub follow_symlinks: bool,
}

impl Default for TracksConfig {
    fn default() -> Self {
        Self {
            extensions: vec![".flac".to_string(), ".mp3".to_string(), ".m4a".to_string()],
            follow_symlinks: false,
        }
    }
}

/// Parameters of the silenceremove pass used by --trim-silence
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SilenceConfig {
    pub threshold_db: f64,
    pub min_duration_secs: f64,
}

impl Default for SilenceConfig {
    fn default() -> Self {
        Self {
            threshold_db: -60.0,
            min_duration_secs: 1.0,
        }
    }
}
