//! Thin runner around the external media engine (ffmpeg/ffprobe)

use serde::Deserialize;
use thiserror::Error;

use std::{
    collections::HashMap,
    ffi::{OsStr, OsString},
    io::Read,
    path::Path,
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

use crate::config::EngineConfig;

/// How many bytes of the child's stderr are kept in error messages
const STDERR_TAIL: usize = 2048;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{program} did not finish within {timeout:?}")]
    TimedOut { program: String, timeout: Duration },

    #[error("failed to parse {program} output: {source}")]
    Parse {
        program: String,
        source: serde_json::Error,
    },

    #[error("malformed probe data: {0}")]
    Malformed(String),

    #[error("i/o error while running {program}: {source}")]
    Io {
        program: String,
        source: std::io::Error,
    },
}

/// Handle to the configured ffmpeg/ffprobe binaries
#[derive(Debug, Clone)]
pub struct Engine {
    ffmpeg: String,
    ffprobe: String,
    timeout: Option<Duration>,
}

/// The `format` section of ffprobe's JSON output
#[derive(Debug, Deserialize)]
pub struct ProbeFormat {
    pub duration: Option<String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: ProbeFormat,
}

impl ProbeFormat {
    /// Container duration in seconds. ffprobe reports it as a decimal string.
    pub fn duration_secs(&self) -> Result<f64, EngineError> {
        let raw = self
            .duration
            .as_deref()
            .ok_or_else(|| EngineError::Malformed("probe output has no duration".to_string()))?;
        let secs: f64 = raw
            .parse()
            .map_err(|_| EngineError::Malformed(format!("unparsable duration {raw:?}")))?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(EngineError::Malformed(format!(
                "duration out of range: {secs}"
            )));
        }
        Ok(secs)
    }
}

impl Engine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            ffmpeg: config.ffmpeg.clone(),
            ffprobe: config.ffprobe.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }

    /// Runs ffmpeg with the given arguments, discarding its stdout.
    ///
    /// -y keeps a leftover output file from turning into an interactive
    /// overwrite prompt that would hang the run.
    pub fn ffmpeg<I, S>(&self, args: I) -> Result<(), EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut full_args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-y".into(),
        ];
        full_args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self.run(&self.ffmpeg, &full_args)?;
        Ok(())
    }

    /// Probes container-level metadata (duration, tags) of a media file.
    pub fn probe(&self, path: &Path) -> Result<ProbeFormat, EngineError> {
        let args: Vec<OsString> = vec![
            "-loglevel".into(),
            "error".into(),
            "-print_format".into(),
            "json".into(),
            "-show_format".into(),
            path.as_os_str().to_os_string(),
        ];
        let stdout = self.run(&self.ffprobe, &args)?;
        let parsed: ProbeOutput =
            serde_json::from_slice(&stdout).map_err(|source| EngineError::Parse {
                program: self.ffprobe.clone(),
                source,
            })?;
        Ok(parsed.format)
    }

    fn run(&self, program: &str, args: &[OsString]) -> Result<Vec<u8>, EngineError> {
        log::debug!("running: {} {}", program, render_args(args));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: program.to_string(),
                source,
            })?;

        // drain both pipes on their own threads so a chatty child cannot
        // block on a full pipe buffer while we wait for it
        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let status = self.wait(program, &mut child)?;

        let io_err = |source| EngineError::Io {
            program: program.to_string(),
            source,
        };
        let stdout = stdout_reader
            .join()
            .expect("stdout reader thread panicked")
            .map_err(io_err)?;
        let stderr = stderr_reader
            .join()
            .expect("stderr reader thread panicked")
            .map_err(io_err)?;

        if !status.success() {
            return Err(EngineError::Failed {
                program: program.to_string(),
                status,
                stderr: stderr_tail(&stderr),
            });
        }

        Ok(stdout)
    }

    /// Waits for the child, enforcing the configured timeout by polling.
    fn wait(&self, program: &str, child: &mut Child) -> Result<ExitStatus, EngineError> {
        let io_err = |source| EngineError::Io {
            program: program.to_string(),
            source,
        };

        let Some(timeout) = self.timeout else {
            return child.wait().map_err(io_err);
        };

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait().map_err(io_err)? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                // kill and reap; the reader threads see EOF once the pipes close
                let _ = child.kill();
                let _ = child.wait();
                return Err(EngineError::TimedOut {
                    program: program.to_string(),
                    timeout,
                });
            }
            thread::sleep(Duration::from_millis(20));
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(
    pipe: Option<R>,
) -> thread::JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn render_args(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keeps the last part of stderr; ffmpeg prints the actual failure last.
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    if text.len() <= STDERR_TAIL {
        return text.to_string();
    }
    let mut start = text.len() - STDERR_TAIL;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    format!("... {}", &text[start..])
}
