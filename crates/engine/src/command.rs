//! Engine process invocation
//!
//! Every call into ffmpeg/ffprobe goes through [`Engine::run`]: argument
//! vectors (never a shell), piped stdio, and an explicit exit-status check
//! with the stderr tail attached to failures.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured output of one engine invocation.
#[derive(Debug)]
pub struct EngineOutput {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error (ffmpeg writes its progress log here).
    pub stderr: String,
}

/// Handle to the external transcoding engine binaries.
#[derive(Debug, Clone)]
pub struct Engine {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Engine {
    /// Binaries from `VIDPACK_FFMPEG` / `VIDPACK_FFPROBE`, defaulting to
    /// `ffmpeg` / `ffprobe` on PATH.
    #[must_use]
    pub fn from_env() -> Self {
        let var = |name: &str, default: &str| {
            std::env::var(name)
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map_or_else(|| PathBuf::from(default), PathBuf::from)
        };
        Self {
            ffmpeg: var("VIDPACK_FFMPEG", "ffmpeg"),
            ffprobe: var("VIDPACK_FFPROBE", "ffprobe"),
        }
    }

    /// Use explicit binary paths.
    #[must_use]
    pub fn with_binaries(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    /// Run ffmpeg with the given arguments.
    pub(crate) async fn ffmpeg(&self, args: &[String]) -> Result<EngineOutput> {
        Self::run(&self.ffmpeg, args).await
    }

    /// Run ffprobe with the given arguments.
    pub(crate) async fn ffprobe(&self, args: &[String]) -> Result<EngineOutput> {
        Self::run(&self.ffprobe, args).await
    }

    async fn run(program: &Path, args: &[String]) -> Result<EngineOutput> {
        debug!(program = %program.display(), ?args, "invoking engine");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::Spawn {
                program: program.display().to_string(),
                source: e,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(Error::Exited {
                program: program.display().to_string(),
                status: output.status.to_string(),
                stderr_tail: stderr_tail(&stderr),
            });
        }

        Ok(EngineOutput { stdout, stderr })
    }

    /// Fail unless `path` exists; some engine invocations exit zero without
    /// producing the requested file.
    pub(crate) fn expect_output(path: &Path) -> Result<()> {
        if path.exists() {
            Ok(())
        } else {
            Err(Error::MissingOutput { path: path.into() })
        }
    }
}

/// Last few lines of an error stream, enough to diagnose without dumping
/// the whole progress log into an error message.
fn stderr_tail(stderr: &str) -> String {
    const MAX_LINES: usize = 8;
    let lines: Vec<&str> = stderr.lines().collect();
    let start = lines.len().saturating_sub(MAX_LINES);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stderr_tail_keeps_last_lines() {
        let long: String = (0..20).map(|i| format!("line {i}\n")).collect();
        let tail = stderr_tail(&long);
        assert!(tail.starts_with("line 12"));
        assert!(tail.ends_with("line 19"));
    }

    #[test]
    fn stderr_tail_passes_short_output_through() {
        assert_eq!(stderr_tail("oops"), "oops");
    }

    #[tokio::test]
    async fn spawn_failure_is_reported() {
        let engine = Engine::with_binaries("/nonexistent/ffmpeg", "/nonexistent/ffprobe");
        let err = engine.ffmpeg(&["-version".to_string()]).await.unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[test]
    fn missing_output_check() {
        let tmp = tempfile::tempdir().unwrap();
        let present = tmp.path().join("here");
        std::fs::write(&present, b"x").unwrap();
        assert!(Engine::expect_output(&present).is_ok());
        assert!(matches!(
            Engine::expect_output(&tmp.path().join("absent")),
            Err(Error::MissingOutput { .. })
        ));
    }
}
