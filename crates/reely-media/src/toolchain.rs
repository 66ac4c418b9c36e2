//! External media tool invocation.
//!
//! `FfmpegToolchain` shells out to ffprobe/ffmpeg with a bounded timeout.
//! A hung tool is killed when the timeout elapses rather than pinning the
//! request forever.

use crate::error::{MediaError, MediaResult};
use crate::probe::{Dimensions, ProbeOutput};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Abstraction over the external probe/remux tools.
#[async_trait]
pub trait MediaToolchain: Send + Sync {
    /// Probe the pixel dimensions of the first video stream in `input`.
    async fn probe_dimensions(&self, input: &Path) -> MediaResult<Dimensions>;

    /// Remux `input` into a faststart copy next to it and return the
    /// output path. The caller owns cleanup of the returned file.
    async fn remux_faststart(&self, input: &Path) -> MediaResult<PathBuf>;
}

/// CLI-backed toolchain using the ffmpeg and ffprobe binaries.
#[derive(Clone)]
pub struct FfmpegToolchain {
    ffmpeg_path: String,
    ffprobe_path: String,
    timeout: Duration,
}

impl FfmpegToolchain {
    pub fn new(
        ffmpeg_path: impl Into<String>,
        ffprobe_path: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        FfmpegToolchain {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
            timeout,
        }
    }

    async fn run_tool(&self, tool: &str, program: &str, args: &[&str]) -> MediaResult<Vec<u8>> {
        let start = std::time::Instant::now();

        let mut cmd = Command::new(program);
        cmd.args(args).kill_on_drop(true);

        let output = timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| MediaError::ToolTimeout {
                tool: tool.to_string(),
                timeout_secs: self.timeout.as_secs(),
            })?
            .map_err(|e| MediaError::ToolSpawn {
                tool: tool.to_string(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!(
                tool = %tool,
                status = output.status.code().unwrap_or(-1),
                stderr = %stderr,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Media tool failed"
            );
            return Err(MediaError::ToolFailed {
                tool: tool.to_string(),
                status: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        tracing::debug!(
            tool = %tool,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Media tool finished"
        );

        Ok(output.stdout)
    }
}

#[async_trait]
impl MediaToolchain for FfmpegToolchain {
    async fn probe_dimensions(&self, input: &Path) -> MediaResult<Dimensions> {
        let input_str = input.to_string_lossy();

        let stdout = self
            .run_tool(
                "ffprobe",
                &self.ffprobe_path,
                &[
                    "-v",
                    "error",
                    "-print_format",
                    "json",
                    "-show_streams",
                    "-select_streams",
                    "v:0",
                    input_str.as_ref(),
                ],
            )
            .await?;

        let parsed: ProbeOutput = serde_json::from_slice(&stdout)?;
        parsed.dimensions()
    }

    async fn remux_faststart(&self, input: &Path) -> MediaResult<PathBuf> {
        let output_path = processing_path(input);
        let input_str = input.to_string_lossy();
        let output_str = output_path.to_string_lossy();

        let result = self
            .run_tool(
                "ffmpeg",
                &self.ffmpeg_path,
                &[
                    "-y",
                    "-i",
                    input_str.as_ref(),
                    "-c",
                    "copy",
                    "-movflags",
                    "faststart",
                    "-f",
                    "mp4",
                    output_str.as_ref(),
                ],
            )
            .await;

        if let Err(e) = result {
            // ffmpeg may leave a partial output behind
            let _ = tokio::fs::remove_file(&output_path).await;
            return Err(e);
        }

        Ok(output_path)
    }
}

/// Sibling output path for the remuxed copy.
fn processing_path(input: &Path) -> PathBuf {
    let mut os = input.as_os_str().to_os_string();
    os.push(".processing");
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_path_is_sibling() {
        let p = processing_path(Path::new("/tmp/upload123.mp4"));
        assert_eq!(p, PathBuf::from("/tmp/upload123.mp4.processing"));
        assert_eq!(p.parent(), Some(Path::new("/tmp")));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::tempdir;

        fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
            let path = dir.join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path
        }

        #[tokio::test]
        async fn test_probe_parses_tool_output() {
            let dir = tempdir().unwrap();
            let probe = write_script(
                dir.path(),
                "fake_probe",
                r#"echo '{"streams":[{"width":1920,"height":1080}]}'"#,
            );

            let toolchain = FfmpegToolchain::new(
                "ffmpeg",
                probe.to_string_lossy(),
                Duration::from_secs(5),
            );
            let dims = toolchain
                .probe_dimensions(Path::new("/tmp/whatever.mp4"))
                .await
                .unwrap();
            assert_eq!(dims.width, 1920);
            assert_eq!(dims.height, 1080);
        }

        #[tokio::test]
        async fn test_nonzero_exit_surfaces_stderr() {
            let dir = tempdir().unwrap();
            let probe = write_script(dir.path(), "fake_probe", "echo 'boom' >&2; exit 1");

            let toolchain = FfmpegToolchain::new(
                "ffmpeg",
                probe.to_string_lossy(),
                Duration::from_secs(5),
            );
            let err = toolchain
                .probe_dimensions(Path::new("/tmp/whatever.mp4"))
                .await
                .unwrap_err();
            match err {
                MediaError::ToolFailed { status, stderr, .. } => {
                    assert_eq!(status, 1);
                    assert_eq!(stderr, "boom");
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_hung_tool_times_out() {
            let dir = tempdir().unwrap();
            let probe = write_script(dir.path(), "fake_probe", "sleep 30");

            let toolchain = FfmpegToolchain::new(
                "ffmpeg",
                probe.to_string_lossy(),
                Duration::from_millis(100),
            );
            let err = toolchain
                .probe_dimensions(Path::new("/tmp/whatever.mp4"))
                .await
                .unwrap_err();
            assert!(matches!(err, MediaError::ToolTimeout { .. }));
        }

        #[tokio::test]
        async fn test_missing_binary_is_spawn_error() {
            let toolchain = FfmpegToolchain::new(
                "ffmpeg",
                "/nonexistent/ffprobe",
                Duration::from_secs(5),
            );
            let err = toolchain
                .probe_dimensions(Path::new("/tmp/whatever.mp4"))
                .await
                .unwrap_err();
            assert!(matches!(err, MediaError::ToolSpawn { .. }));
        }

        #[tokio::test]
        async fn test_failed_remux_removes_partial_output() {
            let dir = tempdir().unwrap();
            // Writes its output file (last argument), then fails.
            let ffmpeg = write_script(
                dir.path(),
                "fake_ffmpeg",
                r#"for last in "$@"; do :; done; echo partial > "$last"; exit 1"#,
            );

            let input = dir.path().join("input.mp4");
            std::fs::write(&input, b"video").unwrap();

            let toolchain = FfmpegToolchain::new(
                ffmpeg.to_string_lossy(),
                "ffprobe",
                Duration::from_secs(5),
            );
            let err = toolchain.remux_faststart(&input).await.unwrap_err();
            assert!(matches!(err, MediaError::ToolFailed { .. }));
            assert!(!dir.path().join("input.mp4.processing").exists());
        }
    }
}
