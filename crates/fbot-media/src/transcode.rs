//! FFmpeg command building and the size-gated transcode policy.
//!
//! Oversized artifacts get one best-effort re-encode pass. The policy is a
//! single evaluation: a transcoded file still above the threshold ships
//! as-is, and a failed transcode degrades to the untouched original. The
//! delivery-size ceiling is therefore best-effort, not guaranteed.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, warn};

use fbot_models::MediaRole;

use crate::error::{MediaError, MediaResult};

/// Delivery-size thresholds, in bytes, per role.
#[derive(Debug, Clone, Copy)]
pub struct SizeLimits {
    pub video_bytes: u64,
    pub audio_bytes: u64,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            video_bytes: 50 * 1024 * 1024,
            audio_bytes: 20 * 1024 * 1024,
        }
    }
}

impl SizeLimits {
    /// Threshold that applies to artifacts of `role`.
    pub fn threshold(&self, role: MediaRole) -> u64 {
        match role {
            MediaRole::Video => self.video_bytes,
            MediaRole::Audio => self.audio_bytes,
        }
    }
}

/// Builder for FFmpeg invocations.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file path
    input: PathBuf,
    /// Output file path
    output: PathBuf,
    /// Output arguments (after -i)
    output_args: Vec<String>,
    /// Whether to overwrite output
    overwrite: bool,
    /// Log level
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add an output argument (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Set video codec.
    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-vcodec").output_arg(codec)
    }

    /// Set audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-acodec").output_arg(codec)
    }

    /// Set CRF (quality).
    pub fn crf(self, crf: u8) -> Self {
        self.output_arg("-crf").output_arg(crf.to_string())
    }

    /// Set audio bitrate.
    pub fn audio_bitrate(self, bitrate: impl Into<String>) -> Self {
        self.output_arg("-b:a").output_arg(bitrate)
    }

    /// Drop the video track.
    pub fn no_video(self) -> Self {
        self.output_arg("-vn")
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-v".to_string());
        args.push(self.log_level.clone());

        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());

        args.extend(self.output_args.clone());

        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Re-encode `input` into `output` with the constrained settings for `role`.
///
/// Video: libx264 at CRF 28 with 128k AAC audio. Audio: video track dropped,
/// 128k audio bitrate. On failure the input file is left untouched.
pub async fn transcode(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    role: MediaRole,
) -> MediaResult<()> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

    let cmd = FfmpegCommand::new(input, output);
    let cmd = match role {
        MediaRole::Video => cmd
            .video_codec("libx264")
            .crf(28)
            .audio_codec("aac")
            .audio_bitrate("128k"),
        MediaRole::Audio => cmd.no_video().audio_bitrate("128k"),
    };

    let args = cmd.build_args();
    debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

    let result = Command::new("ffmpeg")
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(MediaError::transcode_failed(
            stderr.lines().last().unwrap_or("FFmpeg exited with non-zero status"),
            result.status.code(),
        ));
    }

    Ok(())
}

/// Apply the delivery-size policy to an acquired artifact.
///
/// Returns the path to deliver: the original when it fits the threshold or
/// when re-encoding fails, the transcoded file otherwise. This is the one
/// place that decides whether a transcode failure is surfaced; it is not,
/// by policy, and the oversized original is delivered instead.
pub async fn apply_size_policy(
    artifact: &Path,
    title: &str,
    role: MediaRole,
    limits: SizeLimits,
    dir: &Path,
) -> MediaResult<PathBuf> {
    let size = tokio::fs::metadata(artifact).await?.len();
    let threshold = limits.threshold(role);

    if size <= threshold {
        return Ok(artifact.to_path_buf());
    }

    // Title-derived filename, unsanitized; a hostile title makes the
    // transcode fail and the original is delivered instead.
    let output = dir.join(format!("{}.{}", title, role.file_ext()));

    info!(
        artifact = %artifact.display(),
        size = size,
        threshold = threshold,
        role = %role,
        "Artifact over threshold, re-encoding"
    );

    match transcode(artifact, &output, role).await {
        Ok(()) if output.is_file() => Ok(output),
        Ok(()) => {
            warn!(output = %output.display(), "FFmpeg succeeded but produced no file, delivering original");
            Ok(artifact.to_path_buf())
        }
        Err(e) => {
            warn!(error = %e, "Transcode failed, delivering original artifact");
            Ok(artifact.to_path_buf())
        }
    }
}
