//! Media extraction via yt-dlp.
//!
//! Extraction drives the yt-dlp executable with a format spec derived from
//! the requested role and an output template scoped to the request
//! workspace. Every failure mode of the tool (network, geo-block, private
//! content, unsupported URL) collapses into a single
//! [`MediaError::ExtractionFailed`]; callers do not get to discriminate
//! causes, they present one rejection message.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use fbot_models::MediaRole;

use crate::artifact::select_largest;
use crate::error::{MediaError, MediaResult};

/// Title used when yt-dlp does not report one.
const FALLBACK_TITLE: &str = "NoTitle";

/// A successfully acquired deliverable.
#[derive(Debug, Clone)]
pub struct Extracted {
    /// Path of the selected artifact inside the workspace.
    pub artifact: PathBuf,
    /// Media title reported by the extractor.
    pub title: String,
}

/// Check if yt-dlp is available.
pub fn check_ytdlp() -> MediaResult<PathBuf> {
    which::which("yt-dlp").map_err(|_| MediaError::YtDlpNotFound)
}

/// yt-dlp format spec for a role.
///
/// Video requests take the best combined video+audio streams merged to mp4;
/// audio requests take the best audio-only stream.
pub fn format_spec(role: MediaRole) -> &'static str {
    match role {
        MediaRole::Video => "bestvideo+bestaudio/best",
        MediaRole::Audio => "bestaudio/best",
    }
}

/// Download `url` into `dir` and select the deliverable artifact.
///
/// The output template confines all produced files to `dir`. The title is
/// captured from yt-dlp stdout; an empty workspace after a reported success
/// is treated as a failed extraction.
pub async fn extract(url: &str, role: MediaRole, dir: impl AsRef<Path>) -> MediaResult<Extracted> {
    let dir = dir.as_ref();

    which::which("yt-dlp").map_err(|_| MediaError::YtDlpNotFound)?;

    let template = dir.join("%(id)s.%(ext)s");
    let template = template.to_string_lossy();

    let mut args = vec![
        "--quiet",
        "--no-warnings",
        "--no-playlist",
        "--no-simulate",
        "--print",
        "title",
        "-f",
        format_spec(role),
    ];
    if role == MediaRole::Video {
        args.push("--merge-output-format");
        args.push("mp4");
    }
    args.push("-o");
    args.push(&template);
    args.push(url);

    info!(url = %url, role = %role, dir = %dir.display(), "Starting extraction");

    let output = Command::new("yt-dlp")
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("yt-dlp stderr: {}", stderr);
        return Err(MediaError::extraction_failed(format!(
            "yt-dlp failed: {}",
            stderr.lines().last().unwrap_or("Unknown error")
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let title = stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(FALLBACK_TITLE)
        .to_string();

    // yt-dlp can exit zero without leaving a usable file behind.
    let artifact = select_largest(dir)
        .map_err(|_| MediaError::extraction_failed("extractor produced no files"))?;

    let size = artifact.metadata()?.len();
    info!(
        artifact = %artifact.display(),
        title = %title,
        size_mb = size as f64 / (1024.0 * 1024.0),
        "Extraction complete"
    );

    Ok(Extracted { artifact, title })
}
