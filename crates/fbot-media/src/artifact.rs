//! Deliverable artifact selection.
//!
//! Extraction can leave more than one file in a workspace (sidecar
//! metadata, thumbnails, partially merged streams). The delivered artifact
//! is the largest regular file present. This lives in its own module so the
//! policy stays decoupled from the extraction call and testable on its own.

use std::path::{Path, PathBuf};

use crate::error::{MediaError, MediaResult};

/// Pick the largest regular file in `dir`.
///
/// Returns [`MediaError::NoArtifacts`] when the directory holds no regular
/// files at all.
pub fn select_largest(dir: impl AsRef<Path>) -> MediaResult<PathBuf> {
    let dir = dir.as_ref();
    let mut best: Option<(u64, PathBuf)> = None;

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }

        let size = metadata.len();
        if best.as_ref().map_or(true, |(max, _)| size > *max) {
            best = Some((size, entry.path()));
        }
    }

    best.map(|(_, path)| path)
        .ok_or_else(|| MediaError::NoArtifacts(dir.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_selects_largest_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("video.mp4"), vec![0u8; 4096]).unwrap();
        std::fs::write(dir.path().join("video.info.json"), vec![0u8; 128]).unwrap();
        std::fs::write(dir.path().join("thumb.webp"), vec![0u8; 512]).unwrap();

        let selected = select_largest(dir.path()).unwrap();
        assert_eq!(selected.file_name().unwrap(), "video.mp4");
    }

    #[test]
    fn test_empty_dir_is_an_explicit_error() {
        let dir = TempDir::new().unwrap();
        let err = select_largest(dir.path()).unwrap_err();
        assert!(matches!(err, MediaError::NoArtifacts(_)));
    }

    #[test]
    fn test_subdirectories_are_ignored() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("fragments")).unwrap();
        std::fs::write(dir.path().join("audio.m4a"), vec![0u8; 64]).unwrap();

        let selected = select_largest(dir.path()).unwrap();
        assert_eq!(selected.file_name().unwrap(), "audio.m4a");
    }
}
