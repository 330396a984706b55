//! Request-scoped ephemeral workspaces.
//!
//! Every download request gets an exclusively-owned, uniquely-named
//! directory that holds all of its intermediate and final files. The
//! directory is removed when the handle drops, on every exit path of
//! request handling, so no locking or cross-request coordination is needed.

use std::path::Path;

use tempfile::TempDir;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Directory name prefix for workspaces, useful when sweeping leftovers
/// after a crash.
const WORKSPACE_PREFIX: &str = "fetchbot-";

/// An ephemeral directory bound to one download request.
///
/// Dropping the handle recursively removes the directory. Removal errors
/// are swallowed; cleanup is best-effort.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Allocate a uniquely-named workspace under `parent`.
    ///
    /// The parent directory is created if it does not exist.
    pub fn create(parent: impl AsRef<Path>) -> MediaResult<Self> {
        let parent = parent.as_ref();
        std::fs::create_dir_all(parent)?;

        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| MediaError::workspace(format!("failed to allocate workspace: {e}")))?;

        debug!(path = %dir.path().display(), "Allocated workspace");
        Ok(Self { dir })
    }

    /// Path of the workspace directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_is_unique_and_prefixed() {
        let parent = TempDir::new().unwrap();
        let a = Workspace::create(parent.path()).unwrap();
        let b = Workspace::create(parent.path()).unwrap();

        assert_ne!(a.path(), b.path());
        assert!(a
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(WORKSPACE_PREFIX));
    }

    #[test]
    fn test_workspace_removed_on_drop() {
        let parent = TempDir::new().unwrap();
        let ws = Workspace::create(parent.path()).unwrap();
        let path = ws.path().to_path_buf();

        std::fs::write(path.join("artifact.mp4"), b"data").unwrap();
        assert!(path.exists());

        drop(ws);
        assert!(!path.exists(), "workspace must not survive its handle");
    }

    #[test]
    fn test_workspace_removed_on_unwind() {
        let parent = TempDir::new().unwrap();
        let ws = Workspace::create(parent.path()).unwrap();
        let path = ws.path().to_path_buf();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _held = ws;
            panic!("request handling failed");
        }));
        assert!(result.is_err());

        assert!(!path.exists(), "workspace must be removed when the scope unwinds");
    }

    #[test]
    fn test_create_makes_missing_parent() {
        let parent = TempDir::new().unwrap();
        let nested = parent.path().join("work").join("media");
        let ws = Workspace::create(&nested).unwrap();
        assert!(ws.path().starts_with(&nested));
    }
}
