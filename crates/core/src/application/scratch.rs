// Scratch directory scoping
//
// The scratch directory is handed to every scoped operation as an explicit
// working directory. The process-wide cwd is never changed, so concurrent
// adapters cannot race on it and nothing needs restoring on error or panic.

use crate::domain::ScratchDir;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Prefix for temporary scratch directories
pub const SCRATCH_PREFIX: &str = "toolbridge-";

/// Working-directory scope of one adapter
#[derive(Debug)]
pub enum ScratchScope {
    /// No scratch directory: operations run in the caller's directory
    Inherit,
    /// Caller-owned directory (absolute)
    Fixed(PathBuf),
    /// Adapter-owned directory, removed on drop
    Temporary(TempDir),
}

impl ScratchScope {
    /// Resolve a scratch selection into a usable directory
    ///
    /// A fixed directory is made absolute (pinned to the current cwd) and
    /// created if missing.
    pub fn prepare(scratch: Option<ScratchDir>) -> std::io::Result<Self> {
        match scratch {
            None => Ok(ScratchScope::Inherit),
            Some(ScratchDir::Fixed(dir)) => {
                let dir = std::path::absolute(&dir)?;
                if !dir.exists() {
                    debug!(scratch_dir = %dir.display(), "Creating scratch directory");
                    std::fs::create_dir_all(&dir)?;
                }
                Ok(ScratchScope::Fixed(dir))
            }
            Some(ScratchDir::Temporary) => {
                let dir = tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir()?;
                debug!(scratch_dir = %dir.path().display(), "Allocated temporary scratch directory");
                Ok(ScratchScope::Temporary(dir))
            }
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        match self {
            ScratchScope::Inherit => None,
            ScratchScope::Fixed(dir) => Some(dir),
            ScratchScope::Temporary(dir) => Some(dir.path()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.dir().is_some()
    }

    /// Run `op` with the scope's working directory
    pub fn scoped<T>(&self, op: impl FnOnce(Option<&Path>) -> T) -> T {
        op(self.dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn test_inherit_has_no_dir() {
        let scope = ScratchScope::prepare(None).unwrap();
        assert!(!scope.is_active());
        assert_eq!(scope.scoped(|dir| dir.map(Path::to_path_buf)), None);
    }

    #[test]
    fn test_fixed_dir_is_created() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("nested").join("scratch");

        let scope = ScratchScope::prepare(Some(ScratchDir::Fixed(target.clone()))).unwrap();

        assert!(target.is_dir());
        assert_eq!(scope.dir(), Some(target.as_path()));
    }

    #[test]
    fn test_temporary_dir_removed_on_drop() {
        let scope = ScratchScope::prepare(Some(ScratchDir::Temporary)).unwrap();
        let dir = scope.dir().unwrap().to_path_buf();
        assert!(dir.is_dir());
        assert!(dir
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(SCRATCH_PREFIX));

        drop(scope);
        assert!(!dir.exists());
    }

    #[test]
    fn test_cwd_unchanged_after_error() {
        let root = tempfile::tempdir().unwrap();
        let scope = ScratchScope::prepare(Some(ScratchDir::Fixed(root.path().to_path_buf()))).unwrap();
        let before = std::env::current_dir().unwrap();

        let mut seen = None;
        let result: Result<(), String> = scope.scoped(|dir| {
            seen = dir.map(Path::to_path_buf);
            Err("tool input rejected".to_string())
        });

        assert!(result.is_err());
        assert_eq!(seen.as_deref(), scope.dir());
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_cwd_unchanged_after_panic() {
        let root = tempfile::tempdir().unwrap();
        let scope = ScratchScope::prepare(Some(ScratchDir::Fixed(root.path().to_path_buf()))).unwrap();
        let before = std::env::current_dir().unwrap();

        let mut seen = None;
        let result = catch_unwind(AssertUnwindSafe(|| {
            scope.scoped(|dir| {
                seen = dir.map(Path::to_path_buf);
                panic!("mapping blew up");
            })
        }));

        assert!(result.is_err());
        assert_eq!(seen.as_deref(), Some(root.path()));
        assert_eq!(std::env::current_dir().unwrap(), before);
        // Scope still points at the scratch directory afterwards
        assert_eq!(scope.dir(), Some(root.path()));
    }
}
