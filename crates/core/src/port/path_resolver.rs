// Path Resolver Port (filesystem capability provider)

use std::path::{Path, PathBuf};

/// Path and executable resolution (allows mocking in tests)
pub trait PathResolver: Send + Sync {
    /// Absolute form of `path`; relative paths are anchored at `base` when given
    fn absolute(&self, path: &Path, base: Option<&Path>) -> PathBuf;

    /// Whether the path exists
    fn exists(&self, path: &Path) -> bool;

    /// Locate a program on `PATH` (or verify an explicit path to it)
    fn find_executable(&self, program: &str) -> Option<PathBuf>;
}

/// Standard-library resolver (production)
pub struct StdPathResolver;

impl PathResolver for StdPathResolver {
    fn absolute(&self, path: &Path, base: Option<&Path>) -> PathBuf {
        let joined = match base {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        };
        std::path::absolute(&joined).unwrap_or(joined)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn find_executable(&self, program: &str) -> Option<PathBuf> {
        let candidate = Path::new(program);
        if candidate.components().count() > 1 {
            return candidate.is_file().then(|| candidate.to_path_buf());
        }

        let paths = std::env::var_os("PATH")?;
        std::env::split_paths(&paths)
            .flat_map(|dir| executable_candidates(&dir, program))
            .find(|path| path.is_file())
    }
}

#[cfg(windows)]
fn executable_candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    ["", ".exe", ".cmd", ".bat"]
        .iter()
        .map(|ext| dir.join(format!("{}{}", program, ext)))
        .collect()
}

#[cfg(not(windows))]
fn executable_candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    vec![dir.join(program)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_anchors_relative_at_base() {
        let resolved = StdPathResolver.absolute(Path::new("in.txt"), Some(Path::new("/scratch")));
        assert_eq!(resolved, PathBuf::from("/scratch/in.txt"));
    }

    #[test]
    fn test_absolute_keeps_absolute_path() {
        let resolved = StdPathResolver.absolute(Path::new("/data/in.txt"), Some(Path::new("/scratch")));
        assert_eq!(resolved, PathBuf::from("/data/in.txt"));
    }

    #[test]
    fn test_absolute_without_base_is_absolute() {
        let resolved = StdPathResolver.absolute(Path::new("in.txt"), None);
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("in.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_executable_on_path() {
        assert!(StdPathResolver.find_executable("sh").is_some());
        assert!(StdPathResolver
            .find_executable("definitely-not-a-real-program-xyz")
            .is_none());
    }
}
