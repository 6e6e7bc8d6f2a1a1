// Mapping Port
// Caller-supplied translation between the domain object and the tool's files

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Mapping errors (returned to the caller unmodified)
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing path: {0}")]
    MissingPath(&'static str),

    #[error("{0}")]
    Custom(String),
}

/// Everything a mapping strategy may know about the invocation
///
/// File helpers resolve relative paths against the scoped working
/// directory, so strategies never depend on the process-wide cwd.
#[derive(Debug, Clone, Copy)]
pub struct MappingContext<'a> {
    adapter_id: &'a str,
    input_path: Option<&'a Path>,
    output_path: Option<&'a Path>,
    working_dir: Option<&'a Path>,
    params: &'a serde_json::Value,
}

impl<'a> MappingContext<'a> {
    pub fn new(
        adapter_id: &'a str,
        input_path: Option<&'a Path>,
        output_path: Option<&'a Path>,
        working_dir: Option<&'a Path>,
        params: &'a serde_json::Value,
    ) -> Self {
        Self {
            adapter_id,
            input_path,
            output_path,
            working_dir,
            params,
        }
    }

    pub fn adapter_id(&self) -> &'a str {
        self.adapter_id
    }

    /// Scratch directory, or `None` when running in the caller's directory
    pub fn working_dir(&self) -> Option<&'a Path> {
        self.working_dir
    }

    pub fn params(&self) -> &'a serde_json::Value {
        self.params
    }

    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        match self.working_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn input_path(&self) -> Option<PathBuf> {
        self.input_path.map(|p| self.resolve(p))
    }

    pub fn output_path(&self) -> Option<PathBuf> {
        self.output_path.map(|p| self.resolve(p))
    }

    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Result<String, MappingError> {
        Ok(std::fs::read_to_string(self.resolve(path))?)
    }

    pub fn write(
        &self,
        path: impl AsRef<Path>,
        contents: impl AsRef<[u8]>,
    ) -> Result<(), MappingError> {
        Ok(std::fs::write(self.resolve(path), contents)?)
    }

    pub fn read_input(&self) -> Result<String, MappingError> {
        let path = self
            .input_path
            .ok_or(MappingError::MissingPath("input"))?;
        self.read_to_string(path)
    }

    pub fn write_input(&self, contents: impl AsRef<[u8]>) -> Result<(), MappingError> {
        let path = self
            .input_path
            .ok_or(MappingError::MissingPath("input"))?;
        self.write(path, contents)
    }

    pub fn read_output(&self) -> Result<String, MappingError> {
        let path = self
            .output_path
            .ok_or(MappingError::MissingPath("output"))?;
        self.read_to_string(path)
    }

    pub fn write_output(&self, contents: impl AsRef<[u8]>) -> Result<(), MappingError> {
        let path = self
            .output_path
            .ok_or(MappingError::MissingPath("output"))?;
        self.write(path, contents)
    }
}

/// Produces the tool's input from a domain object (typically by writing the input file)
pub trait InputMapping<D: ?Sized, I>: Send + Sync {
    fn map_input(&self, ctx: &MappingContext<'_>, domain: &D) -> Result<I, MappingError>;
}

/// Produces a domain-level result from the tool's output (typically by reading the output file)
pub trait OutputMapping<D: ?Sized, O>: Send + Sync {
    fn map_output(&self, ctx: &MappingContext<'_>, domain: &D) -> Result<O, MappingError>;
}

impl<D, I, F> InputMapping<D, I> for F
where
    D: ?Sized,
    F: Fn(&MappingContext<'_>, &D) -> Result<I, MappingError> + Send + Sync,
{
    fn map_input(&self, ctx: &MappingContext<'_>, domain: &D) -> Result<I, MappingError> {
        self(ctx, domain)
    }
}

impl<D, O, F> OutputMapping<D, O> for F
where
    D: ?Sized,
    F: Fn(&MappingContext<'_>, &D) -> Result<O, MappingError> + Send + Sync,
{
    fn map_output(&self, ctx: &MappingContext<'_>, domain: &D) -> Result<O, MappingError> {
        self(ctx, domain)
    }
}

/// Supplies default strategies for an integration
///
/// Consulted once at adapter construction for every direction the caller
/// did not set explicitly.
pub trait MappingFactory<D: ?Sized, I, O> {
    fn input_mapping(&self) -> Arc<dyn InputMapping<D, I>>;
    fn output_mapping(&self) -> Arc<dyn OutputMapping<D, O>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_against_working_dir() {
        let params = json!(null);
        let ctx = MappingContext::new(
            "id",
            Some(Path::new("in.txt")),
            Some(Path::new("/abs/out.txt")),
            Some(Path::new("/scratch")),
            &params,
        );

        assert_eq!(ctx.input_path(), Some(PathBuf::from("/scratch/in.txt")));
        assert_eq!(ctx.output_path(), Some(PathBuf::from("/abs/out.txt")));
    }

    #[test]
    fn test_resolve_without_working_dir_keeps_path() {
        let params = json!(null);
        let ctx = MappingContext::new("id", Some(Path::new("in.txt")), None, None, &params);

        assert_eq!(ctx.input_path(), Some(PathBuf::from("in.txt")));
        assert!(ctx.output_path().is_none());
    }

    #[test]
    fn test_missing_output_path() {
        let params = json!({});
        let ctx = MappingContext::new("id", None, None, None, &params);

        let err = ctx.read_output().unwrap_err();
        assert!(matches!(err, MappingError::MissingPath("output")));
    }

    #[test]
    fn test_write_then_read_in_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let params = json!({"steps": 3});
        let ctx = MappingContext::new(
            "id",
            Some(Path::new("in.txt")),
            None,
            Some(dir.path()),
            &params,
        );

        ctx.write_input("42").unwrap();
        assert_eq!(ctx.read_input().unwrap(), "42");
        assert!(dir.path().join("in.txt").exists());
        assert_eq!(ctx.params()["steps"], 3);
    }

    #[test]
    fn test_closure_is_input_mapping() {
        let mapping = |ctx: &MappingContext<'_>, value: &i32| -> Result<String, MappingError> {
            Ok(format!("{}:{}", ctx.adapter_id(), value))
        };
        let params = json!(null);
        let ctx = MappingContext::new("abc", None, None, None, &params);

        assert_eq!(InputMapping::map_input(&mapping, &ctx, &7).unwrap(), "abc:7");
    }
}
