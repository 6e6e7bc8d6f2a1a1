// Tool Domain Model

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How file paths are rendered into the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStyle {
    /// Absolute form, anchored at the scratch directory when one is configured
    #[default]
    Absolute,
    /// Exactly as configured (relative paths resolve inside the child's working dir)
    AsGiven,
}

/// Scratch directory selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScratchDir {
    /// Use (and create if missing) a fixed directory
    Fixed(PathBuf),
    /// Allocate a temporary directory owned by the adapter
    Temporary,
}

/// Static description of one external-tool invocation
///
/// Every part is optional; an absent executable is a valid state that
/// makes command building report `Unconfigured::NoExecutable`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolSpec {
    pub executable: Option<String>,
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub trailing_options: Option<String>,
    pub path_style: PathStyle,
}

impl ToolSpec {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: Some(executable.into()),
            ..Default::default()
        }
    }

    /// Executable, treating a blank string as absent
    ///
    /// Non-blank values are returned verbatim.
    pub fn executable(&self) -> Option<&str> {
        non_blank(self.executable.as_deref())
    }

    pub fn has_executable(&self) -> bool {
        self.executable().is_some()
    }

    pub fn has_input_path(&self) -> bool {
        self.input_path.is_some()
    }

    pub fn has_output_path(&self) -> bool {
        self.output_path.is_some()
    }

    /// Trailing options, treating a blank string as absent
    pub fn trailing_options(&self) -> Option<&str> {
        non_blank(self.trailing_options.as_deref())
    }

    pub fn has_trailing_options(&self) -> bool {
        self.trailing_options().is_some()
    }

    /// Program name (first whitespace-separated token of the executable)
    pub fn program(&self) -> Option<&str> {
        self.executable()
            .and_then(|exe| exe.split_whitespace().next())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Serializable adapter configuration (loaded by the CLI or built by callers)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    pub executable: Option<String>,
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub trailing_options: Option<String>,
    pub scratch_dir: Option<PathBuf>,
    /// Allocate a temporary scratch directory (ignored when `scratch_dir` is set)
    pub temporary_scratch: bool,
    pub path_style: PathStyle,
    /// Caller-defined parameters exposed to mapping strategies
    pub params: serde_json::Value,
}

impl AdapterConfig {
    pub fn tool_spec(&self) -> ToolSpec {
        ToolSpec {
            executable: self.executable.clone(),
            input_path: self.input_path.clone(),
            output_path: self.output_path.clone(),
            trailing_options: self.trailing_options.clone(),
            path_style: self.path_style,
        }
    }

    pub fn scratch(&self) -> Option<ScratchDir> {
        match (&self.scratch_dir, self.temporary_scratch) {
            (Some(dir), _) => Some(ScratchDir::Fixed(dir.clone())),
            (None, true) => Some(ScratchDir::Temporary),
            (None, false) => None,
        }
    }
}
