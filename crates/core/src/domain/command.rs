// Command Line Domain Model

use serde::{Deserialize, Serialize};

/// Redirection marker placed before the output path
pub const REDIRECT_MARKER: &str = ">";

/// A fully assembled shell command line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandLine(String);

impl CommandLine {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommandLine {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CommandLine {
    fn from(s: String) -> Self {
        Self(s)
    }
}
