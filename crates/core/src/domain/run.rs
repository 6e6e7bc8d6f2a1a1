// Process run results

use serde::{Deserialize, Serialize};

/// How the child process terminated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Termination {
    /// Exited normally with a status code
    Exited(i32),
    /// Killed by a signal (unix)
    Signaled { signal: i32, name: Option<String> },
    /// Terminated without a code or signal the platform could report
    Unknown,
}

impl Termination {
    pub fn success(&self) -> bool {
        matches!(self, Termination::Exited(0))
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            Termination::Exited(code) => Some(*code),
            _ => None,
        }
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Exited(code) => write!(f, "exit code {}", code),
            Termination::Signaled {
                signal,
                name: Some(name),
            } => write!(f, "signal {} ({})", signal, name),
            Termination::Signaled { signal, name: None } => write!(f, "signal {}", signal),
            Termination::Unknown => write!(f, "unknown termination"),
        }
    }
}

/// Captured output of one child process
///
/// The status is recorded, not judged: a non-zero exit is still a
/// successful capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub status: Termination,
    pub duration_ms: i64,
}

impl RunOutput {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }
}
