// Process Runner Port
// Abstraction for launching an assembled command line as a child process

use crate::domain::{CommandLine, RunOutput};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// One command launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub command: CommandLine,
    /// Child working directory; `None` inherits the caller's
    pub working_dir: Option<PathBuf>,
}

impl RunRequest {
    pub fn new(command: CommandLine) -> Self {
        Self {
            command,
            working_dir: None,
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// Run errors
///
/// Abnormal termination of the child is NOT an error; it is reported in
/// `RunOutput::status`.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Process timeout after {0}ms")]
    Timeout(i64),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Process Runner trait
///
/// Implementations:
/// - ShellProcessRunner (infra-system): runs the command line through the host shell
/// - MockProcessRunner: canned results for tests
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the command and capture stdout, stderr and termination status
    ///
    /// Waits until the child exits and both streams are drained.
    ///
    /// # Errors
    /// - RunError::SpawnFailed if the shell cannot be started
    /// - RunError::Timeout if the runner has a timeout and it elapses
    async fn run(&self, request: &RunRequest) -> Result<RunOutput, RunError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::Termination;
    use std::sync::{Arc, Mutex};

    /// Mock runner behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Succeed with the given stdout and exit code 0
        Stdout(String),
        /// Succeed with a fixed output
        Output(RunOutput),
        /// Fail to spawn with message
        Fail(String),
        /// Timeout after N ms
        Timeout(i64),
    }

    /// Mock Process Runner for testing
    pub struct MockProcessRunner {
        behavior: Arc<Mutex<MockBehavior>>,
        requests: Arc<Mutex<Vec<RunRequest>>>,
    }

    impl MockProcessRunner {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }
        pub fn new_stdout(stdout: impl Into<String>) -> Self {
            Self::new(MockBehavior::Stdout(stdout.into()))
        }
        pub fn new_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(message.into()))
        }
        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
        pub fn requests(&self) -> Vec<RunRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProcessRunner for MockProcessRunner {
        async fn run(&self, request: &RunRequest) -> Result<RunOutput, RunError> {
            self.requests.lock().unwrap().push(request.clone());

            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::Stdout(stdout) => Ok(RunOutput {
                    stdout: stdout.into_bytes(),
                    stderr: Vec::new(),
                    status: Termination::Exited(0),
                    duration_ms: 1,
                }),
                MockBehavior::Output(output) => Ok(output),
                MockBehavior::Fail(msg) => Err(RunError::SpawnFailed(msg)),
                MockBehavior::Timeout(ms) => Err(RunError::Timeout(ms)),
            }
        }
    }
}
