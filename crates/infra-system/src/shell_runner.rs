// Shell process runner implementation
// reason: async-trait, tokio for async process management
use async_trait::async_trait;
use serde::Deserialize;
use std::ffi::OsString;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::info;

use toolbridge_core::domain::{RunOutput, Termination};
use toolbridge_core::port::time_provider::SystemTimeProvider;
use toolbridge_core::port::{ProcessRunner, RunError, RunRequest, TimeProvider};

#[cfg(unix)]
const DEFAULT_SHELL: &str = "sh";
#[cfg(unix)]
const DEFAULT_SHELL_FLAG: &str = "-c";

#[cfg(windows)]
const DEFAULT_SHELL: &str = "cmd";
#[cfg(windows)]
const DEFAULT_SHELL_FLAG: &str = "/C";

/// Runner configuration
///
/// With no allowlist the child inherits the full environment; with no
/// timeout the runner waits for the child indefinitely.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub shell: String,
    pub shell_flag: String,
    pub env_allowlist: Option<Vec<String>>,
    pub timeout_ms: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
            shell_flag: DEFAULT_SHELL_FLAG.to_string(),
            env_allowlist: None,
            timeout_ms: None,
        }
    }
}

/// Shell process runner
/// Hands the whole command line to the host shell, so redirections such as
/// `> out.txt` behave exactly as typed.
pub struct ShellProcessRunner {
    time_provider: Arc<dyn TimeProvider>,
    config: RunnerConfig,
}

impl Default for ShellProcessRunner {
    fn default() -> Self {
        Self::new(Arc::new(SystemTimeProvider), RunnerConfig::default())
    }
}

impl ShellProcessRunner {
    /// Create a new shell process runner
    ///
    /// # Arguments
    /// * `time_provider` - Time provider for duration tracking
    /// * `config` - Shell, environment allowlist and timeout
    ///
    /// # Example
    /// ```ignore
    /// let runner = ShellProcessRunner::new(
    ///     Arc::new(SystemTimeProvider),
    ///     RunnerConfig {
    ///         env_allowlist: Some(vec!["PATH".to_string(), "HOME".to_string()]),
    ///         ..Default::default()
    ///     },
    /// );
    /// ```
    pub fn new(time_provider: Arc<dyn TimeProvider>, config: RunnerConfig) -> Self {
        Self {
            time_provider,
            config,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Filter environment variables to allowlist only
    ///
    /// Names and values stay `OsString`; a non-UTF-8 name can never match.
    fn filter_env<I>(&self, env: I) -> Vec<(OsString, OsString)>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        match &self.config.env_allowlist {
            Some(allowlist) => env
                .into_iter()
                .filter(|(k, _)| {
                    k.to_str()
                        .is_some_and(|k| allowlist.iter().any(|allowed| allowed == k))
                })
                .collect(),
            None => env.into_iter().collect(),
        }
    }

    fn build_command(&self, request: &RunRequest) -> Command {
        let mut command = Command::new(&self.config.shell);
        command
            .arg(&self.config.shell_flag)
            .arg(request.command.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if self.config.env_allowlist.is_some() {
            command.env_clear().envs(self.filter_env(std::env::vars_os()));
        }

        if let Some(dir) = &request.working_dir {
            command.current_dir(dir);
        }

        command
    }

    /// Spawn child process and wait for output
    async fn spawn_and_wait(&self, request: &RunRequest) -> Result<std::process::Output, RunError> {
        let child = self
            .build_command(request)
            .spawn()
            .map_err(|e| RunError::SpawnFailed(e.to_string()))?;

        if let Some(timeout_ms_val) = self.config.timeout_ms {
            match timeout(
                Duration::from_millis(timeout_ms_val),
                child.wait_with_output(),
            )
            .await
            {
                Ok(Ok(output)) => Ok(output),
                Ok(Err(e)) => Err(RunError::IoError(e.to_string())),
                Err(_) => Err(timeout_error(timeout_ms_val)),
            }
        } else {
            child
                .wait_with_output()
                .await
                .map_err(|e| RunError::IoError(e.to_string()))
        }
    }

    /// Build run output from process output
    fn build_output(&self, output: std::process::Output, duration_ms: i64) -> RunOutput {
        RunOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            status: termination(output.status),
            duration_ms,
        }
    }
}

/// Timeout error, saturating limits beyond `i64::MAX`
fn timeout_error(timeout_ms: u64) -> RunError {
    RunError::Timeout(i64::try_from(timeout_ms).unwrap_or(i64::MAX))
}

/// Translate a platform exit status, naming the signal when there is one
fn termination(status: ExitStatus) -> Termination {
    if let Some(code) = status.code() {
        return Termination::Exited(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            let name = nix::sys::signal::Signal::try_from(signal)
                .ok()
                .map(|s| s.as_str().to_string());
            return Termination::Signaled { signal, name };
        }
    }

    Termination::Unknown
}

#[async_trait]
impl ProcessRunner for ShellProcessRunner {
    async fn run(&self, request: &RunRequest) -> Result<RunOutput, RunError> {
        let start_time = self.time_provider.now_millis();

        info!(
            command = %request.command,
            working_dir = ?request.working_dir,
            timeout_ms = ?self.config.timeout_ms,
            "Starting subprocess execution"
        );

        let output = self.spawn_and_wait(request).await?;

        let duration_ms = self.time_provider.now_millis() - start_time;
        let result = self.build_output(output, duration_ms);

        info!(
            command = %request.command,
            duration_ms = %duration_ms,
            status = %result.status,
            stdout_bytes = result.stdout.len(),
            stderr_bytes = result.stderr.len(),
            "Subprocess execution completed"
        );

        Ok(result)
    }
}
