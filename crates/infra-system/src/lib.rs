// Toolbridge Infrastructure - System Adapters
// Implements: ProcessRunner

pub mod shell_runner;

pub use shell_runner::{RunnerConfig, ShellProcessRunner};
