// Domain Layer - Tool descriptions, command lines, run results

pub mod command;
pub mod outcome;
pub mod run;
pub mod tool;

// Re-exports
pub use command::{CommandLine, REDIRECT_MARKER};
pub use outcome::{Outcome, Unconfigured};
pub use run::{RunOutput, Termination};
pub use tool::{AdapterConfig, PathStyle, ScratchDir, ToolSpec};
