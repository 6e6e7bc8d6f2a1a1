// Toolbridge Core - Domain Logic & Ports
// NO process spawning (Hexagonal Architecture); runners live in infra crates

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{ToolAdapter, ToolAdapterBuilder};
pub use domain::{CommandLine, Outcome, RunOutput, Termination, Unconfigured};
pub use error::{AdapterError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
