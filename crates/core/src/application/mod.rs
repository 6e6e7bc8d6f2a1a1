// Application Layer - The adapter use case and its building blocks

pub mod adapter;
pub mod command_builder;
pub mod mappings;
mod panic_guard;
pub mod scratch;

// Re-exports
pub use adapter::{ToolAdapter, ToolAdapterBuilder};
pub use command_builder::build_command;
pub use mappings::{JsonFileMappings, ReadJson, ReadText, TextFileMappings, WriteJson, WriteText};
pub use panic_guard::catch_mapping_panic;
pub use scratch::ScratchScope;
