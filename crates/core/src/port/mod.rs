// Port Layer - Interfaces for external collaborators

pub mod id_provider;
pub mod mapping;
pub mod path_resolver;
pub mod process_runner;
pub mod time_provider;

// Re-exports
pub use id_provider::IdProvider;
pub use mapping::{InputMapping, MappingContext, MappingError, MappingFactory, OutputMapping};
pub use path_resolver::{PathResolver, StdPathResolver};
pub use process_runner::{ProcessRunner, RunError, RunRequest};
pub use time_provider::TimeProvider;
