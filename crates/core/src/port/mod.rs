// Port Layer - Interfaces for external dependencies

pub mod deployment_registry;
pub mod filesystem;
pub mod id_provider; // For deterministic testing
pub mod shell_runner;
pub mod time_provider;

// Re-exports
pub use deployment_registry::{DeploymentRegistry, InMemoryDeploymentRegistry};
pub use filesystem::FileSystem;
pub use id_provider::IdProvider;
pub use shell_runner::{ShellCommand, ShellError, ShellOutput, ShellRunner};
pub use time_provider::TimeProvider;
