// Application Layer - Flows, tasks and their orchestration

pub mod deploy;
pub mod flows;
pub mod registry;
pub mod runner;
pub mod scheduler;
pub mod tasks;

// Re-exports
pub use deploy::{DeployRequest, DeployService};
pub use flows::{Flow, FlowContext, FlowDescriptor, FlowParams};
pub use registry::FlowRegistry;
pub use runner::FlowRunner;
pub use scheduler::{shutdown_channel, DeploymentScheduler, ShutdownSender, ShutdownToken};
pub use tasks::TaskDescriptor;
