// Domain Layer - Pure flow logic and entities

pub mod deployment;
pub mod error;
pub mod filename;
pub mod flow_run;

// Re-exports
pub use deployment::{Deployment, DeploymentSpec, GitCredentials, GitSource, IntervalSchedule};
pub use error::{DomainError, ValidationError};
pub use filename::{classify_filenames, is_valid_filename, FilenameReport, FILENAME_PATTERN};
pub use flow_run::{FlowRun, FlowRunId, FlowRunState};
