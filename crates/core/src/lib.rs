// Zoe Core - Flows, Deployments & Ports
// NO process spawning or filesystem adapters here (see zoe-infra-system)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
