//! Flows - named, independently invokable units of work
//!
//! Each flow carries a [`FlowDescriptor`] (display name, whether prints go to
//! the log) and reads its parameters from a JSON object with per-flow defaults.

pub mod create_file;
pub mod run_multiple;
pub mod run_shell;
pub mod simple_print;
pub mod verify_filenames;

pub use create_file::CreateTextFileFlow;
pub use run_multiple::RunMultipleFlows;
pub use run_shell::RunShellFlow;
pub use simple_print::SimplePrintFlow;
pub use verify_filenames::VerifyFilenamesFlow;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::error::{AppError, Result};
use crate::port::{FileSystem, ShellRunner};

/// Flow metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowDescriptor {
    pub name: &'static str,
    /// Route `print` output to the log instead of stdout only
    pub log_prints: bool,
}

#[async_trait]
pub trait Flow: Send + Sync {
    fn descriptor(&self) -> &FlowDescriptor;

    /// Execute the flow body
    ///
    /// # Errors
    /// Any task failure, propagated unchanged
    async fn run(&self, ctx: &FlowContext, params: &FlowParams) -> Result<()>;
}

/// Ports and the print channel available to a running flow
pub struct FlowContext {
    shell: Arc<dyn ShellRunner>,
    fs: Arc<dyn FileSystem>,
    messages: Mutex<Vec<String>>,
}

impl FlowContext {
    pub fn new(shell: Arc<dyn ShellRunner>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            shell,
            fs,
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn shell(&self) -> &dyn ShellRunner {
        self.shell.as_ref()
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    /// Print a message on behalf of `flow`
    pub fn print(&self, flow: &FlowDescriptor, message: impl Into<String>) {
        let message = message.into();
        if flow.log_prints {
            info!(flow = flow.name, "{}", message);
        } else {
            println!("{}", message);
        }
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message);
    }

    /// Messages printed so far, in order
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Flow parameters (JSON object)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowParams(Map<String, Value>);

impl FlowParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON value, which must be an object (or null)
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(AppError::Validation(format!(
                "Flow parameters must be a JSON object, got: {}",
                other
            ))),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// String parameter, falling back to `default` when absent or null
    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> Result<&'a str> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::String(s)) => Ok(s.as_str()),
            Some(other) => Err(AppError::Validation(format!(
                "Parameter '{}' must be a string, got: {}",
                key, other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::filesystem::mocks::MockFileSystem;
    use crate::port::shell_runner::mocks::MockShellRunner;
    use serde_json::json;

    fn ctx() -> FlowContext {
        FlowContext::new(Arc::new(MockShellRunner::new()), Arc::new(MockFileSystem::new()))
    }

    #[test]
    fn test_params_defaults_and_overrides() {
        let params = FlowParams::new().with("command", "echo hi");

        assert_eq!(params.str_or("command", "default").unwrap(), "echo hi");
        assert_eq!(params.str_or("missing", "default").unwrap(), "default");
    }

    #[test]
    fn test_params_wrong_type_rejected() {
        let params = FlowParams::from_value(json!({ "folder_path": 42 })).unwrap();

        let err = params.str_or("folder_path", "content_files").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_params_must_be_object() {
        assert!(FlowParams::from_value(json!(["a"])).is_err());
        assert_eq!(FlowParams::from_value(Value::Null).unwrap(), FlowParams::new());
    }

    #[test]
    fn test_print_records_messages_in_order() {
        let ctx = ctx();
        let logged = FlowDescriptor { name: "logged", log_prints: true };
        let plain = FlowDescriptor { name: "plain", log_prints: false };

        ctx.print(&logged, "first");
        ctx.print(&plain, "second");

        assert_eq!(ctx.messages(), vec!["first", "second"]);
    }
}
