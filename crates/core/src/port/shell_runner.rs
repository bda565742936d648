// Shell Runner Port
// Abstraction for running a command line through the host shell

use async_trait::async_trait;
use thiserror::Error;

/// Full OS command line, interpreted by the host shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand(String);

impl ShellCommand {
    /// Wrap a command line, rejecting blank input
    pub fn new(command: impl Into<String>) -> Result<Self, ShellError> {
        let command = command.into();
        if command.trim().is_empty() {
            return Err(ShellError::EmptyCommand);
        }
        Ok(Self(command))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a finished child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    pub exit_code: Option<i32>,
    /// Everything written to stdout, line terminators kept
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: i64,
}

impl ShellOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Shell execution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error("Command must not be empty")]
    EmptyCommand,

    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("IO error: {0}")]
    Io(String),

    /// The child exited with a non-zero status (`None` when killed by a signal)
    #[error("Process failed with {}{}", exit_status_text(.exit_code), stderr_suffix(.stderr))]
    ProcessFailure {
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

fn exit_status_text(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {}", code),
        None => "signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim_end();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

impl ShellError {
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ShellError::ProcessFailure { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

/// Shell Runner trait
///
/// Implementations:
/// - StreamingShellExecutor (zoe-infra-system): child process with live line logging
/// - mocks::MockShellRunner: scripted outputs for tests
#[async_trait]
pub trait ShellRunner: Send + Sync {
    /// Run the command and wait for the child to exit
    ///
    /// # Errors
    /// - ShellError::SpawnFailed if the shell cannot be started
    /// - ShellError::ProcessFailure if the child exits non-zero
    async fn run(&self, command: &ShellCommand) -> Result<ShellOutput, ShellError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock shell runner: exit code and stdout per command, `0`/empty otherwise
    #[derive(Default)]
    pub struct MockShellRunner {
        scripted: Mutex<HashMap<String, (i32, String)>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockShellRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn script(self, command: impl Into<String>, exit_code: i32, stdout: impl Into<String>) -> Self {
            self.scripted
                .lock()
                .unwrap()
                .insert(command.into(), (exit_code, stdout.into()));
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ShellRunner for MockShellRunner {
        async fn run(&self, command: &ShellCommand) -> Result<ShellOutput, ShellError> {
            self.calls.lock().unwrap().push(command.as_str().to_string());

            let (exit_code, stdout) = self
                .scripted
                .lock()
                .unwrap()
                .get(command.as_str())
                .cloned()
                .unwrap_or((0, String::new()));

            if exit_code == 0 {
                Ok(ShellOutput {
                    exit_code: Some(0),
                    stdout,
                    stderr: String::new(),
                    duration_ms: 1,
                })
            } else {
                Err(ShellError::ProcessFailure {
                    exit_code: Some(exit_code),
                    stdout,
                    stderr: "mock failure".to_string(),
                })
            }
        }
    }
}
