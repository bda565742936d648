// Tasks - the leaf units of work flows are built from

use std::path::Path;
use tracing::{info, warn};

use crate::domain::{classify_filenames, FilenameReport, ValidationError};
use crate::port::{FileSystem, ShellCommand, ShellError, ShellRunner};

/// Named sub-step of a flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskDescriptor {
    pub name: &'static str,
}

pub const RUN_SHELL_TASK: TaskDescriptor = TaskDescriptor {
    name: "run_shell_task",
};
pub const LIST_FILENAMES_TASK: TaskDescriptor = TaskDescriptor {
    name: "list_filenames",
};
pub const CHECK_FILENAMES_TASK: TaskDescriptor = TaskDescriptor {
    name: "check_filenames",
};

/// Run a command line and return its accumulated stdout
///
/// Output lines are streamed to the log by the runner while the child is alive.
///
/// # Errors
/// - ShellError::EmptyCommand for a blank command
/// - ShellError::ProcessFailure when the child exits non-zero
pub async fn run_shell_task(shell: &dyn ShellRunner, command: &str) -> Result<String, ShellError> {
    let command = ShellCommand::new(command)?;

    info!(task = RUN_SHELL_TASK.name, command = %command, "Task started");

    match shell.run(&command).await {
        Ok(output) => {
            info!(
                task = RUN_SHELL_TASK.name,
                duration_ms = output.duration_ms,
                bytes = output.stdout.len(),
                "Task completed"
            );
            Ok(output.stdout)
        }
        Err(e) => {
            warn!(task = RUN_SHELL_TASK.name, exit_code = ?e.exit_code(), error = %e, "Task failed");
            Err(e)
        }
    }
}

/// List entry names of a directory
///
/// # Errors
/// ValidationError::DirectoryUnavailable if the directory cannot be read
pub fn list_filenames(fs: &dyn FileSystem, folder: &Path) -> Result<Vec<String>, ValidationError> {
    let filenames = fs
        .list_dir(folder)
        .map_err(|e| ValidationError::DirectoryUnavailable {
            path: folder.display().to_string(),
            reason: e.to_string(),
        })?;

    info!(
        task = LIST_FILENAMES_TASK.name,
        folder = %folder.display(),
        count = filenames.len(),
        "Listed directory"
    );
    Ok(filenames)
}

/// Partition names into valid and invalid, keeping encountered order
pub fn check_filenames(filenames: Vec<String>) -> FilenameReport {
    let report = classify_filenames(filenames);
    info!(
        task = CHECK_FILENAMES_TASK.name,
        valid = report.valid.len(),
        invalid = report.invalid.len(),
        "Checked filenames"
    );
    report
}

/// List and classify a directory, failing if any name is invalid
///
/// # Errors
/// - ValidationError::DirectoryUnavailable if the directory cannot be read
/// - ValidationError::ValidationFailure with every invalid name
pub fn verify_filenames(fs: &dyn FileSystem, folder: &Path) -> Result<FilenameReport, ValidationError> {
    let report = check_filenames(list_filenames(fs, folder)?);
    if report.is_clean() {
        Ok(report)
    } else {
        Err(ValidationError::ValidationFailure {
            invalid: report.invalid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::filesystem::mocks::MockFileSystem;
    use crate::port::shell_runner::mocks::MockShellRunner;

    #[tokio::test]
    async fn test_run_shell_task_returns_stdout() {
        let shell = MockShellRunner::new().script("echo hi", 0, "hi\n");

        let result = run_shell_task(&shell, "echo hi").await.unwrap();

        assert_eq!(result, "hi\n");
        assert_eq!(shell.calls(), vec!["echo hi"]);
    }

    #[tokio::test]
    async fn test_run_shell_task_propagates_process_failure() {
        let shell = MockShellRunner::new().script("exit 3", 3, "");

        let err = run_shell_task(&shell, "exit 3").await.unwrap_err();

        assert_eq!(err.exit_code(), Some(3));
    }

    #[tokio::test]
    async fn test_run_shell_task_rejects_blank_command_without_spawning() {
        let shell = MockShellRunner::new();

        let err = run_shell_task(&shell, "").await.unwrap_err();

        assert_eq!(err, ShellError::EmptyCommand);
        assert!(shell.calls().is_empty());
    }

    #[test]
    fn test_missing_directory_is_distinct_error() {
        let fs = MockFileSystem::new();

        let err = list_filenames(&fs, Path::new("nope")).unwrap_err();

        assert!(matches!(err, ValidationError::DirectoryUnavailable { .. }));
    }

    #[test]
    fn test_verify_filenames_lists_every_invalid_name() {
        let fs = MockFileSystem::new().with_dir(
            "content",
            ["hello_world.txt", "BadName.TXT", "ok2.csv", "Also Bad.md"],
        );

        let err = verify_filenames(&fs, Path::new("content")).unwrap_err();

        assert_eq!(
            err,
            ValidationError::ValidationFailure {
                invalid: vec!["BadName.TXT".to_string(), "Also Bad.md".to_string()],
            }
        );
    }

    #[test]
    fn test_verify_filenames_clean_directory() {
        let fs = MockFileSystem::new().with_dir("content", ["a.txt", "b_c.csv"]);

        let report = verify_filenames(&fs, Path::new("content")).unwrap();

        assert_eq!(report.valid, vec!["a.txt", "b_c.csv"]);
        assert!(report.invalid.is_empty());
    }
}
