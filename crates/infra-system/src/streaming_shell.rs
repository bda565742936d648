// Streaming shell executor
// reason: tokio::process so stdout can be read line by line while the child runs
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{info, warn};

use zoe_core::port::time_provider::SystemTimeProvider;
use zoe_core::port::{ShellCommand, ShellError, ShellOutput, ShellRunner, TimeProvider};

/// Which pipe a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// One line of child output, terminator stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub stream: OutputStream,
    pub text: String,
}

/// Runs commands through the host shell (`sh -c`, or `cmd /C` on Windows)
///
/// Every line is logged as soon as the child writes it, and optionally
/// forwarded to a channel. Stderr is drained on its own task so a full
/// stderr pipe cannot stall the child. The child is killed if the run
/// future is dropped, so nothing outlives the runtime on shutdown.
pub struct StreamingShellExecutor {
    time_provider: Arc<dyn TimeProvider>,
    line_tx: Option<mpsc::UnboundedSender<OutputLine>>,
}

impl StreamingShellExecutor {
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            time_provider,
            line_tx: None,
        }
    }

    /// Also forward every line to `tx` as it arrives
    pub fn with_line_sender(mut self, tx: mpsc::UnboundedSender<OutputLine>) -> Self {
        self.line_tx = Some(tx);
        self
    }

    fn shell_command(command: &ShellCommand) -> Command {
        #[cfg(windows)]
        {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command.as_str());
            cmd
        }

        #[cfg(not(windows))]
        {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command.as_str());
            cmd
        }
    }
}

impl Default for StreamingShellExecutor {
    fn default() -> Self {
        Self::new(Arc::new(SystemTimeProvider))
    }
}

/// Read `reader` to EOF line by line, logging and forwarding each line,
/// and return everything read with terminators kept
async fn drain_lines<R>(
    reader: R,
    stream: OutputStream,
    line_tx: Option<mpsc::UnboundedSender<OutputLine>>,
) -> Result<String, ShellError>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut captured = String::new();

    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|e| ShellError::Io(e.to_string()))?;
        if n == 0 {
            break;
        }

        let chunk = String::from_utf8_lossy(&buf);
        let line = chunk.trim_end_matches(|c: char| c == '\n' || c == '\r');
        match stream {
            OutputStream::Stdout => info!(target: "zoe::shell", "{}", line),
            OutputStream::Stderr => warn!(target: "zoe::shell", stream = "stderr", "{}", line),
        }
        if let Some(tx) = &line_tx {
            // Receiver gone means nobody is watching; keep draining regardless
            let _ = tx.send(OutputLine {
                stream,
                text: line.to_string(),
            });
        }
        captured.push_str(&chunk);
    }

    Ok(captured)
}

#[async_trait]
impl ShellRunner for StreamingShellExecutor {
    async fn run(&self, command: &ShellCommand) -> Result<ShellOutput, ShellError> {
        let start_time = self.time_provider.now_millis();

        info!(command = %command, "Starting shell command");

        let mut child = Self::shell_command(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ShellError::SpawnFailed(e.to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ShellError::Io("stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ShellError::Io("stderr was not captured".to_string()))?;

        let stderr_task = tokio::spawn(drain_lines(
            stderr,
            OutputStream::Stderr,
            self.line_tx.clone(),
        ));
        let stdout_text =
            match drain_lines(stdout, OutputStream::Stdout, self.line_tx.clone()).await {
                Ok(text) => text,
                Err(e) => {
                    stderr_task.abort();
                    let _ = child.kill().await;
                    return Err(e);
                }
            };
        let stderr_text = stderr_task
            .await
            .map_err(|e| ShellError::Io(e.to_string()))??;

        // Pipes are at EOF, so the child has exited or closed its output
        let status = child
            .wait()
            .await
            .map_err(|e| ShellError::Io(e.to_string()))?;

        let duration_ms = self.time_provider.now_millis() - start_time;
        let exit_code = status.code();

        info!(
            command = %command,
            duration_ms = %duration_ms,
            exit_code = ?exit_code,
            "Shell command completed"
        );

        if status.success() {
            Ok(ShellOutput {
                exit_code,
                stdout: stdout_text,
                stderr: stderr_text,
                duration_ms,
            })
        } else {
            Err(ShellError::ProcessFailure {
                exit_code,
                stdout: stdout_text,
                stderr: stderr_text,
            })
        }
    }
}
