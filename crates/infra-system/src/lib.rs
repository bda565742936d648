// Zoe Infrastructure - System Adapters
// Implements: ShellRunner, FileSystem

pub mod local_filesystem;
pub mod streaming_shell;

pub use local_filesystem::LocalFileSystem;
pub use streaming_shell::{OutputLine, OutputStream, StreamingShellExecutor};
