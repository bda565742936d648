// Text file creation through cmd.exe
// Only succeeds on Windows hosts; elsewhere the shell task fails

use async_trait::async_trait;
use std::path::Path;
use tracing::info;

use super::{Flow, FlowContext, FlowDescriptor, FlowParams};
use crate::application::tasks::{run_shell_task, TaskDescriptor};
use crate::error::Result;

pub const ENTRYPOINT: &str = "flows/create_file_on_windows:create_text_file_flow";
pub const DEFAULT_FILENAME: &str = "text.txt";
pub const DEFAULT_ROOT: &str = r"C:\";

const DESCRIPTOR: FlowDescriptor = FlowDescriptor {
    name: "Create text file via cmd.exe with parameters",
    log_prints: true,
};

const CREATE_TASK: TaskDescriptor = TaskDescriptor {
    name: "Create text file via cmd.exe",
};
const VERIFY_TASK: TaskDescriptor = TaskDescriptor {
    name: "Verify file creation",
};

pub struct CreateTextFileFlow;

impl CreateTextFileFlow {
    async fn create_if_not_exists(&self, ctx: &FlowContext, file_path: &str) -> Result<()> {
        if ctx.fs().exists(Path::new(file_path)) {
            ctx.print(&DESCRIPTOR, "File already exists. Did not create.");
            return Ok(());
        }

        info!(task = CREATE_TASK.name, file_path = %file_path, "Creating file");
        let command = format!("cmd.exe /c echo. > {}", file_path);
        let result = run_shell_task(ctx.shell(), &command).await?;
        ctx.print(
            &DESCRIPTOR,
            format!("Attempted to create file. Result: {}", result),
        );
        Ok(())
    }

    fn verify(&self, ctx: &FlowContext, file_path: &str) -> &'static str {
        let exists = ctx.fs().exists(Path::new(file_path));
        info!(task = VERIFY_TASK.name, file_path = %file_path, exists, "Verified file");
        if exists {
            "File exists."
        } else {
            "File does not exist."
        }
    }
}

#[async_trait]
impl Flow for CreateTextFileFlow {
    fn descriptor(&self) -> &FlowDescriptor {
        &DESCRIPTOR
    }

    async fn run(&self, ctx: &FlowContext, params: &FlowParams) -> Result<()> {
        let filename = params.str_or("filename", DEFAULT_FILENAME)?;
        let root = params.str_or("root", DEFAULT_ROOT)?;
        let file_path = format!("{}{}", root, filename);

        self.create_if_not_exists(ctx, &file_path).await?;
        let verdict = self.verify(ctx, &file_path);
        ctx.print(&DESCRIPTOR, verdict);
        Ok(())
    }
}
