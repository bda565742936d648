// Shell command flow

use async_trait::async_trait;

use super::{Flow, FlowContext, FlowDescriptor, FlowParams};
use crate::application::tasks::run_shell_task;
use crate::error::Result;

pub const ENTRYPOINT: &str = "flows/run_shell_command:run_shell_flow";

/// Long running command that prints the date every 3 seconds
pub const DEFAULT_COMMAND: &str = "seq 1 100 | xargs -I{} sh -c 'date; sleep 3'";

const DESCRIPTOR: FlowDescriptor = FlowDescriptor {
    name: "Run shell command and capture output",
    log_prints: true,
};

pub struct RunShellFlow;

#[async_trait]
impl Flow for RunShellFlow {
    fn descriptor(&self) -> &FlowDescriptor {
        &DESCRIPTOR
    }

    async fn run(&self, ctx: &FlowContext, params: &FlowParams) -> Result<()> {
        let command = params.str_or("command", DEFAULT_COMMAND)?;

        ctx.print(&DESCRIPTOR, format!("Going to execute command='{}'", command));
        let result = run_shell_task(ctx.shell(), command).await?;
        ctx.print(
            &DESCRIPTOR,
            format!("Finished running external program. Result: {}", result),
        );
        Ok(())
    }
}
