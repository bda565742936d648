// Simple print flow

use async_trait::async_trait;

use super::{Flow, FlowContext, FlowDescriptor, FlowParams};
use crate::error::Result;

pub const ENTRYPOINT: &str = "flows/simple_print_flow:simple_print_flow";

const DESCRIPTOR: FlowDescriptor = FlowDescriptor {
    name: "simple-print-flow",
    log_prints: true,
};

pub struct SimplePrintFlow;

#[async_trait]
impl Flow for SimplePrintFlow {
    fn descriptor(&self) -> &FlowDescriptor {
        &DESCRIPTOR
    }

    async fn run(&self, ctx: &FlowContext, _params: &FlowParams) -> Result<()> {
        ctx.print(&DESCRIPTOR, "Hello, World!");
        Ok(())
    }
}
