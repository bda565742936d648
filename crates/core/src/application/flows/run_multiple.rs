// Composite flow: simple print, then filename verification

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::{Flow, FlowContext, FlowDescriptor, FlowParams, SimplePrintFlow, VerifyFilenamesFlow};
use crate::error::Result;

pub const ENTRYPOINT: &str = "flows/run_multiple_flows:run_multiple_flows";

const DESCRIPTOR: FlowDescriptor = FlowDescriptor {
    name: "Run multiple flows",
    log_prints: true,
};

/// Runs each sub-flow with its default parameters, stopping at the first failure
pub struct RunMultipleFlows {
    subflows: Vec<Arc<dyn Flow>>,
}

impl RunMultipleFlows {
    pub fn new(subflows: Vec<Arc<dyn Flow>>) -> Self {
        Self { subflows }
    }
}

impl Default for RunMultipleFlows {
    fn default() -> Self {
        Self::new(vec![Arc::new(SimplePrintFlow), Arc::new(VerifyFilenamesFlow)])
    }
}

#[async_trait]
impl Flow for RunMultipleFlows {
    fn descriptor(&self) -> &FlowDescriptor {
        &DESCRIPTOR
    }

    async fn run(&self, ctx: &FlowContext, _params: &FlowParams) -> Result<()> {
        let defaults = FlowParams::new();
        for subflow in &self.subflows {
            info!(
                flow = DESCRIPTOR.name,
                subflow = subflow.descriptor().name,
                "Starting sub-flow"
            );
            subflow.run(ctx, &defaults).await?;
        }
        Ok(())
    }
}
