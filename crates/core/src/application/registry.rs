// Flow Registry - entrypoint -> flow

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::flows::{
    self, CreateTextFileFlow, Flow, FlowDescriptor, RunMultipleFlows, RunShellFlow,
    SimplePrintFlow, VerifyFilenamesFlow,
};
use crate::error::{AppError, Result};

#[derive(Default, Clone)]
pub struct FlowRegistry {
    flows: BTreeMap<String, Arc<dyn Flow>>,
}

impl FlowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in flow
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(flows::simple_print::ENTRYPOINT, Arc::new(SimplePrintFlow));
        registry.register(
            flows::verify_filenames::ENTRYPOINT,
            Arc::new(VerifyFilenamesFlow),
        );
        registry.register(flows::run_shell::ENTRYPOINT, Arc::new(RunShellFlow));
        registry.register(flows::create_file::ENTRYPOINT, Arc::new(CreateTextFileFlow));
        registry.register(
            flows::run_multiple::ENTRYPOINT,
            Arc::new(RunMultipleFlows::default()),
        );
        registry
    }

    /// Register a flow, replacing any flow already at `entrypoint`
    pub fn register(&mut self, entrypoint: impl Into<String>, flow: Arc<dyn Flow>) {
        self.flows.insert(entrypoint.into(), flow);
    }

    pub fn resolve(&self, entrypoint: &str) -> Result<Arc<dyn Flow>> {
        self.flows
            .get(entrypoint)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("No flow registered at '{}'", entrypoint)))
    }

    pub fn contains(&self, entrypoint: &str) -> bool {
        self.flows.contains_key(entrypoint)
    }

    /// Entrypoints and descriptors, ordered by entrypoint
    pub fn entries(&self) -> Vec<(&str, &FlowDescriptor)> {
        self.flows
            .iter()
            .map(|(entrypoint, flow)| (entrypoint.as_str(), flow.descriptor()))
            .collect()
    }
}
