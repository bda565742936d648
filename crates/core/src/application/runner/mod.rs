// Flow Runner - resolves an entrypoint and executes it as a tracked FlowRun

mod panic_guard;

pub use panic_guard::{execute_guarded, PanicGuardResult};

use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};

use crate::application::flows::{FlowContext, FlowParams};
use crate::application::registry::FlowRegistry;
use crate::domain::{Deployment, FlowRun};
use crate::error::{AppError, Result};
use crate::port::{FileSystem, IdProvider, ShellRunner, TimeProvider};

pub struct FlowRunner {
    registry: Arc<FlowRegistry>,
    shell: Arc<dyn ShellRunner>,
    fs: Arc<dyn FileSystem>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl FlowRunner {
    pub fn new(
        registry: Arc<FlowRegistry>,
        shell: Arc<dyn ShellRunner>,
        fs: Arc<dyn FileSystem>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            registry,
            shell,
            fs,
            id_provider,
            time_provider,
        }
    }

    pub fn registry(&self) -> &FlowRegistry {
        &self.registry
    }

    /// Run the flow at `entrypoint`
    ///
    /// Flow failures are recorded on the returned run (state FAILED, error text);
    /// only an unknown entrypoint is returned as an error.
    pub async fn run(&self, entrypoint: &str, params: FlowParams) -> Result<FlowRun> {
        self.execute(entrypoint, params, None).await
    }

    /// Run a deployment's flow with default parameters
    pub async fn run_deployment(&self, deployment: &Deployment) -> Result<FlowRun> {
        self.execute(
            &deployment.entrypoint,
            FlowParams::new(),
            Some(deployment.name.as_str()),
        )
        .await
    }

    async fn execute(
        &self,
        entrypoint: &str,
        params: FlowParams,
        deployment: Option<&str>,
    ) -> Result<FlowRun> {
        let flow = self.registry.resolve(entrypoint)?;
        let descriptor = *flow.descriptor();

        let mut run = FlowRun::new(
            self.id_provider.generate_id(),
            self.time_provider.now_millis(),
            descriptor.name,
            entrypoint,
        );
        if let Some(name) = deployment {
            run = run.with_deployment(name);
        }
        run.start(self.time_provider.now_millis())?;

        let span = info_span!("flow_run", run_id = %run.id, flow = descriptor.name);
        info!(parent: &span, entrypoint = %entrypoint, deployment = ?deployment, "Flow run started");

        let ctx = Arc::new(FlowContext::new(self.shell.clone(), self.fs.clone()));
        let task_ctx = ctx.clone();
        let outcome = execute_guarded(
            async move { flow.run(&task_ctx, &params).await }.instrument(span.clone()),
        )
        .await;

        run.messages = ctx.messages();
        let now = self.time_provider.now_millis();
        match outcome {
            PanicGuardResult::Finished(Ok(())) => {
                run.complete(now)?;
                info!(parent: &span, duration_ms = ?run.duration_ms(), "Flow run completed");
            }
            PanicGuardResult::Finished(Err(e)) => {
                error!(parent: &span, error = %e, "Flow run failed");
                run.fail(now, e.to_string())?;
            }
            PanicGuardResult::Panicked(msg) => {
                let e = AppError::Panicked(msg);
                error!(parent: &span, error = %e, "Flow run failed");
                run.fail(now, e.to_string())?;
            }
        }

        Ok(run)
    }
}
