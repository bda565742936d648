//! Deployment Scheduler - runs every registered deployment on its interval
//!
//! One tokio task per deployment. The first tick fires immediately; a run
//! that outlasts its interval delays the next tick instead of stacking runs.
//! Pause state is re-read from the registry on every tick.

mod shutdown;

pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::application::runner::FlowRunner;
use crate::domain::{Deployment, FlowRun, FlowRunState};
use crate::error::{AppError, Result};
use crate::port::DeploymentRegistry;

pub struct DeploymentScheduler {
    registry: Arc<dyn DeploymentRegistry>,
    runner: Arc<FlowRunner>,
}

impl DeploymentScheduler {
    pub fn new(registry: Arc<dyn DeploymentRegistry>, runner: Arc<FlowRunner>) -> Self {
        Self { registry, runner }
    }

    /// Run scheduling loops until `shutdown` fires
    ///
    /// Deployments registered after this call are not picked up.
    pub async fn run(&self, shutdown: ShutdownToken) -> Result<()> {
        let deployments = self.registry.list().await?;
        info!(deployments = deployments.len(), "Deployment scheduler started");

        let handles: Vec<JoinHandle<()>> = deployments
            .into_iter()
            .map(|deployment| {
                tokio::spawn(schedule_loop(
                    deployment,
                    self.registry.clone(),
                    self.runner.clone(),
                    shutdown.clone(),
                ))
            })
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Deployment loop aborted");
            }
        }

        info!("Deployment scheduler stopped");
        Ok(())
    }

    /// Trigger one run of a deployment now, ignoring its schedule and pause state
    pub async fn run_once(&self, name: &str) -> Result<FlowRun> {
        let deployment = self
            .registry
            .get(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Deployment '{}'", name)))?;

        self.runner.run_deployment(&deployment).await
    }
}

async fn schedule_loop(
    deployment: Deployment,
    registry: Arc<dyn DeploymentRegistry>,
    runner: Arc<FlowRunner>,
    mut shutdown: ShutdownToken,
) {
    let name = deployment.name.clone();
    let mut tick = interval(deployment.schedule.interval());
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        deployment = %name,
        interval_secs = deployment.schedule.interval_secs,
        timezone = %deployment.schedule.timezone,
        work_pool = %deployment.work_pool_name,
        "Deployment scheduled"
    );

    loop {
        tokio::select! {
            _ = tick.tick() => {}
            _ = shutdown.wait() => break,
        }
        if shutdown.is_shutdown() {
            break;
        }

        let current = match registry.get(&name).await {
            Ok(Some(current)) => current,
            Ok(None) => {
                warn!(deployment = %name, "Deployment removed, stopping its schedule");
                break;
            }
            Err(e) => {
                error!(deployment = %name, error = ?e, "Failed to read deployment");
                continue;
            }
        };
        if current.paused {
            debug!(deployment = %name, "Deployment paused, skipping tick");
            continue;
        }

        match runner.run_deployment(&current).await {
            Ok(run) if run.state == FlowRunState::Completed => {
                info!(deployment = %name, run_id = %run.id, "Scheduled run completed");
            }
            Ok(run) => {
                warn!(
                    deployment = %name,
                    run_id = %run.id,
                    error = ?run.error,
                    "Scheduled run failed"
                );
            }
            Err(e) => {
                error!(deployment = %name, error = %e, "Scheduled run could not start");
            }
        }
    }

    debug!(deployment = %name, "Deployment loop exited");
}
