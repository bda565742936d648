//! Zoe Scheduler - Main Entry Point
//! Deploys flows into the registry, then runs each on its interval until Ctrl+C

mod config;
mod telemetry;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use zoe_core::application::deploy::{default_deployment_specs, parse_manifest};
use zoe_core::application::{
    shutdown_channel, DeployRequest, DeployService, DeploymentScheduler, FlowRegistry, FlowRunner,
};
use zoe_core::port::id_provider::UuidProvider;
use zoe_core::port::time_provider::SystemTimeProvider;
use zoe_core::port::InMemoryDeploymentRegistry;
use zoe_infra_system::{LocalFileSystem, StreamingShellExecutor};

use config::SchedulerConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const SHUTDOWN_GRACE: std::time::Duration = std::time::Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration & initialize logging
    let config = SchedulerConfig::from_env()?;
    telemetry::init_logging(config.log_format)?;

    info!("Zoe Scheduler v{} starting...", VERSION);

    // 2. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let flows = Arc::new(FlowRegistry::builtin());
    let deployments = Arc::new(InMemoryDeploymentRegistry::new());
    let runner = Arc::new(FlowRunner::new(
        flows.clone(),
        Arc::new(StreamingShellExecutor::new(time_provider.clone())),
        Arc::new(LocalFileSystem),
        Arc::new(UuidProvider),
        time_provider,
    ));

    // 3. Deploy
    let specs = match &config.deployments_file {
        Some(path) => {
            info!(path = %path.display(), "Loading deployment manifest");
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse_manifest(&json).context("Invalid deployment manifest")?
        }
        None => default_deployment_specs(),
    };

    let request = DeployRequest {
        source: config.source(),
        work_pool_name: config.work_pool_name.clone(),
        schedule: config.schedule()?,
    };
    let deployed = DeployService::new(deployments.clone(), flows)
        .deploy_all(&specs, &request)
        .await
        .context("Deployment failed")?;
    info!(count = deployed.len(), "Deployments registered");

    // 4. Start scheduler
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let scheduler = DeploymentScheduler::new(deployments, runner);
    let scheduler_handle = tokio::spawn(async move {
        if let Err(e) = scheduler.run(shutdown_rx).await {
            tracing::error!(error = ?e, "Scheduler failed");
        }
    });

    info!("System ready. Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 6. Graceful shutdown; a run still going after the grace period is dropped and its child killed
    shutdown_tx.shutdown();
    if tokio::time::timeout(SHUTDOWN_GRACE, scheduler_handle).await.is_err() {
        tracing::warn!("Scheduler did not stop within grace period");
    }

    info!("Shutdown complete.");

    Ok(())
}
