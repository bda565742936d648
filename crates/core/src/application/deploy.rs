// Deploy Service - registers flows from a Git source with their schedules

use std::sync::Arc;
use tracing::info;

use crate::application::flows;
use crate::application::registry::FlowRegistry;
use crate::domain::{Deployment, DeploymentSpec, GitSource, IntervalSchedule};
use crate::error::{AppError, Result};
use crate::port::DeploymentRegistry;

pub const DEFAULT_GIT_URL: &str = "https://github.com/pavlo-sevidov-datavise/zoe-prefect.git";
pub const DEFAULT_DEPLOY_WORK_POOL: &str = "docker-container-workers-pool";

/// The deployments pushed by a plain `deploy` invocation
pub fn default_deployment_specs() -> Vec<DeploymentSpec> {
    vec![
        DeploymentSpec::new("Run multiple flows", flows::run_multiple::ENTRYPOINT),
        DeploymentSpec::new("Create text file on Windows", flows::create_file::ENTRYPOINT),
        DeploymentSpec::new(
            "Run long running shell command and capture real-time logs",
            flows::run_shell::ENTRYPOINT,
        ),
    ]
}

/// Parse a JSON manifest: `[{"name": "...", "entrypoint": "..."}, ...]`
pub fn parse_manifest(json: &str) -> Result<Vec<DeploymentSpec>> {
    Ok(serde_json::from_str(json)?)
}

/// Shared settings for a batch of deployments
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub source: GitSource,
    pub work_pool_name: String,
    pub schedule: IntervalSchedule,
}

impl Default for DeployRequest {
    fn default() -> Self {
        Self {
            source: GitSource::new(DEFAULT_GIT_URL),
            work_pool_name: DEFAULT_DEPLOY_WORK_POOL.to_string(),
            schedule: IntervalSchedule::default(),
        }
    }
}

pub struct DeployService {
    deployments: Arc<dyn DeploymentRegistry>,
    flows: Arc<FlowRegistry>,
}

impl DeployService {
    pub fn new(deployments: Arc<dyn DeploymentRegistry>, flows: Arc<FlowRegistry>) -> Self {
        Self { deployments, flows }
    }

    /// Register every spec, replacing deployments with the same name
    ///
    /// The whole batch is validated before anything is registered.
    ///
    /// # Errors
    /// - AppError::Validation for an empty name or entrypoint
    /// - AppError::NotFound if an entrypoint has no registered flow
    pub async fn deploy_all(
        &self,
        specs: &[DeploymentSpec],
        request: &DeployRequest,
    ) -> Result<Vec<Deployment>> {
        let mut deployments = Vec::with_capacity(specs.len());
        for spec in specs {
            let deployment =
                Deployment::new(&spec.name, &spec.entrypoint, request.source.clone())
                    .map_err(|e| AppError::Validation(e.to_string()))?
                    .with_work_pool(&request.work_pool_name)
                    .with_schedule(request.schedule.clone());

            if !self.flows.contains(&deployment.entrypoint) {
                return Err(AppError::NotFound(format!(
                    "Deployment '{}' points at unknown entrypoint '{}'",
                    deployment.name, deployment.entrypoint
                )));
            }
            deployments.push(deployment);
        }

        for deployment in &deployments {
            let replaced = self.deployments.upsert(deployment.clone()).await?;
            info!(
                deployment = %deployment.name,
                entrypoint = %deployment.entrypoint,
                source = %deployment.source.url,
                branch = %deployment.source.branch,
                work_pool = %deployment.work_pool_name,
                interval_secs = deployment.schedule.interval_secs,
                replaced = replaced.is_some(),
                "Deployment registered"
            );
        }

        Ok(deployments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::InMemoryDeploymentRegistry;

    fn service() -> (Arc<InMemoryDeploymentRegistry>, DeployService) {
        let registry = Arc::new(InMemoryDeploymentRegistry::new());
        let service = DeployService::new(registry.clone(), Arc::new(FlowRegistry::builtin()));
        (registry, service)
    }

    #[tokio::test]
    async fn test_deploy_default_specs() {
        let (registry, service) = service();

        let deployed = service
            .deploy_all(&default_deployment_specs(), &DeployRequest::default())
            .await
            .unwrap();

        assert_eq!(deployed.len(), 3);
        let stored = registry.list().await.unwrap();
        assert_eq!(stored.len(), 3);
        for deployment in stored {
            assert_eq!(deployment.work_pool_name, "docker-container-workers-pool");
            assert_eq!(deployment.source.url, DEFAULT_GIT_URL);
            assert_eq!(deployment.schedule.interval_secs, 300);
            assert!(!deployment.build);
        }
    }

    #[tokio::test]
    async fn test_unknown_entrypoint_registers_nothing() {
        let (registry, service) = service();
        let specs = vec![
            DeploymentSpec::new("ok", flows::simple_print::ENTRYPOINT),
            DeploymentSpec::new("broken", "flows/missing:flow"),
        ];

        let result = service.deploy_all(&specs, &DeployRequest::default()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(registry.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let (_, service) = service();
        let specs = vec![DeploymentSpec::new("", flows::simple_print::ENTRYPOINT)];

        let result = service.deploy_all(&specs, &DeployRequest::default()).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_empty_entrypoint_rejected() {
        let (registry, service) = service();
        let specs = vec![DeploymentSpec::new("blank", "  ")];

        let result = service.deploy_all(&specs, &DeployRequest::default()).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(registry.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_redeploy_replaces() {
        let (registry, service) = service();
        let specs = vec![DeploymentSpec::new("hello", flows::simple_print::ENTRYPOINT)];
        service
            .deploy_all(&specs, &DeployRequest::default())
            .await
            .unwrap();

        let request = DeployRequest {
            work_pool_name: "other-pool".to_string(),
            ..DeployRequest::default()
        };
        service.deploy_all(&specs, &request).await.unwrap();

        let stored = registry.list().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].work_pool_name, "other-pool");
    }

    #[test]
    fn test_parse_manifest() {
        let specs = parse_manifest(
            r#"[{"name": "Run multiple flows", "entrypoint": "flows/run_multiple_flows:run_multiple_flows"}]"#,
        )
        .unwrap();

        assert_eq!(specs, vec![default_deployment_specs()[0].clone()]);
        assert!(matches!(
            parse_manifest("{not json"),
            Err(AppError::Serialization(_))
        ));
    }
}
