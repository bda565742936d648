// Deployment Registry Port
// Stores deployments by name; re-deploying a name replaces the previous entry

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::Deployment;
use crate::error::Result;

#[async_trait]
pub trait DeploymentRegistry: Send + Sync {
    /// Insert or replace a deployment, returning the previous one if any
    async fn upsert(&self, deployment: Deployment) -> Result<Option<Deployment>>;

    async fn get(&self, name: &str) -> Result<Option<Deployment>>;

    /// All deployments, ordered by name
    async fn list(&self) -> Result<Vec<Deployment>>;

    /// Pause or resume a deployment; returns false when the name is unknown
    async fn set_paused(&self, name: &str, paused: bool) -> Result<bool>;
}

/// Process-local registry
#[derive(Default)]
pub struct InMemoryDeploymentRegistry {
    deployments: RwLock<BTreeMap<String, Deployment>>,
}

impl InMemoryDeploymentRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeploymentRegistry for InMemoryDeploymentRegistry {
    async fn upsert(&self, deployment: Deployment) -> Result<Option<Deployment>> {
        let mut deployments = self.deployments.write().await;
        Ok(deployments.insert(deployment.name.clone(), deployment))
    }

    async fn get(&self, name: &str) -> Result<Option<Deployment>> {
        Ok(self.deployments.read().await.get(name).cloned())
    }

    async fn list(&self) -> Result<Vec<Deployment>> {
        Ok(self.deployments.read().await.values().cloned().collect())
    }

    async fn set_paused(&self, name: &str, paused: bool) -> Result<bool> {
        let mut deployments = self.deployments.write().await;
        match deployments.get_mut(name) {
            Some(deployment) => {
                if paused {
                    deployment.pause();
                } else {
                    deployment.resume();
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
