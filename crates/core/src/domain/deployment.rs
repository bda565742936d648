// Deployment Domain Model
// A deployment binds a flow entrypoint from a Git source to a work pool and a schedule

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::{DomainError, Result};

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_WORK_POOL: &str = "default-pool";
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Every 5 minutes
pub const DEFAULT_INTERVAL_SECS: u64 = 5 * 60;

/// Fixed-interval schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSchedule {
    pub interval_secs: u64,
    pub timezone: String,
}

impl IntervalSchedule {
    pub fn new(interval: Duration, timezone: impl Into<String>) -> Result<Self> {
        let interval_secs = interval.as_secs();
        if interval_secs == 0 {
            return Err(DomainError::InvalidSchedule(
                "interval must be at least one second".to_string(),
            ));
        }
        Ok(Self {
            interval_secs,
            timezone: timezone.into(),
        })
    }

    pub fn every_minutes(minutes: u64) -> Result<Self> {
        let secs = minutes.checked_mul(60).ok_or_else(|| {
            DomainError::InvalidSchedule(format!("{} minutes overflows the interval", minutes))
        })?;
        Self::new(Duration::from_secs(secs), DEFAULT_TIMEZONE)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for IntervalSchedule {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

/// Credentials for a private flow repository
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitCredentials {
    pub username: Option<String>,
    pub access_token: String,
}

impl std::fmt::Debug for GitCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitCredentials")
            .field("username", &self.username)
            .field("access_token", &"***")
            .finish()
    }
}

/// Where flow code is pulled from. Recorded on the deployment, never cloned here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSource {
    pub url: String,
    pub branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<GitCredentials>,
}

impl GitSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            branch: DEFAULT_BRANCH.to_string(),
            credentials: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_credentials(mut self, credentials: GitCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

/// Name and entrypoint of a flow to deploy (one manifest entry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSpec {
    pub name: String,
    pub entrypoint: String,
}

impl DeploymentSpec {
    pub fn new(name: impl Into<String>, entrypoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entrypoint: entrypoint.into(),
        }
    }
}

/// A registered, schedulable flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub name: String,
    pub entrypoint: String,
    pub source: GitSource,
    pub work_pool_name: String,
    pub schedule: IntervalSchedule,
    /// Flow code is never packaged into an image
    pub build: bool,
    pub paused: bool,
}

impl Deployment {
    pub fn new(
        name: impl Into<String>,
        entrypoint: impl Into<String>,
        source: GitSource,
    ) -> Result<Self> {
        let name = name.into();
        let entrypoint = entrypoint.into();

        if name.trim().is_empty() {
            return Err(DomainError::InvalidDeployment(
                "deployment name must not be empty".to_string(),
            ));
        }
        if entrypoint.trim().is_empty() {
            return Err(DomainError::InvalidDeployment(format!(
                "deployment '{}' has an empty entrypoint",
                name
            )));
        }

        Ok(Self {
            name,
            entrypoint,
            source,
            work_pool_name: DEFAULT_WORK_POOL.to_string(),
            schedule: IntervalSchedule::default(),
            build: false,
            paused: false,
        })
    }

    pub fn with_work_pool(mut self, work_pool_name: impl Into<String>) -> Self {
        self.work_pool_name = work_pool_name.into();
        self
    }

    pub fn with_schedule(mut self, schedule: IntervalSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployment_defaults() {
        let deployment = Deployment::new(
            "Run multiple flows",
            "flows/run_multiple_flows:run_multiple_flows",
            GitSource::new("https://example.com/flows.git"),
        )
        .unwrap();

        assert_eq!(deployment.work_pool_name, "default-pool");
        assert_eq!(deployment.source.branch, "main");
        assert_eq!(deployment.schedule.interval(), Duration::from_secs(300));
        assert_eq!(deployment.schedule.timezone, "UTC");
        assert!(!deployment.build);
        assert!(!deployment.paused);
    }

    #[test]
    fn test_empty_name_or_entrypoint_rejected() {
        let source = GitSource::new("https://example.com/flows.git");
        assert!(Deployment::new("  ", "flows/a:b", source.clone()).is_err());
        assert!(Deployment::new("name", "", source).is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = IntervalSchedule::new(Duration::from_millis(500), "UTC");
        assert!(matches!(result, Err(DomainError::InvalidSchedule(_))));
    }

    #[test]
    fn test_every_minutes_overflow_rejected() {
        let result = IntervalSchedule::every_minutes(u64::MAX / 10);
        assert!(matches!(result, Err(DomainError::InvalidSchedule(_))));
        assert!(IntervalSchedule::every_minutes(0).is_err());
    }

    #[test]
    fn test_every_minutes() {
        let schedule = IntervalSchedule::every_minutes(5).unwrap();
        assert_eq!(schedule, IntervalSchedule::default());
    }

    #[test]
    fn test_credentials_token_redacted_in_debug() {
        let source = GitSource::new("https://example.com/private.git").with_credentials(
            GitCredentials {
                username: Some("deploy".to_string()),
                access_token: "ghp_secret".to_string(),
            },
        );

        let debug = format!("{:?}", source);
        assert!(debug.contains("deploy"));
        assert!(!debug.contains("ghp_secret"));
    }

    #[test]
    fn test_spec_deserializes_from_manifest_entry() {
        let spec: DeploymentSpec = serde_json::from_value(serde_json::json!({
            "name": "Run multiple flows",
            "entrypoint": "flows/run_multiple_flows:run_multiple_flows"
        }))
        .unwrap();

        assert_eq!(spec.name, "Run multiple flows");
    }
}
