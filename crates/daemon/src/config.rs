//! Scheduler configuration from environment variables

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use zoe_core::application::deploy::{DEFAULT_DEPLOY_WORK_POOL, DEFAULT_GIT_URL};
use zoe_core::domain::deployment::{DEFAULT_BRANCH, DEFAULT_INTERVAL_SECS, DEFAULT_TIMEZONE};
use zoe_core::domain::{GitCredentials, GitSource, IntervalSchedule};

use crate::telemetry::LogFormat;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub git_url: String,
    pub git_branch: String,
    pub git_credentials: Option<GitCredentials>,
    pub work_pool_name: String,
    pub interval_secs: u64,
    pub deployments_file: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl SchedulerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (lets tests avoid touching the process env)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let interval_secs = match lookup("ZOE_INTERVAL_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("ZOE_INTERVAL_SECS is not a number: '{}'", raw))?,
            None => DEFAULT_INTERVAL_SECS,
        };

        let git_credentials = lookup("ZOE_GIT_TOKEN").map(|access_token| GitCredentials {
            username: lookup("ZOE_GIT_USERNAME"),
            access_token,
        });

        Ok(Self {
            git_url: lookup("ZOE_GIT_URL").unwrap_or_else(|| DEFAULT_GIT_URL.to_string()),
            git_branch: lookup("ZOE_GIT_BRANCH").unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            git_credentials,
            work_pool_name: lookup("ZOE_WORK_POOL")
                .unwrap_or_else(|| DEFAULT_DEPLOY_WORK_POOL.to_string()),
            interval_secs,
            deployments_file: lookup("ZOE_DEPLOYMENTS_FILE").map(PathBuf::from),
            log_format: LogFormat::parse(&lookup("ZOE_LOG_FORMAT").unwrap_or_default()),
        })
    }

    pub fn source(&self) -> GitSource {
        let source = GitSource::new(&self.git_url).with_branch(&self.git_branch);
        match &self.git_credentials {
            Some(credentials) => source.with_credentials(credentials.clone()),
            None => source,
        }
    }

    pub fn schedule(&self) -> Result<IntervalSchedule> {
        IntervalSchedule::new(Duration::from_secs(self.interval_secs), DEFAULT_TIMEZONE)
            .context("Invalid ZOE_INTERVAL_SECS")
    }
}
