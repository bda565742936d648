// Flow Run Domain Model

use serde::{Deserialize, Serialize};

use super::error::{DomainError, Result};

/// Flow run ID (UUID v4)
pub type FlowRunId = String;

/// Flow run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowRunState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl FlowRunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowRunState::Completed | FlowRunState::Failed)
    }
}

impl std::fmt::Display for FlowRunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowRunState::Pending => write!(f, "PENDING"),
            FlowRunState::Running => write!(f, "RUNNING"),
            FlowRunState::Completed => write!(f, "COMPLETED"),
            FlowRunState::Failed => write!(f, "FAILED"),
        }
    }
}

/// One execution of a flow, held in memory only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowRun {
    pub id: FlowRunId,
    pub flow_name: String,
    pub entrypoint: String,
    pub deployment: Option<String>,

    pub state: FlowRunState,
    pub created_at: i64, // epoch ms
    pub started_at: Option<i64>,
    pub finished_at: Option<i64>,

    /// Messages printed by the flow, in order
    pub messages: Vec<String>,
    pub error: Option<String>,
}

impl FlowRun {
    /// Create a pending run
    ///
    /// # Arguments
    ///
    /// * `id` - Unique run ID (injected, not generated)
    /// * `created_at` - Creation timestamp in epoch ms (injected, not system time)
    /// * `flow_name` - Display name of the flow
    /// * `entrypoint` - Registry entrypoint the flow was resolved from
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        flow_name: impl Into<String>,
        entrypoint: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            flow_name: flow_name.into(),
            entrypoint: entrypoint.into(),
            deployment: None,
            state: FlowRunState::Pending,
            created_at,
            started_at: None,
            finished_at: None,
            messages: Vec::new(),
            error: None,
        }
    }

    pub fn with_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = Some(deployment.into());
        self
    }

    /// Transition to Running state with explicit timestamp
    pub fn start(&mut self, now_millis: i64) -> Result<()> {
        self.transition(FlowRunState::Pending, FlowRunState::Running)?;
        self.started_at = Some(now_millis);
        Ok(())
    }

    /// Transition to Completed state with explicit timestamp
    pub fn complete(&mut self, now_millis: i64) -> Result<()> {
        self.transition(FlowRunState::Running, FlowRunState::Completed)?;
        self.finished_at = Some(now_millis);
        Ok(())
    }

    /// Transition to Failed state, keeping the error message
    pub fn fail(&mut self, now_millis: i64, error: impl Into<String>) -> Result<()> {
        if self.state.is_terminal() {
            return Err(DomainError::InvalidStateTransition {
                from: self.state.to_string(),
                to: FlowRunState::Failed.to_string(),
            });
        }
        self.state = FlowRunState::Failed;
        self.finished_at = Some(now_millis);
        self.error = Some(error.into());
        Ok(())
    }

    pub fn duration_ms(&self) -> Option<i64> {
        Some(self.finished_at? - self.started_at?)
    }

    fn transition(&mut self, expected: FlowRunState, to: FlowRunState) -> Result<()> {
        if self.state != expected {
            return Err(DomainError::InvalidStateTransition {
                from: self.state.to_string(),
                to: to.to_string(),
            });
        }
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> FlowRun {
        FlowRun::new("run-1", 1000, "Run multiple flows", "flows/run_multiple_flows:run_multiple_flows")
    }

    #[test]
    fn test_run_lifecycle() {
        let mut run = run();
        assert_eq!(run.state, FlowRunState::Pending);

        run.start(2000).unwrap();
        assert_eq!(run.state, FlowRunState::Running);
        assert_eq!(run.started_at, Some(2000));

        run.complete(3500).unwrap();
        assert_eq!(run.state, FlowRunState::Completed);
        assert_eq!(run.duration_ms(), Some(1500));
        assert!(run.error.is_none());
    }

    #[test]
    fn test_fail_records_error() {
        let mut run = run();
        run.start(2000).unwrap();
        run.fail(2100, "boom").unwrap();

        assert_eq!(run.state, FlowRunState::Failed);
        assert_eq!(run.error.as_deref(), Some("boom"));
        assert_eq!(run.finished_at, Some(2100));
    }

    #[test]
    fn test_invalid_transitions() {
        let mut run = run();
        assert!(matches!(
            run.complete(2000),
            Err(DomainError::InvalidStateTransition { .. })
        ));

        run.start(2000).unwrap();
        run.complete(3000).unwrap();
        assert!(run.start(4000).is_err());
        assert!(run.fail(4000, "late").is_err());
        assert_eq!(run.state, FlowRunState::Completed);
    }

    #[test]
    fn test_state_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&FlowRunState::Completed).unwrap();
        assert_eq!(json, "\"COMPLETED\"");
    }
}
