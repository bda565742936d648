// Panic isolation for flow runs
use std::any::Any;
use tracing::error;

/// Result of a panic-guarded flow execution
#[derive(Debug)]
pub enum PanicGuardResult<T> {
    /// Execution completed (successfully or with an error)
    Finished(T),
    /// Execution panicked
    Panicked(String),
}

/// Run `future` on its own tokio task so a panicking flow cannot take down the caller
pub async fn execute_guarded<F, T>(future: F) -> PanicGuardResult<T>
where
    F: std::future::Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(future).await {
        Ok(result) => PanicGuardResult::Finished(result),
        Err(join_error) if join_error.is_panic() => {
            let panic_msg = panic_message(join_error.into_panic());
            error!(panic_msg = %panic_msg, "Flow panicked");
            PanicGuardResult::Panicked(panic_msg)
        }
        Err(join_error) => {
            error!(error = %join_error, "Flow task was cancelled");
            PanicGuardResult::Panicked(join_error.to_string())
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
