use std::sync::Arc;

use thiserror::Error;

use crate::execution::command::{CommandError, ExitStatusError};

/// The main error type for taskr operations
#[derive(Debug, Error)]
pub enum TaskrError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for taskr operations
pub type TaskrResult<T> = Result<T, TaskrError>;

/// Errors produced while running a target.
///
/// Cloneable so a task that already ran can hand its recorded result back to every
/// later caller that reaches it through the graph.
#[derive(Debug, Clone, Error)]
pub enum RunError {
    #[error("Target does not exist: {0}")]
    TargetNotFound(String),

    #[error("Cycle detected: {}", .0.join(" -> "))]
    CycleDetected(Vec<String>),

    #[error("Task '{task}' failed: {error:#}")]
    TaskFailed {
        task: String,
        error: Arc<anyhow::Error>,
    },
}

impl RunError {
    pub fn task_failed(task: impl Into<String>, error: anyhow::Error) -> Self {
        RunError::TaskFailed {
            task: task.into(),
            error: Arc::new(error),
        }
    }

    /// Process exit code for this error.
    ///
    /// An explicit [`CommandError`] anywhere in the action's error chain wins, then the
    /// status carried by an [`ExitStatusError`]. Everything else maps to 1.
    pub fn exit_code(&self) -> i32 {
        let RunError::TaskFailed { error, .. } = self else {
            return 1;
        };

        for cause in error.chain() {
            if let Some(command_error) = cause.downcast_ref::<CommandError>() {
                return command_error.exit_code;
            }
            if let Some(status_error) = cause.downcast_ref::<ExitStatusError>() {
                return status_error.exit_code();
            }
        }
        1
    }
}
