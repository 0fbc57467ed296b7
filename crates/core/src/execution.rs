//! Task execution module
//!
//! This module handles running a target through the task graph, guarding task actions
//! against panics, and running external commands from inside actions.

pub mod command;
pub mod fault;
pub mod runner;

pub use command::{ensure_success, CapturedOutput, CommandError, CommandRunner, ExitStatusError};
