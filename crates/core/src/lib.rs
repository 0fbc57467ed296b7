//! taskr Core Library
//!
//! This is the core library for the taskr task runner. Tasks are registered under a
//! name, wired together with dependencies (run before) and dependees (run after), and
//! a single target is then brought to completion with everything it needs, each task
//! running at most once.
//!
//! ## Architecture
//!
//! - [`orchestrator`] - The [`Taskr`] value owning tasks, history and arguments
//! - [`task`] - Task entity and its fluent configuration
//! - [`registry`] - Name to task lookup
//! - [`execution`] - Graph walk, panic boundary and external command runner
//! - [`history`] - Tasks in the order they ran
//! - [`report`] - Task listing, headers and the timing table
//! - [`arguments`] - Flat key/value invocation arguments
//! - [`configs`] - Tasks declared in a YAML file
//! - [`logging`] - Console log setup
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taskr_core::{CommandRunner, Taskr};
//!
//! let mut taskr = Taskr::from_env();
//!
//! taskr
//!     .task("build", || {
//!         CommandRunner::new().run_shell("cargo build")?;
//!         Ok(())
//!     })
//!     .description("Compile the workspace");
//!
//! taskr
//!     .task("test", || {
//!         CommandRunner::new().run_program("cargo", ["test"])?;
//!         Ok(())
//!     })
//!     .depends_on(["build"]);
//!
//! std::process::exit(taskr.execute());
//! ```

pub mod arguments;
pub mod configs;
pub mod execution;
pub mod history;
pub mod logging;
pub mod orchestrator;
pub mod registry;
pub mod report;
pub mod task;
pub mod types;

// Re-export the main types for easier usage
pub use arguments::Arguments;
pub use execution::{CommandError, CommandRunner, ExitStatusError};
pub use orchestrator::Taskr;
pub use task::Task;
pub use types::{RunError, TaskrError, TaskrResult};
