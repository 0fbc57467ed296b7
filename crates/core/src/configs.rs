//! Configuration files
//!
//! Tasks declared in YAML instead of Rust code.

pub mod tasks;

pub use tasks::{load_tasks_file, parse_tasks_config, TaskConfig, TasksFileConfig};
