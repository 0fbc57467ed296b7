//! The [`Taskr`] orchestrator
//!
//! Owns the task registry, the run history and the invocation arguments, and drives a
//! whole run from target selection to exit code.

use colored::*;
use tracing::{debug, info, warn};

use crate::arguments::Arguments;
use crate::history::RunHistory;
use crate::logging;
use crate::registry::TaskRegistry;
use crate::report;
use crate::task::Task;
use crate::types::RunError;

#[derive(Debug, Default)]
pub struct Taskr {
    arguments: Arguments,
    pub(crate) registry: TaskRegistry,
    pub(crate) history: RunHistory,
}

impl Taskr {
    pub fn new(arguments: Arguments) -> Self {
        Self {
            arguments,
            registry: TaskRegistry::new(),
            history: RunHistory::new(),
        }
    }

    /// An orchestrator reading its arguments from the process command line.
    pub fn from_env() -> Self {
        Self::new(Arguments::from_env())
    }

    /// Register `action` under `name` and return the task for further configuration.
    ///
    /// Registering a name twice replaces the earlier task.
    pub fn task<F>(&mut self, name: impl Into<String>, action: F) -> &mut Task
    where
        F: FnMut() -> anyhow::Result<()> + 'static,
    {
        self.registry.register(Task::new(name, action))
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn history(&self) -> &RunHistory {
        &self.history
    }

    /// Deferred errors of every task that ran, in run order.
    pub fn deferred_errors(&self) -> Vec<(&str, &RunError)> {
        self.history
            .iter()
            .filter_map(|name| {
                let run = self.registry.get(name)?.run()?;
                run.deferred_error.as_ref().map(|err| (name, err))
            })
            .collect()
    }

    /// Run the selected target and return the process exit code.
    ///
    /// Without a `target` argument the registered tasks are listed and nothing runs.
    /// A deferred error overrides the run's own result; when several tasks deferred an
    /// error the last one to run wins.
    pub fn execute(&mut self) -> i32 {
        logging::init(self.arguments.has("verbose") || self.arguments.has("v"));

        let Some(target) = self.arguments.get("target").map(str::to_string) else {
            info!("{}", report::task_listing(&self.registry));
            return 0;
        };

        info!("Running taskr");
        if let Some(summary) = report::argument_summary(&self.arguments) {
            debug!("Arguments:");
            debug!("{}", summary);
        }
        info!("");

        let mut result = self.run_target(&target);
        info!("Finished running");

        for (name, err) in self.deferred_errors() {
            warn!("{}", format!("Deferred error in '{}': {}", name, err).red());
            result = Err(err.clone());
        }

        let exit_code = match &result {
            Ok(()) => 0,
            Err(err) => err.exit_code(),
        };

        info!("");
        info!("{}", report::timing_table(&self.registry, &self.history));
        exit_code
    }
}
