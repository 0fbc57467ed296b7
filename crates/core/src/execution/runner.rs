//! Depth-first execution of a target and everything around it
//!
//! For each task: dependencies first, then the guarded action, then (only if the task
//! ended without an error after policy) its dependees. Every task's action runs at most
//! once; reaching it again hands back the recorded result.

use colored::*;
use tracing::{error, info, warn};

use crate::execution::fault::run_guarded;
use crate::orchestrator::Taskr;
use crate::registry::TaskRegistry;
use crate::report::task_header;
use crate::task::{Task, VisitState};
use crate::types::RunError;

impl Taskr {
    /// Run `target` with all of its dependencies and dependees.
    ///
    /// Returns the first error that was not absorbed by a task's error policy. Deferred
    /// errors are not part of the result; see [`Taskr::deferred_errors`].
    pub fn run_target(&mut self, target: &str) -> Result<(), RunError> {
        let mut path = Vec::new();
        self.visit(target, &mut path)
    }

    fn visit(&mut self, name: &str, path: &mut Vec<String>) -> Result<(), RunError> {
        let task = lookup(&mut self.registry, name)?;
        match task.state {
            VisitState::Done => {
                return match task.run().and_then(|run| run.error.clone()) {
                    Some(err) => Err(err),
                    None => Ok(()),
                };
            }
            VisitState::InProgress => return Err(cycle(path, name)),
            VisitState::Unvisited => {}
        }

        task.state = VisitState::InProgress;
        let dependencies = task.dependencies().to_vec();
        path.push(name.to_string());

        let result = self.visit_all(&dependencies, path).and_then(|()| {
            self.run_action(name)?;
            let dependees = lookup(&mut self.registry, name)?.dependees().to_vec();
            self.visit_all(&dependees, path)
        });

        path.pop();
        if let Ok(task) = lookup(&mut self.registry, name) {
            if task.state == VisitState::InProgress {
                // A dependency failed before the action ran
                task.state = VisitState::Unvisited;
            }
        }
        result
    }

    fn visit_all(&mut self, names: &[String], path: &mut Vec<String>) -> Result<(), RunError> {
        for name in names {
            self.visit(name, path)?;
        }
        Ok(())
    }

    fn run_action(&mut self, name: &str) -> Result<(), RunError> {
        let task = lookup(&mut self.registry, name)?;

        info!("{}", task_header(name));
        let (duration, result) = run_guarded(task.action_mut());
        let raw_error = result.err().map(|err| RunError::task_failed(name, err));

        if let Some(err) = &raw_error {
            if task.defers_on_error() {
                warn!("{}", format!("Deferring error: {}", err).yellow());
            } else if task.continues_on_error() {
                warn!("{}", format!("Continuing despite error: {}", err).yellow());
            }
        }

        let error = task.finish(duration, raw_error);
        self.history.push(name);
        info!("");

        match error {
            Some(err) => {
                error!("{}", format!("Failed with error: {}", err).red());
                Err(err)
            }
            None => Ok(()),
        }
    }
}

fn lookup<'a>(registry: &'a mut TaskRegistry, name: &str) -> Result<&'a mut Task, RunError> {
    registry
        .get_mut(name)
        .ok_or_else(|| RunError::TargetNotFound(name.to_string()))
}

/// The cycle closed by re-entering `name`, e.g. `a -> b -> a`.
fn cycle(path: &[String], name: &str) -> RunError {
    let start = path.iter().position(|entry| entry == name).unwrap_or(0);
    let mut cycle = path[start..].to_vec();
    cycle.push(name.to_string());
    RunError::CycleDetected(cycle)
}
