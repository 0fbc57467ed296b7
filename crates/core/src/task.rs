//! Task entity and its fluent configuration surface

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use crate::types::RunError;

/// The unit of work a task runs.
pub type Action = Box<dyn FnMut() -> anyhow::Result<()>>;

/// Where a task is in the current walk of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitState {
    #[default]
    Unvisited,
    /// Dependencies or the action itself are being run.
    InProgress,
    Done,
}

/// Outcome recorded once a task's action has run.
#[derive(Debug, Clone)]
pub struct TaskRun {
    /// Time spent in the action alone.
    pub duration: Duration,
    /// The error after error policy was applied.
    pub error: Option<RunError>,
    /// The raw error when the task defers its errors.
    pub deferred_error: Option<RunError>,
}

impl TaskRun {
    pub fn failed(&self) -> bool {
        self.error.is_some() || self.deferred_error.is_some()
    }
}

/// A registered task.
///
/// Configuration methods return `&mut Self` so registration reads as a chain:
///
/// ```rust
/// use taskr_core::Taskr;
///
/// let mut taskr = Taskr::default();
/// taskr
///     .task("test", || Ok(()))
///     .depends_on(["build"])
///     .description("Run the test suite");
/// ```
pub struct Task {
    name: String,
    description: Option<String>,
    action: Action,
    dependencies: Vec<String>,
    dependees: Vec<String>,
    continue_on_error: bool,
    defer_on_error: bool,
    pub(crate) state: VisitState,
    run: Option<TaskRun>,
}

impl Task {
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: FnMut() -> anyhow::Result<()> + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            action: Box::new(action),
            dependencies: Vec::new(),
            dependees: Vec::new(),
            continue_on_error: false,
            defer_on_error: false,
            state: VisitState::Unvisited,
            run: None,
        }
    }

    /// Run `names` before this task, in the given order.
    ///
    /// Duplicates are dropped within this call only; names added by earlier calls are
    /// not consulted.
    pub fn depends_on<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        append_unique(&mut self.dependencies, names);
        self
    }

    /// Run `names` after this task once it succeeded, in the given order.
    ///
    /// Same duplicate handling as [`Task::depends_on`].
    pub fn dependee_of<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        append_unique(&mut self.dependees, names);
        self
    }

    /// Discard errors from this task's action so the run carries on.
    pub fn continue_on_error(&mut self) -> &mut Self {
        self.continue_on_error = true;
        self
    }

    /// Let the run carry on after this task fails, but report the error at the end.
    pub fn defer_on_error(&mut self) -> &mut Self {
        self.defer_on_error = true;
        self
    }

    /// Text shown next to the name when tasks are listed.
    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn dependees(&self) -> &[String] {
        &self.dependees
    }

    pub fn continues_on_error(&self) -> bool {
        self.continue_on_error
    }

    pub fn defers_on_error(&self) -> bool {
        self.defer_on_error
    }

    pub fn did_run(&self) -> bool {
        self.run.is_some()
    }

    pub fn run(&self) -> Option<&TaskRun> {
        self.run.as_ref()
    }

    pub(crate) fn action_mut(&mut self) -> &mut Action {
        &mut self.action
    }

    /// Apply error policy to the action's raw result and record the outcome.
    ///
    /// Returns the error that should propagate to the caller, if any.
    pub(crate) fn finish(
        &mut self,
        duration: Duration,
        error: Option<RunError>,
    ) -> Option<RunError> {
        debug_assert!(self.run.is_none(), "task '{}' finished twice", self.name);

        let mut error = error;
        let mut deferred_error = None;
        if self.defer_on_error {
            deferred_error = error.take();
        } else if self.continue_on_error {
            error = None;
        }

        self.state = VisitState::Done;
        self.run = Some(TaskRun {
            duration,
            error: error.clone(),
            deferred_error,
        });
        error
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("dependencies", &self.dependencies)
            .field("dependees", &self.dependees)
            .field("continue_on_error", &self.continue_on_error)
            .field("defer_on_error", &self.defer_on_error)
            .field("state", &self.state)
            .field("run", &self.run)
            .finish_non_exhaustive()
    }
}

fn append_unique<I, S>(target: &mut Vec<String>, names: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    for name in names {
        let name = name.into();
        if seen.insert(name.clone()) {
            target.push(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Task {
        Task::new("t", || Ok(()))
    }

    #[test]
    fn test_dedup_within_single_call() {
        let mut task = noop();
        task.depends_on(["a", "b", "a", "c", "b"]);
        assert_eq!(task.dependencies(), ["a", "b", "c"]);
    }

    #[test]
    fn test_duplicates_across_calls_are_kept() {
        let mut task = noop();
        task.depends_on(["a", "b"]).depends_on(["b", "a"]);
        assert_eq!(task.dependencies(), ["a", "b", "b", "a"]);

        task.dependee_of(["x", "x"]).dependee_of(["x"]);
        assert_eq!(task.dependees(), ["x", "x"]);
    }

    #[test]
    fn test_builder_sets_flags_and_description() {
        let mut task = noop();
        task.continue_on_error()
            .defer_on_error()
            .description("does things");
        assert!(task.continues_on_error());
        assert!(task.defers_on_error());
        assert_eq!(task.get_description(), Some("does things"));
        assert!(!task.did_run());
    }

    #[test]
    fn test_finish_with_continue_discards_error() {
        let mut task = noop();
        task.continue_on_error();
        let propagated = task.finish(
            Duration::from_millis(5),
            Some(RunError::task_failed("t", anyhow::anyhow!("bad"))),
        );
        assert!(propagated.is_none());
        let run = task.run().unwrap();
        assert!(run.error.is_none());
        assert!(run.deferred_error.is_none());
        assert!(!run.failed());
        assert_eq!(task.state, VisitState::Done);
    }

    #[test]
    fn test_finish_with_defer_keeps_raw_error_aside() {
        let mut task = noop();
        task.defer_on_error();
        let propagated = task.finish(
            Duration::ZERO,
            Some(RunError::task_failed("t", anyhow::anyhow!("bad"))),
        );
        assert!(propagated.is_none());
        let run = task.run().unwrap();
        assert!(run.error.is_none());
        assert!(run.deferred_error.is_some());
        assert!(run.failed());
    }

    #[test]
    fn test_finish_with_both_flags_defers() {
        let mut task = noop();
        task.continue_on_error().defer_on_error();
        let propagated = task.finish(
            Duration::ZERO,
            Some(RunError::task_failed("t", anyhow::anyhow!("bad"))),
        );
        assert!(propagated.is_none());
        assert!(task.run().unwrap().deferred_error.is_some());
    }

    #[test]
    fn test_finish_without_policy_propagates() {
        let mut task = noop();
        let propagated = task.finish(
            Duration::ZERO,
            Some(RunError::task_failed("t", anyhow::anyhow!("bad"))),
        );
        assert!(propagated.is_some());
        assert!(task.run().unwrap().error.is_some());
    }
}
