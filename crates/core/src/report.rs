//! Console reports: task listing, argument echo, task headers and the timing table

use std::time::Duration;

use colored::*;

use crate::arguments::Arguments;
use crate::history::RunHistory;
use crate::registry::TaskRegistry;

const HEADER_WIDTH: usize = 50;
const TABLE_WIDTH: usize = 60;

/// One line of the timing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingRow {
    pub name: String,
    pub duration: Duration,
    /// The task ended with an error or deferred one.
    pub failed: bool,
}

/// Format as `HH:MM:SS.ffffff`.
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    format!(
        "{:02}:{:02}:{:02}.{:06}",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60,
        duration.subsec_micros()
    )
}

/// Every registered task with its description, sorted by name.
pub fn task_listing(registry: &TaskRegistry) -> String {
    let mut tasks: Vec<_> = registry.iter().collect();
    tasks.sort_by(|a, b| a.name().cmp(b.name()));

    let mut lines = vec!["Please specify one of the following targets:".to_string()];
    if tasks.is_empty() {
        lines.push(format!("  {}", "No tasks registered".dimmed()));
    }
    lines.extend(tasks.into_iter().map(|task| match task.get_description() {
        Some(description) => format!(" - {}: {}", task.name().bold(), description),
        None => format!(" - {}", task.name().bold()),
    }));
    lines.join("\n")
}

/// `key="value"` pairs sorted by key, or `None` when there are no arguments.
pub fn argument_summary(arguments: &Arguments) -> Option<String> {
    if arguments.is_empty() {
        return None;
    }
    let pairs: Vec<String> = arguments
        .iter()
        .map(|(key, value)| format!("{}=\"{}\"", key, value))
        .collect();
    Some(pairs.join(", "))
}

/// Banner printed before a task's action runs.
pub fn task_header(name: &str) -> String {
    let rule = "=".repeat(HEADER_WIDTH);
    format!("{rule}\n{name}\n{rule}")
}

pub fn timing_rows(registry: &TaskRegistry, history: &RunHistory) -> Vec<TimingRow> {
    history
        .iter()
        .filter_map(|name| {
            let run = registry.get(name)?.run()?;
            Some(TimingRow {
                name: name.to_string(),
                duration: run.duration,
                failed: run.failed(),
            })
        })
        .collect()
}

/// Per-task durations plus a total, failed rows in red.
pub fn timing_table(registry: &TaskRegistry, history: &RunHistory) -> String {
    let rows = timing_rows(registry, history);
    let total: Duration = rows.iter().map(|row| row.duration).sum();
    let rule = "-".repeat(TABLE_WIDTH);

    let mut lines = vec![
        format!("{:<40}{:<20}", "Task", "Duration").green().to_string(),
        rule.green().to_string(),
    ];
    for row in &rows {
        let line = format!("{:<40}{:<20}", row.name, format_duration(row.duration));
        let line = if row.failed { line.red() } else { line.green() };
        lines.push(line.to_string());
    }
    lines.push(rule.green().to_string());
    lines.push(
        format!("{:<40}{:<20}", "Total", format_duration(total))
            .green()
            .to_string(),
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::Taskr;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "00:00:00.000000");
        assert_eq!(
            format_duration(Duration::from_micros(1_500_250)),
            "00:00:01.500250"
        );
        assert_eq!(
            format_duration(
                Duration::from_secs(3 * 3600 + 25 * 60 + 7) + Duration::from_nanos(999)
            ),
            "03:25:07.000000"
        );
        assert_eq!(
            format_duration(Duration::from_secs(100 * 3600)),
            "100:00:00.000000"
        );
    }

    #[test]
    fn test_task_header() {
        let header = task_header("build");
        let lines: Vec<_> = header.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "=".repeat(50));
        assert_eq!(lines[1], "build");
        assert_eq!(lines[2], "=".repeat(50));
    }

    #[test]
    fn test_argument_summary() {
        assert_eq!(argument_summary(&Arguments::default()), None);

        let arguments: Arguments = [("target", "build"), ("env", "prod")].into_iter().collect();
        assert_eq!(
            argument_summary(&arguments).unwrap(),
            r#"env="prod", target="build""#
        );
    }

    #[test]
    fn test_task_listing_mentions_every_task() {
        let mut taskr = Taskr::default();
        taskr.task("build", || Ok(())).description("Compile everything");
        taskr.task("clean", || Ok(()));

        let listing = task_listing(taskr.registry());

        assert!(listing.contains("build"));
        assert!(listing.contains(": Compile everything"));
        assert!(listing.contains("clean"));
        assert!(!listing.contains("No tasks registered"));
    }

    #[test]
    fn test_task_listing_one_line_per_task_in_name_order() {
        let mut taskr = Taskr::default();
        taskr.task("test", || Ok(()));
        taskr.task("build", || Ok(())).description("Compile everything");

        let listing = task_listing(taskr.registry());
        let lines: Vec<_> = listing.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Please specify one of the following targets:");
        assert!(lines[1].starts_with(" - ") && lines[1].contains("build"));
        assert!(lines[1].ends_with(": Compile everything"));
        assert!(lines[2].starts_with(" - ") && lines[2].contains("test"));
        assert!(!lines[2].contains(':'));
    }

    #[test]
    fn test_task_listing_without_tasks() {
        let listing = task_listing(Taskr::default().registry());
        assert_eq!(listing.lines().count(), 2);
        assert!(listing.contains("No tasks registered"));
    }

    #[test]
    fn test_timing_rows_follow_history_and_flag_failures() {
        let mut taskr = Taskr::default();
        taskr.task("fmt", || anyhow::bail!("unformatted")).defer_on_error();
        taskr.task("build", || Ok(())).depends_on(["fmt"]);
        taskr.task("test", || anyhow::bail!("red")).depends_on(["build"]);

        assert!(taskr.run_target("test").is_err());

        let rows = timing_rows(taskr.registry(), taskr.history());
        let summary: Vec<_> = rows.iter().map(|row| (row.name.as_str(), row.failed)).collect();
        assert_eq!(summary, [("fmt", true), ("build", false), ("test", true)]);

        let table = timing_table(taskr.registry(), taskr.history());
        assert!(table.contains("Task"));
        assert!(table.contains("Duration"));
        assert!(table.contains("Total"));
        assert_eq!(table.lines().count(), 2 + rows.len() + 2);
    }
}
