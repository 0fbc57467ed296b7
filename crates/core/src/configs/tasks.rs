use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::execution::command::CommandRunner;
use crate::orchestrator::Taskr;
use crate::types::{TaskrError, TaskrResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskConfig {
    pub name: String,
    pub description: Option<String>,
    pub script: Option<String>,
    pub command: Option<Command>,
    /// Relative to the directory of the tasks file.
    pub working_directory: Option<String>,
    pub dependencies: Option<Vec<String>>,
    pub dependees: Option<Vec<String>>,
    #[serde(default)]
    pub continue_on_error: bool,
    #[serde(default)]
    pub defer_on_error: bool,
    /// Capture output instead of streaming it.
    #[serde(default)]
    pub quiet: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TasksFileConfig {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tasks: Vec<TaskConfig>,
}

pub fn parse_tasks_config(yaml_str: &str) -> TaskrResult<TasksFileConfig> {
    let config: TasksFileConfig = serde_yaml::from_str(yaml_str)?;
    Ok(config)
}

pub fn load_tasks_file(path: &Path) -> TaskrResult<TasksFileConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        TaskrError::Config(format!("Failed to read tasks file {}: {}", path.display(), e))
    })?;
    parse_tasks_config(&content)
}

/// What a configured task runs.
#[derive(Debug, Clone)]
enum Step {
    Shell(String),
    Program(String, Vec<String>),
    Script(PathBuf),
}

impl Step {
    fn from_config(task: &TaskConfig) -> TaskrResult<Self> {
        match (&task.command, &task.script) {
            (Some(_), Some(_)) => Err(TaskrError::Config(format!(
                "Task '{}' has both a command and a script",
                task.name
            ))),
            (None, None) => Err(TaskrError::Config(format!(
                "Task '{}' has no script or command to execute",
                task.name
            ))),
            (None, Some(script)) => Ok(Step::Script(PathBuf::from(script))),
            (Some(Command::Single(cmd)), None) => Ok(Step::Shell(cmd.clone())),
            (Some(Command::Multiple(cmds)), None) => match cmds.split_first() {
                Some((program, args)) => Ok(Step::Program(program.clone(), args.to_vec())),
                None => Err(TaskrError::Config(format!(
                    "Task '{}' has an empty command",
                    task.name
                ))),
            },
        }
    }

    fn run(&self, runner: &CommandRunner) -> anyhow::Result<()> {
        let output = match self {
            Step::Shell(cmd) => runner.run_shell(cmd)?,
            Step::Program(program, args) => runner.run_program(program, args)?,
            Step::Script(path) => runner.run_script(path)?,
        };
        if let Some(output) = output {
            tracing::debug!("{}", output.stdout.trim_end());
        }
        Ok(())
    }
}

impl TasksFileConfig {
    /// Register every task of this file with `taskr`.
    ///
    /// Commands run relative to `root` (the directory holding the file). Each argument
    /// the run was started with is exported as `TASKR_ARG_<NAME>`.
    pub fn register(&self, taskr: &mut Taskr, root: &Path) -> TaskrResult<()> {
        let envs: Vec<(String, String)> = taskr
            .arguments()
            .iter()
            .map(|(key, value)| (env_key(key), value.to_string()))
            .collect();

        for config in &self.tasks {
            let step = Step::from_config(config)?;

            let working_dir = match &config.working_directory {
                Some(dir) => root.join(dir),
                None => root.to_path_buf(),
            };
            let runner = envs.iter().fold(
                CommandRunner::new()
                    .working_dir(working_dir)
                    .output_to_console(!config.quiet),
                |runner, (key, value)| runner.env(key.as_str(), value.as_str()),
            );

            let task = taskr.task(config.name.as_str(), move || step.run(&runner));
            if let Some(description) = &config.description {
                task.description(description.as_str());
            }
            if let Some(dependencies) = &config.dependencies {
                task.depends_on(dependencies.iter().map(String::as_str));
            }
            if let Some(dependees) = &config.dependees {
                task.dependee_of(dependees.iter().map(String::as_str));
            }
            if config.continue_on_error {
                task.continue_on_error();
            }
            if config.defer_on_error {
                task.defer_on_error();
            }
        }
        Ok(())
    }
}

fn env_key(name: &str) -> String {
    let name: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("TASKR_ARG_{}", name)
}
