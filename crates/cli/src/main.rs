use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use taskr_core::configs::load_tasks_file;
use taskr_core::{Arguments, Taskr};

/// taskr - run a target and everything it depends on
#[derive(Parser)]
#[command(name = "taskr")]
#[command(about = "A declarative task runner")]
#[command(version)]
struct Cli {
    /// Path to the tasks file
    #[arg(short, long, default_value = "taskr.yml")]
    file: PathBuf,

    /// Task to run; lists the available tasks when omitted
    #[arg(short, long)]
    target: Option<String>,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,

    /// Extra argument passed to tasks as TASKR_ARG_<KEY> (repeatable)
    #[arg(short, long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    args: Vec<(String, String)>,
}

impl Cli {
    fn arguments(&self) -> Arguments {
        let mut arguments: Arguments = self.args.iter().cloned().collect();
        if let Some(target) = &self.target {
            arguments.insert("target", target.as_str());
        }
        if self.verbose {
            arguments.insert("verbose", "");
        }
        arguments
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{}`", s))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{}`", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn load(cli: &Cli) -> Result<Taskr> {
    let config = load_tasks_file(&cli.file)?;
    let root = cli
        .file
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut taskr = Taskr::new(cli.arguments());
    config
        .register(&mut taskr, root)
        .with_context(|| format!("Invalid tasks file {}", cli.file.display()))?;
    Ok(taskr)
}

fn main() {
    let cli = Cli::parse();

    let mut taskr = match load(&cli) {
        Ok(taskr) => taskr,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    std::process::exit(taskr.execute());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("mode=release").unwrap(),
            ("mode".to_string(), "release".to_string())
        );
        assert_eq!(
            parse_key_val("url=a=b").unwrap(),
            ("url".to_string(), "a=b".to_string())
        );
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=x").is_err());
    }

    #[test]
    fn test_cli_builds_arguments() {
        let cli = Cli::parse_from(["taskr", "-t", "deploy", "-v", "-a", "env=prod"]);
        let arguments = cli.arguments();
        assert_eq!(arguments.get("target"), Some("deploy"));
        assert!(arguments.has("verbose"));
        assert_eq!(arguments.get("env"), Some("prod"));
        assert_eq!(cli.file, PathBuf::from("taskr.yml"));
    }

    #[test]
    fn test_no_target_means_discovery() {
        let cli = Cli::parse_from(["taskr", "--file", "ci/taskr.yml"]);
        assert!(!cli.arguments().has("target"));
    }
}
