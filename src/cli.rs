use std::path::PathBuf;

use clap::Parser;

use crate::logging;

#[derive(Debug, Parser)]
#[command(name = "taskmanager")]
#[command(version)]
#[command(about = "A small terminal to-do list")]
pub struct Cli {
    /// Task to add at startup (repeatable)
    #[arg(long = "task", value_name = "TEXT")]
    pub tasks: Vec<String>,

    /// Start with completed tasks hidden
    #[arg(long)]
    pub hide_completed: bool,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Directory for log files (default: <tmp>/taskmanager)
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or(logging::default_log_level())
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(logging::default_log_dir)
    }
}
