use anyhow::{Context, Result};
use clap::Parser;
use log::error;
use taskmanager::{cli::Cli, logging, tasks::TaskList, tui::App};

fn seed_tasks(texts: &[String]) -> Result<TaskList> {
    let mut tasks = TaskList::new();
    for text in texts {
        tasks
            .add(text.as_str())
            .with_context(|| format!("invalid --task value `{text}`"))?;
    }
    Ok(tasks)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = logging::init_logging(cli.log_level(), &cli.log_dir())?;
    let tasks = seed_tasks(&cli.tasks)?;

    let mut terminal = ratatui::init();
    terminal.clear()?;
    let app_result = App::new(tasks, cli.hide_completed).run(&mut terminal);
    ratatui::restore();
    if let Err(err) = &app_result {
        error!("event=tui_exit module=main status=error error={err:#}");
    }
    app_result
}
