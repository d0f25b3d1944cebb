pub mod base_commands;
pub mod command_error;
pub mod report_format;
pub mod simulate_cmd;
pub mod task_cmds;
pub mod task_sheet_cmds;

use std::io;
use std::path::Path;

use chrono::NaiveDate;
use clap::CommandFactory;

use crate::commands::base_commands::{CliArgs, Commands};
use crate::commands::command_error::CommandError;
use crate::domain::project::Project;
use crate::services::project_yaml::load_project_from_yaml_file;

pub fn run_command(cmd: Commands) -> Result<(), CommandError> {
    match cmd {
        Commands::AddTask { .. } => task_cmds::add_task_command(cmd),
        Commands::EditTask { .. } => task_cmds::edit_task_command(cmd),
        Commands::DeleteTask { .. } => task_cmds::delete_task_command(cmd),
        Commands::ListTasks { .. } => task_cmds::list_tasks_command(cmd),
        Commands::RefreshDurations { .. } => task_cmds::refresh_durations_command(cmd),
        Commands::Import { .. } => task_sheet_cmds::import_command(cmd),
        Commands::Export { .. } => task_sheet_cmds::export_command(cmd),
        Commands::Template { .. } => task_sheet_cmds::template_command(cmd),
        Commands::Simulate { .. } => simulate_cmd::simulate_command(cmd),
        Commands::Completions { shell } => {
            let mut command = CliArgs::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut io::stdout());
            Ok(())
        }
    }
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| CommandError::InvalidDate(value.to_string()))
}

/// Loads the project at `path`, or starts an empty one named after the file.
pub(crate) fn load_or_create_project(path: &str) -> Result<Project, CommandError> {
    if Path::new(path).exists() {
        return Ok(load_project_from_yaml_file(path)?);
    }
    Ok(Project::new(&file_stem(path)))
}

pub(crate) fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(path)
        .to_string()
}

pub(crate) fn write_file(path: &str, contents: &[u8]) -> Result<(), CommandError> {
    std::fs::write(path, contents).map_err(|source| CommandError::Write {
        path: path.to_string(),
        source,
    })
}
