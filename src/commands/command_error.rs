use std::io;

use thiserror::Error;

use crate::domain::project::ProjectError;
use crate::domain::task::TaskError;
use crate::services::project_yaml::ProjectYamlError;
use crate::services::simulation::SimulationError;
use crate::services::task_sheet::TaskSheetError;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    ProjectFile(#[from] ProjectYamlError),
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    TaskSheet(#[from] TaskSheetError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error("invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("failed to serialize report: {0}")]
    Serialize(String),
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: io::Error },
}
