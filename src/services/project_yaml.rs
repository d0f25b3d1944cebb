use std::io::{self, Write};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::project::{Project, ProjectError};
use crate::domain::task::{TaskError, TaskEstimate};

#[derive(Error, Debug)]
pub enum ProjectYamlError {
    #[error("failed to read project yaml: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse project yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid date format: {0}")]
    InvalidDate(String),
    #[error("invalid task {name}: {source}")]
    InvalidTask { name: String, source: TaskError },
    #[error(transparent)]
    Project(#[from] ProjectError),
}

#[derive(Serialize, Deserialize)]
struct ProjectRecord {
    name: String,
    #[serde(default)]
    tasks: Vec<TaskRecord>,
}

#[derive(Serialize, Deserialize)]
struct TaskRecord {
    name: String,
    #[serde(default)]
    resource: String,
    connected_task: Option<String>,
    start_date: String,
    most_likely: u32,
    optimistic: Option<u32>,
    pessimistic: Option<u32>,
}

pub fn load_project_from_yaml_file(path: &str) -> Result<Project, ProjectYamlError> {
    let contents = std::fs::read_to_string(path)?;
    deserialize_project_from_yaml_str(&contents)
}

pub fn deserialize_project_from_yaml_str(input: &str) -> Result<Project, ProjectYamlError> {
    let record: ProjectRecord = serde_yaml::from_str(input)?;
    let mut project = Project::new(&record.name);

    for task_record in record.tasks {
        let start_date = parse_date(&task_record.start_date)?;
        let task = TaskEstimate::create(
            &task_record.name,
            &task_record.resource,
            task_record.connected_task.as_deref(),
            task_record.most_likely,
            start_date,
            task_record.optimistic,
            task_record.pessimistic,
        )
        .map_err(|source| ProjectYamlError::InvalidTask {
            name: task_record.name.clone(),
            source,
        })?;
        project.add_task(task)?;
    }

    Ok(project)
}

pub fn serialize_project_to_yaml<W: Write>(writer: &mut W, project: &Project) -> io::Result<()> {
    let record = ProjectRecord {
        name: project.name.clone(),
        tasks: project.tasks().iter().map(task_to_record).collect(),
    };

    let yaml = serde_yaml::to_string(&record).map_err(io::Error::other)?;
    writer.write_all(yaml.as_bytes())
}

fn task_to_record(task: &TaskEstimate) -> TaskRecord {
    TaskRecord {
        name: task.name.clone(),
        resource: task.resource.clone(),
        connected_task: task.connected_task.clone(),
        start_date: task.start_date.format("%Y-%m-%d").to_string(),
        most_likely: task.most_likely(),
        optimistic: Some(task.optimistic()),
        pessimistic: Some(task.pessimistic()),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, ProjectYamlError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ProjectYamlError::InvalidDate(value.to_string()))
}
