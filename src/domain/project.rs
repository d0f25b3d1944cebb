use thiserror::Error;

use crate::domain::task::{FieldUpdate, TaskEstimate, TaskField};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProjectError {
    #[error("a task named {0} already exists")]
    DuplicateTask(String),
    #[error("task {0} not found")]
    UnknownTask(String),
}

/// Ordered collection of tasks. Task names are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub name: String,
    tasks: Vec<TaskEstimate>,
}

impl Project {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks(name: &str, tasks: Vec<TaskEstimate>) -> Result<Self, ProjectError> {
        let mut project = Self::new(name);
        for task in tasks {
            project.add_task(task)?;
        }
        Ok(project)
    }

    pub fn tasks(&self) -> &[TaskEstimate] {
        &self.tasks
    }

    pub fn task(&self, name: &str) -> Option<&TaskEstimate> {
        self.tasks.iter().find(|task| task.name == name)
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|task| task.name.as_str()).collect()
    }

    pub fn add_task(&mut self, task: TaskEstimate) -> Result<(), ProjectError> {
        if self.task(&task.name).is_some() {
            return Err(ProjectError::DuplicateTask(task.name));
        }
        self.tasks.push(task);
        Ok(())
    }

    pub fn delete_task(&mut self, name: &str) -> Result<TaskEstimate, ProjectError> {
        let index = self.index_of(name)?;
        Ok(self.tasks.remove(index))
    }

    /// Applies one edit to the named task. Renaming onto another task's name,
    /// or to a blank name, is rejected like any other invalid edit.
    pub fn update_task(
        &mut self,
        name: &str,
        field: TaskField,
        raw_value: &str,
    ) -> Result<FieldUpdate, ProjectError> {
        let index = self.index_of(name)?;
        if field == TaskField::Name && raw_value != name && self.task(raw_value).is_some() {
            return Ok(FieldUpdate::Rejected {
                reason: format!("a task named {raw_value} already exists"),
            });
        }
        Ok(self.tasks[index].update_field(field, raw_value))
    }

    pub fn refresh_durations(&mut self) {
        for task in &mut self.tasks {
            task.refresh_default_bounds();
        }
    }

    /// Sum of the PERT estimates of all tasks.
    pub fn total_pert_estimate(&self) -> f64 {
        self.tasks.iter().map(TaskEstimate::pert_estimate).sum()
    }

    fn index_of(&self, name: &str) -> Result<usize, ProjectError> {
        self.tasks
            .iter()
            .position(|task| task.name == name)
            .ok_or_else(|| ProjectError::UnknownTask(name.to_string()))
    }
}
