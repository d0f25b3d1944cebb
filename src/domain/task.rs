use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use thiserror::Error;

use crate::domain::estimate::{default_optimistic, default_pessimistic, ThreePointEstimate};

/// Text used by task sources when a task has no connected task.
pub const NO_CONNECTED_TASK: &str = "None";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TaskError {
    #[error("task name must not be empty")]
    MissingName,
    #[error("most likely duration must be a positive number of days")]
    InvalidMostLikely,
    #[error("unknown task field: {0}")]
    UnknownField(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Name,
    Resource,
    ConnectedTask,
    StartDate,
    Optimistic,
    MostLikely,
    Pessimistic,
}

impl TaskField {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TaskField::Optimistic | TaskField::MostLikely | TaskField::Pessimistic
        )
    }
}

impl FromStr for TaskField {
    type Err = TaskError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "name" => Ok(TaskField::Name),
            "resource" => Ok(TaskField::Resource),
            "connectedtask" => Ok(TaskField::ConnectedTask),
            "startdate" => Ok(TaskField::StartDate),
            "optimistic" => Ok(TaskField::Optimistic),
            "mostlikely" | "duration" => Ok(TaskField::MostLikely),
            "pessimistic" => Ok(TaskField::Pessimistic),
            _ => Err(TaskError::UnknownField(value.to_string())),
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskField::Name => "name",
            TaskField::Resource => "resource",
            TaskField::ConnectedTask => "connectedTask",
            TaskField::StartDate => "startDate",
            TaskField::Optimistic => "optimistic",
            TaskField::MostLikely => "mostLikely",
            TaskField::Pessimistic => "pessimistic",
        };
        f.write_str(name)
    }
}

/// Outcome of an in-place edit. A rejected edit leaves the task untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Accepted,
    Rejected { reason: String },
}

impl FieldUpdate {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FieldUpdate::Accepted)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskEstimate {
    pub name: String,
    pub resource: String,
    pub connected_task: Option<String>,
    pub start_date: NaiveDate,
    estimate: ThreePointEstimate,
    pert_estimate: f64,
}

impl TaskEstimate {
    pub fn create(
        name: &str,
        resource: &str,
        connected_task: Option<&str>,
        most_likely: u32,
        start_date: NaiveDate,
        optimistic: Option<u32>,
        pessimistic: Option<u32>,
    ) -> Result<Self, TaskError> {
        if name.trim().is_empty() {
            return Err(TaskError::MissingName);
        }
        if most_likely == 0 {
            return Err(TaskError::InvalidMostLikely);
        }

        let estimate = ThreePointEstimate::new(most_likely, optimistic, pessimistic);
        Ok(Self {
            name: name.to_string(),
            resource: resource.to_string(),
            connected_task: parse_connected_task(connected_task),
            start_date,
            estimate,
            pert_estimate: estimate.pert_mean(),
        })
    }

    pub fn estimate(&self) -> &ThreePointEstimate {
        &self.estimate
    }

    pub fn optimistic(&self) -> u32 {
        self.estimate.optimistic
    }

    pub fn most_likely(&self) -> u32 {
        self.estimate.most_likely
    }

    pub fn pessimistic(&self) -> u32 {
        self.estimate.pessimistic
    }

    pub fn pert_estimate(&self) -> f64 {
        self.pert_estimate
    }

    /// Connected task as written by task sources, `"None"` when absent.
    pub fn connected_task_label(&self) -> &str {
        self.connected_task.as_deref().unwrap_or(NO_CONNECTED_TASK)
    }

    /// Numeric fields take the leading whole number of `raw_value`; anything
    /// that does not start with a positive number is rejected and the
    /// previous value kept. Blank names and unparsable dates are rejected too.
    pub fn update_field(&mut self, field: TaskField, raw_value: &str) -> FieldUpdate {
        let update = match field {
            TaskField::Name if raw_value.trim().is_empty() => FieldUpdate::Rejected {
                reason: TaskError::MissingName.to_string(),
            },
            TaskField::Name => {
                self.name = raw_value.to_string();
                FieldUpdate::Accepted
            }
            TaskField::Resource => {
                self.resource = raw_value.to_string();
                FieldUpdate::Accepted
            }
            TaskField::ConnectedTask => {
                self.connected_task = parse_connected_task(Some(raw_value));
                FieldUpdate::Accepted
            }
            TaskField::StartDate => match NaiveDate::parse_from_str(raw_value.trim(), "%Y-%m-%d") {
                Ok(date) => {
                    self.start_date = date;
                    FieldUpdate::Accepted
                }
                Err(_) => FieldUpdate::Rejected {
                    reason: format!("invalid date: {raw_value}"),
                },
            },
            TaskField::Optimistic | TaskField::MostLikely | TaskField::Pessimistic => {
                match parse_days(raw_value) {
                    Some(days) => {
                        let slot = match field {
                            TaskField::Optimistic => &mut self.estimate.optimistic,
                            TaskField::MostLikely => &mut self.estimate.most_likely,
                            _ => &mut self.estimate.pessimistic,
                        };
                        *slot = days;
                        FieldUpdate::Accepted
                    }
                    None => FieldUpdate::Rejected {
                        reason: format!("{field} must be a positive whole number, got {raw_value:?}"),
                    },
                }
            }
        };

        if field.is_numeric() {
            self.update_pert_estimate();
        }
        if let FieldUpdate::Rejected { reason } = &update {
            tracing::debug!(task = %self.name, %field, %reason, "ignored task edit");
        }
        update
    }

    /// Re-derives both bounds from the current most likely duration.
    pub fn refresh_default_bounds(&mut self) {
        self.estimate.optimistic = default_optimistic(self.estimate.most_likely);
        self.estimate.pessimistic = default_pessimistic(self.estimate.most_likely);
        self.update_pert_estimate();
    }

    /// `from_date + most_likely` days. Ignores the PERT estimate.
    pub fn expected_finish_date(&self, from_date: NaiveDate) -> NaiveDate {
        from_date
            .checked_add_days(Days::new(u64::from(self.estimate.most_likely)))
            .unwrap_or(NaiveDate::MAX)
    }

    fn update_pert_estimate(&mut self) {
        self.pert_estimate = self.estimate.pert_mean();
    }
}

fn parse_connected_task(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != NO_CONNECTED_TASK)
        .map(str::to_string)
}

/// Leading whole number of `raw_value`: `"4.5"` is 4 and `"12abc"` is 12.
/// Zero, negative and non-numeric input yields `None`.
fn parse_days(raw_value: &str) -> Option<u32> {
    let trimmed = raw_value.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    unsigned[..digits].parse::<u32>().ok().filter(|days| *days > 0)
}
