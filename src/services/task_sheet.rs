//! Spreadsheet exchange for task lists.
//!
//! Export writes CSV with the column set below. Import reads CSV or the first
//! worksheet of an Excel/ODS workbook. Rows without Optimistic/Pessimistic
//! columns get the default bounds derived from the most likely duration.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::project::{Project, ProjectError};
use crate::domain::task::{TaskError, TaskEstimate};

pub const TASK_NAME: &str = "Task Name";
pub const RESOURCE_NAME: &str = "Resource Name";
pub const CONNECTED_TASK: &str = "Connected Task";
pub const DURATION: &str = "Duration (days)";
pub const START_DATE: &str = "Start Date";
pub const OPTIMISTIC: &str = "Optimistic";
pub const PESSIMISTIC: &str = "Pessimistic";
pub const PERT_ESTIMATE: &str = "PERT Estimate";

#[derive(Error, Debug)]
pub enum TaskSheetError {
    #[error("failed to read task sheet: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to open workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        source: calamine::Error,
    },
    #[error("workbook {0} has no worksheets")]
    EmptyWorkbook(PathBuf),
    #[error("row {row}: missing {column}")]
    MissingField { row: usize, column: &'static str },
    #[error("row {row}: invalid {column} value {value:?}")]
    InvalidField {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("row {row}: {source}")]
    InvalidTask { row: usize, source: TaskError },
    #[error(transparent)]
    Project(#[from] ProjectError),
}

/// One spreadsheet row as raw cell text.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct SheetRow {
    #[serde(rename = "Task Name", default)]
    task_name: Option<String>,
    #[serde(rename = "Resource Name", default)]
    resource_name: Option<String>,
    #[serde(rename = "Connected Task", default)]
    connected_task: Option<String>,
    #[serde(rename = "Duration (days)", default)]
    duration: Option<String>,
    #[serde(rename = "Start Date", default)]
    start_date: Option<String>,
    #[serde(rename = "Optimistic", default)]
    optimistic: Option<String>,
    #[serde(rename = "Pessimistic", default)]
    pessimistic: Option<String>,
}

impl SheetRow {
    fn set(&mut self, column: &str, value: String) {
        let slot = match column.trim() {
            TASK_NAME => &mut self.task_name,
            RESOURCE_NAME => &mut self.resource_name,
            CONNECTED_TASK => &mut self.connected_task,
            DURATION => &mut self.duration,
            START_DATE => &mut self.start_date,
            OPTIMISTIC => &mut self.optimistic,
            PESSIMISTIC => &mut self.pessimistic,
            _ => return,
        };
        *slot = Some(value);
    }
}

/// Imports tasks from `path`, choosing the reader from the file extension.
pub fn import_tasks_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<TaskEstimate>, TaskSheetError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let tasks = match extension.as_deref() {
        Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => import_tasks_from_workbook(path)?,
        _ => import_tasks_from_csv(std::fs::File::open(path)?)?,
    };
    tracing::info!(path = %path.display(), tasks = tasks.len(), "imported task sheet");
    Ok(tasks)
}

/// Imports tasks into a new project, enforcing unique task names.
pub fn import_project_from_file<P: AsRef<Path>>(
    path: P,
    name: &str,
) -> Result<Project, TaskSheetError> {
    let tasks = import_tasks_from_file(path)?;
    Ok(Project::with_tasks(name, tasks)?)
}

pub fn import_tasks_from_csv<R: Read>(reader: R) -> Result<Vec<TaskEstimate>, TaskSheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut tasks = Vec::new();
    for (index, row) in reader.deserialize::<SheetRow>().enumerate() {
        // Header is row 1.
        tasks.push(row_to_task(row?, index + 2)?);
    }
    Ok(tasks)
}

fn import_tasks_from_workbook(path: &Path) -> Result<Vec<TaskEstimate>, TaskSheetError> {
    let workbook_error = |source| TaskSheetError::Workbook {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TaskSheetError::EmptyWorkbook(path.to_path_buf()))?
        .map_err(workbook_error)?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(cell_to_string).collect(),
        None => return Ok(Vec::new()),
    };

    let mut tasks = Vec::new();
    for (index, cells) in rows.enumerate() {
        if cells.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let mut row = SheetRow::default();
        for (header, cell) in headers.iter().zip(cells) {
            let value = if header.trim() == START_DATE {
                cell_to_date_string(cell)
            } else {
                cell_to_string(cell)
            };
            if !value.is_empty() {
                row.set(header, value);
            }
        }
        tasks.push(row_to_task(row, index + 2)?);
    }
    Ok(tasks)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) | Data::DateTimeIso(value) | Data::DurationIso(value) => {
            value.trim().to_string()
        }
        Data::Float(value) => value.to_string(),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => value.as_f64().to_string(),
        Data::Error(error) => format!("{error:?}"),
    }
}

fn cell_to_date_string(cell: &Data) -> String {
    let serial = match cell {
        Data::DateTime(value) => Some(value.as_f64()),
        Data::Float(value) => Some(*value),
        Data::Int(value) => Some(*value as f64),
        _ => None,
    };
    match serial.and_then(date_from_excel_serial) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => cell_to_string(cell),
    }
}

/// Excel stores dates as days since 1899-12-30.
pub fn date_from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}

/// `2024-12-07`, or an ISO date-time such as ODS date cells carry
/// (`2024-12-07T00:00:00`), whose time part is dropped.
fn parse_sheet_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok().or_else(|| {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|date_time| date_time.date())
    })
}

fn row_to_task(row: SheetRow, row_number: usize) -> Result<TaskEstimate, TaskSheetError> {
    let name = required(row.task_name, row_number, TASK_NAME)?;
    let most_likely = parse_whole_days(
        &required(row.duration, row_number, DURATION)?,
        row_number,
        DURATION,
    )?;
    let start_date_text = required(row.start_date, row_number, START_DATE)?;
    let start_date =
        parse_sheet_date(&start_date_text).ok_or_else(|| TaskSheetError::InvalidField {
            row: row_number,
            column: START_DATE,
            value: start_date_text.clone(),
        })?;
    let optimistic = optional_days(row.optimistic, row_number, OPTIMISTIC)?;
    let pessimistic = optional_days(row.pessimistic, row_number, PESSIMISTIC)?;

    TaskEstimate::create(
        &name,
        row.resource_name.as_deref().unwrap_or_default(),
        row.connected_task.as_deref(),
        most_likely,
        start_date,
        optimistic,
        pessimistic,
    )
    .map_err(|source| TaskSheetError::InvalidTask {
        row: row_number,
        source,
    })
}

fn required(
    value: Option<String>,
    row: usize,
    column: &'static str,
) -> Result<String, TaskSheetError> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(TaskSheetError::MissingField { row, column })
}

fn optional_days(
    value: Option<String>,
    row: usize,
    column: &'static str,
) -> Result<Option<u32>, TaskSheetError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_whole_days(text, row, column).map(Some),
    }
}

/// Whole days from cell text. Spreadsheets often store `5` as `5.0`, so a
/// fractional part is truncated.
fn parse_whole_days(text: &str, row: usize, column: &'static str) -> Result<u32, TaskSheetError> {
    let invalid = || TaskSheetError::InvalidField {
        row,
        column,
        value: text.to_string(),
    };
    if let Ok(days) = text.parse::<u32>() {
        return Ok(days);
    }
    let days = text.parse::<f64>().map_err(|_| invalid())?;
    if !days.is_finite() || days < 0.0 || days > f64::from(u32::MAX) {
        return Err(invalid());
    }
    Ok(days.trunc() as u32)
}

pub fn export_tasks_to_csv<W: Write>(writer: W, tasks: &[TaskEstimate]) -> Result<(), TaskSheetError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([
        TASK_NAME,
        RESOURCE_NAME,
        CONNECTED_TASK,
        DURATION,
        START_DATE,
        OPTIMISTIC,
        PESSIMISTIC,
        PERT_ESTIMATE,
    ])?;
    for task in tasks {
        writer.write_record([
            task.name.clone(),
            task.resource.clone(),
            task.connected_task_label().to_string(),
            task.most_likely().to_string(),
            task.start_date.format("%Y-%m-%d").to_string(),
            task.optimistic().to_string(),
            task.pessimistic().to_string(),
            task.pert_estimate().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_tasks_to_csv_file<P: AsRef<Path>>(
    path: P,
    tasks: &[TaskEstimate],
) -> Result<(), TaskSheetError> {
    let file = std::fs::File::create(path)?;
    export_tasks_to_csv(file, tasks)
}

/// Import template with a single example row.
pub fn write_template_csv<W: Write>(writer: W) -> Result<(), TaskSheetError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.serialize(SheetRow {
        task_name: Some("Example Task".to_string()),
        resource_name: Some("Resource 1".to_string()),
        connected_task: Some("None".to_string()),
        duration: Some("5".to_string()),
        start_date: Some("2024-12-07".to_string()),
        optimistic: None,
        pessimistic: None,
    })?;
    writer.flush()?;
    Ok(())
}
