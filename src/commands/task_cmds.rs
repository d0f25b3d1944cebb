use crate::commands::base_commands::Commands;
use crate::commands::command_error::CommandError;
use crate::commands::report_format::format_task_table;
use crate::commands::{load_or_create_project, parse_date, write_file};
use crate::domain::project::Project;
use crate::domain::task::{FieldUpdate, TaskEstimate, TaskField};
use crate::services::project_yaml::{load_project_from_yaml_file, serialize_project_to_yaml};

pub fn add_task_command(cmd: Commands) -> Result<(), CommandError> {
    if let Commands::AddTask {
        project,
        name,
        resource,
        connected_task,
        duration,
        start_date,
        optimistic,
        pessimistic,
    } = cmd
    {
        let mut tasks = load_or_create_project(&project)?;
        let task = TaskEstimate::create(
            &name,
            &resource,
            Some(connected_task.as_str()),
            duration,
            parse_date(&start_date)?,
            optimistic,
            pessimistic,
        )?;
        let pert = task.pert_estimate();
        tasks.add_task(task)?;
        save_project(&project, &tasks)?;
        println!("Added task {name} (PERT {pert:.1} days) to {project}");
    }
    Ok(())
}

pub fn edit_task_command(cmd: Commands) -> Result<(), CommandError> {
    if let Commands::EditTask {
        project,
        task,
        field,
        value,
    } = cmd
    {
        let field: TaskField = field.parse()?;
        let mut tasks = load_project_from_yaml_file(&project)?;
        match tasks.update_task(&task, field, &value)? {
            FieldUpdate::Accepted => {
                save_project(&project, &tasks)?;
                println!("Updated {field} of task {task}");
            }
            FieldUpdate::Rejected { reason } => {
                println!("Ignored edit of {field} for task {task}: {reason}");
            }
        }
    }
    Ok(())
}

pub fn delete_task_command(cmd: Commands) -> Result<(), CommandError> {
    if let Commands::DeleteTask { project, task } = cmd {
        let mut tasks = load_project_from_yaml_file(&project)?;
        tasks.delete_task(&task)?;
        save_project(&project, &tasks)?;
        println!("Deleted task {task} from {project}");
    }
    Ok(())
}

pub fn list_tasks_command(cmd: Commands) -> Result<(), CommandError> {
    if let Commands::ListTasks { project } = cmd {
        let tasks = load_project_from_yaml_file(&project)?;
        println!("{}", format_task_table(&tasks));
    }
    Ok(())
}

pub fn refresh_durations_command(cmd: Commands) -> Result<(), CommandError> {
    if let Commands::RefreshDurations { project } = cmd {
        let mut tasks = load_project_from_yaml_file(&project)?;
        tasks.refresh_durations();
        save_project(&project, &tasks)?;
        println!("Refreshed durations of {} tasks in {project}", tasks.tasks().len());
    }
    Ok(())
}

pub(crate) fn save_project(path: &str, project: &Project) -> Result<(), CommandError> {
    let mut buffer = Vec::new();
    serialize_project_to_yaml(&mut buffer, project).map_err(|source| CommandError::Write {
        path: path.to_string(),
        source,
    })?;
    write_file(path, &buffer)
}
