use crate::commands::base_commands::Commands;
use crate::commands::command_error::CommandError;
use crate::commands::{file_stem, write_file};
use crate::commands::task_cmds::save_project;
use crate::services::project_yaml::load_project_from_yaml_file;
use crate::services::task_sheet::{
    export_tasks_to_csv_file, import_project_from_file, write_template_csv,
};

pub fn import_command(cmd: Commands) -> Result<(), CommandError> {
    if let Commands::Import {
        input,
        output,
        name,
    } = cmd
    {
        let name = name.unwrap_or_else(|| file_stem(&input));
        let project = import_project_from_file(&input, &name)?;
        save_project(&output, &project)?;
        println!("Imported {} tasks from {input} into {output}", project.tasks().len());
    }
    Ok(())
}

pub fn export_command(cmd: Commands) -> Result<(), CommandError> {
    if let Commands::Export { project, output } = cmd {
        let tasks = load_project_from_yaml_file(&project)?;
        export_tasks_to_csv_file(&output, tasks.tasks())?;
        println!("Exported {} tasks to {output}", tasks.tasks().len());
    }
    Ok(())
}

pub fn template_command(cmd: Commands) -> Result<(), CommandError> {
    if let Commands::Template { output } = cmd {
        let mut buffer = Vec::new();
        write_template_csv(&mut buffer)?;
        write_file(&output, &buffer)?;
        println!("Task template written to {output}");
    }
    Ok(())
}
