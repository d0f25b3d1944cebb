use crate::commands::base_commands::Commands;
use crate::commands::command_error::CommandError;
use crate::commands::report_format::format_simulation_report;
use crate::commands::{parse_date, write_file};
use crate::services::histogram::write_histogram_png;
use crate::services::simulation::{simulate_project_from_yaml_file, SimulationSettings};
use crate::services::simulation_types::SimulationOutput;

pub fn simulate_command(cmd: Commands) -> Result<(), CommandError> {
    if let Commands::Simulate {
        project,
        output,
        start_date,
        iterations,
        bins,
        seed,
        distribution,
    } = cmd
    {
        let settings = SimulationSettings {
            iterations,
            start_date: parse_date(&start_date)?,
            bin_count: usize::from(bins),
            seed,
            distribution,
        };
        let simulation = simulate_project_from_yaml_file(&project, &settings)?;

        let contents = serialize_output(&output, &simulation)?;
        write_file(&output, contents.as_bytes())?;

        println!("{}", format_simulation_report(&simulation.report));
        println!("Simulation result written to {output}");

        let histogram_path = format!("{output}.png");
        if simulation.report.confidence.histogram.is_empty() {
            return Ok(());
        }
        match write_histogram_png(&histogram_path, &simulation.report.confidence) {
            Ok(()) => println!("Simulation histogram written to {histogram_path}"),
            Err(e) => {
                tracing::warn!(path = %histogram_path, error = %e, "histogram not written");
                eprintln!("Failed to write simulation histogram: {e}");
            }
        }
    }
    Ok(())
}

fn serialize_output(path: &str, simulation: &SimulationOutput) -> Result<String, CommandError> {
    if path.to_ascii_lowercase().ends_with(".json") {
        serde_json::to_string_pretty(simulation).map_err(|e| CommandError::Serialize(e.to_string()))
    } else {
        serde_yaml::to_string(simulation).map_err(|e| CommandError::Serialize(e.to_string()))
    }
}
