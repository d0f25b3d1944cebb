use chrono::Local;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::services::pert_sampler::DistributionKind;
use crate::services::simulation::MAX_ITERATIONS;

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task with a three point estimate to a project YAML file
    AddTask {
        /// Project YAML file, created when missing
        #[arg(short, long)]
        project: String,
        /// Unique task name
        #[arg(short, long)]
        name: String,
        /// Resource working on the task
        #[arg(short, long)]
        resource: String,
        /// Name of a connected task
        #[arg(short, long, default_value = "None")]
        connected_task: String,
        /// Most likely duration in days
        #[arg(short, long)]
        duration: u32,
        /// Task start date (YYYY-MM-DD)
        #[arg(short, long, default_value_t = default_start_date())]
        start_date: String,
        /// Optimistic duration in days, derived from the duration when omitted
        #[arg(long)]
        optimistic: Option<u32>,
        /// Pessimistic duration in days, derived from the duration when omitted
        #[arg(long)]
        pessimistic: Option<u32>,
    },
    /// Edit one field of a task; invalid numbers are ignored
    EditTask {
        /// Project YAML file
        #[arg(short, long)]
        project: String,
        /// Name of the task to edit
        #[arg(short, long)]
        task: String,
        /// Field to edit (name, resource, connectedTask, startDate, optimistic, mostLikely, pessimistic)
        #[arg(short, long)]
        field: String,
        /// New raw value
        #[arg(short, long, allow_hyphen_values = true)]
        value: String,
    },
    /// Delete a task from a project
    DeleteTask {
        /// Project YAML file
        #[arg(short, long)]
        project: String,
        /// Name of the task to delete
        #[arg(short, long)]
        task: String,
    },
    /// Print the tasks of a project with their PERT estimates
    ListTasks {
        /// Project YAML file
        #[arg(short, long)]
        project: String,
    },
    /// Reset optimistic and pessimistic durations from the most likely duration
    RefreshDurations {
        /// Project YAML file
        #[arg(short, long)]
        project: String,
    },
    /// Import tasks from a CSV or Excel sheet into a project YAML file
    Import {
        /// CSV, XLSX, XLS or ODS file
        #[arg(short, long)]
        input: String,
        /// Output project YAML file
        #[arg(short, long)]
        output: String,
        /// Project name, defaults to the input file name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Export the tasks of a project to CSV
    Export {
        /// Project YAML file
        #[arg(short, long)]
        project: String,
        /// Output CSV file
        #[arg(short, long)]
        output: String,
    },
    /// Write an import template CSV
    Template {
        /// Output CSV file
        #[arg(short, long)]
        output: String,
    },
    /// Simulate project duration with Monte Carlo sampling of PERT estimates
    Simulate {
        /// Project YAML file
        #[arg(short, long)]
        project: String,
        /// Output report file (YAML, or JSON for a .json extension)
        #[arg(short, long)]
        output: String,
        /// Project start date (YYYY-MM-DD)
        #[arg(short, long, default_value_t = default_start_date())]
        start_date: String,
        /// Number of simulation iterations
        #[arg(
            short = 'n',
            long,
            default_value_t = 10000,
            value_parser = RangedU64ValueParser::<usize>::new().range(0..=MAX_ITERATIONS as u64)
        )]
        iterations: usize,
        /// Number of histogram bins
        #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(1..))]
        bins: u16,
        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
        /// Duration distribution (normal or beta)
        #[arg(short, long, default_value_t = DistributionKind::Normal)]
        distribution: DistributionKind,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Short description used in failure messages.
    pub fn action(&self) -> &'static str {
        match self {
            Commands::AddTask { .. } => "add task",
            Commands::EditTask { .. } => "edit task",
            Commands::DeleteTask { .. } => "delete task",
            Commands::ListTasks { .. } => "list tasks",
            Commands::RefreshDurations { .. } => "refresh durations",
            Commands::Import { .. } => "import tasks",
            Commands::Export { .. } => "export tasks",
            Commands::Template { .. } => "write template",
            Commands::Simulate { .. } => "simulate project",
            Commands::Completions { .. } => "generate completions",
        }
    }
}

fn default_start_date() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulate_defaults_start_date_to_today() {
        let args = CliArgs::parse_from([
            "pertcast",
            "simulate",
            "-p",
            "project.yaml",
            "-o",
            "report.yaml",
        ]);

        if let Commands::Simulate {
            start_date,
            iterations,
            bins,
            seed,
            distribution,
            ..
        } = args.command
        {
            assert_eq!(start_date, default_start_date());
            assert_eq!(iterations, 10000);
            assert_eq!(bins, 10);
            assert_eq!(seed, None);
            assert_eq!(distribution, DistributionKind::Normal);
        } else {
            panic!("expected simulate command");
        }
    }

    #[test]
    fn simulate_rejects_zero_bins() {
        let result = CliArgs::try_parse_from([
            "pertcast", "simulate", "-p", "p.yaml", "-o", "r.yaml", "--bins", "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn simulate_rejects_iterations_above_limit() {
        let too_many = (MAX_ITERATIONS + 1).to_string();
        let huge = usize::MAX.to_string();
        for iterations in [too_many.as_str(), huge.as_str()] {
            let result = CliArgs::try_parse_from([
                "pertcast", "simulate", "-p", "p.yaml", "-o", "r.yaml", "-n", iterations,
            ]);
            assert!(result.is_err(), "{iterations} iterations should be rejected");
        }

        let limit = MAX_ITERATIONS.to_string();
        let args = CliArgs::try_parse_from([
            "pertcast", "simulate", "-p", "p.yaml", "-o", "r.yaml", "-n", limit.as_str(),
        ])
        .unwrap();
        assert!(matches!(
            args.command,
            Commands::Simulate { iterations, .. } if iterations == MAX_ITERATIONS
        ));
    }

    #[test]
    fn add_task_defaults_connected_task_to_none() {
        let args = CliArgs::parse_from([
            "pertcast",
            "add-task",
            "-p",
            "project.yaml",
            "-n",
            "Design",
            "-r",
            "Alice",
            "-d",
            "10",
            "-s",
            "2024-12-07",
        ]);

        if let Commands::AddTask {
            connected_task,
            optimistic,
            pessimistic,
            ..
        } = args.command
        {
            assert_eq!(connected_task, "None");
            assert_eq!(optimistic, None);
            assert_eq!(pessimistic, None);
        } else {
            panic!("expected add-task command");
        }
    }

    #[test]
    fn edit_task_accepts_negative_looking_values() {
        let args = CliArgs::parse_from([
            "pertcast", "edit-task", "-p", "p.yaml", "-t", "A", "-f", "optimistic", "-v", "-3",
        ]);
        if let Commands::EditTask { value, .. } = args.command {
            assert_eq!(value, "-3");
        } else {
            panic!("expected edit-task command");
        }
    }
}
