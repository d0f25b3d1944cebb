use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::domain::project::Project;
use crate::domain::task::TaskEstimate;
use crate::services::confidence::{reduce_sorted, DEFAULT_BIN_COUNT};
use crate::services::pert_sampler::{
    BetaPertSampler, DistributionKind, DurationSampler, NormalPertSampler,
};
use crate::services::project_yaml::{load_project_from_yaml_file, ProjectYamlError};
use crate::services::simulation_types::{SimulationOutput, SimulationReport};

/// Upper bound the CLI accepts for `--iterations`.
pub const MAX_ITERATIONS: usize = 50_000_000;

/// Trials reserved up front; larger runs grow the result list as they go.
const PREALLOCATED_TRIALS: usize = 1 << 20;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("failed to load project: {0}")]
    LoadProject(#[from] ProjectYamlError),
}

#[derive(Debug, Clone)]
pub struct SimulationSettings {
    pub iterations: usize,
    pub start_date: NaiveDate,
    pub bin_count: usize,
    pub seed: Option<u64>,
    pub distribution: DistributionKind,
}

impl SimulationSettings {
    pub fn new(iterations: usize, start_date: NaiveDate) -> Self {
        Self {
            iterations,
            start_date,
            bin_count: DEFAULT_BIN_COUNT,
            seed: None,
            distribution: DistributionKind::Normal,
        }
    }
}

/// Runs `trial_count` trials with the default normal sampler and an
/// entropy-seeded generator. Results are not reproducible between calls.
pub fn run_simulation(tasks: &[TaskEstimate], trial_count: usize) -> Vec<f64> {
    let mut sampler = NormalPertSampler::new(rand::thread_rng());
    run_simulation_with_sampler(tasks, trial_count, &mut sampler)
}

/// Each trial draws one duration per task and records the sum. Trials are
/// returned in the order they ran.
pub fn run_simulation_with_sampler<S: DurationSampler + ?Sized>(
    tasks: &[TaskEstimate],
    trial_count: usize,
    sampler: &mut S,
) -> Vec<f64> {
    let mut results = Vec::with_capacity(trial_count.min(PREALLOCATED_TRIALS));
    for _ in 0..trial_count {
        let total: f64 = tasks
            .iter()
            .map(|task| sampler.sample(task.estimate()))
            .sum();
        results.push(total);
    }
    tracing::debug!(trials = trial_count, tasks = tasks.len(), "simulation finished");
    results
}

pub fn simulate_project_from_yaml_file(
    path: &str,
    settings: &SimulationSettings,
) -> Result<SimulationOutput, SimulationError> {
    let project = load_project_from_yaml_file(path)?;
    let mut output = simulate_project(&project, settings);
    output.report.data_source = data_source_name(path);
    Ok(output)
}

pub fn simulate_project(project: &Project, settings: &SimulationSettings) -> SimulationOutput {
    let span = tracing::info_span!("simulate", project = %project.name, iterations = settings.iterations);
    let _guard = span.enter();

    let mut sampler = build_sampler(settings.distribution, settings.seed);
    let mut results = run_simulation_with_sampler(project.tasks(), settings.iterations, sampler.as_mut());
    results.sort_by(f64::total_cmp);

    let confidence = reduce_sorted(&results, settings.start_date, settings.bin_count);
    let report = SimulationReport {
        data_source: String::new(),
        start_date: settings.start_date,
        iterations: settings.iterations,
        tasks: project.tasks().len(),
        distribution: settings.distribution.to_string(),
        pert_total: project.total_pert_estimate(),
        confidence,
    };

    SimulationOutput { report, results }
}

pub fn build_sampler(distribution: DistributionKind, seed: Option<u64>) -> Box<dyn DurationSampler> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    match distribution {
        DistributionKind::Normal => Box::new(NormalPertSampler::new(rng)),
        DistributionKind::Beta => Box::new(BetaPertSampler::new(rng)),
    }
}

fn data_source_name(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
        .to_string()
}
