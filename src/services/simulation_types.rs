use chrono::NaiveDate;
use serde::Serialize;

/// Day count reached by a given share of the trials.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ConfidenceLevel {
    pub days: f64,
    pub rounded_days: u64,
    pub date: NaiveDate,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub label: String,
    pub count: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ConfidenceResult {
    pub trials: usize,
    pub min: f64,
    pub max: f64,
    pub p20: ConfidenceLevel,
    pub p50: ConfidenceLevel,
    pub p90: ConfidenceLevel,
    pub histogram: Vec<HistogramBin>,
}

#[derive(Serialize, Debug, Clone)]
pub struct SimulationReport {
    pub data_source: String,
    pub start_date: NaiveDate,
    pub iterations: usize,
    pub tasks: usize,
    pub distribution: String,
    pub pert_total: f64,
    pub confidence: ConfidenceResult,
}

#[derive(Serialize, Debug, Clone)]
pub struct SimulationOutput {
    pub report: SimulationReport,
    pub results: Vec<f64>,
}
