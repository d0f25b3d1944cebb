use chrono::NaiveDate;

use crate::domain::project::Project;
use crate::services::simulation_types::{ConfidenceLevel, SimulationReport};

const HISTOGRAM_WIDTH: usize = 40;

pub fn format_simulation_report(report: &SimulationReport) -> String {
    let confidence = &report.confidence;

    let mut lines = Vec::new();
    lines.push("Simulation Report".to_string());
    lines.push(format!("Data source: {}", report.data_source));
    lines.push(format!("Start date: {}", report.start_date.format("%Y-%m-%d")));
    lines.push(format!("Iterations: {}", report.iterations));
    lines.push(format!("Tasks: {}", report.tasks));
    lines.push(format!("Distribution: {}", report.distribution));
    lines.push(format!("PERT total: {:.1} days", report.pert_total));
    lines.push(String::new());
    lines.push("Confidence:".to_string());
    lines.push("Confidence | Days | End".to_string());
    lines.push("-----------|------|----".to_string());
    lines.push(format_confidence_row("20%", &confidence.p20));
    lines.push(format_confidence_row("50%", &confidence.p50));
    lines.push(format_confidence_row("90%", &confidence.p90));

    if !confidence.histogram.is_empty() {
        let max_count = confidence
            .histogram
            .iter()
            .map(|bin| bin.count)
            .max()
            .unwrap_or(0)
            .max(1);
        lines.push(String::new());
        lines.push("Histogram:".to_string());
        for bin in &confidence.histogram {
            let bar = "#".repeat(bin.count * HISTOGRAM_WIDTH / max_count);
            lines.push(format!("{:>12} | {:>6} | {bar}", bin.label, bin.count));
        }
    }

    lines.join("\n")
}

fn format_confidence_row(label: &str, level: &ConfidenceLevel) -> String {
    format!(
        "{label} | {days} days | {date}",
        days = level.rounded_days,
        date = format_display_date(level.date)
    )
}

/// `Dec 7, 2024`
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn format_task_table(project: &Project) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Project: {}", project.name));
    lines.push(
        "Task | Resource | Connected Task | Start | Finish | Optimistic | Most Likely | Pessimistic | PERT"
            .to_string(),
    );
    lines.push("-----|----------|----------------|-------|--------|------------|-------------|-------------|-----".to_string());
    for task in project.tasks() {
        lines.push(format!(
            "{} | {} | {} | {} | {} | {} | {} | {} | {:.1}",
            task.name,
            task.resource,
            task.connected_task_label(),
            task.start_date.format("%Y-%m-%d"),
            task.expected_finish_date(task.start_date).format("%Y-%m-%d"),
            task.optimistic(),
            task.most_likely(),
            task.pessimistic(),
            task.pert_estimate(),
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::confidence::reduce;
    use crate::test_support::{build_task, on_date};

    fn build_report(results: &[f64]) -> SimulationReport {
        SimulationReport {
            data_source: "project.yaml".to_string(),
            start_date: on_date(2024, 12, 7),
            iterations: results.len(),
            tasks: 2,
            distribution: "normal".to_string(),
            pert_total: 15.5,
            confidence: reduce(results, on_date(2024, 12, 7), 4),
        }
    }

    #[test]
    fn format_simulation_report_includes_header_and_confidence_table() {
        let report = build_report(&[10.2, 11.0, 12.7, 14.0, 20.0]);
        let output = format_simulation_report(&report);

        assert!(output.contains("Simulation Report"));
        assert!(output.contains("Data source: project.yaml"));
        assert!(output.contains("Start date: 2024-12-07"));
        assert!(output.contains("Iterations: 5"));
        assert!(output.contains("Distribution: normal"));
        assert!(output.contains("PERT total: 15.5 days"));
        assert!(output.contains("Confidence | Days | End"));
        // floor(5 * 0.2) = 1 => 11.0, floor(5 * 0.5) = 2 => 12.7, floor(5 * 0.9) = 4 => 20.0
        assert!(output.contains("20% | 11 days | Dec 18, 2024"));
        assert!(output.contains("50% | 13 days | Dec 20, 2024"));
        assert!(output.contains("90% | 20 days | Dec 27, 2024"));
        assert!(output.contains("Histogram:"));
        assert!(output.contains("10-13 days"));
    }

    #[test]
    fn format_simulation_report_omits_histogram_without_results() {
        let report = build_report(&[]);
        let output = format_simulation_report(&report);
        assert!(output.contains("90% | 0 days | Dec 7, 2024"));
        assert!(!output.contains("Histogram:"));
    }

    #[test]
    fn format_task_table_shows_finish_date_and_rounded_pert() {
        let project = Project::with_tasks("Demo", vec![build_task("Design", 10)]).unwrap();
        let output = format_task_table(&project);
        assert!(output.contains("Project: Demo"));
        assert!(output.contains(
            "Design | Resource 1 | None | 2024-12-07 | 2024-12-17 | 6 | 10 | 16 | 10.3"
        ));
    }
}
