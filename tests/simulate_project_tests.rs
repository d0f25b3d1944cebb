use assert_fs::prelude::*;
use predicates::prelude::*;
use std::fs;

const PROJECT_YAML: &str = r#"
name: Demo
tasks:
  - name: Design
    resource: Alice
    start_date: 2024-12-07
    most_likely: 10
  - name: Build
    resource: Bob
    connected_task: Design
    start_date: 2024-12-17
    most_likely: 4
    optimistic: 4
    pessimistic: 4
"#;

#[test]
fn simulate_project_writes_yaml_report() {
    let temp = assert_fs::TempDir::new().unwrap();
    let input_file = temp.child("project.yaml");
    input_file.write_str(PROJECT_YAML).unwrap();
    let output_file = temp.child("simulation.yaml");

    let mut cmd = assert_cmd::cargo_bin_cmd!("pertcast");
    cmd.args([
        "simulate",
        "-p",
        input_file.path().to_str().unwrap(),
        "-o",
        output_file.path().to_str().unwrap(),
        "-s",
        "2024-12-07",
        "--iterations",
        "500",
        "--seed",
        "11",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Simulation Report"))
        .stdout(predicate::str::contains("Data source: project.yaml"))
        .stdout(predicate::str::contains("Simulation result written to"));

    let output = fs::read_to_string(output_file.path()).unwrap();
    assert!(output.contains("report:"));
    assert!(output.contains("results:"));
    assert!(output.contains("start_date: 2024-12-07"));
    assert!(output.contains("iterations: 500"));
    assert!(output.contains("histogram:"));

    let report: serde_yaml::Value = serde_yaml::from_str(&output).unwrap();
    let results = report["results"].as_sequence().unwrap();
    assert_eq!(results.len(), 500);
    for value in results {
        let total = value.as_f64().unwrap();
        assert!((10.0..=20.0).contains(&total), "{total} outside [10, 20]");
    }
    let bins = report["report"]["confidence"]["histogram"].as_sequence().unwrap();
    assert_eq!(bins.len(), 10);
    let counted: u64 = bins.iter().map(|bin| bin["count"].as_u64().unwrap()).sum();
    assert_eq!(counted, 500);

    let histogram_path = format!("{}.png", output_file.path().display());
    assert!(fs::metadata(&histogram_path).is_ok());
}

#[test]
fn simulate_project_writes_json_for_json_extension() {
    let temp = assert_fs::TempDir::new().unwrap();
    let input_file = temp.child("project.yaml");
    input_file.write_str(PROJECT_YAML).unwrap();
    let output_file = temp.child("simulation.json");

    let mut cmd = assert_cmd::cargo_bin_cmd!("pertcast");
    cmd.args([
        "simulate",
        "-p",
        input_file.path().to_str().unwrap(),
        "-o",
        output_file.path().to_str().unwrap(),
        "-s",
        "2024-12-07",
        "-n",
        "20",
        "-b",
        "5",
        "-d",
        "beta",
    ]);
    cmd.assert().success();

    let output = fs::read_to_string(output_file.path()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(report["report"]["distribution"], "beta");
    assert_eq!(report["report"]["confidence"]["histogram"].as_array().unwrap().len(), 5);
    assert_eq!(report["results"].as_array().unwrap().len(), 20);
}

#[test]
fn simulate_empty_project_reports_zero_days() {
    let temp = assert_fs::TempDir::new().unwrap();
    let input_file = temp.child("empty.yaml");
    input_file.write_str("name: Empty\ntasks: []\n").unwrap();
    let output_file = temp.child("simulation.yaml");

    let mut cmd = assert_cmd::cargo_bin_cmd!("pertcast");
    cmd.args([
        "simulate",
        "-p",
        input_file.path().to_str().unwrap(),
        "-o",
        output_file.path().to_str().unwrap(),
        "-s",
        "2024-12-07",
        "-n",
        "10",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("90% | 0 days | Dec 7, 2024"));
}

#[test]
fn simulate_rejects_invalid_start_date() {
    let input_file = assert_fs::NamedTempFile::new("project.yaml").unwrap();
    input_file.write_str(PROJECT_YAML).unwrap();
    let output_file = assert_fs::NamedTempFile::new("simulation.yaml").unwrap();

    let mut cmd = assert_cmd::cargo_bin_cmd!("pertcast");
    cmd.args([
        "simulate",
        "-p",
        input_file.path().to_str().unwrap(),
        "-o",
        output_file.path().to_str().unwrap(),
        "-s",
        "tomorrow",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to simulate project: invalid date: tomorrow"));
}
