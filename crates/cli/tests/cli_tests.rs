//! CLI integration tests

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn cardio(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cardio"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .env_remove("CARDIO_CONFIG")
        .env_remove("CARDIO_MODELS_DIR")
        .env_remove("CARDIO_MODEL_IDS")
        .env_remove("CARDIO_MIN_MODELS")
        .output()
        .expect("Failed to execute command")
}

/// Models dir with one logistic model voting on age, one missing model
fn write_fixture(dir: &Path) {
    let models = dir.join("models");
    fs::create_dir_all(&models).unwrap();
    // Ten weights, only Age matters: age > 50 means presence
    let mut weights = vec![0.0; 10];
    weights[0] = 1.0;
    let model = serde_json::json!({
        "schema_version": "heart-disease/v1",
        "weights": weights,
        "bias": -50.0,
    });
    fs::write(models.join("logistic_regression.json"), model.to_string()).unwrap();

    fs::write(
        dir.join("cardio.toml"),
        "model_ids = [\"logistic_regression\", \"xgboost\"]\n",
    )
    .unwrap();

    let answers = serde_json::json!({
        "Age": 61,
        "Sex": "Male",
        "Chest pain type": "Asymptomatic",
        "BP": 140,
        "Cholesterol": 207,
        "FBS over 120": "No",
        "EKG results": "Left ventricular hypertrophy",
        "Max HR": 138,
        "Exercise angina": "Yes",
        "ST depression": 1.9,
    });
    fs::write(dir.join("answers.json"), answers.to_string()).unwrap();
}

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    let output = cardio(&["--help"], dir.path());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Heart disease prediction"), "Should show about text");
    assert!(stdout.contains("predict"), "Should show predict command");
    assert!(stdout.contains("schema"), "Should show schema command");
    assert!(stdout.contains("models"), "Should show models command");
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    let output = cardio(&["--version"], dir.path());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("cardio"), "Should show binary name");
}

#[test]
fn test_predict_help() {
    let dir = TempDir::new().unwrap();
    let output = cardio(&["predict", "--help"], dir.path());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("--answers"), "Should show answers option");
    assert!(stdout.contains("--dump-metrics"), "Should show dump-metrics option");
}

#[test]
fn test_schema_json() {
    let dir = TempDir::new().unwrap();
    let output = cardio(&["schema", "--format", "json"], dir.path());
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0]["name"], "Age");
    assert_eq!(rows[1]["options"], "Male | Female");
    assert_eq!(rows[9]["name"], "ST depression");
}

#[test]
fn test_predict_from_answers_file_json() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());

    let output = cardio(
        &["predict", "--answers", "answers.json", "--format", "json"],
        dir.path(),
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["schema_version"], "heart-disease/v1");
    assert_eq!(
        report["features"],
        serde_json::json!([61.0, 0.0, 3.0, 140.0, 207.0, 1.0, 2.0, 138.0, 0.0, 1.9])
    );
    assert_eq!(report["predictions"][0]["model"], "logistic_regression");
    assert_eq!(report["predictions"][0]["prediction"], "presence");
    assert_eq!(report["load_failures"][0]["identifier"], "xgboost");
    assert_eq!(report["load_failures"][0]["reason"]["kind"], "not_found");
}

#[test]
fn test_predict_from_answers_file_text() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());

    let output = cardio(&["predict", "--answers", "answers.json"], dir.path());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Prediction by logistic_regression: Presence"));
    assert!(stdout.contains("xgboost"), "Should warn about the missing model");
}

#[test]
fn test_missing_answer_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    fs::write(dir.path().join("partial.json"), r#"{"Age": 54}"#).unwrap();

    let output = cardio(&["predict", "--answers", "partial.json"], dir.path());
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("no value supplied for feature 'Sex'"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Prediction by"));
}

#[test]
fn test_min_models_refuses_run() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());

    let output = cardio(
        &["predict", "--answers", "answers.json", "--min-models", "2"],
        dir.path(),
    );
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("at least 2 required"));
}

#[test]
fn test_interactive_predict_from_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());

    let mut child = Command::new(env!("CARGO_BIN_EXE_cardio"))
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn cardio");

    // Age 30, everything else left at its default
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"30\n\n\n\n\n\n\n\n\n\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Enter your age in years"));
    assert!(stdout.contains("Prediction by logistic_regression: Absence"));
}

#[test]
fn test_models_json() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());

    let output = cardio(&["models", "--format", "json"], dir.path());
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["status"], "degraded");
    assert_eq!(report["models"][0]["model"], "logistic_regression");
    assert_eq!(report["models"][0]["status"], "loaded");
    assert_eq!(report["models"][0]["backend"], "logistic");
    assert_eq!(report["models"][1]["status"], "not found");
}
