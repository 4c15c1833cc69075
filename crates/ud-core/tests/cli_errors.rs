//! CLI error handling tests for ud-core.
//!
//! Invalid arguments, inputs and model files must fail with the documented
//! exit code and a report on stderr, never a partial payload on stdout.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn ud_core(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ud-core").expect("ud-core binary should exist");
    cmd.env_remove("UD_MODEL")
        .env_remove("UD_CONFIG_DIR")
        .env_remove("UD_LOG")
        .env_remove("UD_LOG_FORMAT")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", home.path())
        .env("HOME", home.path());
    cmd
}

fn json_stderr(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stderr).expect("stderr should be a JSON error")
}

// ============================================================================
// Argument errors (10)
// ============================================================================

mod arguments {
    use super::*;

    #[test]
    fn unknown_command_fails() {
        let home = TempDir::new().unwrap();
        ud_core(&home)
            .arg("nonexistent-command")
            .assert()
            .code(10)
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn unknown_forecast_value_fails() {
        let home = TempDir::new().unwrap();
        ud_core(&home)
            .args(["evaluate", "--forecast", "cloudy"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("cloudy"));
    }

    #[test]
    fn non_numeric_probability_fails() {
        let home = TempDir::new().unwrap();
        ud_core(&home)
            .args(["evaluate", "--prior-rain", "likely"])
            .assert()
            .code(10);
    }

    #[test]
    fn unknown_preset_fails() {
        let home = TempDir::new().unwrap();
        ud_core(&home)
            .args(["evaluate", "--preset", "monsoon"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("monsoon"));
    }

    #[test]
    fn unknown_config_subcommand_fails() {
        let home = TempDir::new().unwrap();
        ud_core(&home)
            .args(["config", "nonexistent"])
            .assert()
            .code(10);
    }

    #[test]
    fn invalid_format_fails() {
        let home = TempDir::new().unwrap();
        ud_core(&home)
            .args(["--format", "yaml", "evaluate"])
            .assert()
            .code(10);
    }

    #[test]
    fn help_succeeds() {
        let home = TempDir::new().unwrap();
        ud_core(&home)
            .arg("--help")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("evaluate"));
    }

    #[test]
    fn version_flag_succeeds() {
        let home = TempDir::new().unwrap();
        ud_core(&home)
            .arg("--version")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("ud-core"));
    }
}

// ============================================================================
// Input errors (11)
// ============================================================================

mod inputs {
    use super::*;

    #[test]
    fn prior_above_one_is_rejected() {
        let home = TempDir::new().unwrap();
        let output = ud_core(&home)
            .args(["evaluate", "--prior-rain", "1.5"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(11));
        assert!(output.stdout.is_empty());

        let json = json_stderr(&output);
        assert_eq!(json["status"], "error");
        assert_eq!(json["exit_code"], "ERR_INPUT");
        assert_eq!(json["error"]["context"]["field"], "prior_rain");
    }

    #[test]
    fn certain_prior_is_rejected() {
        let home = TempDir::new().unwrap();
        for prior in ["0", "1"] {
            ud_core(&home)
                .args(["evaluate", "--prior-rain", prior])
                .assert()
                .code(11);
        }
    }

    #[test]
    fn negative_prior_is_rejected() {
        let home = TempDir::new().unwrap();
        ud_core(&home)
            .args(["evaluate", "--prior-rain", "-0.2"])
            .assert()
            .code(11);
    }

    #[test]
    fn nan_is_rejected() {
        let home = TempDir::new().unwrap();
        ud_core(&home)
            .args(["evaluate", "--p-good-rain", "NaN"])
            .assert()
            .code(11)
            .stderr(predicate::str::contains("p_good_given_rain"));
    }

    #[test]
    fn utility_above_scale_is_rejected() {
        let home = TempDir::new().unwrap();
        let output = ud_core(&home)
            .args(["evaluate", "--u-rain-umbrella", "101"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(11));
        assert_eq!(json_stderr(&output)["error"]["context"]["field"], "rain_umbrella");
    }

    #[test]
    fn voi_rejects_bad_inputs_too() {
        let home = TempDir::new().unwrap();
        ud_core(&home)
            .args(["voi", "--p-good-sunny", "1.2"])
            .assert()
            .code(11);
    }

    #[test]
    fn summary_error_format() {
        let home = TempDir::new().unwrap();
        ud_core(&home)
            .args(["-f", "summary", "evaluate", "--prior-rain", "2"])
            .assert()
            .code(11)
            .stderr(predicate::str::contains("error:"))
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn exitcode_format_is_silent() {
        let home = TempDir::new().unwrap();
        ud_core(&home)
            .args(["-f", "exitcode", "evaluate", "--prior-rain", "2"])
            .assert()
            .code(11)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::is_empty());
    }
}

// ============================================================================
// Degenerate forecast (12)
// ============================================================================

#[test]
fn impossible_forecast_is_degenerate() {
    let home = TempDir::new().unwrap();
    let output = ud_core(&home)
        .args([
            "evaluate",
            "--forecast",
            "good",
            "--p-good-rain",
            "0",
            "--p-good-sunny",
            "0",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(12));

    let json = json_stderr(&output);
    assert_eq!(json["exit_code"], "ERR_DEGENERATE");
    assert_eq!(json["error"]["context"]["observation"], "good");
}

#[test]
fn impossible_forecast_not_observed_still_evaluates() {
    let home = TempDir::new().unwrap();
    ud_core(&home)
        .args([
            "evaluate",
            "--forecast",
            "bad",
            "--p-good-rain",
            "0",
            "--p-good-sunny",
            "0",
        ])
        .assert()
        .code(0);
}

// ============================================================================
// Model file errors (13, 14)
// ============================================================================

mod model_file {
    use super::*;

    #[test]
    fn missing_explicit_file_fails() {
        let home = TempDir::new().unwrap();
        let output = ud_core(&home)
            .args(["--model", "/nonexistent/model.json", "evaluate"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(13));
        assert_eq!(json_stderr(&output)["exit_code"], "ERR_CONFIG");
    }

    #[test]
    fn missing_environment_file_fails() {
        let home = TempDir::new().unwrap();
        ud_core(&home)
            .env("UD_MODEL", "/nonexistent/model.json")
            .arg("evaluate")
            .assert()
            .code(13);
    }

    #[test]
    fn malformed_json_fails() {
        let home = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, "{ not json").unwrap();

        ud_core(&home)
            .arg("--model")
            .arg(&path)
            .arg("evaluate")
            .assert()
            .code(13);
    }

    #[test]
    fn unknown_field_fails() {
        let home = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, r#"{"schema_version": "1.0.0", "humidity": 0.9}"#).unwrap();

        ud_core(&home)
            .arg("--model")
            .arg(&path)
            .arg("evaluate")
            .assert()
            .code(13);
    }

    #[test]
    fn out_of_range_value_fails() {
        let home = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, r#"{"schema_version": "1.0.0", "prior_rain": 0}"#).unwrap();

        ud_core(&home)
            .arg("--model")
            .arg(&path)
            .arg("evaluate")
            .assert()
            .code(13)
            .stderr(predicate::str::contains("prior_rain"));
    }

    #[test]
    fn version_mismatch_fails() {
        let home = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, r#"{"schema_version": "2.0.0"}"#).unwrap();

        let output = ud_core(&home)
            .arg("--model")
            .arg(&path)
            .arg("evaluate")
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(14));

        let json = json_stderr(&output);
        assert_eq!(json["exit_code"], "ERR_VERSION");
        assert_eq!(json["error"]["context"]["actual"], "2.0.0");
    }

    #[test]
    fn markdown_error_is_human_readable() {
        let home = TempDir::new().unwrap();
        ud_core(&home)
            .args(["--model", "/nonexistent/model.json", "-f", "md", "--no-color", "evaluate"])
            .assert()
            .code(13)
            .stderr(predicate::str::contains("/nonexistent/model.json"));
    }
}
