//! End-to-end tests for the `gv` binary.
//!
//! Every invocation runs with an empty XDG config home and without the GV_*
//! environment, so results do not depend on the developer's machine.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Sandbox {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    fn gv(&self) -> Command {
        let mut cmd = Command::cargo_bin("gv").expect("gv binary should exist");
        cmd.env("XDG_CONFIG_HOME", self.dir.path())
            .env_remove("GV_CONFIG")
            .env_remove("GV_SEED")
            .env_remove("GV_LOG")
            .env_remove("GV_LOG_FORMAT")
            .env_remove("RUST_LOG");
        cmd
    }

    fn config(&self, content: &str) -> std::path::PathBuf {
        let path = self.dir.path().join("gv.toml");
        fs::write(&path, content).expect("write config");
        path
    }
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn value_at(json: &Value, i: usize) -> f64 {
    json["points"][i]["value"].as_f64().expect("numeric value")
}

// ============================================================================
// Help
// ============================================================================

mod help {
    use super::*;

    #[test]
    fn lists_subcommands() {
        Sandbox::new()
            .gv()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("sample"))
            .stdout(predicate::str::contains("pdf"))
            .stdout(predicate::str::contains("cdf"))
            .stdout(predicate::str::contains("describe"));
    }

    #[test]
    fn missing_subcommand_fails() {
        Sandbox::new().gv().assert().failure();
    }
}

// ============================================================================
// sample
// ============================================================================

mod sample {
    use super::*;

    #[test]
    fn json_batch() {
        let output = Sandbox::new()
            .gv()
            .args(["sample", "--shape", "2", "--scale", "3", "-n", "25", "--seed", "42"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json = stdout_json(&output);
        assert_eq!(json["command"], "sample");
        assert_eq!(json["count"], 25);
        assert_eq!(json["seed"], 42);
        let samples = json["samples"].as_array().unwrap();
        assert_eq!(samples.len(), 25);
        assert!(samples.iter().all(|s| s.as_f64().unwrap() > 0.0));
    }

    #[test]
    fn seed_makes_output_reproducible() {
        let sandbox = Sandbox::new();
        let args = ["sample", "--shape", "0.4", "--scale", "1.5", "-n", "10", "--seed", "7"];
        let first = sandbox.gv().args(args).output().unwrap();
        let second = sandbox.gv().args(args).output().unwrap();
        assert_eq!(first.stdout, second.stdout);
    }

    #[test]
    fn seed_from_config_and_env_match_flag() {
        let sandbox = Sandbox::new();
        let base = ["sample", "--shape", "3", "--scale", "1", "-n", "5"];

        let with_flag = sandbox.gv().args(base).args(["--seed", "11"]).output().unwrap();

        let config = sandbox.config("[sampler]\nseed = 11\n");
        let with_config = sandbox
            .gv()
            .args(base)
            .arg("--config")
            .arg(&config)
            .output()
            .unwrap();

        let with_env = sandbox.gv().args(base).env("GV_SEED", "11").output().unwrap();

        let samples = |o: &std::process::Output| stdout_json(o)["samples"].clone();
        assert_eq!(samples(&with_flag), samples(&with_config));
        assert_eq!(samples(&with_flag), samples(&with_env));
    }

    #[test]
    fn human_format_prints_one_per_line() {
        Sandbox::new()
            .gv()
            .args(["--format", "human", "sample", "-a", "1", "-b", "1", "-n", "4", "--seed", "1"])
            .assert()
            .success()
            .stdout(predicate::function(|out: &str| out.lines().count() == 4));
    }

    #[test]
    fn invalid_shape_exits_with_args_error() {
        Sandbox::new()
            .gv()
            .args(["sample", "--shape", "0", "--scale", "1"])
            .assert()
            .code(10)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("ERR_ARGS"))
            .stderr(predicate::str::contains("shape"));
    }

    #[test]
    fn negative_scale_human_error() {
        Sandbox::new()
            .gv()
            .args(["-f", "human", "sample", "--shape", "2", "--scale", "-1"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("invalid parameter scale=-1"))
            .stderr(predicate::str::contains("hint:"));
    }
}

// ============================================================================
// pdf / cdf
// ============================================================================

mod evaluate {
    use super::*;

    #[test]
    fn pdf_values() {
        let output = Sandbox::new()
            .gv()
            .args(["pdf", "--shape", "2", "--scale", "3", "6", "-1", "0"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json = stdout_json(&output);
        assert_eq!(json["command"], "pdf");
        assert!((value_at(&json, 0) - 0.090_223_522_157_7).abs() < 1e-10);
        assert_eq!(value_at(&json, 1), 0.0);
        assert_eq!(value_at(&json, 2), 0.0);
    }

    #[test]
    fn log_pdf_values() {
        let output = Sandbox::new()
            .gv()
            .args(["pdf", "--log", "--shape", "1", "--scale", "2", "4"])
            .output()
            .unwrap();
        let json = stdout_json(&output);
        assert_eq!(json["command"], "log_pdf");
        // ln(e^{-2}/2)
        assert!((value_at(&json, 0) - (-2.0 - 2f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn cdf_and_survival() {
        let sandbox = Sandbox::new();
        let cdf = stdout_json(
            &sandbox
                .gv()
                .args(["cdf", "--shape", "2", "--scale", "3", "6"])
                .output()
                .unwrap(),
        );
        let survival = stdout_json(
            &sandbox
                .gv()
                .args(["cdf", "--upper", "--shape", "2", "--scale", "3", "6"])
                .output()
                .unwrap(),
        );
        assert_eq!(survival["command"], "survival");
        let f = value_at(&cdf, 0);
        let s = value_at(&survival, 0);
        assert!((f - 0.593_994_150_290_161_9).abs() < 1e-12);
        assert!((f + s - 1.0).abs() < 1e-12);
    }

    #[test]
    fn human_format_is_tab_separated() {
        Sandbox::new()
            .gv()
            .args(["-f", "human", "cdf", "-a", "1", "-b", "1", "0", "-5"])
            .assert()
            .success()
            .stdout("0\t0\n-5\t0\n");
    }

    #[test]
    fn nan_point_rejected() {
        Sandbox::new()
            .gv()
            .args(["cdf", "--shape", "2", "--scale", "3", "NaN"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("invalid parameter x"));
    }

    #[test]
    fn points_are_required() {
        Sandbox::new()
            .gv()
            .args(["pdf", "--shape", "2", "--scale", "3"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("error"));
    }
}

// ============================================================================
// describe
// ============================================================================

mod describe {
    use super::*;

    #[test]
    fn summary_statistics() {
        let output = Sandbox::new()
            .gv()
            .args(["describe", "--shape", "4", "--scale", "0.5"])
            .output()
            .unwrap();
        let json = stdout_json(&output);
        assert_eq!(json["mean"], 2.0);
        assert_eq!(json["variance"], 1.0);
        assert_eq!(json["rate"], 2.0);
        assert_eq!(json["skewness"], 1.0);
        assert_eq!(json["excess_kurtosis"], 1.5);
    }
}

// ============================================================================
// Configuration
// ============================================================================

mod config {
    use super::*;

    #[test]
    fn missing_config_file() {
        Sandbox::new()
            .gv()
            .args(["--config", "/nonexistent/gv.toml", "describe", "-a", "1", "-b", "1"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("not found"));
    }

    #[test]
    fn zero_iteration_cap_rejected() {
        let sandbox = Sandbox::new();
        let config = sandbox.config("[sampler]\nmax_iterations = 0\n");
        sandbox
            .gv()
            .arg("--config")
            .arg(&config)
            .args(["sample", "-a", "1", "-b", "1"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("sampler.max_iterations"));
    }

    #[test]
    fn unknown_key_rejected() {
        let sandbox = Sandbox::new();
        let config = sandbox.config("[sampler]\nmax_iter = 5\n");
        sandbox
            .gv()
            .arg("--config")
            .arg(&config)
            .args(["describe", "-a", "1", "-b", "1"])
            .assert()
            .code(10);
    }

    #[test]
    fn jsonl_logs_go_to_stderr() {
        let output = Sandbox::new()
            .gv()
            .args(["-vv", "--log-format", "jsonl", "sample", "-a", "2", "-b", "1", "--seed", "3"])
            .output()
            .unwrap();
        assert!(output.status.success());
        // stdout stays a single JSON document
        stdout_json(&output);
        let stderr = String::from_utf8(output.stderr).unwrap();
        let first = stderr.lines().next().expect("debug logs on stderr");
        let event: Value = serde_json::from_str(first).expect("JSONL log line");
        assert!(event.get("level").is_some());
    }

    #[test]
    fn config_resolution_is_logged_once() {
        let sandbox = Sandbox::new();
        let config = sandbox.config("[sampler]\nseed = 4\n");
        let output = sandbox
            .gv()
            .args(["-vv", "--log-format", "jsonl", "--config"])
            .arg(&config)
            .args(["describe", "-a", "2", "-b", "1"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let stderr = String::from_utf8(output.stderr).unwrap();
        let events: Vec<Value> = stderr
            .lines()
            .filter_map(|line| serde_json::from_str::<Value>(line).ok())
            .filter(|event| event["event"] == "config.loaded")
            .collect();
        assert_eq!(events.len(), 1, "stderr:\n{}", stderr);
        assert_eq!(events[0]["source"], "CLI argument");
        assert_eq!(events[0]["seed"], "Some(4)");
    }
}
