#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Nothing listens here; requests fail fast with "connection refused"
pub const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:9";

/// Runs the arcaload binary with its config isolated in a temp directory
pub struct ArcaloadTest {
    pub temp_dir: TempDir,
    binary_path: PathBuf,
}

impl ArcaloadTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        ArcaloadTest {
            temp_dir,
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_arcaload")),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("config.yaml")
    }

    pub fn write_config(&self, yaml: &str) {
        fs::write(self.config_path(), yaml).expect("Failed to write config");
    }

    /// Run with the server pointed at an unreachable address
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.binary_path)
            .args(args)
            .current_dir(self.temp_dir.path())
            .env("ARCALOAD_CONFIG", self.config_path())
            .env("ARCALOAD_BASE_URL", UNREACHABLE_BASE_URL)
            .env_remove("ARCALOAD_LOG")
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to execute arcaload command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }
}
