//! Common test utilities for painel integration tests.
//!
//! Provides `TestEnv`, which points every invocation at its own config file
//! and log directory so tests never read the user's configuration.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

/// Address nothing listens on; requests fail fast with connection refused.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

/// An isolated environment for running the `painel` binary.
pub struct TestEnv {
    pub config_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Create an environment with `contents` written to its config file.
    pub fn with_config(contents: &str) -> Self {
        let env = Self::new();
        std::fs::write(env.config_path(), contents).unwrap();
        env
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.config_dir.path().join("config.toml")
    }

    /// Get a Command for the painel binary with isolated configuration.
    pub fn painel(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_painel"));
        cmd.env("PAINEL_CONFIG", self.config_path());
        cmd.env("PAINEL_LOG_DIR", self.config_dir.path().join("logs"));
        cmd.env_remove("PAINEL_DATABASE_URL");
        cmd.env_remove("PAINEL_PROJECT_ID");
        cmd.env_remove("PAINEL_COLLECTION");
        cmd.env_remove("PAINEL_LOG");
        cmd
    }
}

/// Parse stdout of a finished command as JSON.
pub fn parse_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout should be JSON")
}
