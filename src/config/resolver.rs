//! Precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags
//! 2. Environment variables (`PAINEL_DATABASE_URL`, `PAINEL_PROJECT_ID`,
//!    `PAINEL_COLLECTION`, `PAINEL_LOG_DIR`)
//! 3. `config.toml`
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::schema::{
    DEFAULT_DATABASE_URL, DEFAULT_PROJECT_ID, PainelConfig, default_config_path, default_log_dir,
    validate_database_url,
};
use crate::Result;
use crate::models::{Team, TeamMember, default_team};
use crate::sync::DEFAULT_COLLECTION;

pub const DATABASE_URL_ENV: &str = "PAINEL_DATABASE_URL";
pub const PROJECT_ID_ENV: &str = "PAINEL_PROJECT_ID";
pub const COLLECTION_ENV: &str = "PAINEL_COLLECTION";
pub const LOG_DIR_ENV: &str = "PAINEL_LOG_DIR";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from environment variable
    EnvVar(String),
    /// Value from the config file
    File(PathBuf),
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::File(path) => write!(f, "file:{}", path.display()),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

impl Serialize for ValueSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, Serialize)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub database_url: Option<String>,
    pub project_id: Option<String>,
    pub collection: Option<String>,
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// Config file that was consulted (it may not exist).
    pub config_path: Option<PathBuf>,
    pub database_url: Resolved<String>,
    pub project_id: Resolved<String>,
    pub collection: Resolved<String>,
    pub log_dir: Resolved<PathBuf>,
    pub team: Resolved<Vec<TeamMember>>,
}

impl ResolvedConfig {
    pub fn team(&self) -> Team {
        Team::new(self.team.value.clone())
    }
}

/// Resolve configuration from flags, the process environment, and the file.
pub fn resolve_config(overrides: ConfigOverrides) -> Result<ResolvedConfig> {
    resolve_config_with(overrides, |name| std::env::var(name).ok())
}

/// Resolve configuration with an explicit environment lookup.
pub fn resolve_config_with<F>(overrides: ConfigOverrides, env: F) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config_path = overrides.config_path.clone().or_else(default_config_path);
    let file = match &config_path {
        Some(path) => PainelConfig::load(path)?,
        None => PainelConfig::new(),
    };
    let file_source = || match &config_path {
        Some(path) => ValueSource::File(path.clone()),
        None => ValueSource::Default,
    };

    let pick = |flag: Option<String>, env_name: &str, from_file: Option<String>, default: &str| {
        if let Some(value) = flag {
            Resolved::new(value, ValueSource::CliFlag)
        } else if let Some(value) = env(env_name).filter(|v| !v.is_empty()) {
            Resolved::new(value, ValueSource::EnvVar(env_name.to_string()))
        } else if let Some(value) = from_file {
            Resolved::new(value, file_source())
        } else {
            Resolved::new(default.to_string(), ValueSource::Default)
        }
    };

    let mut database_url = pick(
        overrides.database_url,
        DATABASE_URL_ENV,
        file.database_url.clone(),
        DEFAULT_DATABASE_URL,
    );
    validate_database_url(&database_url.value)?;
    database_url.value = database_url.value.trim_end_matches('/').to_string();

    let project_id = pick(
        overrides.project_id,
        PROJECT_ID_ENV,
        file.project_id.clone(),
        DEFAULT_PROJECT_ID,
    );
    let mut collection = pick(
        overrides.collection,
        COLLECTION_ENV,
        file.collection.clone(),
        DEFAULT_COLLECTION,
    );
    collection.value = collection.value.trim_matches('/').to_string();

    let log_dir = if let Some(dir) = env(LOG_DIR_ENV).filter(|v| !v.is_empty()) {
        Resolved::new(PathBuf::from(dir), ValueSource::EnvVar(LOG_DIR_ENV.to_string()))
    } else if let Some(dir) = file.log_dir.clone() {
        Resolved::new(dir, file_source())
    } else {
        Resolved::new(default_log_dir(), ValueSource::Default)
    };

    let team = if file.team.is_empty() {
        Resolved::new(default_team(), ValueSource::Default)
    } else {
        Resolved::new(file.team.clone(), file_source())
    };

    Ok(ResolvedConfig {
        config_path,
        database_url,
        project_id,
        collection,
        log_dir,
        team,
    })
}

/// Whether a config file exists at the resolved location.
pub fn config_file_exists(config: &ResolvedConfig) -> bool {
    config
        .config_path
        .as_deref()
        .is_some_and(Path::exists)
}
