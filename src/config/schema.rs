//! TOML schema for `config.toml`.
//!
//! ```toml
//! database_url = "https://agenda-portal-2d149-default-rtdb.firebaseio.com"
//! project_id = "agenda-portal-2d149"
//! collection = "agenda"
//! log_dir = "/var/log/painel"
//!
//! [[team]]
//! name = "Tiago"
//! initials = "Ti"
//! color = "#4682B4"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::TeamMember;
use crate::{Error, Result};

/// Public database the dashboard was built against.
pub const DEFAULT_DATABASE_URL: &str = "https://agenda-portal-2d149-default-rtdb.firebaseio.com";

/// Project the default database belongs to.
pub const DEFAULT_PROJECT_ID: &str = "agenda-portal-2d149";

/// Values read from a config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PainelConfig {
    pub database_url: Option<String>,
    pub project_id: Option<String>,
    pub collection: Option<String>,
    pub log_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub team: Vec<TeamMember>,
}

impl PainelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: PainelConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a file. A missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Validate the values that are set.
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.database_url {
            validate_database_url(url)?;
        }
        if let Some(collection) = &self.collection {
            if collection.trim_matches('/').is_empty() {
                return Err(Error::Config("collection must not be empty".to_string()));
            }
        }
        for member in &self.team {
            if member.name.trim().is_empty() {
                return Err(Error::Config("team member name must not be empty".to_string()));
            }
        }
        Ok(())
    }
}

/// A database URL must be http(s).
pub fn validate_database_url(url: &str) -> Result<()> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "database_url must start with http:// or https://, got {}",
            url
        )))
    }
}

/// Default location of the config file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("painel").join("config.toml"))
}

/// Default directory for log files.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("painel")
        .join("logs")
}
