//! Configuration for painel.
//!
//! ## config.toml
//!
//! Located at `~/.config/painel/config.toml` (or the path given with
//! `--config` / `PAINEL_CONFIG`). Every key is optional:
//!
//! - `database_url` - Realtime Database root URL
//! - `project_id` - Project identifier, shown next to the URL
//! - `collection` - Path holding the task records
//! - `log_dir` - Where the dashboard writes its log files
//! - `[[team]]` - Team roster used for the responsible picker and avatars
//!
//! ## Precedence
//!
//! CLI flag > environment variable > config file > defaults
//!
//! Use the [`resolver`] module for unified precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    ConfigOverrides, Resolved, ResolvedConfig, ValueSource, config_file_exists, resolve_config,
    resolve_config_with,
};
pub use schema::{DEFAULT_DATABASE_URL, DEFAULT_PROJECT_ID, PainelConfig, default_config_path};
