//! Painel - a live task board for a marketing team.
//!
//! Tasks live in a hosted realtime database under a single collection.
//! This library keeps one streaming subscription to that collection,
//! normalizes every snapshot into [`models::Task`] values, and exposes the
//! board state, filters, and task editor that the `painel` TUI and CLI are
//! built on.

pub mod board;
pub mod cli;
pub mod commands;
pub mod config;
pub mod editor;
pub mod logging;
pub mod models;
pub mod store;
pub mod sync;
pub mod tui;

/// Library-level error type for Painel operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Store returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Subscription failed: {0}")]
    Subscription(String),

    #[error("Write failed: {0}")]
    Write(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for Painel operations.
pub type Result<T> = std::result::Result<T, Error>;
