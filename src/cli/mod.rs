//! CLI argument definitions for Painel.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::TaskStatus;

/// Painel - live task board for the marketing team.
///
/// Run without a command to open the dashboard.
#[derive(Parser, Debug)]
#[command(name = "painel")]
#[command(author, version, about = "Live task board for a marketing team", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Realtime Database root URL (also PAINEL_DATABASE_URL)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Path to config.toml
    #[arg(long = "config", global = true, env = "PAINEL_CONFIG")]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the live dashboard (default)
    Board,

    /// Print the current task list once
    List {
        /// Only tasks with this status
        #[arg(short, long, value_enum)]
        status: Option<TaskStatus>,

        /// Only tasks for this person ("unassigned" for tasks without one)
        #[arg(short, long)]
        responsible: Option<String>,
    },

    /// Show task counts by status
    Stats,

    /// Create a task
    Add {
        /// Task title
        #[arg(short, long)]
        title: String,

        /// Publishing platform (e.g. Instagram)
        #[arg(short, long)]
        platform: String,

        #[command(flatten)]
        fields: TaskFieldArgs,
    },

    /// Update fields of an existing task
    Update {
        /// Task ID (push ids start with '-')
        #[arg(allow_hyphen_values = true)]
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New platform
        #[arg(short, long)]
        platform: Option<String>,

        #[command(flatten)]
        fields: TaskFieldArgs,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Optional task fields shared by `add` and `update`.
#[derive(Args, Debug, Clone, Default)]
pub struct TaskFieldArgs {
    /// Responsible person
    #[arg(short, long)]
    pub responsible: Option<String>,

    /// Task status
    #[arg(short, long, value_enum)]
    pub status: Option<TaskStatus>,

    /// Due date (YYYY-MM-DD, empty to clear)
    #[arg(long = "due")]
    pub due_date: Option<String>,

    /// Completion percentage (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub progress: Option<u8>,

    /// Campaign objective
    #[arg(short, long)]
    pub objective: Option<String>,

    /// Longer description
    #[arg(short, long)]
    pub description: Option<String>,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration and where each value came from
    Show,
}
