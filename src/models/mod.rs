//! Data models for Painel.

mod task;
mod team;

pub use task::{
    DEFAULT_PLATFORM, DUE_DATE_SUFFIX, RemoteRecord, Task, TaskFields, TaskStatus, UNASSIGNED,
    creation_timestamp, encode_due_date, field, format_due_date, normalize_snapshot,
};
pub use team::{FALLBACK_COLOR, Rgb, Team, TeamMember, default_team, initials_from_name};
