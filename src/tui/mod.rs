//! Terminal User Interface module for painel
//!
//! A keyboard-driven dashboard over the live task collection: KPI counters,
//! filters, a card grid, and a modal form to create or edit tasks.

mod app;
mod connection;
mod notifications;
mod views;

pub use app::{App, run_dashboard};
pub use connection::SyncStatus;
pub use notifications::{NotificationLevel, NotificationManager, Toast};
pub use views::BoardView;
