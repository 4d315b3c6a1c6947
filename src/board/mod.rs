//! Board state: the task list, filters, and counts the dashboard shows.
//!
//! [`Board`] is the single owner of view state. It is changed only through
//! its mutation methods; each one bumps a revision published on a `watch`
//! channel, and renderers redraw when their receiver reports a change.

use serde::Serialize;
use tokio::sync::watch;

use crate::models::{Task, TaskStatus, Team, UNASSIGNED};

/// Status filter for the task grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    /// All choices in display order.
    pub const CHOICES: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Only(TaskStatus::Pending),
        StatusFilter::Only(TaskStatus::InProgress),
        StatusFilter::Only(TaskStatus::Completed),
    ];

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => task.status == *status,
        }
    }

    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "Todos",
            StatusFilter::Only(TaskStatus::Pending) => "Pendentes",
            StatusFilter::Only(TaskStatus::InProgress) => "Em Progresso",
            StatusFilter::Only(TaskStatus::Completed) => "Concluídas",
        }
    }

    /// The next choice, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::CHOICES.iter().position(|c| *c == self).unwrap_or(0);
        Self::CHOICES[(index + 1) % Self::CHOICES.len()]
    }
}

impl From<Option<TaskStatus>> for StatusFilter {
    fn from(status: Option<TaskStatus>) -> Self {
        status.map_or(StatusFilter::All, StatusFilter::Only)
    }
}

/// Responsible-party filter for the task grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResponsibleFilter {
    #[default]
    All,
    Member(String),
    Unassigned,
}

impl ResponsibleFilter {
    /// Parse a filter name: `all`, `unassigned` (or the unassigned label),
    /// or anything else as a member name.
    pub fn parse(s: &str) -> Self {
        match s {
            "all" => ResponsibleFilter::All,
            "unassigned" | UNASSIGNED => ResponsibleFilter::Unassigned,
            name => ResponsibleFilter::Member(name.to_string()),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            ResponsibleFilter::All => true,
            ResponsibleFilter::Member(name) => task.responsible == *name,
            ResponsibleFilter::Unassigned => task.responsible == UNASSIGNED,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ResponsibleFilter::All => "Todos",
            ResponsibleFilter::Member(name) => name,
            ResponsibleFilter::Unassigned => UNASSIGNED,
        }
    }

    /// Choices for a team: all, each member, then unassigned.
    pub fn choices(team: &Team) -> Vec<ResponsibleFilter> {
        std::iter::once(ResponsibleFilter::All)
            .chain(
                team.members()
                    .iter()
                    .map(|m| ResponsibleFilter::Member(m.name.clone())),
            )
            .chain(std::iter::once(ResponsibleFilter::Unassigned))
            .collect()
    }

    /// The next choice for a team, wrapping around.
    pub fn next(&self, team: &Team) -> Self {
        let choices = Self::choices(team);
        let index = choices.iter().position(|c| c == self).unwrap_or(0);
        choices[(index + 1) % choices.len()].clone()
    }
}

/// Keep the tasks that pass both filters, in their original order.
pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    status: &StatusFilter,
    responsible: &ResponsibleFilter,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| status.matches(task) && responsible.matches(task))
        .collect()
}

/// Counts over the unfiltered task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl Stats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(
            Stats {
                total: tasks.len(),
                ..Stats::default()
            },
            |mut stats, task| {
                match task.status {
                    TaskStatus::Pending => stats.pending += 1,
                    TaskStatus::InProgress => stats.in_progress += 1,
                    TaskStatus::Completed => stats.completed += 1,
                }
                stats
            },
        )
    }
}

/// The dashboard's state container.
pub struct Board {
    tasks: Vec<Task>,
    stats: Stats,
    loading: bool,
    last_error: Option<String>,
    status_filter: StatusFilter,
    responsible_filter: ResponsibleFilter,
    revision: watch::Sender<u64>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// A board waiting for its first snapshot.
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            tasks: Vec::new(),
            stats: Stats::default(),
            loading: true,
            last_error: None,
            status_filter: StatusFilter::All,
            responsible_filter: ResponsibleFilter::All,
            revision,
        }
    }

    /// Receiver that reports every state change.
    pub fn watch(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn changed(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Replace the whole task list with a new snapshot.
    pub fn apply_snapshot(&mut self, tasks: Vec<Task>) {
        self.stats = Stats::from_tasks(&tasks);
        self.tasks = tasks;
        self.loading = false;
        self.last_error = None;
        self.changed();
    }

    /// Record a subscription failure. The task list is left as it was.
    pub fn subscription_failed(&mut self, detail: impl Into<String>) {
        self.loading = false;
        self.last_error = Some(detail.into());
        self.changed();
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        if self.status_filter != filter {
            self.status_filter = filter;
            self.changed();
        }
    }

    pub fn set_responsible_filter(&mut self, filter: ResponsibleFilter) {
        if self.responsible_filter != filter {
            self.responsible_filter = filter;
            self.changed();
        }
    }

    pub fn cycle_status_filter(&mut self) {
        self.set_status_filter(self.status_filter.next());
    }

    pub fn cycle_responsible_filter(&mut self, team: &Team) {
        let next = self.responsible_filter.next(team);
        self.set_responsible_filter(next);
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks passing the current filters, recomputed on every call.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        filter_tasks(&self.tasks, &self.status_filter, &self.responsible_filter)
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn responsible_filter(&self) -> &ResponsibleFilter {
        &self.responsible_filter
    }
}
