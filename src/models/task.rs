//! Task model and the mapping between remote records and local tasks.
//!
//! Remote records are loosely typed JSON objects keyed by Portuguese field
//! labels. Reading is lenient: any field may be missing or carry an
//! unexpected type. Writing always produces the full record.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Remote field labels.
pub mod field {
    pub const TITLE: &str = "Título";
    pub const DESCRIPTION: &str = "Descrição";
    pub const PLATFORM: &str = "Plataforma";
    pub const RESPONSIBLE: &str = "Responsável";
    pub const STATUS: &str = "Status";
    pub const DUE_DATE: &str = "Data de Entrega";
    pub const PROGRESS: &str = "Progresso (%)";
    pub const OBJECTIVE: &str = "objetivo";
    pub const CREATED_AT: &str = "Data de Criação";
}

/// Label used for tasks with no responsible party.
pub const UNASSIGNED: &str = "Não Atribuído";

/// Platform shown when a record has none.
pub const DEFAULT_PLATFORM: &str = "N/A";

/// Fixed time-of-day appended to due dates so they stay on the same
/// calendar day in the team's timezone (UTC-3).
pub const DUE_DATE_SUFFIX: &str = "T03:00:00.000Z";

/// Normalized task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// All statuses in display order.
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// Classify a free-text remote status label.
    ///
    /// Matching is a case-insensitive substring test: "progresso" means in
    /// progress, "concluído"/"concluido" means completed, and everything
    /// else (including an empty label) is pending.
    pub fn classify(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("progresso") {
            TaskStatus::InProgress
        } else if label.contains("concluído") || label.contains("concluido") {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        }
    }

    /// Remote (Portuguese) label written back to the store.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pendente",
            TaskStatus::InProgress => "Em Progresso",
            TaskStatus::Completed => "Concluído",
        }
    }

    /// Machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// The status after this one, wrapping around.
    pub fn next(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A task as shown on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    /// Store-assigned key, never changes.
    pub id: String,
    pub title: String,
    pub description: String,
    pub platform: String,
    pub responsible: String,
    pub status: TaskStatus,
    /// Due date as stored, usually `YYYY-MM-DDT03:00:00.000Z` or empty.
    pub due_date: String,
    /// Completion percentage, 0 to 100.
    pub progress: u8,
    pub objective: String,
    /// Original creation timestamp, kept so edits can write it back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Task {
    /// Normalize one remote entry.
    ///
    /// Returns `None` for entries that are not objects or have no title;
    /// those records are treated as incomplete and never shown.
    pub fn from_remote(id: &str, value: &Value) -> Option<Self> {
        let record = value.as_object()?;
        let title = title_field(record)?;

        Some(Task {
            id: id.to_string(),
            title,
            description: text_field(record, field::DESCRIPTION).unwrap_or_default(),
            platform: text_field(record, field::PLATFORM)
                .unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
            responsible: text_field(record, field::RESPONSIBLE)
                .unwrap_or_else(|| UNASSIGNED.to_string()),
            status: TaskStatus::classify(
                &text_field(record, field::STATUS).unwrap_or_default(),
            ),
            due_date: text_field(record, field::DUE_DATE).unwrap_or_default(),
            progress: parse_progress(record.get(field::PROGRESS)),
            objective: text_field(record, field::OBJECTIVE).unwrap_or_default(),
            created_at: text_field(record, field::CREATED_AT),
        })
    }

    /// Due date without any time component, as a date input expects it.
    pub fn due_date_input(&self) -> &str {
        strip_time(&self.due_date)
    }

    /// Whether nobody is responsible for this task.
    pub fn is_unassigned(&self) -> bool {
        self.responsible == UNASSIGNED
    }
}

/// Normalize a full collection snapshot into tasks.
///
/// Order follows the store's key order, which for push ids is creation
/// order. Integer-keyed collections arrive as arrays; their indexes become
/// ids and null holes are skipped. Anything else yields an empty list.
pub fn normalize_snapshot(snapshot: &Value) -> Vec<Task> {
    match snapshot {
        Value::Object(entries) => entries
            .iter()
            .filter_map(|(id, value)| Task::from_remote(id, value))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter_map(|(index, value)| Task::from_remote(&index.to_string(), value))
            .collect(),
        _ => Vec::new(),
    }
}

/// Read a field as non-empty text. Numbers and booleans are rendered.
fn text_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    let text = match record.get(key)? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() { None } else { Some(text) }
}

/// Read the title. Falsy values (`0`, `false`) count as missing.
fn title_field(record: &Map<String, Value>) -> Option<String> {
    match record.get(field::TITLE)? {
        Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        _ => text_field(record, field::TITLE),
    }
}

/// Parse the progress field and clamp it into 0..=100.
///
/// Strings use leading-integer semantics, so "50%" reads as 50.
fn parse_progress(value: Option<&Value>) -> u8 {
    let raw = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => leading_integer(s).unwrap_or(0),
        _ => 0,
    };
    raw.clamp(0, 100) as u8
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

fn strip_time(date: &str) -> &str {
    date.split('T').next().unwrap_or(date)
}

/// Encode an optional due date the way the store expects it.
pub fn encode_due_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!("{}{}", date.format("%Y-%m-%d"), DUE_DATE_SUFFIX),
        None => String::new(),
    }
}

/// Creation timestamp in the store's format, e.g. `2025-06-01T12:30:00.000Z`.
pub fn creation_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format a due date for a card, `dd/mm/yy`.
///
/// Empty dates read "Sem data"; anything unparseable is shown verbatim.
pub fn format_due_date(date: &str) -> String {
    if date.is_empty() {
        return "Sem data".to_string();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(date) {
        return parsed.with_timezone(&Utc).format("%d/%m/%y").to_string();
    }
    match NaiveDate::parse_from_str(strip_time(date), "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%d/%m/%y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// The editable fields of a task, as submitted by the editor or CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub platform: String,
    pub responsible: String,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub progress: u8,
    pub objective: String,
}

impl TaskFields {
    /// Start from an existing task's values.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            platform: task.platform.clone(),
            responsible: task.responsible.clone(),
            status: task.status,
            due_date: NaiveDate::parse_from_str(task.due_date_input(), "%Y-%m-%d").ok(),
            progress: task.progress,
            objective: task.objective.clone(),
        }
    }

    /// Build the full remote record for these fields.
    pub fn to_record(&self, created_at: impl Into<String>) -> RemoteRecord {
        RemoteRecord {
            title: self.title.clone(),
            description: self.description.clone(),
            platform: self.platform.clone(),
            responsible: self.responsible.clone(),
            status: self.status.label().to_string(),
            due_date: encode_due_date(self.due_date),
            progress: self.progress.min(100),
            objective: self.objective.clone(),
            created_at: created_at.into(),
        }
    }
}

/// The wire shape of a task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    #[serde(rename = "Título")]
    pub title: String,
    #[serde(rename = "Descrição")]
    pub description: String,
    #[serde(rename = "Plataforma")]
    pub platform: String,
    #[serde(rename = "Responsável")]
    pub responsible: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Data de Entrega")]
    pub due_date: String,
    #[serde(rename = "Progresso (%)")]
    pub progress: u8,
    #[serde(rename = "objetivo")]
    pub objective: String,
    #[serde(rename = "Data de Criação")]
    pub created_at: String,
}
