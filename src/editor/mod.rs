//! Task editor: form state and the modal that hosts it.
//!
//! The modal is either closed or open with a form in create or edit mode.
//! Submitting validates the required fields, then hands the result to the
//! store adapter. A successful write closes the modal; a failed write keeps
//! the form as it was so the user can try again.

use chrono::NaiveDate;

use crate::models::{Task, TaskFields, TaskStatus, UNASSIGNED};
use crate::sync::StoreAdapter;
use crate::{Error, Result};

/// Form fields in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Platform,
    Responsible,
    DueDate,
    Status,
    Progress,
    Objective,
    Description,
}

impl FormField {
    pub const ALL: [FormField; 8] = [
        FormField::Title,
        FormField::Platform,
        FormField::Responsible,
        FormField::DueDate,
        FormField::Status,
        FormField::Progress,
        FormField::Objective,
        FormField::Description,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Título",
            FormField::Platform => "Plataforma",
            FormField::Responsible => "Responsável",
            FormField::DueDate => "Data de Entrega",
            FormField::Status => "Status",
            FormField::Progress => "Progresso",
            FormField::Objective => "Objetivo",
            FormField::Description => "Descrição",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, FormField::Title | FormField::Platform)
    }

    /// Free-text fields accept typed characters.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FormField::Title
                | FormField::Platform
                | FormField::DueDate
                | FormField::Objective
                | FormField::Description
        )
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Editable values of the task form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub platform: String,
    pub responsible: String,
    /// `YYYY-MM-DD` or empty.
    pub due_date: String,
    pub status: TaskStatus,
    pub progress: u8,
    pub objective: String,
    pub description: String,
    pub focus: FormField,
    /// Last validation message, shown under the form.
    pub error: Option<String>,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::blank()
    }
}

impl TaskForm {
    /// Empty form: pending, 0% progress, nobody responsible.
    pub fn blank() -> Self {
        Self {
            title: String::new(),
            platform: String::new(),
            responsible: String::new(),
            due_date: String::new(),
            status: TaskStatus::Pending,
            progress: 0,
            objective: String::new(),
            description: String::new(),
            focus: FormField::Title,
            error: None,
        }
    }

    /// Form pre-filled from a task. The due date loses its time part.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            platform: task.platform.clone(),
            responsible: task.responsible.clone(),
            due_date: task.due_date_input().to_string(),
            status: task.status,
            progress: task.progress.min(100),
            objective: task.objective.clone(),
            description: task.description.clone(),
            ..Self::blank()
        }
    }

    /// Check required fields and build the values to write.
    pub fn validate(&self) -> Result<TaskFields> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("Título é obrigatório".to_string()));
        }
        if self.platform.trim().is_empty() {
            return Err(Error::InvalidInput("Plataforma é obrigatória".to_string()));
        }
        let due_date = match self.due_date.trim() {
            "" => None,
            date => Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
                Error::InvalidInput(format!("Data de Entrega inválida: {}", date))
            })?),
        };

        Ok(TaskFields {
            title: self.title.clone(),
            description: self.description.clone(),
            platform: self.platform.clone(),
            responsible: self.responsible.clone(),
            status: self.status,
            due_date,
            progress: self.progress.min(100),
            objective: self.objective.clone(),
        })
    }

    /// Text buffer of the focused field, if it is a text field.
    pub fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Platform => Some(&mut self.platform),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Objective => Some(&mut self.objective),
            FormField::Description => Some(&mut self.description),
            FormField::Responsible | FormField::Status | FormField::Progress => None,
        }
    }

    /// Type a character into the focused text field.
    pub fn input_char(&mut self, c: char) {
        if let Some(text) = self.focused_text_mut() {
            text.push(c);
        }
    }

    /// Delete the last character of the focused text field.
    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text_mut() {
            text.pop();
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Move progress by `delta`, staying within 0..=100.
    pub fn adjust_progress(&mut self, delta: i16) {
        self.progress = (i16::from(self.progress) + delta).clamp(0, 100) as u8;
    }

    pub fn cycle_status(&mut self) {
        self.status = self.status.next();
    }

    /// Move the responsible selector through `options` (forward or back).
    pub fn cycle_responsible(&mut self, options: &[String], forward: bool) {
        if options.is_empty() {
            return;
        }
        let len = options.len();
        let next = match options.iter().position(|o| *o == self.responsible) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None if forward => 0,
            None => len - 1,
        };
        self.responsible = options[next].clone();
    }

    /// Responsible party for display; empty reads as unassigned.
    pub fn responsible_label(&self) -> &str {
        if self.responsible.is_empty() {
            UNASSIGNED
        } else {
            &self.responsible
        }
    }
}

/// Whether the form creates a new task or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit {
        id: String,
        /// Creation timestamp of the record being edited.
        created_at: Option<String>,
    },
}

/// The editor modal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    Closed,
    Open { form: TaskForm, mode: FormMode },
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(String),
    Updated(String),
    /// Required fields missing; the modal stays open.
    Invalid(String),
    /// The write failed; the modal stays open for a retry.
    Failed,
    /// Nothing to submit.
    NotOpen,
}

/// The task editor.
#[derive(Debug, Default)]
pub struct Editor {
    modal: Modal,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn is_open(&self) -> bool {
        matches!(self.modal, Modal::Open { .. })
    }

    pub fn mode(&self) -> Option<&FormMode> {
        match &self.modal {
            Modal::Open { mode, .. } => Some(mode),
            Modal::Closed => None,
        }
    }

    pub fn form(&self) -> Option<&TaskForm> {
        match &self.modal {
            Modal::Open { form, .. } => Some(form),
            Modal::Closed => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut TaskForm> {
        match &mut self.modal {
            Modal::Open { form, .. } => Some(form),
            Modal::Closed => None,
        }
    }

    /// Open a blank form for a new task.
    pub fn open_create(&mut self) {
        self.modal = Modal::Open {
            form: TaskForm::blank(),
            mode: FormMode::Create,
        };
    }

    /// Open a form pre-filled from `task`.
    pub fn open_edit(&mut self, task: &Task) {
        self.modal = Modal::Open {
            form: TaskForm::from_task(task),
            mode: FormMode::Edit {
                id: task.id.clone(),
                created_at: task.created_at.clone(),
            },
        };
    }

    pub fn cancel(&mut self) {
        self.modal = Modal::Closed;
    }

    /// Validate and write the open form.
    pub async fn submit(&mut self, adapter: &StoreAdapter) -> SubmitOutcome {
        let Modal::Open { form, mode } = &mut self.modal else {
            return SubmitOutcome::NotOpen;
        };

        let fields = match form.validate() {
            Ok(fields) => fields,
            Err(e) => {
                let message = match e {
                    Error::InvalidInput(msg) => msg,
                    other => other.to_string(),
                };
                form.error = Some(message.clone());
                return SubmitOutcome::Invalid(message);
            }
        };
        form.error = None;
        let mode = mode.clone();

        let outcome = match &mode {
            FormMode::Create => adapter.create(&fields).await.map(SubmitOutcome::Created),
            FormMode::Edit { id, created_at } => adapter
                .update(id, &fields, created_at.as_deref())
                .await
                .map(|()| SubmitOutcome::Updated(id.clone())),
        };

        match outcome {
            Ok(done) => {
                self.modal = Modal::Closed;
                done
            }
            // Already logged by the adapter.
            Err(_) => SubmitOutcome::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn adapter(store: &Arc<MemoryStore>) -> StoreAdapter {
        StoreAdapter::new(Arc::clone(store) as Arc<dyn crate::store::TaskStore>, "agenda")
    }

    fn filled_form() -> TaskForm {
        TaskForm {
            title: "Campanha X".to_string(),
            platform: "Instagram".to_string(),
            responsible: "Tiago".to_string(),
            due_date: "2025-06-01".to_string(),
            ..TaskForm::blank()
        }
    }

    #[test]
    fn test_open_create_resets_form() {
        let mut editor = Editor::new();
        assert!(!editor.is_open());
        editor.open_create();
        assert!(editor.is_open());
        assert_eq!(editor.mode(), Some(&FormMode::Create));
        let form = editor.form().unwrap();
        assert_eq!(form.status, TaskStatus::Pending);
        assert_eq!(form.progress, 0);
        assert!(form.title.is_empty());
    }

    #[test]
    fn test_open_edit_copies_task_and_strips_time() {
        let task = Task::from_remote(
            "-N1",
            &json!({
                "Título": "Post",
                "Plataforma": "LinkedIn",
                "Data de Entrega": "2025-06-01T03:00:00.000Z",
                "Progresso (%)": 40,
                "Data de Criação": "2024-01-01T00:00:00.000Z",
            }),
        )
        .unwrap();
        let mut editor = Editor::new();
        editor.open_edit(&task);

        let form = editor.form().unwrap();
        assert_eq!(form.title, "Post");
        assert_eq!(form.due_date, "2025-06-01");
        assert_eq!(form.progress, 40);
        assert_eq!(
            editor.mode(),
            Some(&FormMode::Edit {
                id: "-N1".to_string(),
                created_at: Some("2024-01-01T00:00:00.000Z".to_string()),
            })
        );
    }

    #[test]
    fn test_cancel_closes() {
        let mut editor = Editor::new();
        editor.open_create();
        editor.cancel();
        assert_eq!(editor.modal(), &Modal::Closed);
    }

    #[test]
    fn test_validate_requires_title_and_platform() {
        let mut form = TaskForm::blank();
        assert!(form.validate().is_err());
        form.title = "  ".to_string();
        form.platform = "Instagram".to_string();
        assert!(form.validate().is_err());
        form.title = "Post".to_string();
        assert!(form.validate().is_ok());
        form.platform.clear();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_date() {
        let mut form = filled_form();
        form.due_date = "01/06/2025".to_string();
        assert!(form.validate().is_err());
        form.due_date.clear();
        assert_eq!(form.validate().unwrap().due_date, None);
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut form = TaskForm::blank();
        form.adjust_progress(-5);
        assert_eq!(form.progress, 0);
        form.adjust_progress(95);
        form.adjust_progress(10);
        assert_eq!(form.progress, 100);
    }

    #[test]
    fn test_text_input_goes_to_focused_field() {
        let mut form = TaskForm::blank();
        form.input_char('A');
        form.focus_next();
        form.input_char('B');
        form.focus_next();
        // Responsible is a selector, typing does nothing.
        form.input_char('C');
        assert_eq!(form.title, "A");
        assert_eq!(form.platform, "B");
        assert!(form.responsible.is_empty());
        form.focus_previous();
        form.backspace();
        assert!(form.platform.is_empty());
    }

    #[test]
    fn test_focus_wraps() {
        assert_eq!(FormField::Description.next(), FormField::Title);
        assert_eq!(FormField::Title.previous(), FormField::Description);
    }

    #[test]
    fn test_cycle_responsible() {
        let options = vec!["Ana".to_string(), "Bia".to_string(), UNASSIGNED.to_string()];
        let mut form = TaskForm::blank();
        assert_eq!(form.responsible_label(), UNASSIGNED);
        form.cycle_responsible(&options, true);
        assert_eq!(form.responsible, "Ana");
        form.cycle_responsible(&options, false);
        assert_eq!(form.responsible, UNASSIGNED);
    }

    #[tokio::test]
    async fn test_submit_create_scenario() {
        let store = Arc::new(MemoryStore::new());
        let adapter = adapter(&store);
        let mut editor = Editor::new();
        editor.open_create();
        *editor.form_mut().unwrap() = filled_form();

        let outcome = editor.submit(&adapter).await;
        let SubmitOutcome::Created(id) = outcome else {
            panic!("expected Created, got {:?}", outcome);
        };
        assert!(!editor.is_open());

        let record = store.value_at(&format!("agenda/{}", id));
        assert_eq!(record["Status"], "Pendente");
        assert_eq!(record["Data de Entrega"], "2025-06-01T03:00:00.000Z");
        assert_eq!(record["Progresso (%)"], 0);
    }

    #[tokio::test]
    async fn test_submit_invalid_keeps_modal_open() {
        let store = Arc::new(MemoryStore::new());
        let adapter = adapter(&store);
        let mut editor = Editor::new();
        editor.open_create();

        let outcome = editor.submit(&adapter).await;
        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        assert!(editor.is_open());
        assert!(editor.form().unwrap().error.is_some());
        assert_eq!(store.value_at("agenda"), serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_form_for_retry() {
        let store = Arc::new(MemoryStore::new());
        store.reject_writes(true);
        let adapter = adapter(&store);
        let mut editor = Editor::new();
        editor.open_create();
        *editor.form_mut().unwrap() = filled_form();

        assert_eq!(editor.submit(&adapter).await, SubmitOutcome::Failed);
        assert!(editor.is_open());
        assert_eq!(editor.form().unwrap().title, "Campanha X");

        store.reject_writes(false);
        assert!(matches!(
            editor.submit(&adapter).await,
            SubmitOutcome::Created(_)
        ));
    }

    #[tokio::test]
    async fn test_submit_edit_updates_in_place() {
        let store = Arc::new(MemoryStore::with_data(json!({
            "agenda": { "-N1": {
                "Título": "Post",
                "Plataforma": "LinkedIn",
                "Data de Criação": "2024-01-01T00:00:00.000Z"
            } }
        })));
        let adapter = adapter(&store);
        let task = adapter.fetch_task("-N1").await.unwrap();

        let mut editor = Editor::new();
        editor.open_edit(&task);
        editor.form_mut().unwrap().cycle_status();

        assert_eq!(
            editor.submit(&adapter).await,
            SubmitOutcome::Updated("-N1".to_string())
        );
        let record = store.value_at("agenda/-N1");
        assert_eq!(record["Status"], "Em Progresso");
        assert_eq!(record["Data de Criação"], "2024-01-01T00:00:00.000Z");
    }

    #[tokio::test]
    async fn test_submit_when_closed() {
        let adapter = adapter(&Arc::new(MemoryStore::new()));
        let mut editor = Editor::new();
        assert_eq!(editor.submit(&adapter).await, SubmitOutcome::NotOpen);
    }
}
