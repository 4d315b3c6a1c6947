//! Command implementations for the Painel CLI.
//!
//! Every command returns a value implementing [`Output`] so `main` can print
//! it as JSON (default) or human-readable text (`-H`).

use serde::Serialize;

use crate::Result;
use crate::board::{ResponsibleFilter, Stats, StatusFilter, filter_tasks};
use crate::cli::TaskFieldArgs;
use crate::config::{ResolvedConfig, config_file_exists};
use crate::editor::TaskForm;
use crate::models::{Task, TaskStatus, format_due_date};
use crate::sync::StoreAdapter;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json_of<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

// === list ===

#[derive(Debug, Serialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
    pub count: usize,
}

impl Output for TaskList {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.tasks.is_empty() {
            return "Nenhuma tarefa encontrada com os filtros selecionados.".to_string();
        }
        let mut lines = vec![format!("{} tarefa(s):", self.count)];
        for task in &self.tasks {
            lines.push(format!(
                "  {}  [{}] {} ({}) {} | Entrega: {} | {}%",
                task.id,
                task.status.label(),
                task.title,
                task.platform,
                task.responsible,
                format_due_date(&task.due_date),
                task.progress
            ));
        }
        lines.join("\n")
    }
}

/// Fetch the collection once and apply the filters.
pub async fn list(
    adapter: &StoreAdapter,
    status: Option<TaskStatus>,
    responsible: Option<&str>,
) -> Result<TaskList> {
    let tasks = adapter.fetch().await?;
    let status = StatusFilter::from(status);
    let responsible = responsible.map_or(ResponsibleFilter::All, ResponsibleFilter::parse);
    let tasks: Vec<Task> = filter_tasks(&tasks, &status, &responsible)
        .into_iter()
        .cloned()
        .collect();
    Ok(TaskList {
        count: tasks.len(),
        tasks,
    })
}

// === stats ===

impl Output for Stats {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Total de Tarefas: {}\nPendentes: {}\nEm Progresso: {}\nConcluídas: {}",
            self.total, self.pending, self.in_progress, self.completed
        )
    }
}

/// Counts over the whole collection.
pub async fn stats(adapter: &StoreAdapter) -> Result<Stats> {
    let tasks = adapter.fetch().await?;
    Ok(Stats::from_tasks(&tasks))
}

// === add / update ===

#[derive(Debug, Serialize)]
pub struct TaskWritten {
    pub id: String,
    pub action: &'static str,
}

impl Output for TaskWritten {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        match self.action {
            "created" => format!("Tarefa criada com sucesso! ({})", self.id),
            _ => format!("Tarefa atualizada com sucesso! ({})", self.id),
        }
    }
}

fn apply_field_args(form: &mut TaskForm, args: &TaskFieldArgs) {
    if let Some(responsible) = &args.responsible {
        form.responsible = responsible.clone();
    }
    if let Some(status) = args.status {
        form.status = status;
    }
    if let Some(due) = &args.due_date {
        form.due_date = due.clone();
    }
    if let Some(progress) = args.progress {
        form.progress = progress;
    }
    if let Some(objective) = &args.objective {
        form.objective = objective.clone();
    }
    if let Some(description) = &args.description {
        form.description = description.clone();
    }
}

/// Create a task. Same validation as the dashboard form.
pub async fn add(
    adapter: &StoreAdapter,
    title: &str,
    platform: &str,
    args: &TaskFieldArgs,
) -> Result<TaskWritten> {
    let mut form = TaskForm::blank();
    form.title = title.to_string();
    form.platform = platform.to_string();
    apply_field_args(&mut form, args);

    let fields = form.validate()?;
    let id = adapter.create(&fields).await?;
    Ok(TaskWritten {
        id,
        action: "created",
    })
}

/// Load a task, apply the given fields, and write it back whole.
pub async fn update(
    adapter: &StoreAdapter,
    id: &str,
    title: Option<&str>,
    platform: Option<&str>,
    args: &TaskFieldArgs,
) -> Result<TaskWritten> {
    let task = adapter.fetch_task(id).await?;
    let mut form = TaskForm::from_task(&task);
    if let Some(title) = title {
        form.title = title.to_string();
    }
    if let Some(platform) = platform {
        form.platform = platform.to_string();
    }
    apply_field_args(&mut form, args);

    let fields = form.validate()?;
    adapter
        .update(&task.id, &fields, task.created_at.as_deref())
        .await?;
    Ok(TaskWritten {
        id: task.id,
        action: "updated",
    })
}

// === config show ===

#[derive(Debug, Serialize)]
pub struct ConfigReport {
    pub config_file_exists: bool,
    #[serde(flatten)]
    pub config: ResolvedConfig,
}

impl Output for ConfigReport {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let config = &self.config;
        let file = match &config.config_path {
            Some(path) if self.config_file_exists => path.display().to_string(),
            Some(path) => format!("{} (not found)", path.display()),
            None => "(none)".to_string(),
        };
        let mut lines = vec![
            format!("config file:  {}", file),
            format!(
                "database_url: {}  [{}]",
                config.database_url.value, config.database_url.source
            ),
            format!(
                "project_id:   {}  [{}]",
                config.project_id.value, config.project_id.source
            ),
            format!(
                "collection:   {}  [{}]",
                config.collection.value, config.collection.source
            ),
            format!(
                "log_dir:      {}  [{}]",
                config.log_dir.value.display(),
                config.log_dir.source
            ),
            format!("team:         [{}]", config.team.source),
        ];
        let team = config.team();
        for member in team.members() {
            lines.push(format!(
                "  {:<3} {}",
                team.initials_for(&member.name),
                member.name
            ));
        }
        lines.join("\n")
    }
}

pub fn config_show(config: &ResolvedConfig) -> ConfigReport {
    ConfigReport {
        config_file_exists: config_file_exists(config),
        config: config.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn adapter_with(store: &Arc<MemoryStore>) -> StoreAdapter {
        StoreAdapter::new(store.clone(), "agenda")
    }

    fn seeded() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::with_data(json!({
            "agenda": {
                "-A": { "Título": "Post", "Plataforma": "Instagram", "Responsável": "Tiago", "Status": "Pendente" },
                "-B": { "Título": "Vídeo", "Plataforma": "YouTube", "Responsável": "Wallace", "Status": "Concluído", "Progresso (%)": 100 },
                "-C": { "Título": "Blog", "Status": "Em Progresso" }
            }
        })))
    }

    #[tokio::test]
    async fn test_list_filters_by_status_and_responsible() {
        let store = seeded();
        let adapter = adapter_with(&store);

        let all = list(&adapter, None, None).await.unwrap();
        assert_eq!(all.count, 3);

        let done = list(&adapter, Some(TaskStatus::Completed), None).await.unwrap();
        assert_eq!(done.tasks.len(), 1);
        assert_eq!(done.tasks[0].id, "-B");

        let unassigned = list(&adapter, None, Some("unassigned")).await.unwrap();
        assert_eq!(unassigned.tasks.len(), 1);
        assert_eq!(unassigned.tasks[0].id, "-C");
    }

    #[tokio::test]
    async fn test_list_human_empty_message() {
        let adapter = adapter_with(&Arc::new(MemoryStore::new()));
        let result = list(&adapter, None, None).await.unwrap();
        assert_eq!(
            result.to_human(),
            "Nenhuma tarefa encontrada com os filtros selecionados."
        );
    }

    #[tokio::test]
    async fn test_stats_counts() {
        let adapter = adapter_with(&seeded());
        let stats = stats(&adapter).await.unwrap();
        assert_eq!(
            stats,
            Stats {
                total: 3,
                pending: 1,
                in_progress: 1,
                completed: 1
            }
        );
        assert!(stats.to_human().contains("Total de Tarefas: 3"));
    }

    #[tokio::test]
    async fn test_add_requires_title() {
        let adapter = adapter_with(&Arc::new(MemoryStore::new()));
        let err = add(&adapter, "  ", "Instagram", &TaskFieldArgs::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Título"));
    }

    #[tokio::test]
    async fn test_add_then_update_keeps_untouched_fields() {
        let store = Arc::new(MemoryStore::new());
        let adapter = adapter_with(&store);
        let args = TaskFieldArgs {
            responsible: Some("Tiago".to_string()),
            due_date: Some("2025-06-01".to_string()),
            ..Default::default()
        };
        let created = add(&adapter, "Campanha X", "Instagram", &args).await.unwrap();
        let before = store.value_at(&format!("agenda/{}", created.id));

        let change = TaskFieldArgs {
            status: Some(TaskStatus::InProgress),
            progress: Some(50),
            ..Default::default()
        };
        update(&adapter, &created.id, None, None, &change)
            .await
            .unwrap();

        let after = store.value_at(&format!("agenda/{}", created.id));
        assert_eq!(after["Título"], "Campanha X");
        assert_eq!(after["Responsável"], "Tiago");
        assert_eq!(after["Status"], "Em Progresso");
        assert_eq!(after["Progresso (%)"], 50);
        assert_eq!(after["Data de Entrega"], "2025-06-01T03:00:00.000Z");
        assert_eq!(after["Data de Criação"], before["Data de Criação"]);
    }

    #[tokio::test]
    async fn test_update_missing_task() {
        let adapter = adapter_with(&Arc::new(MemoryStore::new()));
        let err = update(&adapter, "-nope", None, None, &TaskFieldArgs::default())
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::NotFound(_)));
    }
}
