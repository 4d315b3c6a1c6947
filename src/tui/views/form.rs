//! Task form modal
//!
//! Drawn centered over the board while the editor is open.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::board::{progress_bar, progress_color, status_color};
use super::{centered_rect, truncate};
use crate::editor::{FormField, FormMode, TaskForm};

const FORM_WIDTH: u16 = 72;
const FORM_HEIGHT: u16 = 16;
const LABEL_WIDTH: usize = 20;

fn field_value(form: &TaskForm, field: FormField, width: usize) -> Span<'static> {
    let focused = form.focus == field;
    let text = match field {
        FormField::Title => form.title.clone(),
        FormField::Platform => form.platform.clone(),
        FormField::DueDate => {
            if form.due_date.is_empty() && !focused {
                "AAAA-MM-DD".to_string()
            } else {
                form.due_date.clone()
            }
        }
        FormField::Objective => form.objective.clone(),
        FormField::Description => form.description.clone(),
        FormField::Responsible => format!("< {} >", form.responsible_label()),
        FormField::Status => format!("< {} >", form.status.label()),
        FormField::Progress => {
            let bar = progress_bar(form.progress, 20);
            return Span::styled(
                format!("{} {}%", bar, form.progress),
                Style::default().fg(progress_color(form.progress)),
            );
        }
    };

    let style = match field {
        FormField::Status => Style::default().fg(status_color(form.status)),
        FormField::DueDate if form.due_date.is_empty() && !focused => {
            Style::default().fg(Color::DarkGray)
        }
        _ => Style::default(),
    };

    if focused && field.is_text() {
        // Keep the end of the text visible while typing.
        let chars: Vec<char> = text.chars().collect();
        let visible = width.saturating_sub(1);
        let start = chars.len().saturating_sub(visible);
        let tail: String = chars[start..].iter().collect();
        Span::styled(format!("{}▏", tail), style)
    } else {
        Span::styled(truncate(&text, width), style)
    }
}

/// Render the task form over `area`.
pub fn render_form(frame: &mut Frame, area: Rect, form: &TaskForm, mode: &FormMode) {
    let rect = centered_rect(FORM_WIDTH, FORM_HEIGHT, area);
    let (title, submit) = match mode {
        FormMode::Create => (" Nova Tarefa ", "Criar Tarefa"),
        FormMode::Edit { .. } => (" Editar Tarefa ", "Salvar Alterações"),
    };

    let value_width = usize::from(rect.width.saturating_sub(4)).saturating_sub(LABEL_WIDTH + 1);
    let mut lines = Vec::with_capacity(FormField::ALL.len() + 4);
    lines.push(Line::from(""));

    for field in FormField::ALL {
        let focused = form.focus == field;
        let marker = if focused { "▶ " } else { "  " };
        let required = if field.is_required() { "*" } else { "" };
        let label = format!("{}{}{}", marker, field.label(), required);
        let label_style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<width$} ", label, width = LABEL_WIDTH), label_style),
            field_value(form, field, value_width),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(match &form.error {
        Some(error) => Line::from(Span::styled(
            format!("  {}", error),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(""),
    });
    lines.push(Line::from(Span::styled(
        format!(
            "  Enter:{}  Esc:Cancelar  Tab:Campo  ←/→:Opção",
            submit
        ),
        Style::default().fg(Color::DarkGray),
    )));

    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Span::styled(
                title,
                Style::default().add_modifier(Modifier::BOLD),
            )),
    );

    frame.render_widget(Clear, rect);
    frame.render_widget(body, rect);
}
