//! Board view - the main dashboard screen
//!
//! Header, KPI counters, filter bar, and a grid of task cards with
//! keyboard selection.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use super::{to_color, truncate};
use crate::board::{Board, ResponsibleFilter, StatusFilter};
use crate::models::{Task, TaskStatus, Team, format_due_date};
use crate::tui::connection::SyncStatus;

/// Rows taken by one card, borders included.
pub const CARD_HEIGHT: u16 = 8;

const CARD_MIN_WIDTH: u16 = 34;
const MAX_COLUMNS: usize = 3;

const GOLD: Color = Color::Rgb(0xDA, 0xA5, 0x20);
const GREEN: Color = Color::Rgb(0x00, 0x64, 0x00);

pub fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Pending => Color::Gray,
        TaskStatus::InProgress => GOLD,
        TaskStatus::Completed => GREEN,
    }
}

fn status_icon(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "◷",
        TaskStatus::InProgress => "◐",
        TaskStatus::Completed => "✓",
    }
}

/// Full bars are green, anything short of 100% is gold.
pub fn progress_color(progress: u8) -> Color {
    if progress >= 100 { GREEN } else { GOLD }
}

/// Text progress bar `width` cells wide.
pub fn progress_bar(progress: u8, width: usize) -> String {
    let filled = (usize::from(progress.min(100)) * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Grid columns for a given width: one to three.
pub fn columns_for(width: u16) -> usize {
    usize::from(width / CARD_MIN_WIDTH).clamp(1, MAX_COLUMNS)
}

/// Selection and scroll state for the card grid
#[derive(Debug)]
pub struct BoardView {
    /// Index into the visible (filtered) tasks
    selected: usize,
    /// Columns used by the last render
    columns: usize,
    /// First grid row on screen
    scroll_row: usize,
}

impl Default for BoardView {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardView {
    pub fn new() -> Self {
        Self {
            selected: 0,
            columns: 1,
            scroll_row: 0,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Keep the selection inside a list of `len` cards.
    pub fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn select_next(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self, len: usize) {
        if self.selected + self.columns < len {
            self.selected += self.columns;
        }
    }

    pub fn select_up(&mut self) {
        if self.selected >= self.columns {
            self.selected -= self.columns;
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    /// Task under the cursor.
    pub fn selected_task<'a>(&self, visible: &[&'a Task]) -> Option<&'a Task> {
        visible.get(self.selected).copied()
    }

    /// Render the whole board screen.
    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        board: &Board,
        team: &Team,
        status: &SyncStatus,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Header
                Constraint::Length(3), // KPIs
                Constraint::Length(3), // Filters
                Constraint::Min(3),    // Cards
                Constraint::Length(1), // Key hints
            ])
            .split(area);

        render_header(frame, chunks[0], status);
        render_kpis(frame, chunks[1], board);
        render_filters(frame, chunks[2], board, team);
        self.render_grid(frame, chunks[3], board, team);
        render_hints(frame, chunks[4], board);
    }

    fn render_grid(&mut self, frame: &mut Frame, area: Rect, board: &Board, team: &Team) {
        if board.is_loading() {
            let loading = Paragraph::new("Carregando dados do Firebase...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(loading, vertical_center(area));
            return;
        }

        let tasks = board.visible_tasks();
        if tasks.is_empty() {
            let empty = Paragraph::new("Nenhuma tarefa encontrada com os filtros selecionados.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, vertical_center(area));
            return;
        }

        self.columns = columns_for(area.width);
        self.clamp(tasks.len());

        let columns = self.columns;
        let col_width = area.width / columns as u16;
        let visible_rows = usize::from((area.height / CARD_HEIGHT).max(1));
        let selected_row = self.selected / columns;
        if selected_row < self.scroll_row {
            self.scroll_row = selected_row;
        } else if selected_row >= self.scroll_row + visible_rows {
            self.scroll_row = selected_row + 1 - visible_rows;
        }

        let first = self.scroll_row * columns;
        for (index, task) in tasks
            .iter()
            .enumerate()
            .skip(first)
            .take(visible_rows * columns)
        {
            let row = (index - first) / columns;
            let col = index % columns;
            let rect = Rect::new(
                area.x + col as u16 * col_width,
                area.y + row as u16 * CARD_HEIGHT,
                col_width,
                CARD_HEIGHT,
            )
            .intersection(area);
            render_card(frame, rect, task, team, index == self.selected);
        }
    }
}

fn vertical_center(area: Rect) -> Rect {
    Rect::new(area.x, area.y + area.height / 2, area.width, area.height.min(1))
}

fn render_header(frame: &mut Frame, area: Rect, status: &SyncStatus) {
    let indicator_color = match status {
        SyncStatus::Loading => Color::Yellow,
        SyncStatus::Live => Color::Green,
        SyncStatus::Failed => Color::Red,
    };
    let title = "Painel de Marketing";
    let status_display = format!("[{}] {}", status.indicator(), status.label());
    let padding = usize::from(area.width)
        .saturating_sub(title.chars().count() + status_display.chars().count() + 4);

    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(format!(" {}", title), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" ".repeat(padding)),
            Span::styled(status_display, Style::default().fg(indicator_color)),
        ]),
        Line::from(Span::styled(
            " Acompanhamento de tarefas e entregas da equipe PSR",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_kpis(frame: &mut Frame, area: Rect, board: &Board) {
    let stats = board.stats();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let kpis = [
        ("Total de Tarefas", stats.total, Color::White),
        ("Pendentes", stats.pending, status_color(TaskStatus::Pending)),
        ("Em Progresso", stats.in_progress, GOLD),
        ("Concluídas", stats.completed, GREEN),
    ];
    for ((label, count, color), cell) in kpis.into_iter().zip(cells.iter()) {
        let kpi = Paragraph::new(Span::styled(
            count.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(label));
        frame.render_widget(kpi, *cell);
    }
}

fn filter_span(label: &str, active: bool) -> Span<'static> {
    let text = format!(" {} ", label);
    if active {
        Span::styled(
            text,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw(text)
    }
}

fn render_filters(frame: &mut Frame, area: Rect, board: &Board, team: &Team) {
    let label_style = Style::default().fg(Color::DarkGray);
    let mut spans = vec![Span::styled(" Status:", label_style)];
    for choice in StatusFilter::CHOICES {
        spans.push(filter_span(choice.label(), choice == board.status_filter()));
    }
    spans.push(Span::styled("  Responsável:", label_style));
    for choice in ResponsibleFilter::choices(team) {
        spans.push(filter_span(
            choice.label(),
            &choice == board.responsible_filter(),
        ));
    }

    let filters = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Filtrar por "));
    frame.render_widget(filters, area);
}

fn render_hints(frame: &mut Frame, area: Rect, board: &Board) {
    let line = match board.last_error() {
        Some(_) => Line::from(Span::styled(
            " Sincronização interrompida; os dados exibidos podem estar desatualizados. q:Sair",
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            " n:Nova Tarefa  Enter:Editar  h/j/k/l:Navegar  s:Status  a:Responsável  q:Sair",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_card(frame: &mut Frame, area: Rect, task: &Task, team: &Team, selected: bool) {
    let inner_width = usize::from(area.width.saturating_sub(2));
    let border_style = if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if selected {
            BorderType::Thick
        } else {
            BorderType::Rounded
        })
        .border_style(border_style)
        .title(Span::styled(
            truncate(&task.title, inner_width.saturating_sub(2)),
            Style::default().add_modifier(Modifier::BOLD),
        ));

    let initials = format!(" {} ", team.initials_for(&task.responsible));
    let avatar_style = Style::default()
        .fg(Color::White)
        .bg(to_color(team.color_for(&task.responsible)))
        .add_modifier(Modifier::BOLD);
    let platform_width = inner_width.saturating_sub(initials.chars().count() + 1);
    let platform = truncate(&task.platform, platform_width);
    let gap = inner_width.saturating_sub(platform.chars().count() + initials.chars().count());

    let percent = format!("{}%", task.progress);
    let bar_width = inner_width.saturating_sub(percent.len() + 1);
    let description = if task.description.is_empty() {
        "Sem descrição."
    } else {
        task.description.as_str()
    };

    let color = status_color(task.status);
    let lines = vec![
        Line::from(vec![
            Span::styled(platform, Style::default().fg(Color::DarkGray)),
            Span::raw(" ".repeat(gap)),
            Span::styled(initials, avatar_style),
        ]),
        Line::from(Span::styled(
            truncate(&task.responsible, inner_width),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            format!("{} {}", status_icon(task.status), task.status.label()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                progress_bar(task.progress, bar_width),
                Style::default().fg(progress_color(task.progress)),
            ),
            Span::raw(" "),
            Span::styled(percent, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(format!("Entrega: {}", format_due_date(&task.due_date))),
        Line::from(Span::styled(
            truncate(description, inner_width),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let card = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(card, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::normalize_snapshot;
    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::json;

    fn tasks(n: usize) -> Vec<Task> {
        let entries: serde_json::Map<String, serde_json::Value> = (0..n)
            .map(|i| (format!("-K{:02}", i), json!({ "Título": format!("Tarefa {}", i) })))
            .collect();
        normalize_snapshot(&serde_json::Value::Object(entries))
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 4), "░░░░");
        assert_eq!(progress_bar(50, 4), "██░░");
        assert_eq!(progress_bar(100, 4), "████");
        assert_eq!(progress_color(100), GREEN);
        assert_eq!(progress_color(99), GOLD);
    }

    #[test]
    fn test_columns_for_width() {
        assert_eq!(columns_for(20), 1);
        assert_eq!(columns_for(80), 2);
        assert_eq!(columns_for(200), 3);
    }

    #[test]
    fn test_grid_navigation() {
        let mut view = BoardView::new();
        view.columns = 3;
        view.select_down(7);
        assert_eq!(view.selected(), 3);
        view.select_down(7);
        assert_eq!(view.selected(), 6);
        view.select_down(7);
        assert_eq!(view.selected(), 6);
        view.select_next(7);
        assert_eq!(view.selected(), 6);
        view.select_up();
        view.select_previous();
        assert_eq!(view.selected(), 2);
        view.clamp(1);
        assert_eq!(view.selected(), 0);
    }

    #[test]
    fn test_render_loading_state() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let board = Board::new();
        let mut view = BoardView::new();
        terminal
            .draw(|f| {
                let area = f.area();
                view.render(f, area, &board, &Team::default(), &SyncStatus::Loading)
            })
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Carregando dados do Firebase..."));
        assert!(text.contains("Painel de Marketing"));
    }

    #[test]
    fn test_render_empty_state() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut board = Board::new();
        board.apply_snapshot(Vec::new());
        let mut view = BoardView::new();
        terminal
            .draw(|f| {
                let area = f.area();
                view.render(f, area, &board, &Team::default(), &SyncStatus::Live)
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("Nenhuma tarefa encontrada"));
    }

    #[test]
    fn test_render_cards_and_selection_scrolls() {
        let mut terminal = Terminal::new(TestBackend::new(70, 30)).unwrap();
        let mut board = Board::new();
        board.apply_snapshot(tasks(10));
        let mut view = BoardView::new();
        let team = Team::default();

        terminal
            .draw(|f| {
                let area = f.area();
                view.render(f, area, &board, &team, &SyncStatus::Live)
            })
            .unwrap();
        assert_eq!(view.columns(), 2);
        let text = buffer_text(&terminal);
        assert!(text.contains("Tarefa 0"));
        assert!(text.contains("Sem descrição."));
        assert!(text.contains("Sem data"));

        for _ in 0..4 {
            view.select_down(10);
        }
        assert_eq!(view.selected(), 8);
        terminal
            .draw(|f| {
                let area = f.area();
                view.render(f, area, &board, &team, &SyncStatus::Live)
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("Tarefa 8"));
    }
}
