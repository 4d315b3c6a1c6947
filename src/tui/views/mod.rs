//! TUI Views module
//!
//! The board (header, KPIs, filters, card grid) and the task form modal.

mod board;
mod form;

pub use board::{BoardView, CARD_HEIGHT, columns_for, progress_bar, progress_color, status_color};
pub use form::render_form;

use ratatui::prelude::*;

use crate::models::Rgb;

pub(crate) fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Cut `s` to at most `width` characters, ending with an ellipsis when cut.
pub(crate) fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    if width > 0 {
        out.push('…');
    }
    out
}

/// A rectangle of `width` x `height` cells centered in `area`.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
