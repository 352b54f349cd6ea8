pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::TableState;
use renderfns::{draw_footer, draw_header};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Breadcrumb
    ])
    .split(frame.area());

  let status = app.status();
  let shortcuts = app.shortcuts();
  draw_header(
    frame,
    chunks[0],
    app.title(),
    app.api_url(),
    status.as_deref(),
    &shortcuts,
  );

  if let Some(view) = app.current_view_mut() {
    view.render(frame, chunks[1]);
  }

  let breadcrumb = app.breadcrumb();
  draw_footer(frame, chunks[2], &breadcrumb, app.message());

  // Drawn last so it sits above the view's own overlays
  let area = frame.area();
  app.command_input().render_overlay(frame, area);
}

/// Keep the selection inside `0..len`, selecting the first row when
/// nothing is selected yet
pub fn ensure_valid_selection(state: &mut TableState, len: usize) {
  if len == 0 {
    state.select(None);
    return;
  }
  match state.selected() {
    Some(i) if i >= len => state.select(Some(len - 1)),
    None => state.select(Some(0)),
    _ => {}
  }
}
