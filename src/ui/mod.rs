pub mod renderfns;
pub mod screen;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::ListState;

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

  let shortcuts = app.current_view().shortcuts();
  renderfns::draw_header(
    frame,
    chunks[0],
    app.title(),
    &app.source_label(),
    &shortcuts,
  );

  // Draw current view
  app.render_current(frame, chunks[1]);

  renderfns::draw_footer(frame, chunks[2], &app.view_breadcrumb());
}

/// Keep a list selection inside `0..len`, selecting the first row by default
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  match state.selected() {
    _ if len == 0 => state.select(None),
    None => state.select(Some(0)),
    Some(i) if i >= len => state.select(Some(len - 1)),
    Some(_) => {}
  }
}
