use crate::query::{QueryCache, QueryKey};
use crate::ui::renderfns::type_color;
use crate::ui::screen::{detail_screen, DetailSheet, ImageRef, Screen, FAILURE_TEXT, LOADING_TEXT};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// View for displaying one creature
pub struct DetailView {
  name: String,
}

impl DetailView {
  pub fn new(name: String) -> Self {
    Self { name }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  fn sheet_lines(sheet: &DetailSheet) -> Vec<Line<'_>> {
    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::DarkGray));

    let image = match &sheet.image {
      ImageRef::Url { src, .. } => Span::styled(src.as_str(), Style::default().fg(Color::Cyan)),
      ImageRef::Missing { alt } => Span::styled(
        format!("(no image for {})", alt),
        Style::default().fg(Color::DarkGray),
      ),
    };

    let types_style = sheet
      .primary_type
      .as_deref()
      .map(|t| Style::default().fg(type_color(t)))
      .unwrap_or_default();

    vec![
      Line::from(vec![label("image: "), image]),
      Line::default(),
      Line::from(vec![label("id: "), Span::raw(sheet.id.to_string())]),
      Line::from(vec![label("height: "), Span::raw(sheet.height.to_string())]),
      Line::from(vec![label("weight: "), Span::raw(sheet.weight.to_string())]),
      Line::from(vec![
        label("types: "),
        Span::styled(sheet.types.as_str(), types_style),
      ]),
    ]
  }
}

impl View for DetailView {
  fn query_key(&self) -> QueryKey {
    QueryKey::Detail(self.name.clone())
  }

  fn handle_key(&mut self, key: KeyEvent, _cache: &QueryCache) -> ViewAction {
    match key.code {
      KeyCode::Char('r') => ViewAction::Refresh,
      KeyCode::Char('q') | KeyCode::Char('b') | KeyCode::Esc | KeyCode::Backspace => {
        ViewAction::Back
      }
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, cache: &mut QueryCache) {
    let screen = detail_screen(cache.resolve(&self.query_key()));

    let title = match &screen {
      Screen::Ready(sheet) => format!(" {} ", sheet.name),
      _ => format!(" {} ", self.name),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let paragraph = match &screen {
      Screen::Loading => Paragraph::new(LOADING_TEXT).style(Style::default().fg(Color::DarkGray)),
      Screen::Failure => Paragraph::new(FAILURE_TEXT).style(Style::default().fg(Color::Red)),
      Screen::Ready(sheet) => Paragraph::new(Self::sheet_lines(sheet)).wrap(Wrap { trim: false }),
    };

    frame.render_widget(paragraph.block(block), area);
  }

  fn breadcrumb_label(&self) -> String {
    self.name.clone()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("r", "refresh").with_priority(40),
      ShortcutInfo::new("q", "back").with_priority(50),
    ]
  }
}
