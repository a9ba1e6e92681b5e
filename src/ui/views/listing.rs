use crate::query::{Payload, QueryCache, QueryKey};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::truncate;
use crate::ui::screen::{listing_screen, ListRow, Screen, FAILURE_TEXT, LOADING_TEXT};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

const MAX_NAME_WIDTH: usize = 40;

/// Overview of the first catalog page
pub struct ListingView {
  list_state: ListState,
}

impl ListingView {
  pub fn new() -> Self {
    Self {
      list_state: ListState::default(),
    }
  }

  /// Names of the listed creatures, empty unless the listing has loaded
  fn names(cache: &QueryCache) -> Vec<&str> {
    match cache.peek(&QueryKey::Listing).and_then(|e| e.data()) {
      Some(Payload::Listing(listing)) => listing.results.iter().map(|r| r.name.as_str()).collect(),
      _ => Vec::new(),
    }
  }

  fn move_selection(&mut self, delta: i32, len: usize) {
    if len == 0 {
      return;
    }
    let current = self.list_state.selected().unwrap_or(0) as i32;
    let next = (current + delta).rem_euclid(len as i32) as usize;
    self.list_state.select(Some(next));
  }

  fn render_rows(&mut self, frame: &mut Frame, area: Rect, block: Block, rows: &[ListRow]) {
    ensure_valid_selection(&mut self.list_state, rows.len());

    let width = rows.len().to_string().len();
    let items: Vec<ListItem> = rows
      .iter()
      .map(|row| {
        ListItem::new(Line::from(vec![
          Span::styled(
            format!("{:>width$}. ", row.position, width = width),
            Style::default().fg(Color::DarkGray),
          ),
          Span::raw(truncate(&row.name, MAX_NAME_WIDTH)),
        ]))
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }
}

impl Default for ListingView {
  fn default() -> Self {
    Self::new()
  }
}

impl View for ListingView {
  fn query_key(&self) -> QueryKey {
    QueryKey::Listing
  }

  fn handle_key(&mut self, key: KeyEvent, cache: &QueryCache) -> ViewAction {
    let names = Self::names(cache);

    match key.code {
      KeyCode::Up | KeyCode::Char('k') => {
        self.move_selection(-1, names.len());
        ViewAction::None
      }
      KeyCode::Down | KeyCode::Char('j') => {
        self.move_selection(1, names.len());
        ViewAction::None
      }
      KeyCode::Enter => match self.list_state.selected().and_then(|i| names.get(i)) {
        Some(name) => ViewAction::Select(name.to_string()),
        None => ViewAction::None,
      },
      KeyCode::Char('r') => ViewAction::Refresh,
      KeyCode::Char('q') | KeyCode::Esc | KeyCode::Backspace => ViewAction::Back,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, cache: &mut QueryCache) {
    let entry = cache.resolve(&QueryKey::Listing);

    let (title, resource, screen) = match listing_screen(entry) {
      Screen::Ready(rows) => match entry.data() {
        Some(Payload::Listing(listing)) => {
          let selected = self.list_state.selected().unwrap_or(0);
          let resource = listing.results.get(selected).map(|r| r.reference_url.clone());
          let title = format!(" Overview ({} of {}) ", rows.len(), listing.count);
          (title, resource, Screen::Ready(rows))
        }
        _ => (" Overview ".to_string(), None, Screen::Ready(rows)),
      },
      other => (" Overview ".to_string(), None, other),
    };

    let mut block = Block::default()
      .title(title)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));
    // Resource behind the highlighted row
    if let Some(url) = resource {
      block = block.title_bottom(format!(" {} ", url));
    }

    match screen {
      Screen::Loading => {
        let paragraph = Paragraph::new(LOADING_TEXT)
          .block(block)
          .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
      }
      Screen::Failure => {
        let paragraph = Paragraph::new(FAILURE_TEXT)
          .block(block)
          .style(Style::default().fg(Color::Red));
        frame.render_widget(paragraph, area);
      }
      Screen::Ready(rows) => self.render_rows(frame, area, block, &rows),
    }
  }

  fn breadcrumb_label(&self) -> String {
    "Pokedex".to_string()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("j/k", "nav").with_priority(10),
      ShortcutInfo::new("enter", "details").with_priority(20),
      ShortcutInfo::new("r", "refresh").with_priority(40),
      ShortcutInfo::new("q", "quit").with_priority(50),
    ]
  }
}
