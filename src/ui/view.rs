use crate::query::{QueryCache, QueryKey};
use crossterm::event::KeyEvent;
use ratatui::prelude::*;

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub priority: u8, // Lower = shown first
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }
}

/// Actions that a view can request in response to user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
  /// No action needed
  None,
  /// Show details for the named creature
  Select(String),
  /// Drop the cached entry for this view's key and fetch it again
  Refresh,
  /// Leave the current view (quits from the overview)
  Back,
}

/// Trait for view behavior
///
/// Views own no fetched data. They name the cache key they depend on, read
/// the entry through the shared `QueryCache` when rendering, and return
/// actions for the App to execute.
pub trait View {
  /// The cache key this view renders
  fn query_key(&self) -> QueryKey;

  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent, cache: &QueryCache) -> ViewAction;

  /// Render the view to the frame, resolving its key (and so possibly
  /// issuing its fetch) on the way
  fn render(&mut self, frame: &mut Frame, area: Rect, cache: &mut QueryCache);

  /// Get the breadcrumb label for this view
  fn breadcrumb_label(&self) -> String;

  /// Get keyboard shortcuts to display in the header
  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("r", "refresh").with_priority(40),
      ShortcutInfo::new("q", "back").with_priority(50),
    ]
  }
}
