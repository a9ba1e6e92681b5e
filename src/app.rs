use crate::config::{Config, SourceKind};
use crate::event::{Event, EventHandler};
use crate::pokeapi::DataSource;
use crate::query::{QueryCache, QueryKey, Subscription};
use crate::ui;
use crate::ui::view::{View, ViewAction};
use crate::ui::views::{DetailView, ListingView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

/// Main application state
pub struct App {
  /// Application configuration
  config: Config,

  /// Shared query cache, the only owner of fetched data
  cache: QueryCache,

  /// Root view, kept alive so its cursor survives a trip to the details
  listing: ListingView,

  /// Detail view for the selected creature, if any
  detail: Option<DetailView>,

  /// Transitions of the visible view's key
  watch: Subscription,

  /// Whether the screen must be redrawn before waiting again
  needs_redraw: bool,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config, source: Arc<dyn DataSource>) -> Self {
    let mut cache = QueryCache::new(source);
    let watch = cache.subscribe(QueryKey::Listing);

    Self {
      config,
      cache,
      listing: ListingView::new(),
      detail: None,
      watch,
      needs_redraw: true,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let result = self.event_loop().await;

    // Cleanup terminal, even if the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(&mut self) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let mut events = EventHandler::new(Duration::from_millis(self.config.tick_rate_ms));

    // Main loop
    while !self.should_quit {
      if self.needs_redraw {
        terminal.draw(|frame| ui::draw(frame, self))?;
        self.needs_redraw = false;
      }

      tokio::select! {
        event = events.next() => match event {
          Some(event) => self.handle_event(event),
          None => break,
        },
        Some(key) = self.cache.completed() => self.handle_cache_update(&key),
      }
    }

    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Resize => self.needs_redraw = true,
      Event::Tick => {
        // Pick up anything that finished while input was being handled
        for key in self.cache.poll() {
          self.handle_cache_update(&key);
        }
      }
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let action = match &mut self.detail {
      Some(detail) => detail.handle_key(key, &self.cache),
      None => self.listing.handle_key(key, &self.cache),
    };
    self.apply(action);
    self.needs_redraw = true;
  }

  fn apply(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Select(name) => {
        tracing::info!(%name, "creature selected");
        self.detail = Some(DetailView::new(name));
        self.watch_current();
      }
      ViewAction::Back => {
        if self.detail.take().is_some() {
          self.watch_current();
        } else {
          self.should_quit = true;
        }
      }
      ViewAction::Refresh => {
        let key = self.current_view().query_key();
        tracing::info!(key = %key, "refresh requested");
        self.cache.invalidate(&key);
      }
    }
  }

  /// Follow the key of whichever view is now visible
  fn watch_current(&mut self) {
    let key = self.current_view().query_key();
    self.watch = self.cache.subscribe(key);
  }

  fn handle_cache_update(&mut self, key: &QueryKey) {
    // Only transitions of the visible key need a redraw
    if let Some(status) = self.watch.latest() {
      tracing::trace!(visible = %self.watch.key(), changed = %key, ?status, "redraw");
      self.needs_redraw = true;
    }
  }

  pub fn current_view(&self) -> &dyn View {
    match &self.detail {
      Some(detail) => detail,
      None => &self.listing,
    }
  }

  pub fn render_current(&mut self, frame: &mut Frame, area: Rect) {
    match &mut self.detail {
      Some(detail) => detail.render(frame, area, &mut self.cache),
      None => self.listing.render(frame, area, &mut self.cache),
    }
  }

  // Accessors for UI rendering
  pub fn title(&self) -> &str {
    &self.config.title
  }

  pub fn source_label(&self) -> String {
    match self.config.source {
      SourceKind::Live => ui::renderfns::extract_domain(&self.config.api.base_url).to_string(),
      SourceKind::Fixture => "offline".to_string(),
    }
  }

  /// Name of the creature whose details are shown
  pub fn selected(&self) -> Option<&str> {
    self.detail.as_ref().map(DetailView::name)
  }

  pub fn view_breadcrumb(&self) -> Vec<String> {
    let mut crumbs = vec![self.listing.breadcrumb_label()];
    if let Some(detail) = &self.detail {
      crumbs.push(detail.breadcrumb_label());
    }
    crumbs
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pokeapi::FixtureSource;
  use crate::query::tests::StubSource;
  use ratatui::backend::TestBackend;
  use std::sync::atomic::Ordering;

  fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::from(code));
  }

  async fn settle(app: &mut App) {
    let key = tokio::time::timeout(Duration::from_secs(1), app.cache.completed())
      .await
      .unwrap();
    if let Some(key) = key {
      app.handle_cache_update(&key);
    }
  }

  fn render(app: &mut App, terminal: &mut Terminal<TestBackend>) -> String {
    terminal.draw(|frame| ui::draw(frame, app)).unwrap();
    app.needs_redraw = false;

    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
      for x in 0..buffer.area.width {
        text.push_str(buffer[(x, y)].symbol());
      }
      text.push('\n');
    }
    text
  }

  fn terminal() -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(120, 20)).unwrap()
  }

  #[tokio::test]
  async fn test_browse_details_and_back_without_refetch() {
    let source = StubSource::new();
    let listing_calls = source.listing_calls.clone();
    let detail_calls = source.detail_calls.clone();
    let mut app = App::new(Config::default(), Arc::new(source));
    let mut terminal = terminal();

    let screen = render(&mut app, &mut terminal);
    assert!(screen.contains("Loading..."));
    assert!(screen.contains("My Pokedex"));

    settle(&mut app).await;
    assert!(app.needs_redraw);
    let screen = render(&mut app, &mut terminal);
    assert!(screen.contains("Overview (9 of 1126)"));
    assert!(screen.contains("> 1. bulbasaur"));
    assert!(screen.contains("9. blastoise"));
    assert!(!screen.contains("Loading..."));
    assert!(screen.contains(" https://pokeapi.co/api/v2/pokemon/1/ "));

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.selected(), Some("bulbasaur"));
    let screen = render(&mut app, &mut terminal);
    assert!(screen.contains("Loading..."));
    assert!(screen.contains("Pokedex > bulbasaur"));

    settle(&mut app).await;
    let screen = render(&mut app, &mut terminal);
    assert!(screen.contains("id: 1"));
    assert!(screen.contains("height: 7"));
    assert!(screen.contains("weight: 69"));
    assert!(screen.contains("types: grass and poison"));
    assert!(screen.contains(
      "image: https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/1.png"
    ));

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.selected(), None);
    let screen = render(&mut app, &mut terminal);
    assert!(screen.contains("> 1. bulbasaur"));

    // Second visit is served from the cache
    press(&mut app, KeyCode::Enter);
    let screen = render(&mut app, &mut terminal);
    assert!(screen.contains("types: grass and poison"));

    assert_eq!(listing_calls.load(Ordering::SeqCst), 1);
    assert_eq!(detail_calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_cursor_moves_and_wraps() {
    let mut app = App::new(Config::default(), Arc::new(StubSource::new()));
    let mut terminal = terminal();
    render(&mut app, &mut terminal);
    settle(&mut app).await;
    render(&mut app, &mut terminal);

    press(&mut app, KeyCode::Char('j'));
    let screen = render(&mut app, &mut terminal);
    assert!(screen.contains(" https://pokeapi.co/api/v2/pokemon/2/ "));
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.selected(), Some("venusaur"));

    press(&mut app, KeyCode::Char('q'));
    press(&mut app, KeyCode::Up);
    press(&mut app, KeyCode::Up);
    press(&mut app, KeyCode::Char('k'));
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.selected(), Some("blastoise"));
  }

  #[tokio::test]
  async fn test_failure_shows_generic_message() {
    let mut app = App::new(Config::default(), Arc::new(StubSource::failing()));
    let mut terminal = terminal();
    render(&mut app, &mut terminal);
    settle(&mut app).await;

    let screen = render(&mut app, &mut terminal);
    assert!(screen.contains("Something went wrong..."));
    assert!(!screen.contains("boom"));

    // Nothing to select
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.selected(), None);
  }

  #[tokio::test]
  async fn test_refresh_fetches_visible_key_again() {
    let source = StubSource::new();
    let listing_calls = source.listing_calls.clone();
    let mut app = App::new(Config::default(), Arc::new(source));
    let mut terminal = terminal();
    render(&mut app, &mut terminal);
    settle(&mut app).await;

    press(&mut app, KeyCode::Char('r'));
    let screen = render(&mut app, &mut terminal);
    assert!(screen.contains("Loading..."));

    settle(&mut app).await;
    let screen = render(&mut app, &mut terminal);
    assert!(screen.contains("1. bulbasaur"));
    assert_eq!(listing_calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn test_round_trips_keep_one_listing_subscriber() {
    let mut app = App::new(Config::default(), Arc::new(StubSource::new()));
    app.cache.resolve(&QueryKey::Listing);
    settle(&mut app).await;

    for _ in 0..500 {
      app.apply(ViewAction::Select("bulbasaur".to_string()));
      app.apply(ViewAction::Back);
    }

    assert!(app.cache.subscriber_count(&QueryKey::Listing) <= 1);
    assert!(app.cache.subscriber_count(&QueryKey::Detail("bulbasaur".to_string())) <= 1);
    assert!(!app.should_quit);
  }

  #[tokio::test]
  async fn test_back_from_overview_quits() {
    let mut app = App::new(Config::default(), Arc::new(StubSource::new()));
    press(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit);
  }

  #[tokio::test]
  async fn test_ctrl_c_quits_from_details() {
    let mut app = App::new(Config::default(), Arc::new(StubSource::new()));
    app.apply(ViewAction::Select("bulbasaur".to_string()));
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);
  }

  #[test]
  fn test_source_label() {
    let offline = Config {
      source: SourceKind::Fixture,
      ..Config::default()
    };
    let app = App::new(offline, Arc::new(FixtureSource::new()));
    assert_eq!(app.source_label(), "offline");

    let app = App::new(Config::default(), Arc::new(FixtureSource::new()));
    assert_eq!(app.source_label(), "pokeapi.co");
  }
}
