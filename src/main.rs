mod app;
mod config;
mod event;
mod logging;
mod pokeapi;
mod query;
mod ui;

use clap::Parser;
use color_eyre::Result;
use config::SourceKind;
use pokeapi::{DataSource, FixtureSource, PokeApiClient};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "A terminal Pokedex backed by the PokeAPI catalog")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/pokedex/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Use built-in data instead of the network
  #[arg(long)]
  offline: bool,

  /// PokeAPI base URL
  #[arg(long)]
  base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Command line overrides
  if args.offline {
    config.source = SourceKind::Fixture;
  }
  if let Some(base_url) = args.base_url {
    config.api.base_url = base_url;
  }

  let _log_guard = logging::init()?;

  let source: Arc<dyn DataSource> = match config.source {
    SourceKind::Live => Arc::new(PokeApiClient::new(&config.api)?),
    SourceKind::Fixture => Arc::new(FixtureSource::new()),
  };
  tracing::info!(source = ?config.source, base_url = %config.api.base_url, "starting");

  // Initialize and run the app
  let mut app = app::App::new(config, source);
  app.run().await?;

  Ok(())
}
