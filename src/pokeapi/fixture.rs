//! Static stand-in for the live API, used with `--offline`.
//!
//! Data is a copy of `GET /pokemon?limit=9` and a partial copy of
//! `GET /pokemon/1`. Every detail lookup returns the same record.

use futures::future::{self, BoxFuture, FutureExt};

use super::api_types::{ApiListingResponse, ApiPokemon};
use super::source::{DataSource, FetchError};
use super::types::{Detail, Listing};

const LISTING_JSON: &str = include_str!("fixtures/listing.json");
const DETAIL_JSON: &str = include_str!("fixtures/detail.json");

/// Fixed listing/detail pair served without network access
#[derive(Debug, Clone, Default)]
pub struct FixtureSource;

impl FixtureSource {
  pub fn new() -> Self {
    Self
  }

  pub fn listing() -> Result<Listing, FetchError> {
    serde_json::from_str::<ApiListingResponse>(LISTING_JSON)
      .map(Listing::from)
      .map_err(|e| FetchError::new(format!("Invalid listing fixture: {}", e)))
  }

  pub fn detail() -> Result<Detail, FetchError> {
    serde_json::from_str::<ApiPokemon>(DETAIL_JSON)
      .map(Detail::from)
      .map_err(|e| FetchError::new(format!("Invalid detail fixture: {}", e)))
  }
}

impl DataSource for FixtureSource {
  fn fetch_listing(&self) -> BoxFuture<'static, Result<Listing, FetchError>> {
    future::ready(Self::listing()).boxed()
  }

  fn fetch_detail(&self, _name_or_id: &str) -> BoxFuture<'static, Result<Detail, FetchError>> {
    future::ready(Self::detail()).boxed()
  }
}
