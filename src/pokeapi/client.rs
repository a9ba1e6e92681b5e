use crate::config::ApiConfig;
use crate::pokeapi::api_types::{ApiListingResponse, ApiPokemon};
use crate::pokeapi::source::{DataSource, FetchError};
use crate::pokeapi::types::{Detail, Listing};
use color_eyre::{eyre::eyre, Result};
use futures::future::{BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use url::Url;

/// PokeAPI HTTP client
#[derive(Clone)]
pub struct PokeApiClient {
  http: reqwest::Client,
  base_url: Url,
  page_size: u32,
}

impl PokeApiClient {
  pub fn new(config: &ApiConfig) -> Result<Self> {
    let base_url = Url::parse(&config.base_url)
      .map_err(|e| eyre!("Invalid API base URL '{}': {}", config.base_url, e))?;

    if base_url.cannot_be_a_base() {
      return Err(eyre!("API base URL cannot be a base: {}", config.base_url));
    }

    let http = reqwest::Client::builder()
      .user_agent(concat!("pokedex/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      base_url,
      page_size: config.page_size,
    })
  }

  /// Build `{base_url}/{segments...}`, tolerating a trailing slash on the base
  fn endpoint(&self, segments: &[&str]) -> Result<Url> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|_| eyre!("API base URL cannot be a base: {}", self.base_url))?
      .pop_if_empty()
      .extend(segments);
    Ok(url)
  }

  /// Get the first page of the catalog
  pub async fn get_listing(&self) -> Result<Listing> {
    let mut url = self.endpoint(&["pokemon"])?;
    url
      .query_pairs_mut()
      .append_pair("limit", &self.page_size.to_string());

    let response: ApiListingResponse = self.get_json(url).await?;
    let listing = Listing::from(response);
    tracing::debug!(
      count = listing.count,
      next = ?listing.next,
      previous = ?listing.previous,
      "listing page fetched"
    );
    Ok(listing)
  }

  /// Get a single creature by name or id
  pub async fn get_pokemon(&self, name_or_id: &str) -> Result<Detail> {
    let name = name_or_id.trim().to_lowercase();
    if name.is_empty() {
      return Err(eyre!("Creature name must not be empty"));
    }

    let url = self.endpoint(&["pokemon", &name])?;
    let response: ApiPokemon = self.get_json(url).await?;
    Ok(response.into())
  }

  async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
    tracing::debug!(%url, "GET");

    let response = self
      .http
      .get(url.clone())
      .send()
      .await
      .map_err(|e| eyre!("Request to {} failed: {}", url, e))?;

    let status = response.status();
    if !status.is_success() {
      return Err(eyre!("HTTP {} for {}", status.as_u16(), url));
    }

    response
      .json::<T>()
      .await
      .map_err(|e| eyre!("Failed to parse response from {}: {}", url, e))
  }
}

impl DataSource for PokeApiClient {
  fn fetch_listing(&self) -> BoxFuture<'static, Result<Listing, FetchError>> {
    let client = self.clone();
    async move { client.get_listing().await.map_err(FetchError::from) }.boxed()
  }

  fn fetch_detail(&self, name_or_id: &str) -> BoxFuture<'static, Result<Detail, FetchError>> {
    let client = self.clone();
    let name = name_or_id.to_string();
    async move { client.get_pokemon(&name).await.map_err(FetchError::from) }.boxed()
  }
}
