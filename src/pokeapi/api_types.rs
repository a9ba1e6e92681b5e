//! Serde-deserializable types matching PokeAPI responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on application needs.

use serde::Deserialize;

use super::types::{Detail, Listing, ListingEntry, TypeSlot};

// ============================================================================
// Listing endpoint: GET /pokemon?limit=N
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiNamedResource {
  pub name: String,
  pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiListingResponse {
  pub count: u32,
  pub next: Option<String>,
  pub previous: Option<String>,
  #[serde(default)]
  pub results: Vec<ApiNamedResource>,
}

impl From<ApiListingResponse> for Listing {
  fn from(response: ApiListingResponse) -> Self {
    Listing {
      count: response.count,
      next: response.next,
      previous: response.previous,
      results: response
        .results
        .into_iter()
        .map(|r| ListingEntry {
          name: r.name,
          reference_url: r.url,
        })
        .collect(),
    }
  }
}

// ============================================================================
// Detail endpoint: GET /pokemon/{name-or-id}
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiTypeSlot {
  pub slot: u32,
  #[serde(rename = "type")]
  pub type_ref: ApiNamedResource,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiSprites {
  pub front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiPokemon {
  pub id: u32,
  pub name: String,
  pub height: u32,
  pub weight: u32,
  #[serde(default)]
  pub types: Vec<ApiTypeSlot>,
  #[serde(default)]
  pub sprites: ApiSprites,
  // The real endpoint returns many more fields (abilities, moves, stats...)
  // which are ignored.
}

impl From<ApiPokemon> for Detail {
  fn from(pokemon: ApiPokemon) -> Self {
    Detail {
      id: pokemon.id,
      name: pokemon.name,
      height: pokemon.height,
      weight: pokemon.weight,
      types: pokemon
        .types
        .into_iter()
        .map(|t| TypeSlot {
          slot: t.slot,
          type_name: t.type_ref.name,
        })
        .collect(),
      image_url: pokemon.sprites.front_default,
    }
  }
}
