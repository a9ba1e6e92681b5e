//! Pure mapping from a cache entry to what a view should show.
//!
//! Each function returns exactly one of loading, failure or ready; drawing is
//! left to the views.

use crate::pokeapi::types::{Detail, Listing};
use crate::query::{CacheEntry, Payload, QueryState};
use crate::ui::renderfns::join_conjunction;

pub const LOADING_TEXT: &str = "Loading...";
pub const FAILURE_TEXT: &str = "Something went wrong...";

/// What a view shows for its entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen<T> {
  /// Entry is uninitialized or loading
  Loading,
  /// Fetch failed; the error itself is not shown
  Failure,
  /// Fetch succeeded
  Ready(T),
}

/// One selectable row of the overview list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
  /// 1-indexed
  pub position: usize,
  pub name: String,
}

/// Picture reference for the detail sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
  Url { src: String, alt: String },
  Missing { alt: String },
}

/// Key/value rendering of a creature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSheet {
  pub name: String,
  pub id: u32,
  pub height: u32,
  pub weight: u32,
  pub image: ImageRef,
  /// Type names joined as "a, b and c"
  pub types: String,
  pub primary_type: Option<String>,
}

fn screen_for<T>(entry: &CacheEntry, project: impl FnOnce(&Payload) -> Option<T>) -> Screen<T> {
  match entry.state() {
    QueryState::Uninitialized | QueryState::Loading => Screen::Loading,
    QueryState::Error(_) => Screen::Failure,
    // A payload of the wrong shape cannot be shown either
    QueryState::Success(payload) => project(payload).map_or(Screen::Failure, Screen::Ready),
  }
}

pub fn listing_screen(entry: &CacheEntry) -> Screen<Vec<ListRow>> {
  screen_for(entry, |payload| match payload {
    Payload::Listing(listing) => Some(list_rows(listing)),
    Payload::Detail(_) => None,
  })
}

pub fn detail_screen(entry: &CacheEntry) -> Screen<DetailSheet> {
  screen_for(entry, |payload| match payload {
    Payload::Detail(detail) => Some(detail_sheet(detail)),
    Payload::Listing(_) => None,
  })
}

fn list_rows(listing: &Listing) -> Vec<ListRow> {
  listing
    .results
    .iter()
    .enumerate()
    .map(|(i, entry)| ListRow {
      position: i + 1,
      name: entry.name.clone(),
    })
    .collect()
}

fn detail_sheet(detail: &Detail) -> DetailSheet {
  let type_names = detail.type_names();
  let image = match &detail.image_url {
    Some(src) => ImageRef::Url {
      src: src.clone(),
      alt: detail.name.clone(),
    },
    None => ImageRef::Missing {
      alt: detail.name.clone(),
    },
  };

  DetailSheet {
    name: detail.name.clone(),
    id: detail.id,
    height: detail.height,
    weight: detail.weight,
    image,
    types: join_conjunction(type_names.as_slice()),
    primary_type: type_names.first().map(|t| t.to_string()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pokeapi::types::{ListingEntry, TypeSlot};
  use crate::pokeapi::FixtureSource;
  use crate::query::tests::StubSource;
  use crate::query::{QueryCache, QueryKey};
  use std::sync::Arc;
  use std::time::Duration;

  async fn settled(source: StubSource, key: QueryKey) -> CacheEntry {
    let mut cache = QueryCache::new(Arc::new(source));
    cache.resolve(&key);
    tokio::time::timeout(Duration::from_secs(1), cache.completed())
      .await
      .unwrap();
    cache.peek(&key).unwrap().clone()
  }

  fn detail_with_types(names: &[&str]) -> Detail {
    Detail {
      types: names
        .iter()
        .enumerate()
        .map(|(i, name)| TypeSlot {
          slot: i as u32 + 1,
          type_name: name.to_string(),
        })
        .collect(),
      ..FixtureSource::detail().unwrap()
    }
  }

  #[test]
  fn test_uninitialized_entry_is_loading() {
    let entry = CacheEntry::default();
    assert_eq!(listing_screen(&entry), Screen::Loading);
    assert_eq!(detail_screen(&entry), Screen::Loading);
  }

  #[tokio::test]
  async fn test_loading_entry_is_loading() {
    let (source, _gate) = StubSource::gated();
    let mut cache = QueryCache::new(Arc::new(source));
    let entry = cache.resolve(&QueryKey::Listing);
    assert_eq!(listing_screen(entry), Screen::Loading);
  }

  #[tokio::test]
  async fn test_failed_fetch_shows_failure() {
    let entry = settled(StubSource::failing(), QueryKey::Listing).await;
    assert_eq!(listing_screen(&entry), Screen::Failure);
  }

  #[tokio::test]
  async fn test_wrong_payload_shape_shows_failure() {
    let entry = settled(StubSource::new(), QueryKey::Listing).await;
    assert_eq!(detail_screen(&entry), Screen::Failure);
  }

  #[tokio::test]
  async fn test_listing_rows_are_one_indexed_in_order() {
    let entry = settled(StubSource::new(), QueryKey::Listing).await;

    let rows = match listing_screen(&entry) {
      Screen::Ready(rows) => rows,
      other => panic!("expected rows, got {:?}", other),
    };

    assert_eq!(rows.len(), 9);
    assert_eq!(
      rows[0],
      ListRow {
        position: 1,
        name: "bulbasaur".to_string()
      }
    );
    assert_eq!(rows[8].position, 9);
    assert_eq!(rows[8].name, "blastoise");
  }

  #[tokio::test]
  async fn test_empty_listing_is_ready_with_no_rows() {
    let listing = Listing {
      count: 0,
      next: None,
      previous: None,
      results: Vec::<ListingEntry>::new(),
    };
    let entry = settled(StubSource::with_listing(listing), QueryKey::Listing).await;

    assert_eq!(listing_screen(&entry), Screen::Ready(Vec::new()));
  }

  #[tokio::test]
  async fn test_detail_sheet_fields() {
    let entry = settled(StubSource::new(), QueryKey::Detail("bulbasaur".to_string())).await;

    let sheet = match detail_screen(&entry) {
      Screen::Ready(sheet) => sheet,
      other => panic!("expected sheet, got {:?}", other),
    };

    assert_eq!(sheet.id, 1);
    assert_eq!(sheet.height, 7);
    assert_eq!(sheet.weight, 69);
    assert_eq!(sheet.types, "grass and poison");
    assert_eq!(sheet.primary_type.as_deref(), Some("grass"));
    assert_eq!(
      sheet.image,
      ImageRef::Url {
        src: "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/1.png"
          .to_string(),
        alt: "bulbasaur".to_string(),
      }
    );
  }

  #[test]
  fn test_types_follow_slot_order() {
    let mut detail = detail_with_types(&["grass", "poison"]);
    detail.types.reverse();

    let sheet = detail_sheet(&detail);
    assert_eq!(sheet.types, "grass and poison");
    assert_eq!(sheet.primary_type.as_deref(), Some("grass"));
  }

  #[test]
  fn test_single_type_has_no_conjunction() {
    let sheet = detail_sheet(&detail_with_types(&["grass"]));
    assert_eq!(sheet.types, "grass");
  }

  #[test]
  fn test_no_types_and_no_image() {
    let detail = Detail {
      image_url: None,
      ..detail_with_types(&[])
    };

    let sheet = detail_sheet(&detail);

    assert_eq!(sheet.types, "");
    assert_eq!(sheet.primary_type, None);
    assert_eq!(
      sheet.image,
      ImageRef::Missing {
        alt: "bulbasaur".to_string()
      }
    );
  }
}
