/// One page of the creature catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
  pub count: u32,
  pub next: Option<String>,
  pub previous: Option<String>,
  pub results: Vec<ListingEntry>,
}

/// A catalog row: the creature's name and the URL of its detail resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
  pub name: String,
  pub reference_url: String,
}

/// Full creature details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
  pub id: u32,
  pub name: String,
  pub height: u32,
  pub weight: u32,
  pub types: Vec<TypeSlot>,
  pub image_url: Option<String>,
}

/// Elemental type in its display slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSlot {
  pub slot: u32,
  pub type_name: String,
}

impl Detail {
  /// Type names ordered by slot, primary type first
  pub fn type_names(&self) -> Vec<&str> {
    let mut slots: Vec<&TypeSlot> = self.types.iter().collect();
    slots.sort_by_key(|t| t.slot);
    slots.into_iter().map(|t| t.type_name.as_str()).collect()
  }
}
