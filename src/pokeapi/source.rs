//! The contract the query cache fetches through.

use color_eyre::Report;
use futures::future::BoxFuture;
use std::fmt;

use super::types::{Detail, Listing};

/// The single failure kind a fetch can produce.
///
/// Network errors, missing resources and malformed bodies all collapse into
/// this one value; only the message differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
  message: String,
}

impl FetchError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }

  pub fn message(&self) -> &str {
    &self.message
  }
}

impl fmt::Display for FetchError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "fetch failed: {}", self.message)
  }
}

impl std::error::Error for FetchError {}

impl From<Report> for FetchError {
  fn from(report: Report) -> Self {
    Self::new(report.to_string())
  }
}

/// Where creature data comes from.
///
/// Implementations must be interchangeable: the cache and the views never
/// know whether they are talking to the network or to fixtures.
pub trait DataSource: Send + Sync {
  /// Fetch the first page of the catalog
  fn fetch_listing(&self) -> BoxFuture<'static, Result<Listing, FetchError>>;

  /// Fetch details for a creature by name or numeric id
  fn fetch_detail(&self, name_or_id: &str) -> BoxFuture<'static, Result<Detail, FetchError>>;
}
