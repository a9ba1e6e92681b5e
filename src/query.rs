//! Shared query cache for data fetching.
//!
//! Inspired by TanStack Query / RTK Query, this module provides a `QueryCache`
//! that maps a `QueryKey` to a `CacheEntry` and owns the whole request
//! lifecycle. Every view that resolves the same key sees the same entry.
//!
//! # Example
//!
//! ```ignore
//! let mut cache = QueryCache::new(Arc::new(FixtureSource::new()));
//! let mut updates = cache.subscribe(QueryKey::Listing);
//!
//! // First resolve issues the fetch, later ones return the memoized entry
//! cache.resolve(&QueryKey::Listing);
//!
//! // In the event loop
//! if let Some(key) = cache.completed().await {
//!     // Entry for `key` changed, trigger re-render
//! }
//!
//! // In render
//! match cache.resolve(&QueryKey::Listing).state() {
//!     QueryState::Uninitialized | QueryState::Loading => render_spinner(),
//!     QueryState::Success(payload) => render_data(payload),
//!     QueryState::Error(_) => render_error(),
//! }
//! ```

use crate::pokeapi::types::{Detail, Listing};
use crate::pokeapi::{DataSource, FetchError};
use futures::future::{BoxFuture, FutureExt, TryFutureExt};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Kinds of remote query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
  List,
  Details,
}

impl Endpoint {
  pub fn name(self) -> &'static str {
    match self {
      Endpoint::List => "pokemonList",
      Endpoint::Details => "pokemonDetails",
    }
  }
}

/// Cache address: an endpoint plus its argument
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
  /// First catalog page
  Listing,
  /// One creature, by name or id
  Detail(String),
}

impl QueryKey {
  pub fn endpoint(&self) -> Endpoint {
    match self {
      QueryKey::Listing => Endpoint::List,
      QueryKey::Detail(_) => Endpoint::Details,
    }
  }
}

impl fmt::Display for QueryKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      QueryKey::Listing => write!(f, "{}", self.endpoint().name()),
      QueryKey::Detail(name) => write!(f, "{}({})", self.endpoint().name(), name),
    }
  }
}

/// Result shape of each endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
  Listing(Listing),
  Detail(Detail),
}

/// Status of an entry, without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Uninitialized,
  Loading,
  Success,
  Error,
}

/// The state of a query
#[derive(Debug, Clone, Default)]
pub enum QueryState {
  /// Entry exists but no fetch has been issued
  #[default]
  Uninitialized,
  /// A fetch is in flight
  Loading,
  /// Fetch completed successfully
  Success(Payload),
  /// Fetch failed
  Error(FetchError),
}

impl QueryState {
  pub fn status(&self) -> Status {
    match self {
      QueryState::Uninitialized => Status::Uninitialized,
      QueryState::Loading => Status::Loading,
      QueryState::Success(_) => Status::Success,
      QueryState::Error(_) => Status::Error,
    }
  }
}

/// Per-key record of fetch status, data and error
#[derive(Debug, Clone, Default)]
pub struct CacheEntry {
  state: QueryState,
  /// Logical timestamp of the fetch that owns this entry
  requested_at: u64,
}

impl CacheEntry {
  pub fn state(&self) -> &QueryState {
    &self.state
  }

  pub fn status(&self) -> Status {
    self.state.status()
  }

  pub fn is_loading(&self) -> bool {
    matches!(self.state, QueryState::Loading)
  }

  pub fn data(&self) -> Option<&Payload> {
    match &self.state {
      QueryState::Success(payload) => Some(payload),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&FetchError> {
    match &self.state {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }

  pub fn requested_at(&self) -> u64 {
    self.requested_at
  }
}

/// A finished fetch travelling back to the cache
struct Completion {
  key: QueryKey,
  requested_at: u64,
  result: Result<Payload, FetchError>,
}

/// Receives every status transition of one key.
///
/// Dropping the subscription unsubscribes.
#[derive(Debug)]
pub struct Subscription {
  key: QueryKey,
  rx: mpsc::UnboundedReceiver<Status>,
}

impl Subscription {
  pub fn key(&self) -> &QueryKey {
    &self.key
  }

  /// Drain pending transitions, returning the most recent one
  pub fn latest(&mut self) -> Option<Status> {
    let mut last = None;
    while let Ok(status) = self.rx.try_recv() {
      last = Some(status);
    }
    last
  }
}

/// Process-wide query store.
///
/// All mutation happens on the task that owns the cache. Fetches run as
/// spawned tasks that only report back through a channel; `poll()` or
/// `completed()` applies their results.
pub struct QueryCache {
  source: Arc<dyn DataSource>,
  entries: HashMap<QueryKey, CacheEntry>,
  subscribers: HashMap<QueryKey, Vec<mpsc::UnboundedSender<Status>>>,
  completions_tx: mpsc::UnboundedSender<Completion>,
  completions_rx: mpsc::UnboundedReceiver<Completion>,
  clock: u64,
}

impl QueryCache {
  pub fn new(source: Arc<dyn DataSource>) -> Self {
    let (completions_tx, completions_rx) = mpsc::unbounded_channel();
    Self {
      source,
      entries: HashMap::new(),
      subscribers: HashMap::new(),
      completions_tx,
      completions_rx,
      clock: 0,
    }
  }

  /// Return the entry for `key`, issuing its fetch if the key is new.
  ///
  /// An existing entry is returned unchanged whatever its status: a loading
  /// key is never fetched twice and finished keys are never revalidated.
  pub fn resolve(&mut self, key: &QueryKey) -> &CacheEntry {
    if !self.entries.contains_key(key) {
      self.entries.insert(key.clone(), CacheEntry::default());
      self.start_fetch(key);
    }
    self.entries.entry(key.clone()).or_default()
  }

  /// Read the entry for `key` without side effects
  pub fn peek(&self, key: &QueryKey) -> Option<&CacheEntry> {
    self.entries.get(key)
  }

  /// Forget the entry for `key` so the next `resolve` fetches again.
  ///
  /// A fetch still in flight for the old entry completes but is discarded.
  pub fn invalidate(&mut self, key: &QueryKey) -> bool {
    let Some(entry) = self.entries.remove(key) else {
      return false;
    };
    tracing::debug!(key = %key, requested_at = entry.requested_at(), "entry invalidated");
    self.publish(key, Status::Uninitialized);
    true
  }

  /// Register interest in every status transition of `key`
  pub fn subscribe(&mut self, key: QueryKey) -> Subscription {
    let (tx, rx) = mpsc::unbounded_channel();
    let senders = self.subscribers.entry(key.clone()).or_default();
    // Settled keys never publish again, so drop dead senders here too
    senders.retain(|tx| !tx.is_closed());
    senders.push(tx);
    Subscription { key, rx }
  }

  #[cfg(test)]
  pub(crate) fn subscriber_count(&self, key: &QueryKey) -> usize {
    self.subscribers.get(key).map_or(0, Vec::len)
  }

  /// Apply every finished fetch without waiting.
  ///
  /// Returns the keys whose entries changed.
  pub fn poll(&mut self) -> Vec<QueryKey> {
    let mut changed = Vec::new();
    while let Ok(completion) = self.completions_rx.try_recv() {
      if let Some(key) = self.apply(completion) {
        changed.push(key);
      }
    }
    changed
  }

  /// Wait for the next finished fetch and apply it.
  ///
  /// Cancel safe: nothing is lost if the future is dropped before it resolves.
  pub async fn completed(&mut self) -> Option<QueryKey> {
    loop {
      let completion = self.completions_rx.recv().await?;
      if let Some(key) = self.apply(completion) {
        return Some(key);
      }
    }
  }

  /// Internal: move an entry to loading and spawn its fetch
  fn start_fetch(&mut self, key: &QueryKey) {
    self.clock += 1;
    let requested_at = self.clock;

    if let Some(entry) = self.entries.get_mut(key) {
      entry.state = QueryState::Loading;
      entry.requested_at = requested_at;
    }

    let fetch: BoxFuture<'static, Result<Payload, FetchError>> = match key {
      QueryKey::Listing => self.source.fetch_listing().map_ok(Payload::Listing).boxed(),
      QueryKey::Detail(name) => self
        .source
        .fetch_detail(name)
        .map_ok(Payload::Detail)
        .boxed(),
    };

    let tx = self.completions_tx.clone();
    let task_key = key.clone();
    tokio::spawn(async move {
      let result = fetch.await;
      // Ignore send errors - the cache may have been dropped
      let _ = tx.send(Completion {
        key: task_key,
        requested_at,
        result,
      });
    });

    tracing::debug!(key = %key, requested_at, "fetch issued");
    self.publish(key, Status::Loading);
  }

  /// Internal: store a finished fetch, returning its key if the entry changed
  fn apply(&mut self, completion: Completion) -> Option<QueryKey> {
    let Completion {
      key,
      requested_at,
      result,
    } = completion;

    let entry = match self.entries.get_mut(&key) {
      Some(entry) if entry.is_loading() && entry.requested_at == requested_at => entry,
      _ => {
        tracing::debug!(key = %key, requested_at, "discarding stale completion");
        return None;
      }
    };

    entry.state = match result {
      Ok(payload) => QueryState::Success(payload),
      Err(error) => QueryState::Error(error),
    };
    if let Some(error) = entry.error() {
      tracing::warn!(key = %key, error = error.message(), "fetch failed");
    }
    let status = entry.status();

    tracing::debug!(key = %key, ?status, "entry updated");
    self.publish(&key, status);
    Some(key)
  }

  /// Internal: notify subscribers of `key`, pruning dropped ones
  fn publish(&mut self, key: &QueryKey, status: Status) {
    if let Some(senders) = self.subscribers.get_mut(key) {
      senders.retain(|tx| tx.send(status).is_ok());
      if senders.is_empty() {
        self.subscribers.remove(key);
      }
    }
  }
}

impl fmt::Debug for QueryCache {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("QueryCache")
      .field("entries", &self.entries)
      .field("clock", &self.clock)
      .finish_non_exhaustive()
  }
}
