pub mod api_types;
pub mod client;
pub mod fixture;
pub mod source;
pub mod types;

pub use client::PokeApiClient;
pub use fixture::FixtureSource;
pub use source::{DataSource, FetchError};
