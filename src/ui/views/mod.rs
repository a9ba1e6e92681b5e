mod detail;
mod listing;

pub use detail::DetailView;
pub use listing::ListingView;
