pub mod media;
pub mod runtime;
pub mod watchlist;

pub use media::{MediaKind, MediaSummary};
pub use runtime::RuntimeBreakdown;
pub use watchlist::WatchListEntry;
