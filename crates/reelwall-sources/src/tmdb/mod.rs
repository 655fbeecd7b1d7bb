pub mod client;
pub mod records;

pub use client::TmdbClient;
pub use records::{runtime_minutes, summaries_from_payload, ImageUrls, RawMediaRecord};
