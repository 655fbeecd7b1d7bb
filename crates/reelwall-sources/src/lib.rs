pub mod error;
pub mod factory;
pub mod proxy;
pub mod tmdb;
pub mod traits;

pub use error::SourceError;
pub use factory::build_source;
pub use proxy::{ProxyClient, RuntimeResponse};
pub use tmdb::TmdbClient;
pub use traits::MetadataSource;
