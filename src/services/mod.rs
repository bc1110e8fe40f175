pub mod browse_session;
pub mod catalog;
pub mod config;
pub mod config_manager;
pub mod debounce;
pub mod error;
pub mod query_codec;
pub mod url_sync;
pub mod view_cache;
pub mod view_engine;

pub use browse_session::BrowseSession;
pub use catalog::{Catalog, JsonFileSource, RecordSource, StaticSource};
pub use config::{BrowseConfig, ViewCacheConfig};
pub use config_manager::ConfigManager;
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE_WINDOW};
pub use error::BrowseError;
pub use query_codec::QueryCodec;
pub use url_sync::{build_url, UrlSync};
pub use view_cache::ViewCache;
pub use view_engine::{apply_view, apply_view_indices, facet_options, FacetOption, Neighbors};
