//! Fetching, aggregation and view derivation services.

pub mod aggregator;
pub mod character_api;
pub mod debounce;
pub mod engine;
pub mod event_broadcaster;
pub mod view;

pub use aggregator::fetch_all_pages;
pub use character_api::{CharacterSource, HttpCharacterSource};
pub use debounce::Debouncer;
pub use engine::{CatalogEngine, CatalogView, EngineSettings, FetchStatus};
pub use event_broadcaster::EventBroadcaster;
