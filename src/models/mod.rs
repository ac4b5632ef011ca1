//! Domain models for the character catalog.

pub mod character;
pub mod event;
pub mod page;
pub mod query;

// Re-export commonly used types
pub use character::{Character, CharacterStatus, Gender, LocationRef};
pub use event::EngineEvent;
pub use page::{Aggregate, PageInfo, PageResult};
pub use query::{FilterSet, PageSize, QueryState, SortKey, SortOrder};
