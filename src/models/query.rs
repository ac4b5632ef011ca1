//! User-mutable query state: filters, sort and client-side page size.

use serde::{Deserialize, Serialize};

use super::{CharacterStatus, Gender};
use crate::error::QueryError;

/// Filter values forwarded to the remote API.
///
/// An empty string or `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    /// Name substring.
    pub name: String,
    pub status: Option<CharacterStatus>,
    /// Species substring.
    pub species: String,
    pub gender: Option<Gender>,
}

impl FilterSet {
    /// True when no filter constrains the result.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.status.is_none()
            && self.species.is_empty()
            && self.gender.is_none()
    }

    /// Query parameters for the non-empty filters, in a fixed order.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::with_capacity(4);
        if !self.name.is_empty() {
            pairs.push(("name", self.name.as_str()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_query_value()));
        }
        if !self.species.is_empty() {
            pairs.push(("species", self.species.as_str()));
        }
        if let Some(gender) = self.gender {
            pairs.push(("gender", gender.as_query_value()));
        }
        pairs
    }
}

impl std::fmt::Display for FilterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "(none)");
        }
        let rendered = self
            .query_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{}", rendered)
    }
}

/// Field the derived view is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Arrival order.
    #[default]
    None,
    Name,
    Id,
}

impl SortKey {
    pub fn parse(s: &str) -> Result<Self, QueryError> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "name" => Ok(Self::Name),
            "id" => Ok(Self::Id),
            other => Err(QueryError::UnknownSortKey(other.to_string())),
        }
    }
}

/// Ordering direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Result<Self, QueryError> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(QueryError::UnknownSortOrder(other.to_string())),
        }
    }
}

/// Client-side page size, one of [`PageSize::ALLOWED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    pub const ALLOWED: [u32; 6] = [5, 10, 20, 50, 100, 250];

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(20)
    }
}

impl TryFrom<u32> for PageSize {
    type Error = QueryError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if Self::ALLOWED.contains(&value) {
            Ok(Self(value))
        } else {
            Err(QueryError::InvalidPageSize(value))
        }
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

/// Full query state owned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub filters: FilterSet,
    pub sort_by: SortKey,
    /// Only meaningful while `sort_by` is not [`SortKey::None`].
    pub sort_order: SortOrder,
    pub page_size: PageSize,
    /// 1-based.
    pub page: u32,
}

impl QueryState {
    pub fn with_page_size(page_size: PageSize) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            filters: FilterSet::default(),
            sort_by: SortKey::None,
            sort_order: SortOrder::Asc,
            page_size: PageSize::default(),
            page: 1,
        }
    }
}
