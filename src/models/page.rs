//! One page of results from the remote API and the assembled aggregate.

use serde::{Deserialize, Serialize};

use super::Character;

/// Pagination metadata returned with every page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Total number of records matching the filters.
    pub count: u32,
    /// Total number of remote pages.
    pub pages: u32,
    /// URL of the next page, `None` on the last page.
    pub next: Option<String>,
    /// URL of the previous page, `None` on the first page.
    pub prev: Option<String>,
}

impl PageInfo {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_prev(&self) -> bool {
        self.prev.is_some()
    }
}

/// One fetch outcome. Consumed by the aggregation loop, never retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub info: PageInfo,
    pub results: Vec<Character>,
}

/// Every record matching one filter generation, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub records: Vec<Character>,
    /// `count` reported by the remote on the first page.
    pub reported_count: u32,
    /// True when the record cap stopped the loop before the last page.
    pub truncated: bool,
}

impl Aggregate {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
