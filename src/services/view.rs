//! Sort and pagination derivation over the aggregate.
//!
//! Everything here is pure and synchronous: the aggregate is never mutated.

use std::cmp::Ordering;

use crate::models::{Character, PageSize, SortKey, SortOrder};

/// Case-insensitive lexicographic comparison.
fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Stable sort of `records` by `key` and `order`.
///
/// [`SortKey::None`] keeps arrival order. Equal keys keep their relative order in
/// both directions.
pub fn sort_records<'a>(
    records: &'a [Character],
    key: SortKey,
    order: SortOrder,
) -> Vec<&'a Character> {
    let mut sorted: Vec<&Character> = records.iter().collect();
    let compare: fn(&Character, &Character) -> Ordering = match key {
        SortKey::None => return sorted,
        SortKey::Name => |a, b| cmp_ignore_case(&a.name, &b.name),
        SortKey::Id => |a, b| a.id.cmp(&b.id),
    };
    match order {
        SortOrder::Asc => sorted.sort_by(|a, b| compare(a, b)),
        SortOrder::Desc => sorted.sort_by(|a, b| compare(b, a)),
    }
    sorted
}

/// Number of client pages, never less than one.
pub fn total_pages(total_items: usize, page_size: PageSize) -> u32 {
    let size = page_size.get() as usize;
    total_items.div_ceil(size).max(1) as u32
}

/// Clamp a 1-based page into `1..=total_pages`.
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

/// Items of the 1-based `page`; empty when the page lies past the end.
pub fn page_slice<T>(items: &[T], page: u32, page_size: PageSize) -> &[T] {
    let size = page_size.get() as usize;
    let start = (page.max(1) as usize - 1).saturating_mul(size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + size).min(items.len());
    &items[start..end]
}

/// One derived page of the aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedPage {
    pub items: Vec<Character>,
    /// Page actually shown, after clamping.
    pub page: u32,
    pub total_pages: u32,
    pub total_items: usize,
}

/// Sort then paginate, clamping the requested page into range.
pub fn derive_page(
    records: &[Character],
    key: SortKey,
    order: SortOrder,
    page: u32,
    page_size: PageSize,
) -> DerivedPage {
    let sorted = sort_records(records, key, order);
    let total_pages = total_pages(sorted.len(), page_size);
    let page = clamp_page(page, total_pages);
    let items = page_slice(&sorted, page, page_size)
        .iter()
        .map(|c| (*c).clone())
        .collect();

    DerivedPage {
        items,
        page,
        total_pages,
        total_items: sorted.len(),
    }
}
