//! Fetch-all-pages loop.
//!
//! The remote API serves a fixed page size, so the client assembles the full
//! filtered result set itself before applying its own page size.

use tracing::{debug, info};

use super::character_api::CharacterSource;
use crate::error::RemoteResult;
use crate::models::{Aggregate, FilterSet};

/// Fetch every page matching `filters`, in page order.
///
/// Pages are requested one at a time; whether page `n + 1` is requested depends on
/// page `n`'s `next` indicator. Any failure aborts the loop and no partial result is
/// returned. With `max_records` set, the loop stops once the cap is reached and the
/// aggregate is marked truncated if more pages remained.
pub async fn fetch_all_pages(
    source: &dyn CharacterSource,
    filters: &FilterSet,
    max_records: Option<usize>,
) -> RemoteResult<Aggregate> {
    let mut aggregate = Aggregate::default();
    let mut page = 1;

    loop {
        let result = source.fetch_page(page, filters).await?;
        if page == 1 {
            aggregate.reported_count = result.info.count;
        }
        let has_next = result.info.has_next();
        debug!(
            "Fetched page {}/{} ({} records, filters: {})",
            page,
            result.info.pages,
            result.results.len(),
            filters
        );
        aggregate.records.extend(result.results);

        if let Some(cap) = max_records
            && aggregate.records.len() >= cap
        {
            aggregate.truncated = has_next || aggregate.records.len() > cap;
            aggregate.records.truncate(cap);
            if aggregate.truncated {
                info!(
                    "Record cap of {} reached, stopped after page {} of {}",
                    cap, page, result.info.pages
                );
            }
            break;
        }

        if !has_next {
            break;
        }
        page += 1;
    }

    Ok(aggregate)
}
