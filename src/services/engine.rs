//! Aggregation engine.
//!
//! Owns the query state, the aggregate and the fetch status. Filter changes go
//! through a debounced fetch sequence; sort and pagination changes only re-derive
//! the view. Each sequence is tagged with a generation, and a result whose
//! generation is no longer current is discarded on arrival.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::aggregator::fetch_all_pages;
use super::character_api::CharacterSource;
use super::debounce::Debouncer;
use super::event_broadcaster::EventBroadcaster;
use super::view::{self, derive_page};
use crate::error::{QueryError, RemoteResult};
use crate::models::{
    Aggregate, Character, CharacterStatus, EngineEvent, FilterSet, Gender, PageSize, QueryState,
    SortKey, SortOrder,
};

/// Engine tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Quiet window before a filter change starts a fetch sequence
    pub debounce: Duration,
    /// Initial page size
    pub page_size: PageSize,
    /// Optional cap on aggregated records
    pub max_records: Option<usize>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            page_size: PageSize::default(),
            max_records: None,
        }
    }
}

/// Status of the latest fetch sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Output contract consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogView {
    /// Current page slice
    pub items: Vec<Character>,
    pub status: FetchStatus,
    pub loading: bool,
    pub error: Option<String>,
    /// A filter change is waiting for its quiet window; `items` still belong
    /// to the previous filters
    pub refresh_pending: bool,
    /// Page shown, always within `1..=total_pages`
    pub page: u32,
    pub total_pages: u32,
    /// Records in the aggregate
    pub total_items: usize,
    /// The record cap cut the aggregate short
    pub truncated: bool,
    pub query: QueryState,
}

impl CatalogView {
    /// A sequence succeeded with nothing to show. False before the first load.
    pub fn is_empty_result(&self) -> bool {
        self.status == FetchStatus::Success && self.items.is_empty()
    }
}

struct EngineState {
    query: QueryState,
    aggregate: Aggregate,
    status: FetchStatus,
    error: Option<String>,
    generation: u64,
}

struct Shared {
    source: Arc<dyn CharacterSource>,
    settings: EngineSettings,
    state: Mutex<EngineState>,
    debouncer: Debouncer,
    events: EventBroadcaster,
}

/// Handle to the engine. Cheap to clone; all clones share one state.
#[derive(Clone)]
pub struct CatalogEngine {
    shared: Arc<Shared>,
}

impl CatalogEngine {
    /// Create an idle engine with an empty aggregate.
    ///
    /// Nothing is fetched until [`refresh`](Self::refresh) or a filter intent.
    pub fn new(source: Arc<dyn CharacterSource>, settings: EngineSettings) -> Self {
        let state = EngineState {
            query: QueryState::with_page_size(settings.page_size),
            aggregate: Aggregate::default(),
            status: FetchStatus::Idle,
            error: None,
            generation: 0,
        };
        let debouncer = Debouncer::new(settings.debounce);

        Self {
            shared: Arc::new(Shared {
                source,
                settings,
                state: Mutex::new(state),
                debouncer,
                events: EventBroadcaster::new(),
            }),
        }
    }

    /// Subscribe to engine events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<EngineEvent> {
        self.shared.events.subscribe()
    }

    // ========================================================================
    // Filter intents (debounced refetch)
    // ========================================================================

    /// Replace the name substring filter.
    pub fn set_name_filter(&self, name: impl Into<String>) {
        let name = name.into();
        self.update_filters(|f| f.name = name);
    }

    /// Replace the status filter; `None` matches every status.
    pub fn set_status_filter(&self, status: Option<CharacterStatus>) {
        self.update_filters(|f| f.status = status);
    }

    /// Replace the species substring filter.
    pub fn set_species_filter(&self, species: impl Into<String>) {
        let species = species.into();
        self.update_filters(|f| f.species = species);
    }

    /// Replace the gender filter; `None` matches every gender.
    pub fn set_gender_filter(&self, gender: Option<Gender>) {
        self.update_filters(|f| f.gender = gender);
    }

    /// Reset all four filters; refetches through the same debounced path.
    pub fn clear_filters(&self) {
        self.update_filters(|f| *f = FilterSet::default());
    }

    /// Schedule a debounced fetch sequence with the current filters.
    ///
    /// Used for the initial load and for user-triggered retries.
    pub fn refresh(&self) {
        self.schedule_sequence();
    }

    // ========================================================================
    // View intents (re-derivation only)
    // ========================================================================

    /// Set the sort key. Clearing it also resets the order to ascending.
    pub fn set_sort_by(&self, key: SortKey) {
        {
            let mut state = self.lock();
            state.query.sort_by = key;
            if key == SortKey::None {
                state.query.sort_order = SortOrder::Asc;
            }
        }
        self.view_changed();
    }

    /// Set the sort order. Rejected while no sort key is set.
    pub fn set_sort_order(&self, order: SortOrder) -> Result<(), QueryError> {
        {
            let mut state = self.lock();
            if state.query.sort_by == SortKey::None {
                return Err(QueryError::SortOrderWithoutKey);
            }
            state.query.sort_order = order;
        }
        self.view_changed();
        Ok(())
    }

    /// Back to arrival order.
    pub fn clear_sort(&self) {
        {
            let mut state = self.lock();
            state.query.sort_by = SortKey::None;
            state.query.sort_order = SortOrder::Asc;
        }
        self.view_changed();
    }

    /// Move to `page`, clamped into the current page range. Returns the page set.
    pub fn set_page(&self, page: u32) -> u32 {
        let applied = {
            let mut state = self.lock();
            let total_pages = view::total_pages(state.aggregate.len(), state.query.page_size);
            let applied = view::clamp_page(page, total_pages);
            state.query.page = applied;
            applied
        };
        if applied != page {
            debug!("Requested page {} clamped to {}", page, applied);
        }
        self.view_changed();
        applied
    }

    /// Change the page size and return to the first page.
    pub fn set_items_per_page(&self, page_size: PageSize) {
        {
            let mut state = self.lock();
            state.query.page_size = page_size;
            state.query.page = 1;
        }
        self.view_changed();
    }

    // ========================================================================
    // Read side
    // ========================================================================

    /// Derive the current view: sort, then paginate with the page clamped.
    pub fn view(&self) -> CatalogView {
        let state = self.lock();
        let derived = derive_page(
            &state.aggregate.records,
            state.query.sort_by,
            state.query.sort_order,
            state.query.page,
            state.query.page_size,
        );
        let mut query = state.query.clone();
        query.page = derived.page;

        CatalogView {
            items: derived.items,
            status: state.status,
            loading: state.status == FetchStatus::Loading,
            error: state.error.clone(),
            refresh_pending: self.shared.debouncer.is_pending(),
            page: derived.page,
            total_pages: derived.total_pages,
            total_items: derived.total_items,
            truncated: state.aggregate.truncated,
            query,
        }
    }

    /// Snapshot of the query state. The page is stored as last set, not clamped.
    pub fn query(&self) -> QueryState {
        self.lock().query.clone()
    }

    /// Status of the latest sequence.
    pub fn status(&self) -> FetchStatus {
        self.lock().status
    }

    /// Generation of the latest started sequence (0 before the first).
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// True while a debounced sequence is waiting for its quiet window.
    pub fn is_refresh_pending(&self) -> bool {
        self.shared.debouncer.is_pending()
    }

    /// Look up a record of the aggregate by id.
    pub fn character(&self, id: u32) -> Option<Character> {
        self.lock()
            .aggregate
            .records
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    // ========================================================================
    // Fetch sequence
    // ========================================================================

    fn update_filters(&self, edit: impl FnOnce(&mut FilterSet)) {
        let changed = {
            let mut state = self.lock();
            let before = state.query.filters.clone();
            edit(&mut state.query.filters);
            state.query.filters != before
        };
        if changed {
            self.schedule_sequence();
        }
    }

    fn schedule_sequence(&self) {
        let weak = Arc::downgrade(&self.shared);
        self.shared.debouncer.schedule(move || {
            if let Some(engine) = Self::upgrade(&weak) {
                engine.begin_sequence();
            }
        });
    }

    /// Start a new generation with the filters as they are now.
    fn begin_sequence(&self) {
        let (generation, filters) = {
            let mut state = self.lock();
            state.generation += 1;
            state.aggregate = Aggregate::default();
            state.error = None;
            state.status = FetchStatus::Loading;
            state.query.page = 1;
            (state.generation, state.query.filters.clone())
        };

        info!("Fetch sequence {} started (filters: {})", generation, filters);
        self.shared.events.send(EngineEvent::FetchStarted {
            generation,
            filters: filters.clone(),
        });

        let source = Arc::clone(&self.shared.source);
        let max_records = self.shared.settings.max_records;
        let weak = Arc::downgrade(&self.shared);
        tokio::spawn(async move {
            let result = fetch_all_pages(source.as_ref(), &filters, max_records).await;
            if let Some(engine) = Self::upgrade(&weak) {
                engine.finish_sequence(generation, result);
            }
        });
    }

    fn finish_sequence(&self, generation: u64, result: RemoteResult<Aggregate>) {
        let event = {
            let mut state = self.lock();
            if state.generation != generation {
                debug!(
                    "Discarding result of sequence {} (current is {})",
                    generation, state.generation
                );
                EngineEvent::StaleDiscarded { generation }
            } else {
                match result {
                    Ok(aggregate) => {
                        let total = aggregate.len();
                        let truncated = aggregate.truncated;
                        info!(
                            "Fetch sequence {} completed ({} records{})",
                            generation,
                            total,
                            if truncated { ", truncated" } else { "" }
                        );
                        state.aggregate = aggregate;
                        state.status = FetchStatus::Success;
                        EngineEvent::FetchCompleted {
                            generation,
                            total,
                            truncated,
                        }
                    }
                    Err(e) => {
                        warn!("Fetch sequence {} failed: {}", generation, e);
                        let message = e.to_string();
                        state.aggregate = Aggregate::default();
                        state.status = FetchStatus::Error;
                        state.error = Some(message.clone());
                        EngineEvent::FetchFailed {
                            generation,
                            message,
                        }
                    }
                }
            }
        };
        self.shared.events.send(event);
    }

    fn view_changed(&self) {
        self.shared.events.send(EngineEvent::ViewChanged);
    }

    fn upgrade(weak: &Weak<Shared>) -> Option<Self> {
        weak.upgrade().map(|shared| Self { shared })
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
