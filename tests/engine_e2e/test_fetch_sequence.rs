//! E2E tests: fetch-all-pages sequences and their state transitions.

use std::sync::Arc;

use character_catalog::models::{EngineEvent, FilterSet};
use character_catalog::services::{EngineSettings, FetchStatus};

use super::stub_source::{StubCharacterSource, roster};
use super::test_helpers::*;

/// (1) Startup load drains every remote page and reports the remote count.
#[tokio::test(start_paused = true)]
async fn test_initial_load_fetches_every_page() {
    let source = Arc::new(StubCharacterSource::new(roster(100)));
    let engine = engine_over(&source);

    let event = load(&engine).await;

    assert_eq!(
        event,
        EngineEvent::FetchCompleted {
            generation: 1,
            total: 100,
            truncated: false,
        }
    );
    let pages: Vec<u32> = source.calls().iter().map(|(page, _)| *page).collect();
    assert_eq!(pages, vec![1, 2, 3, 4, 5]);

    let view = engine.view();
    assert_eq!(engine.status(), FetchStatus::Success);
    assert!(!view.loading);
    assert_eq!(view.error, None);
    assert_eq!(view.total_items, 100);
    assert_eq!(view.total_pages, 5);
    assert_eq!(ids(&view.items), (1..=20).collect::<Vec<_>>());
}

/// (2) The aggregate size equals the remote's count for the filters in effect.
#[tokio::test(start_paused = true)]
async fn test_aggregate_matches_remote_count_under_filters() {
    let source = Arc::new(StubCharacterSource::new(roster(250)));
    let engine = engine_over(&source);
    let mut rx = engine.subscribe();

    engine.set_name_filter("smith");
    engine.set_species_filter("human");
    wait_for_settled(&mut rx).await;

    let filters = engine.query().filters;
    let expected = source.matching(&filters);
    assert_eq!(expected.len(), 100);
    assert_eq!(engine.view().total_items, expected.len());
    assert_eq!(ids(&all_items(&engine)), ids(&expected));
}

/// (3) A 404 with an error body surfaces that message verbatim.
#[tokio::test(start_paused = true)]
async fn test_not_found_error_message_is_surfaced() {
    let source = Arc::new(StubCharacterSource::new(roster(40)));
    source.fail_for_name("zzz", 404, r#"{"error":"Character not found"}"#);
    let engine = engine_over(&source);
    let mut rx = engine.subscribe();

    engine.set_name_filter("zzz");
    let event = wait_for_settled(&mut rx).await;

    assert_eq!(
        event,
        EngineEvent::FetchFailed {
            generation: 1,
            message: "Character not found".to_string(),
        }
    );
    let view = engine.view();
    assert_eq!(engine.status(), FetchStatus::Error);
    assert_eq!(view.error.as_deref(), Some("Character not found"));
    assert!(!view.loading);
    assert_eq!(view.total_items, 0);
    assert!(view.items.is_empty());
    assert!(!view.is_empty_result());
}

/// (4) A failure on a later page aborts the sequence and leaves nothing partial.
#[tokio::test(start_paused = true)]
async fn test_mid_sequence_failure_discards_partial_results() {
    let source = Arc::new(StubCharacterSource::new(roster(100)));
    source.fail_on_page(3);
    let engine = engine_over(&source);

    let event = load(&engine).await;

    assert!(matches!(event, EngineEvent::FetchFailed { .. }));
    let pages: Vec<u32> = source.calls().iter().map(|(page, _)| *page).collect();
    assert_eq!(pages, vec![1, 2, 3]);
    let view = engine.view();
    assert_eq!(view.error.as_deref(), Some("API error: 500"));
    assert_eq!(view.total_items, 0);
}

/// (5) A new sequence clears the previous aggregate before any page arrives.
#[tokio::test(start_paused = true)]
async fn test_stale_data_is_never_shown_while_loading() {
    let source = Arc::new(StubCharacterSource::new(roster(60)));
    let engine = engine_over(&source);
    load(&engine).await;
    assert_eq!(engine.view().total_items, 60);

    let mut rx = engine.subscribe();
    engine.set_name_filter("rick");
    wait_for(&mut rx, |e| matches!(e, EngineEvent::FetchStarted { .. })).await;

    let view = engine.view();
    assert!(view.loading);
    assert_eq!(view.error, None);
    assert!(view.items.is_empty());
    assert!(!view.is_empty_result());
    assert_eq!(engine.status(), FetchStatus::Loading);

    wait_for_settled(&mut rx).await;
    assert_eq!(engine.view().total_items, 12);
}

/// (6) A successful sequence clears the error left by a failed one.
#[tokio::test(start_paused = true)]
async fn test_success_after_failure_clears_error() {
    let source = Arc::new(StubCharacterSource::new(roster(30)));
    source.fail_for_name("broken", 500, "");
    let engine = engine_over(&source);
    let mut rx = engine.subscribe();

    engine.set_name_filter("broken");
    wait_for_settled(&mut rx).await;
    assert_eq!(engine.view().error.as_deref(), Some("API error: 500"));

    engine.set_name_filter("morty");
    wait_for_settled(&mut rx).await;
    let view = engine.view();
    assert_eq!(view.error, None);
    assert_eq!(view.total_items, 6);
}

/// (7) Every filter-triggered sequence returns to page 1.
#[tokio::test(start_paused = true)]
async fn test_refetch_resets_page() {
    let source = Arc::new(StubCharacterSource::new(roster(100)));
    let engine = engine_over(&source);
    load(&engine).await;
    assert_eq!(engine.set_page(4), 4);

    let mut rx = engine.subscribe();
    engine.set_species_filter("alien");
    wait_for_settled(&mut rx).await;

    assert_eq!(engine.query().page, 1);
    assert_eq!(engine.view().page, 1);
}

/// (8) clear_filters goes through the debounced refetch and restores the startup aggregate.
#[tokio::test(start_paused = true)]
async fn test_clear_filters_round_trip() {
    let source = Arc::new(StubCharacterSource::new(roster(75)));
    let engine = engine_over(&source);
    load(&engine).await;
    let startup = all_items(&engine);

    let mut rx = engine.subscribe();
    engine.set_name_filter("beth");
    engine.set_gender_filter(Some(character_catalog::models::Gender::Male));
    wait_for_settled(&mut rx).await;
    assert!(engine.view().total_items < startup.len());

    engine.clear_filters();
    wait_for_settled(&mut rx).await;

    assert!(engine.query().filters.is_empty());
    assert_eq!(all_items(&engine), startup);
    assert_eq!(source.sequences().last(), Some(&FilterSet::default()));
}

/// (9) The record cap stops fetching and flags the view as truncated.
#[tokio::test(start_paused = true)]
async fn test_record_cap_truncates_aggregate() {
    let source = Arc::new(StubCharacterSource::new(roster(200)));
    let engine = engine_with(
        &source,
        EngineSettings {
            max_records: Some(50),
            ..EngineSettings::default()
        },
    );

    let event = load(&engine).await;

    assert_eq!(
        event,
        EngineEvent::FetchCompleted {
            generation: 1,
            total: 50,
            truncated: true,
        }
    );
    assert_eq!(source.calls().len(), 3);
    let view = engine.view();
    assert!(view.truncated);
    assert_eq!(view.total_items, 50);
    assert_eq!(view.total_pages, 3);
}

/// (10) An empty 200 response settles into the "no results" state.
#[tokio::test(start_paused = true)]
async fn test_empty_result_indication() {
    let source = Arc::new(StubCharacterSource::new(Vec::new()));
    source.answer_empty_with_ok();
    let engine = engine_over(&source);

    load(&engine).await;

    let view = engine.view();
    assert!(view.is_empty_result());
    assert_eq!(view.total_pages, 1);
    assert_eq!(view.page, 1);
}
