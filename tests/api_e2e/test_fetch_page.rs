//! E2E tests: HTTP adapter requests, decoding and error mapping.

use std::time::Duration;

use character_catalog::config::Config;
use character_catalog::error::{NETWORK_ERROR_MESSAGE, RemoteError};
use character_catalog::models::{CharacterStatus, FilterSet, Gender};
use character_catalog::services::{CharacterSource, HttpCharacterSource, fetch_all_pages};

use super::mock_character_api::{MockCharacterApi, Stall, character};

fn roster(n: u32) -> Vec<character_catalog::models::Character> {
    (1..=n).map(|id| character(id, "Rick Sanchez")).collect()
}

/// (1) Filters are forwarded as query parameters next to the page number.
#[actix_rt::test]
async fn test_filters_sent_as_query_params() {
    let api = MockCharacterApi::start(roster(10)).await;
    let source = HttpCharacterSource::new(&api.config()).unwrap();
    let filters = FilterSet {
        name: "rick".to_string(),
        status: Some(CharacterStatus::Dead),
        species: "human".to_string(),
        gender: Some(Gender::Male),
    };

    let page = source.fetch_page(1, &filters).await.unwrap();

    assert_eq!(page.info.count, 4);
    assert_eq!(
        page.results.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![1, 4, 7, 10]
    );
    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    let query = &requests[0];
    assert_eq!(query.get("page").map(String::as_str), Some("1"));
    assert_eq!(query.get("name").map(String::as_str), Some("rick"));
    assert_eq!(query.get("status").map(String::as_str), Some("dead"));
    assert_eq!(query.get("species").map(String::as_str), Some("human"));
    assert_eq!(query.get("gender").map(String::as_str), Some("male"));
}

/// (2) Empty filters send only the page number.
#[actix_rt::test]
async fn test_empty_filters_send_only_page() {
    let api = MockCharacterApi::start(roster(5)).await;
    let source = HttpCharacterSource::new(&api.config()).unwrap();

    source.fetch_page(1, &FilterSet::default()).await.unwrap();

    let requests = api.requests();
    assert_eq!(requests[0].len(), 1);
    assert!(requests[0].contains_key("page"));
}

/// (3) A full sequence follows the remote's pagination to the last page.
#[actix_rt::test]
async fn test_fetch_all_pages_over_http() {
    let api = MockCharacterApi::start(roster(45)).await;
    let source = HttpCharacterSource::new(&api.config()).unwrap();

    let aggregate = fetch_all_pages(&source, &FilterSet::default(), None)
        .await
        .unwrap();

    assert_eq!(aggregate.reported_count, 45);
    assert!(!aggregate.truncated);
    assert_eq!(
        aggregate.records.iter().map(|c| c.id).collect::<Vec<_>>(),
        (1..=45).collect::<Vec<_>>()
    );
    let pages: Vec<String> = api
        .requests()
        .iter()
        .map(|q| q["page"].clone())
        .collect();
    assert_eq!(pages, vec!["1", "2", "3"]);
}

/// (4) Page links are decoded and reflect the position in the sequence.
#[actix_rt::test]
async fn test_page_info_links() {
    let api = MockCharacterApi::start(roster(45)).await;
    let source = HttpCharacterSource::new(&api.config()).unwrap();

    let first = source.fetch_page(1, &FilterSet::default()).await.unwrap();
    assert_eq!(first.info.pages, 3);
    assert!(first.info.has_next());
    assert!(!first.info.has_prev());
    assert!(first.info.next.unwrap().ends_with("page=2"));

    let last = source.fetch_page(3, &FilterSet::default()).await.unwrap();
    assert_eq!(last.results.len(), 5);
    assert!(!last.info.has_next());
    assert!(last.info.has_prev());
}

/// (5) A 404 for an empty match carries the remote's error message.
#[actix_rt::test]
async fn test_not_found_body_message() {
    let api = MockCharacterApi::start(roster(5)).await;
    let source = HttpCharacterSource::new(&api.config()).unwrap();
    let filters = FilterSet {
        name: "zzz".to_string(),
        ..FilterSet::default()
    };

    let err = source.fetch_page(1, &filters).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "There is nothing here");
}

/// (6) A failure without a body falls back to the status code.
#[actix_rt::test]
async fn test_server_error_without_body() {
    let api = MockCharacterApi::start(roster(5)).await;
    api.fail_with(500, "");
    let source = HttpCharacterSource::new(&api.config()).unwrap();

    let err = source.fetch_page(1, &FilterSet::default()).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "API error: 500");
}

/// (7) A success response that is not a page result is a decode error.
#[actix_rt::test]
async fn test_malformed_success_body() {
    let api = MockCharacterApi::start(roster(5)).await;
    api.fail_with(200, "<html>maintenance</html>");
    let source = HttpCharacterSource::new(&api.config()).unwrap();

    let err = source.fetch_page(1, &FilterSet::default()).await.unwrap_err();

    assert!(matches!(err, RemoteError::Decode { .. }));
    assert!(
        err.to_string()
            .starts_with("Invalid response from character API")
    );
}

/// (8) An unreachable server yields the generic network message.
#[actix_rt::test]
async fn test_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = Config {
        api_base_url: format!("http://127.0.0.1:{}/api", port),
        ..Config::default()
    };
    let source = HttpCharacterSource::new(&config).unwrap();

    let err = source.fetch_page(1, &FilterSet::default()).await.unwrap_err();

    assert!(matches!(err, RemoteError::Connection { .. }));
    assert_eq!(err.status(), None);
    assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
}

fn with_timeout(api: &MockCharacterApi) -> HttpCharacterSource {
    let config = Config {
        request_timeout: Some(Duration::from_secs(1)),
        ..api.config()
    };
    HttpCharacterSource::new(&config).unwrap()
}

/// (9) A configured timeout ends a request whose response never starts.
#[actix_rt::test]
async fn test_timeout_before_response() {
    let api = MockCharacterApi::start(roster(5)).await;
    api.stall(Stall::BeforeHeaders(Duration::from_secs(3)));
    let source = with_timeout(&api);

    let err = source.fetch_page(1, &FilterSet::default()).await.unwrap_err();

    assert!(matches!(err, RemoteError::Connection { .. }));
    assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
}

/// (10) A body that stalls past the timeout is a connectivity failure, not a decode error.
#[actix_rt::test]
async fn test_timeout_while_reading_body() {
    let api = MockCharacterApi::start(roster(5)).await;
    api.stall(Stall::MidBody(Duration::from_secs(3)));
    let source = with_timeout(&api);

    let err = source.fetch_page(1, &FilterSet::default()).await.unwrap_err();

    assert!(matches!(err, RemoteError::Connection { .. }));
    assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
}
