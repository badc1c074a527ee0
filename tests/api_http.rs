//! HTTP-level tests for the blocking client against a local mock server.
//!
//! The blocking client must not be created or dropped on an async worker, so every
//! client interaction runs inside `spawn_blocking`.

use countries_rs::{detail, query};
use countries_rs::{Client, Config, CountrySource, DataError, NameMatch, QueryState};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn body() -> serde_json::Value {
    json!([
        {
            "name": {
                "common": "Japan",
                "official": "Japan",
                "nativeName": { "jpn": { "official": "日本", "common": "日本" } }
            },
            "cca3": "JPN",
            "capital": ["Tokyo"],
            "region": "Asia",
            "subregion": "Eastern Asia",
            "population": 125836021,
            "flags": { "png": "https://flagcdn.com/w320/jp.png", "svg": "https://flagcdn.com/jp.svg" },
            "tld": [".jp"],
            "currencies": { "JPY": { "name": "Japanese yen", "symbol": "¥" } },
            "languages": { "jpn": "Japanese" }
        },
        {
            "name": { "common": "Israel", "official": "State of Israel" },
            "cca3": "ISR",
            "region": "Asia",
            "population": 9216900,
            "flags": { "svg": "https://flagcdn.com/il.svg" }
        },
        {
            "name": { "common": "Bhutan", "official": "Kingdom of Bhutan" },
            "cca3": "BTN",
            "capital": ["Thimphu"],
            "region": "Asia",
            "population": 771612,
            "flags": { "svg": "https://flagcdn.com/bt.svg" },
            "borders": ["CHN", "IND"]
        }
    ])
}

fn client_for(uri: String) -> Client {
    Client::new(&Config::default().with_base_url(uri))
}

#[tokio::test]
async fn region_endpoint_is_parsed_filtered_and_sorted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/region/Asia"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body()))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let state = tokio::task::spawn_blocking(move || {
        let client = client_for(uri);
        query::resolve(&client, &QueryState::region("Asia"), &Config::default())
    })
    .await
    .unwrap();

    let list = state.ready().unwrap();
    let names: Vec<_> = list.iter().map(|c| c.common_name.as_str()).collect();
    assert_eq!(names, ["Bhutan", "Japan"]);
    assert_eq!(list[1].flag_url, "https://flagcdn.com/jp.svg");
    assert_eq!(list[1].capital.as_deref(), Some("Tokyo"));
}

#[tokio::test]
async fn full_text_name_search_sends_query_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/name/japan"))
        .and(query_param("fullText", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body()))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let found = tokio::task::spawn_blocking(move || {
        client_for(uri).by_name(" japan ", NameMatch::FullText)
    })
    .await
    .unwrap()
    .unwrap();
    assert_eq!(found.len(), 3);
}

#[tokio::test]
async fn not_found_status_maps_to_not_found_and_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/name/atlantis"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"status": 404, "message": "Not Found"})),
        )
        .mount(&server)
        .await;

    let uri = server.uri();
    let (raw, state) = tokio::task::spawn_blocking(move || {
        let client = client_for(uri);
        let raw = client.by_name("atlantis", NameMatch::Partial);
        let state = query::resolve(&client, &QueryState::name("atlantis"), &Config::default());
        (raw, state)
    })
    .await
    .unwrap();

    assert!(matches!(raw, Err(DataError::NotFound(_))));
    assert_eq!(state.ready().map(Vec::len), Some(0));
}

#[tokio::test]
async fn server_errors_are_retried_then_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/all"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let uri = server.uri();
    let state = tokio::task::spawn_blocking(move || {
        query::resolve(&client_for(uri), &QueryState::all(), &Config::default())
    })
    .await
    .unwrap();
    assert_eq!(state.error(), Some("request failed with HTTP 503"));
}

#[tokio::test]
async fn malformed_body_is_a_parse_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/all"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let raw = tokio::task::spawn_blocking(move || client_for(uri).all())
        .await
        .unwrap();
    assert!(matches!(raw, Err(DataError::Parse(_))));
}

#[tokio::test]
async fn border_codes_are_sent_as_one_comma_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alpha"))
        .and(query_param("codes", "CHN,IND"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": { "common": "China" }, "cca3": "CHN" },
            { "name": { "common": "India" }, "cca3": "IND" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let found = tokio::task::spawn_blocking(move || {
        client_for(uri).by_codes(&["CHN".to_string(), "IND".to_string()])
    })
    .await
    .unwrap()
    .unwrap();
    let names: Vec<_> = found.iter().map(|c| c.name.common.as_str()).collect();
    assert_eq!(names, ["China", "India"]);
}

#[tokio::test]
async fn border_batch_404_is_reported_with_its_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/name/Nepal"))
        .and(query_param("fullText", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": { "common": "Nepal" }, "cca3": "NPL", "borders": ["CHN", "IND"] }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/alpha"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"status": 404, "message": "Not Found"})),
        )
        .mount(&server)
        .await;

    let uri = server.uri();
    let state = tokio::task::spawn_blocking(move || {
        detail::resolve_detail_state(&client_for(uri), "Nepal", &Config::default())
    })
    .await
    .unwrap();
    assert_eq!(state.error(), Some("request failed with HTTP 404"));
}
