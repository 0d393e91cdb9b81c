// Integration tests for the request pipeline and typed client against a
// local mock upstream.

use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;

use cascade_api_engine::api::client::ApiClient;
use cascade_api_engine::config::EngineConfig;
use cascade_api_engine::detect::image::ImageFormat;
use cascade_api_engine::engine::collector::ResponseOutcome;
use cascade_api_engine::engine::handle::Engine;
use cascade_api_engine::error::Error;
use cascade_api_engine::request::descriptor::RequestDescriptor;
use cascade_api_engine::request::encoding::UploadEncoding;

fn character_json(name: &str) -> String {
    format!(
        r#"{{"name":"{name}","status":"Alive","species":"Human","origin":{{"name":"Earth","url":""}},"location":{{"name":"Earth","url":""}},"image":"","url":""}}"#
    )
}

fn page_json(names: &[&str], next: Option<&str>, previous: Option<&str>) -> String {
    let results: Vec<String> = names.iter().map(|n| character_json(n)).collect();
    let render = |cursor: Option<&str>| match cursor {
        Some(url) => format!(r#""{url}""#),
        None => "null".to_string(),
    };
    format!(
        r#"{{"info":{{"count":4,"pages":2,"next":{},"previous":{}}},"results":[{}]}}"#,
        render(next),
        render(previous),
        results.join(",")
    )
}

async fn characters_handler(
    State(base): State<String>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    let content_type = header::CONTENT_TYPE;
    match query.as_deref() {
        None => (
            StatusCode::OK,
            [(content_type, "application/json")],
            page_json(
                &["Rick Sanchez", "Morty Smith"],
                Some(&format!("{base}/api/character?page=2")),
                None,
            ),
        ),
        Some("page=2") => (
            StatusCode::OK,
            [(content_type, "application/json")],
            page_json(
                &["Summer Smith", "Beth Smith"],
                None,
                Some(&format!("{base}/api/character")),
            ),
        ),
        Some(_) => (
            StatusCode::NOT_FOUND,
            [(content_type, "text/plain")],
            "no such page".to_string(),
        ),
    }
}

async fn echo_handler(headers: HeaderMap, body: String) -> String {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    format!("{content_type}|{body}")
}

/// Start the mock upstream on a random port, returning its base URL.
async fn start_upstream() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let app = Router::new()
        .route("/api/character", get(characters_handler))
        .route(
            "/api/character/1",
            get(|| async { character_json("Rick Sanchez") }),
        )
        .route(
            "/api/character/broken",
            get(|| async { r#"{"name":"Rick Sanchez"}"# }),
        )
        .route(
            "/api/character/999",
            get(|| async { (StatusCode::NOT_FOUND, "no such character") }),
        )
        .route(
            "/api/legacy/1",
            get(|| async { Redirect::permanent("/api/character/1") }),
        )
        .route("/api/big", get(|| async { vec![0u8; 4096] }))
        .route(
            "/api/avatar.png",
            get(|| async { b"\x89PNG\r\n\x1a\nimage-data".to_vec() }),
        )
        .route("/api/echo", post(echo_handler))
        .route(
            "/api/query",
            get(|RawQuery(query): RawQuery| async move { query.unwrap_or_default() }),
        )
        .with_state(base.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base
}

fn client_for(base: &str) -> ApiClient {
    let engine = Arc::new(Engine::new(EngineConfig::default()).unwrap());
    ApiClient::new(engine).with_base_url(format!("{base}/api"))
}

#[tokio::test]
async fn test_entity_decodes() {
    let base = start_upstream().await;
    let client = client_for(&base);

    let character = client
        .character(&format!("{base}/api/character/1"))
        .await
        .unwrap();
    assert_eq!(character.name, "Rick Sanchez");
    assert_eq!(character.species, "Human");
}

#[tokio::test]
async fn test_pagination_cursor_chain() {
    let base = start_upstream().await;
    let client = client_for(&base);

    let first = client.characters(None).await.unwrap();
    assert_eq!(first.results.len(), 2);
    assert!(first.results.len() <= first.info.count as usize);
    assert_eq!(first.info.pages, 2);

    // The cursor is an opaque URL, dispatched as-is.
    let next = first.info.next.clone().unwrap();
    let second = client.characters(Some(&next)).await.unwrap();
    assert_eq!(second.results[0].name, "Summer Smith");

    // Finite collection: the chain terminates instead of revisiting a page.
    assert!(second.info.next.is_none());
    assert_eq!(second.info.previous, Some(format!("{base}/api/character")));
}

#[tokio::test]
async fn test_status_failure_carries_status_and_body() {
    let base = start_upstream().await;
    let client = client_for(&base);

    match client
        .character(&format!("{base}/api/character/999"))
        .await
    {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(&body[..], b"no such character");
        }
        other => panic!("expected HttpStatus, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn test_malformed_payload_never_partial() {
    let base = start_upstream().await;
    let client = client_for(&base);

    let result = client
        .character(&format!("{base}/api/character/broken"))
        .await;
    assert!(matches!(result, Err(Error::MalformedPayload { .. })));
}

#[tokio::test]
async fn test_redirects_are_followed() {
    let base = start_upstream().await;
    let client = client_for(&base);

    let character = client
        .character(&format!("{base}/api/legacy/1"))
        .await
        .unwrap();
    assert_eq!(character.name, "Rick Sanchez");
}

#[tokio::test]
async fn test_body_cap_overflow_aborts() {
    let base = start_upstream().await;
    let engine = Engine::new(EngineConfig {
        max_response_bytes: 1024,
        ..EngineConfig::default()
    })
    .unwrap();

    let descriptor = RequestDescriptor::get(format!("{base}/api/big"));
    let err = engine.execute(&descriptor).await.unwrap_err();
    assert!(matches!(err, Error::BufferOverflow { limit: 1024 }));
}

#[tokio::test]
async fn test_transport_failure_has_no_status() {
    // Nothing listens on this port; the request never gets a response.
    let engine = Engine::new(EngineConfig::default()).unwrap();
    let descriptor = RequestDescriptor::get("http://127.0.0.1:9/api/character");

    match engine.execute(&descriptor).await.unwrap() {
        ResponseOutcome::Failure { status: None, body: None } => {}
        other => panic!("expected transport failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_query_string_on_the_wire() {
    let base = start_upstream().await;
    let engine = Engine::new(EngineConfig::default()).unwrap();

    // No parameters: the URL goes out untouched.
    let bare = RequestDescriptor::get(format!("{base}/api/query"));
    match engine.execute(&bare).await.unwrap() {
        ResponseOutcome::Success { body } => assert_eq!(&body[..], b""),
        other => panic!("expected success, got {:?}", other),
    }

    // One live parameter, one null: only the live one is encoded.
    let filtered = RequestDescriptor::get(format!("{base}/api/query"))
        .param("name", "Rick")
        .param("status", Value::Null);
    match engine.execute(&filtered).await.unwrap() {
        ResponseOutcome::Success { body } => assert_eq!(&body[..], b"name=Rick"),
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_post_form_and_json_bodies() {
    let base = start_upstream().await;
    let engine = Engine::new(EngineConfig::default()).unwrap();

    let form = RequestDescriptor::post(format!("{base}/api/echo"))
        .with_encoding(UploadEncoding::Form)
        .param("a", "1")
        .param("b", Value::Null);
    match engine.execute(&form).await.unwrap() {
        ResponseOutcome::Success { body } => assert_eq!(
            &body[..],
            b"application/x-www-form-urlencoded; charset=utf-8|a=1"
        ),
        other => panic!("expected success, got {:?}", other),
    }

    let json = RequestDescriptor::post(format!("{base}/api/echo"))
        .param("a", "1")
        .param("b", Value::Null);
    match engine.execute(&json).await.unwrap() {
        ResponseOutcome::Success { body } => {
            assert_eq!(&body[..], br#"application/json; charset=utf-8|{"a":"1"}"#)
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_image_fetch_sniffs_format() {
    let base = start_upstream().await;
    let client = client_for(&base);

    let image = client.image(&format!("{base}/api/avatar.png")).await.unwrap();
    assert_eq!(image.format, ImageFormat::Png);
    assert!(image.bytes.starts_with(b"\x89PNG"));
}
