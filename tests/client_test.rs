//! HTTP behaviour of the API client against a mock server.

use std::sync::Arc;
use std::time::Duration;

use newsroom::client::{ApiClient, RequestOptions, ResponseBody, SessionEvent};
use newsroom::error::AppError;
use newsroom::models::{ApiConfig, ArticleStatus, MediaUpload, TaxonomyInput};
use newsroom::query::{ArticleQuery, FilterChange, FilterState, MediaQuery};
use newsroom::session::{MemoryTokenStore, Session};
use reqwest::Method;
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{
    body_json, body_string_contains, header, header_exists, method, path, query_param,
    query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        ..ApiConfig::default()
    }
}

async fn logged_in(token: &str) -> Arc<Session> {
    Arc::new(
        Session::init(MemoryTokenStore::with_token(token))
            .await
            .unwrap(),
    )
}

fn article_json(id: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "slug": id,
        "title": title,
        "summary": null,
        "published_at": "2024-05-01T09:00:00",
        "status": "published",
        "is_featured": false
    })
}

#[tokio::test]
async fn test_list_articles_sends_only_set_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles/"))
        .and(query_param("limit", "8"))
        .and(query_param("offset", "8"))
        .and(query_param("category", "world"))
        .and(query_param("status", "published"))
        .and(query_param("dateFrom", "2024-01-01"))
        .and(query_param_is_missing("is_highlight"))
        .and(query_param_is_missing("dateTo"))
        .and(query_param_is_missing("q"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([article_json("a1", "Hello")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&api_config(&server), Arc::new(Session::anonymous())).unwrap();

    let mut filters = FilterState::for_category("world");
    filters.apply(FilterChange::Status(Some(ArticleStatus::Published)));
    filters.apply(FilterChange::DateFrom(chrono::NaiveDate::from_ymd_opt(2024, 1, 1)));
    filters.apply(FilterChange::Search("ignored by the server".into()));
    filters.apply(FilterChange::Page(2));

    let articles = client
        .list_articles(&ArticleQuery::from_filters(&filters, 8))
        .await
        .unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "Hello");
    assert!(articles[0].published_at.is_some());
}

#[tokio::test]
async fn test_bearer_token_attached_when_logged_in() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "t1", "name": "Politics", "slug": "politics"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&api_config(&server), logged_in("secret").await).unwrap();
    let tags = client.list_tags().await.unwrap();
    assert_eq!(tags[0].slug, "politics");
}

#[tokio::test]
async fn test_anonymous_public_read_has_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories/"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = ApiClient::new(&api_config(&server), Arc::new(Session::anonymous())).unwrap();
    assert!(client.list_categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unauthorized_clears_session_and_signals() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
        .expect(1)
        .mount(&server)
        .await;

    let session = logged_in("stale").await;
    let (tx, mut events) = mpsc::unbounded_channel();
    let client = ApiClient::new(&api_config(&server), Arc::clone(&session))
        .unwrap()
        .with_listener(tx);

    let err = client.list_users().await.unwrap_err();
    assert!(matches!(err, AppError::SessionExpired));
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Expired);
    assert!(!session.is_authenticated().await);

    // No further authenticated request leaves the client.
    let err = client.list_users().await.unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated));
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_unauthorized_keeps_token_from_newer_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(300)))
        .expect(1)
        .mount(&server)
        .await;

    let session = logged_in("old").await;
    let (tx, mut events) = mpsc::unbounded_channel();
    let client = ApiClient::new(&api_config(&server), Arc::clone(&session))
        .unwrap()
        .with_listener(tx);

    let pending = tokio::spawn({
        let client = client.clone();
        async move { client.list_users().await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    session.login("new").await.unwrap();

    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(err, AppError::SessionExpired));
    assert_eq!(session.token().await.as_deref(), Some("new"));
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_forbidden_signals_access_denied() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/tags/t1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let session = logged_in("editor").await;
    let (tx, mut events) = mpsc::unbounded_channel();
    let client = ApiClient::new(&api_config(&server), Arc::clone(&session))
        .unwrap()
        .with_listener(tx);

    let err = client.delete_tag("t1").await.unwrap_err();
    assert!(matches!(err, AppError::AccessDenied));
    assert_eq!(events.try_recv().unwrap(), SessionEvent::AccessDenied);
    assert!(session.is_authenticated().await);
}

#[tokio::test]
async fn test_other_status_is_http_error_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Article not found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles/empty"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ApiClient::new(&api_config(&server), Arc::new(Session::anonymous())).unwrap();

    match client.get_article("missing").await.unwrap_err() {
        AppError::Http { status, body } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(body, "Article not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    match client.get_article("empty").await.unwrap_err() {
        AppError::Http { body, .. } => assert_eq!(body, "Internal Server Error"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_success_is_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let client = ApiClient::new(&api_config(&server), Arc::new(Session::anonymous())).unwrap();
    let body = client
        .request(Method::GET, "/api/health", RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(body, ResponseBody::Text("OK".into()));
}

#[tokio::test]
async fn test_schema_mismatch_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let client = ApiClient::new(&api_config(&server), Arc::new(Session::anonymous())).unwrap();
    let err = client.get_article("broken").await.unwrap_err();
    assert!(matches!(err, AppError::Decode { .. }));
}

#[tokio::test]
async fn test_login_stores_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "ed@example.org", "password": "pw"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "fresh", "token_type": "bearer"})),
        )
        .mount(&server)
        .await;

    let session = Arc::new(Session::anonymous());
    let client = ApiClient::new(&api_config(&server), Arc::clone(&session)).unwrap();

    client.login("ed@example.org", "pw").await.unwrap();
    assert_eq!(session.token().await.as_deref(), Some("fresh"));

    client.logout().await.unwrap();
    assert!(!session.is_authenticated().await);
}

#[tokio::test]
async fn test_failed_login_does_not_signal_expiry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid credentials"))
        .mount(&server)
        .await;

    let (tx, mut events) = mpsc::unbounded_channel();
    let client = ApiClient::new(&api_config(&server), Arc::new(Session::anonymous()))
        .unwrap()
        .with_listener(tx);

    let err = client.login("ed@example.org", "wrong").await.unwrap_err();
    assert!(matches!(err, AppError::Http { .. }));
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_mutation_requires_login_without_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/categories/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "c1"})))
        .expect(0)
        .mount(&server)
        .await;

    let client = ApiClient::new(&api_config(&server), Arc::new(Session::anonymous())).unwrap();
    let err = client
        .create_category(&TaxonomyInput::new("World", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated));
}

#[tokio::test]
async fn test_create_category_posts_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/categories/"))
        .and(header("authorization", "Bearer admin"))
        .and(body_json(json!({"name": "World News", "slug": "world-news"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "c9"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&api_config(&server), logged_in("admin").await).unwrap();
    let created = client
        .create_category(&TaxonomyInput::new("World News", None))
        .await
        .unwrap();
    assert_eq!(created.id, "c9");
}

#[tokio::test]
async fn test_upload_media_sends_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/media/upload"))
        .and(header("authorization", "Bearer admin"))
        .and(body_string_contains("name=\"file\"; filename=\"photo.png\""))
        .and(body_string_contains("name=\"caption\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m1",
            "url": "/static/uploads/photo.png",
            "file_name": "photo.png",
            "mime_type": "image/png",
            "caption": "Harbour at dawn"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&api_config(&server), logged_in("admin").await).unwrap();
    let mut upload = MediaUpload::new("photo.png", b"\x89PNG fake".to_vec());
    upload.caption = Some("Harbour at dawn".into());

    let asset = client.upload_media(upload).await.unwrap();
    assert_eq!(asset.id, "m1");
    assert_eq!(asset.mime_type.as_deref(), Some("image/png"));
}

#[tokio::test]
async fn test_list_media_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/media/"))
        .and(query_param("q", "harbour"))
        .and(query_param("limit", "20"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&api_config(&server), Arc::new(Session::anonymous())).unwrap();
    let query = MediaQuery {
        q: Some("harbour".into()),
        limit: Some(20),
        offset: None,
    };
    assert!(client.list_media(&query).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_section_items_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/homepage_section_items/section/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "i2", "section_id": "s1", "article_id": "a2", "position": 2},
            {"id": "i1", "section_id": "s1", "article_id": "a1", "position": 1}
        ])))
        .mount(&server)
        .await;

    let client = ApiClient::new(&api_config(&server), Arc::new(Session::anonymous())).unwrap();
    let items = client.list_section_items("s1").await.unwrap();
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let config = ApiConfig {
        base_url: "http://127.0.0.1:1".into(),
        ..ApiConfig::default()
    };
    let client = ApiClient::new(&config, Arc::new(Session::anonymous())).unwrap();
    let err = client.list_categories().await.unwrap_err();
    assert!(err.is_network(), "unexpected error: {err:?}");
}
