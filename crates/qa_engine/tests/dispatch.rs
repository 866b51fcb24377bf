use std::time::Duration;

use pretty_assertions::assert_eq;
use qa_engine::{
    AskRequest, Backend, ChatRequest, DispatchError, DispatchSettings, Endpoints, IngestReply,
    IngestRequest, ReqwestBackend,
};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> ReqwestBackend {
    let base = Url::parse(&server.uri()).unwrap();
    ReqwestBackend::new(DispatchSettings::new(base.clone(), base)).expect("backend")
}

#[tokio::test]
async fn chat_posts_query_and_k_and_returns_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"query": "What is RAG?", "k": 4})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "X"})))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let answer = backend
        .chat(&ChatRequest {
            query: "What is RAG?".to_string(),
            k: 4,
        })
        .await
        .expect("chat ok");
    assert_eq!(answer, "X");
}

#[tokio::test]
async fn chat_without_answer_returns_stringified_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"detail":"no index","code":7}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let answer = backend
        .chat(&ChatRequest {
            query: "q".to_string(),
            k: 4,
        })
        .await
        .expect("chat ok");
    assert_eq!(answer, r#"{"detail":"no index","code":7}"#);
}

#[tokio::test]
async fn error_status_with_json_body_is_still_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let answer = backend
        .chat(&ChatRequest {
            query: "q".to_string(),
            k: 4,
        })
        .await
        .expect("chat ok");
    assert_eq!(answer, r#"{"detail":"boom"}"#);
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend
        .ask(&AskRequest {
            question: "q".to_string(),
            url: "https://example.com".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Malformed(_)), "{err:?}");
}

#[tokio::test]
async fn ingest_and_ask_use_site_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ingest"))
        .and(body_json(json!({"url": "https://example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .and(body_json(
            json!({"question": "What is this?", "url": "https://example.com"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "A site."})))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let reply = backend
        .ingest(&IngestRequest {
            url: "https://example.com".to_string(),
        })
        .await
        .expect("ingest ok");
    assert_eq!(
        reply,
        IngestReply {
            success: true,
            error: None
        }
    );

    let answer = backend
        .ask(&AskRequest {
            question: "What is this?".to_string(),
            url: "https://example.com".to_string(),
        })
        .await
        .expect("ask ok");
    assert_eq!(answer, "A site.");
}

#[tokio::test]
async fn ingest_rejection_keeps_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ingest"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "error": "could not load page"})),
        )
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let reply = backend
        .ingest(&IngestRequest {
            url: "https://example.com".to_string(),
        })
        .await
        .expect("ingest ok");
    assert!(!reply.success);
    assert_eq!(reply.error.as_deref(), Some("could not load page"));
}

#[tokio::test]
async fn configured_timeout_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"answer": "late"})),
        )
        .mount(&server)
        .await;

    let base = Url::parse(&server.uri()).unwrap();
    let settings = DispatchSettings {
        request_timeout: Some(Duration::from_millis(50)),
        ..DispatchSettings::new(base.clone(), base)
    };
    let backend = ReqwestBackend::new(settings).expect("backend");
    let err = backend
        .chat(&ChatRequest {
            query: "q".to_string(),
            k: 4,
        })
        .await
        .unwrap_err();
    assert_eq!(err, DispatchError::Timeout);
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    // Bind then drop to obtain a port with nothing listening.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let base = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
    let backend = ReqwestBackend::new(DispatchSettings::new(base.clone(), base)).unwrap();

    let err = backend
        .chat(&ChatRequest {
            query: "q".to_string(),
            k: 4,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Transport(_)), "{err:?}");
    assert!(!backend.health().await);
}

#[tokio::test]
async fn health_reports_online_for_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    assert!(backend_for(&server).health().await);
}

#[test]
fn endpoints_keep_base_path_prefix() {
    let backend_url = Url::parse("http://localhost:8000/rag").unwrap();
    let site_url = Url::parse("http://localhost:3000/").unwrap();
    let endpoints = Endpoints::from_settings(&DispatchSettings::new(backend_url, site_url))
        .expect("endpoints");

    assert_eq!(endpoints.chat.as_str(), "http://localhost:8000/rag/chat");
    assert_eq!(endpoints.health.as_str(), "http://localhost:8000/rag/health");
    assert_eq!(endpoints.ingest.as_str(), "http://localhost:3000/api/ingest");
    assert_eq!(endpoints.ask.as_str(), "http://localhost:3000/api/ask");
}

#[test]
fn non_base_url_is_rejected() {
    let bad = Url::parse("mailto:someone@example.com").unwrap();
    let good = Url::parse("http://localhost:3000").unwrap();
    let err = Endpoints::from_settings(&DispatchSettings::new(bad, good)).unwrap_err();
    assert!(matches!(err, DispatchError::InvalidEndpoint(_)));
}
