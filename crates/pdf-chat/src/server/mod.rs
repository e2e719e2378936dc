//! HTTP server for the PDF chat service

pub mod routes;
pub mod state;

use axum::{extract::State, routing::get, Json, Router};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::ChatConfig;
use crate::error::{Error, Result};
use crate::types::HealthResponse;
pub use state::AppState;

/// Build the route table
///
/// | Method | Path       | Handler                     |
/// |--------|------------|-----------------------------|
/// | GET    | `/`        | `static_dir/index.html`     |
/// | GET    | `/static/*`| files under `static_dir`    |
/// | GET    | `/health`  | [`health_check`]            |
/// | POST   | `/upload`  | [`routes::upload::upload_file`] |
/// | POST   | `/chat`    | [`routes::chat::chat`]      |
/// | GET    | `/files`   | [`routes::files::list_files`] |
pub fn build_router(state: AppState) -> Router {
    let server = &state.config().server;
    let static_dir = server.static_dir.clone();
    let enable_cors = server.enable_cors;

    let router = Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(&static_dir))
        .route("/health", get(health_check))
        .merge(routes::api_routes(server.max_upload_size))
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    }
}

/// Chat HTTP server
pub struct ChatServer {
    config: ChatConfig,
    state: AppState,
}

impl ChatServer {
    /// Create a server with the default component wiring
    pub fn new(config: ChatConfig) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Address the server binds to
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }

    /// Start the server and run until Ctrl+C
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = build_router(self.state);

        tracing::info!("Starting chat server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        documents: state.store().len(),
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{CompletionProvider, CompletionRequest, Role, MAX_CONTEXT_CHARS};
    use crate::ingestion::TextExtractor;
    use crate::store::{InMemoryTextStore, TextStore};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    /// Treats the upload bytes as the document text; "broken" fails
    struct FakeExtractor;

    impl TextExtractor for FakeExtractor {
        fn extract(&self, filename: &str, data: &[u8]) -> Result<String> {
            let text = String::from_utf8_lossy(data).to_string();
            if text == "broken" {
                return Err(Error::extraction(filename, "corrupt xref"));
            }
            Ok(text)
        }
    }

    /// Records every request and answers with a canned reply or failure
    #[derive(Default)]
    struct RecordingLlm {
        requests: Mutex<Vec<CompletionRequest>>,
        failure: Option<String>,
    }

    #[async_trait]
    impl CompletionProvider for RecordingLlm {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.failure {
                Some(msg) => Err(Error::llm(msg.clone())),
                None => Ok("It is about rivers.".to_string()),
            }
        }

        fn name(&self) -> &str {
            "recording"
        }

        fn model(&self) -> &str {
            "fake-model"
        }
    }

    struct Harness {
        router: Router,
        store: Arc<InMemoryTextStore>,
        llm: Arc<RecordingLlm>,
        dir: tempfile::TempDir,
    }

    fn harness_with(llm: RecordingLlm, max_upload_size: usize) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let upload_dir = dir.path().join("uploads");
        let static_dir = dir.path().join("static");
        std::fs::create_dir_all(&upload_dir).unwrap();
        std::fs::create_dir_all(&static_dir).unwrap();
        std::fs::write(static_dir.join("index.html"), "<h1>PDF Chat</h1>").unwrap();

        let mut config = ChatConfig::default();
        config.server.upload_dir = upload_dir;
        config.server.static_dir = static_dir;
        config.server.max_upload_size = max_upload_size;

        let store = Arc::new(InMemoryTextStore::new());
        let llm = Arc::new(llm);
        let state = AppState::with_components(
            config,
            store.clone(),
            Arc::new(FakeExtractor),
            llm.clone(),
        );

        Harness {
            router: build_router(state),
            store,
            llm,
            dir,
        }
    }

    fn harness() -> Harness {
        harness_with(RecordingLlm::default(), 1024 * 1024)
    }

    fn multipart_request(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
        let boundary = "pdfchatboundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn chat_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn upload(h: &Harness, filename: &str, content: &str) -> (StatusCode, Value) {
        send(&h.router, multipart_request("file", filename, content.as_bytes())).await
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_upload_registers_document() {
        let h = harness();
        let (status, body) = upload(&h, "My report.pdf", "Rivers flow downhill.").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "File uploaded successfully");
        assert_eq!(body["filename"], "My_report.pdf");
        assert_eq!(body["text_length"], 21);

        assert_eq!(h.store.get("My_report.pdf").as_deref(), Some("Rivers flow downhill."));
        let saved = std::fs::read(h.dir.path().join("uploads/My_report.pdf")).unwrap();
        assert_eq!(saved, b"Rivers flow downhill.");
    }

    #[tokio::test]
    async fn test_upload_rejects_non_pdf() {
        let h = harness();
        let (status, body) = upload(&h, "notes.txt", "plain text").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], routes::upload::INVALID_FILE_TYPE);
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn test_upload_requires_file_part() {
        let h = harness();
        let (status, body) =
            send(&h.router, multipart_request("document", "a.pdf", b"text")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], routes::upload::NO_FILE_PART);
    }

    #[tokio::test]
    async fn test_upload_without_multipart_body() {
        let h = harness();
        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&h.router, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": routes::upload::NO_FILE_PART}));
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn test_upload_requires_filename() {
        let h = harness();
        let (status, body) = upload(&h, "", "text").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], routes::upload::NO_SELECTED_FILE);
    }

    #[tokio::test]
    async fn test_upload_sanitizes_traversal() {
        let h = harness();
        let (status, body) = upload(&h, "../../evil.pdf", "payload").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["filename"], "evil.pdf");
        assert!(h.dir.path().join("uploads/evil.pdf").exists());
        assert!(!h.dir.path().join("evil.pdf").exists());
    }

    #[tokio::test]
    async fn test_upload_extraction_failure() {
        let h = harness();
        let (status, body) = upload(&h, "bad.pdf", "broken").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to extract text from PDF");
        assert!(!h.store.contains("bad.pdf"));
    }

    #[tokio::test]
    async fn test_upload_too_large() {
        let h = harness_with(RecordingLlm::default(), 256);
        let (status, _) = upload(&h, "big.pdf", &"z".repeat(4096)).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(h.store.is_empty());
        assert!(!h.dir.path().join("uploads/big.pdf").exists());
    }

    #[tokio::test]
    async fn test_reupload_overwrites_text() {
        let h = harness();
        upload(&h, "a.pdf", "first version").await;
        upload(&h, "a.pdf", "second version").await;

        let (status, _) = send(
            &h.router,
            chat_request(json!({"message": "What changed?", "filename": "a.pdf"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let requests = h.llm.requests.lock().unwrap();
        let system = &requests[0].messages[0].content;
        assert!(system.contains("second version"));
        assert!(!system.contains("first version"));
    }

    #[tokio::test]
    async fn test_chat_answers() {
        let h = harness();
        upload(&h, "a.pdf", "Rivers flow downhill.").await;

        let (status, body) = send(
            &h.router,
            chat_request(json!({"message": "What is it about?", "filename": "a.pdf"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"response": "It is about rivers."}));

        let requests = h.llm.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.messages[0].role, Role::System);
        assert!(request.messages[0].content.ends_with("Rivers flow downhill."));
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.messages[1].content, "What is it about?");
        assert_eq!(request.max_tokens, 500);
    }

    #[tokio::test]
    async fn test_chat_unknown_file() {
        let h = harness();
        let (status, body) = send(
            &h.router,
            chat_request(json!({"message": "Hello?", "filename": "never.pdf"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], routes::chat::NO_DOCUMENT);

        let (status, body) = send(&h.router, chat_request(json!({"message": "Hello?"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], routes::chat::NO_DOCUMENT);
        assert!(h.llm.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_empty_message() {
        let h = harness();
        upload(&h, "a.pdf", "text").await;

        for filename in ["a.pdf", "missing.pdf", ""] {
            let (status, body) = send(
                &h.router,
                chat_request(json!({"message": "", "filename": filename})),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], routes::chat::NO_MESSAGE);
        }
    }

    #[tokio::test]
    async fn test_chat_null_fields() {
        let h = harness();
        upload(&h, "a.pdf", "text").await;

        let (status, body) = send(
            &h.router,
            chat_request(json!({"message": null, "filename": "a.pdf"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], routes::chat::NO_MESSAGE);

        let (status, body) = send(
            &h.router,
            chat_request(json!({"message": "Hi", "filename": null})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], routes::chat::NO_DOCUMENT);
        assert!(h.llm.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_prompt_truncated() {
        let h = harness();
        let long_text = "y".repeat(MAX_CONTEXT_CHARS + 1000);
        upload(&h, "long.pdf", &long_text).await;

        send(
            &h.router,
            chat_request(json!({"message": "Summarize", "filename": "long.pdf"})),
        )
        .await;

        let requests = h.llm.requests.lock().unwrap();
        let system = &requests[0].messages[0].content;
        assert_eq!(system.matches('y').count(), MAX_CONTEXT_CHARS);
    }

    #[tokio::test]
    async fn test_chat_upstream_failure() {
        let llm = RecordingLlm {
            failure: Some("HTTP 401 Unauthorized - invalid api key".to_string()),
            ..RecordingLlm::default()
        };
        let h = harness_with(llm, 1024 * 1024);
        upload(&h, "a.pdf", "text").await;

        let (status, body) = send(
            &h.router,
            chat_request(json!({"message": "Hi", "filename": "a.pdf"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "Error communicating with AI: HTTP 401 Unauthorized - invalid api key"
        );
    }

    #[tokio::test]
    async fn test_list_files() {
        let h = harness();
        let (status, body) = send(&h.router, get("/files")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"files": []}));

        upload(&h, "a.pdf", "A").await;
        upload(&h, "b.pdf", "B").await;

        let (_, body) = send(&h.router, get("/files")).await;
        let mut files: Vec<String> = serde_json::from_value(body["files"].clone()).unwrap();
        files.sort();
        assert_eq!(files, vec!["a.pdf", "b.pdf"]);
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness();
        upload(&h, "a.pdf", "A").await;

        let (status, body) = send(&h.router, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok", "documents": 1}));
    }

    #[tokio::test]
    async fn test_index_page() {
        let h = harness();
        let response = h.router.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"<h1>PDF Chat</h1>");
    }
}
