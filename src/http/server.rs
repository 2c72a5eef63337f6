//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dial route and fallbacks
//! - Wire up middleware (tracing, request ID, timeout, body limit, metrics)
//! - Bind server to listener
//! - Drain and stop on a shutdown signal or a fatal dial error

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::DialerConfig;
use crate::http::handlers::{method_not_allowed, not_found, show_dial, update_dial};
use crate::http::request::{propagate_request_id_layer, request_id_of, set_request_id_layer};
use crate::lifecycle::{shutdown_signal, Shutdown};
use crate::observability::metrics;
use crate::toggle::ToggleState;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub toggle: Arc<ToggleState>,
    pub uri: Arc<str>,
    pub shutdown: Arc<Shutdown>,
}

/// HTTP server for the dial page.
pub struct DialServer {
    router: Router,
    config: DialerConfig,
    shutdown: Arc<Shutdown>,
}

impl DialServer {
    /// Create a new HTTP server serving `toggle` on the configured route.
    pub fn new(config: DialerConfig, toggle: ToggleState, shutdown: Arc<Shutdown>) -> Self {
        let state = AppState {
            toggle: Arc::new(toggle),
            uri: Arc::from(config.uri.as_str()),
            shutdown: shutdown.clone(),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            shutdown,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &DialerConfig, state: AppState) -> Router {
        let dial_route = get(show_dial).post(update_dial).fallback(method_not_allowed);

        Router::new()
            .route(&config.uri, dial_route)
            .fallback(not_found)
            .with_state(state)
            .layer(middleware::from_fn(track_metrics))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            ))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            uri = %self.config.uri,
            "Listening"
        );

        let mut fatal = self.shutdown.subscribe();
        let shutdown = async move {
            tokio::select! {
                _ = shutdown_signal() => {}
                _ = fatal.recv() => {}
            }
        };

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &DialerConfig {
        &self.config
    }
}

async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let request_id = request_id_of(&request);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %request.uri().path(),
        "Handling request"
    );

    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16(), start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode};
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::store::DocumentStore;

    const URI: &str = "/dials";

    struct Harness {
        dir: TempDir,
        shutdown: Arc<Shutdown>,
        router: Router,
    }

    impl Harness {
        fn new(contents: &str) -> Self {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("dials.json");
            fs::write(&path, contents).unwrap();

            let config = DialerConfig::new(path.to_string_lossy(), "smp", URI, 0);
            let toggle = ToggleState::new(DocumentStore::new(path, "smp"));
            let shutdown = Arc::new(Shutdown::new());
            let server = DialServer::new(config, toggle, shutdown.clone());

            Self {
                dir,
                shutdown,
                router: server.router(),
            }
        }

        fn document(&self) -> String {
            fs::read_to_string(self.dir.path().join("dials.json")).unwrap()
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let headers = response.headers().clone();
            let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, headers, String::from_utf8(body.to_vec()).unwrap())
        }

        async fn get(&self, method: Method, path: &str) -> (StatusCode, axum::http::HeaderMap, String) {
            let request = Request::builder()
                .method(method)
                .uri(path)
                .body(Body::empty())
                .unwrap();
            self.send(request).await
        }

        async fn post(&self, path: &str, form: &str) -> (StatusCode, axum::http::HeaderMap, String) {
            let request = Request::builder()
                .method(Method::POST)
                .uri(path)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap();
            self.send(request).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_renders_page() {
        let harness = Harness::new(r#"{"smp":"disabled"}"#);
        let (status, headers, body) = harness.get(Method::GET, URI).await;

        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        assert!(headers.contains_key("x-request-id"));
        assert!(body.contains("SMP status is disabled"));
        assert!(!body.contains(r#"id="dials-timer""#));
    }

    #[tokio::test(start_paused = true)]
    async fn test_head_matches_get_without_body() {
        let harness = Harness::new(r#"{"smp":"disabled"}"#);
        let (get_status, get_headers, _) = harness.get(Method::GET, URI).await;
        let (status, headers, body) = harness.get(Method::HEAD, URI).await;

        assert_eq!(status, get_status);
        assert_eq!(headers[header::CONTENT_TYPE], get_headers[header::CONTENT_TYPE]);
        assert!(body.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_post_changes_dial_and_redirects() {
        let harness = Harness::new(r#"{"smp":"disabled","other":true}"#);

        let (status, headers, _) = harness.post(URI, "smp=enabled").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], URI);
        assert_eq!(harness.document(), r#"{"smp":"enabled","other":true}"#);

        let (_, _, body) = harness.get(Method::GET, URI).await;
        assert!(body.contains("SMP status is enabled"));
        assert!(body.contains(r#"<div id="dials-timer">60 seconds</div>"#));

        tokio::time::sleep(Duration::from_millis(60_050)).await;
        let (_, _, body) = harness.get(Method::GET, URI).await;
        assert!(!body.contains(r#"id="dials-timer""#));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_post_does_not_restart_countdown() {
        let harness = Harness::new(r#"{"smp":"enabled"}"#);

        harness.post(URI, "smp=disabled").await;
        tokio::time::sleep(Duration::from_millis(10_050)).await;

        let (status, headers, _) = harness.post(URI, "smp=disabled").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], URI);

        let (_, _, body) = harness.get(Method::GET, URI).await;
        assert!(body.contains(r#"<div id="dials-timer">50 seconds</div>"#));
    }

    #[tokio::test]
    async fn test_other_methods_are_rejected() {
        let harness = Harness::new(r#"{"smp":"disabled"}"#);

        for method in [Method::PUT, Method::DELETE, Method::PATCH] {
            let (status, _, body) = harness.get(method.clone(), URI).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(body, format!("405 HTTP method {} not allowed", method));
        }
        assert_eq!(harness.document(), r#"{"smp":"disabled"}"#);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let harness = Harness::new(r#"{"smp":"disabled"}"#);

        for path in ["/", "/dials/", "/other"] {
            let (status, _, _) = harness.get(Method::GET, path).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }

        let (status, _, _) = harness.post("/other", "smp=enabled").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(harness.document(), r#"{"smp":"disabled"}"#);
    }

    #[tokio::test]
    async fn test_post_without_field_is_rejected() {
        let harness = Harness::new(r#"{"smp":"disabled"}"#);

        let (status, _, _) = harness.post(URI, "other=enabled").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(harness.document(), r#"{"smp":"disabled"}"#);
    }

    #[tokio::test]
    async fn test_corrupt_document_triggers_fatal_shutdown() {
        let harness = Harness::new(r#"{"smp":"disabled"}"#);
        let mut shutdown_rx = harness.shutdown.subscribe();

        fs::write(harness.dir.path().join("dials.json"), r#"{"smp":1}"#).unwrap();
        let (status, _, _) = harness.get(Method::GET, URI).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(shutdown_rx.recv().await.is_ok());
        assert!(harness.shutdown.is_fatal());
    }

    #[tokio::test]
    async fn test_persist_failure_keeps_serving() {
        let harness = Harness::new(r#"{"smp":"disabled"}"#);
        fs::create_dir(harness.dir.path().join("dials.json.tmp")).unwrap();

        let (status, _, _) = harness.post(URI, "smp=enabled").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!harness.shutdown.is_fatal());

        let (status, _, body) = harness.get(Method::GET, URI).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("SMP status is disabled"));
    }
}
