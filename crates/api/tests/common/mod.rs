use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use sightline_api::config::ServerConfig;
use sightline_api::engine::{DetectionCoordinator, TaskStore};
use sightline_api::routes;
use sightline_api::state::AppState;
use sightline_detector::Detector;

/// `ServerConfig` for tests: the dev CORS origin, zero detector
/// latency, and a frontend dir that never exists so static serving
/// stays out of the way.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        detect_concurrency: 8,
        detect_min_delay_ms: 0,
        detect_max_delay_ms: 0,
        job_ttl_secs: 3600,
        job_sweep_interval_secs: 60,
        frontend_dir: "does-not-exist".to_string(),
    }
}

/// The full application router around an injectable detector.
///
/// Rebuilds the same middleware stack `main.rs` assembles (CORS,
/// request id, timeout, tracing, panic recovery), so what the tests
/// drive is what production runs.
pub fn build_test_app(detector: Arc<dyn Detector>) -> Router {
    let config = test_config();
    let store = Arc::new(TaskStore::new());
    let coordinator = Arc::new(DetectionCoordinator::new(
        Arc::clone(&store),
        detector,
        config.detect_concurrency,
    ));

    let state = AppState {
        config: Arc::new(config),
        store,
        coordinator,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Read a response body to completion as raw bytes.
pub async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

/// Read a response body to completion and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

/// Build a multipart POST request with one `files` part per payload.
pub fn multipart_request(uri: &str, parts: &[&[u8]]) -> Request<Body> {
    const BOUNDARY: &str = "sightline-test-boundary";

    let mut body = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"files\"; filename=\"img{i}.png\"\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(part);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Deterministic 16x16 PNG payload, encoded in memory.
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::new(16, 16);
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}
