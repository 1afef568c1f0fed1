use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sightline_api::config::ServerConfig;
use sightline_api::engine::{DetectionCoordinator, StoreJanitor, TaskStore};
use sightline_api::{routes, state};
use sightline_detector::StubDetector;

use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let cors = build_cors_layer(&config);

    // Engine wiring: one store, one stub detector, one coordinator, all
    // shared by handle.
    let store = Arc::new(TaskStore::new());
    let detector = Arc::new(StubDetector::new(
        config.detect_min_delay_ms,
        config.detect_max_delay_ms,
    ));
    let coordinator = Arc::new(DetectionCoordinator::new(
        Arc::clone(&store),
        detector,
        config.detect_concurrency,
    ));
    tracing::info!(
        concurrency = config.detect_concurrency,
        "Detection engine ready",
    );

    // The janitor evicts expired completed jobs until cancelled at
    // shutdown.
    let janitor_cancel = tokio_util::sync::CancellationToken::new();
    let janitor = StoreJanitor::new(
        Arc::clone(&store),
        config.job_ttl_secs,
        config.job_sweep_interval_secs,
    );
    let janitor_cancel_clone = janitor_cancel.clone();
    let janitor_handle = tokio::spawn(async move {
        janitor.run(janitor_cancel_clone).await;
    });

    let state = AppState {
        config: Arc::new(config.clone()),
        store: Arc::clone(&store),
        coordinator,
    };

    let request_id_header = HeaderName::from_static("x-request-id");

    let mut app = Router::new()
        // Liveness stays unversioned at the root.
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes());

    // When a frontend build is present next to the binary, serve it as
    // the fallback, with index.html covering SPA routes.
    let frontend = std::path::Path::new(&config.frontend_dir);
    if frontend.is_dir() {
        tracing::info!(dir = %config.frontend_dir, "Serving static frontend");
        app = app.fallback_service(
            ServeDir::new(frontend).fallback(ServeFile::new(frontend.join("index.html"))),
        );
    }

    // Middleware, applied bottom-up: CORS and request-id assignment run
    // first on the way in, panic recovery wraps everything.
    let app = app
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // In-flight workers are not awaited: jobs are in-memory only, so
    // there is nothing they could leave half-persisted.
    tracing::info!("Server stopped accepting connections, cleaning up");

    janitor_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), janitor_handle).await;
    tracing::info!("Store janitor stopped");

    let jobs_tracked = store.job_count().await;
    tracing::info!(jobs_tracked, "Graceful shutdown complete");
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; the default keeps this crate and the HTTP
/// layer at debug.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sightline_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Block until SIGINT or (on Unix) SIGTERM arrives.
///
/// Covers both an interactive Ctrl-C and a supervisor-sent TERM, so
/// shutdown is graceful either way.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

/// CORS layer from the configured origin list.
///
/// An unparseable origin panics at startup: a misconfigured server
/// should refuse to come up rather than silently reject browsers.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}
