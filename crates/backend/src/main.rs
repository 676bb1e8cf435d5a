pub mod domain;
pub mod handlers;
pub mod shared;

use std::sync::Arc;

use anyhow::Context;

use domain::code_store::FileCodeStore;
use domain::issuance_log::FileIssuanceLog;
use shared::certificate::CertificateRenderer;
use shared::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use axum::middleware::{self, Next};
    use axum::response::Response;
    use axum::{
        routing::{get, post},
        Router,
    };
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::services::ServeDir;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("backend.log"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    async fn request_logger(req: Request<Body>, next: Next) -> Response {
        use axum::body::to_bytes;

        let start = std::time::Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let response = next.run(req).await;
        let (parts, body) = response.into_parts();

        // Buffer the body to report its real size.
        let bytes = match to_bytes(body, usize::MAX).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    "{} | {:>5}ms | body read failed ({e}) | {} {}",
                    parts.status.as_u16(),
                    start.elapsed().as_millis(),
                    method,
                    path
                );
                return Response::from_parts(parts, Body::default());
            }
        };

        tracing::info!(
            "{} | {:>5}ms | {:>8}b | {} {}",
            parts.status.as_u16(),
            start.elapsed().as_millis(),
            bytes.len(),
            method,
            path
        );
        Response::from_parts(parts, Body::from(bytes))
    }

    let config = shared::config::load_config()?;

    let codes = Arc::new(FileCodeStore::new(&config.storage.codes_path));
    let log = Arc::new(FileIssuanceLog::new(&config.storage.log_path));
    let renderer = Arc::new(CertificateRenderer::new(config.certificate.clone()));

    // The codes file is the one piece of state the service cannot run
    // without; fail at startup rather than on the first submission.
    use domain::code_store::CodeStore as _;
    let outstanding = codes
        .load_all()
        .await
        .with_context(|| format!("cannot read codes file {}", config.storage.codes_path))?;
    tracing::info!("{} redemption codes outstanding", outstanding.len());

    let state = AppState {
        codes,
        log,
        renderer,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/redemption", post(handlers::redemption::redeem))
        .route("/api/issuance-log", get(handlers::issuance_log::list_all))
        .fallback_service(ServeDir::new("static"))
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = ([0, 0, 0, 0], config.server.port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    config.server.port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", config.server.port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
