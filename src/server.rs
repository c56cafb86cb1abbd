use crate::calculator::DealCalculator;
use crate::constants::{SERVICE_NAME, UPLOAD_FIELD};
use crate::error::PropperError;
use crate::pipeline::{preview_upload, process_upload};
use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Extension, Router,
};
use hyper::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Read-only state shared by every request
pub struct AppState {
    pub calculator: Arc<dyn DealCalculator>,
    pub preview_limit: usize,
    pub max_upload_bytes: usize,
}

/// Every failure surfaces as a 400 with the message in `detail`
#[derive(Debug)]
pub struct ApiError(String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "detail": self.0 })),
        )
            .into_response()
    }
}

impl From<PropperError> for ApiError {
    fn from(err: PropperError) -> Self {
        ApiError(err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError(err.to_string())
    }
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Pull the uploaded file out of the multipart body
async fn read_upload(mut multipart: Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        return Ok((filename, bytes.to_vec()));
    }
    Err(ApiError(format!("Missing multipart field '{}'", UPLOAD_FIELD)))
}

async fn upload(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (filename, bytes) = read_upload(multipart).await?;
    let preview = preview_upload(&bytes, &filename, state.preview_limit).map_err(|e| {
        warn!("Upload of '{}' rejected: {}", filename, e);
        ApiError::from(e)
    })?;
    Ok(Json(preview))
}

async fn calculate(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (filename, bytes) = read_upload(multipart).await?;
    let response = process_upload(&bytes, &filename, state.calculator.as_ref()).map_err(|e| {
        warn!("Calculation for '{}' rejected: {}", filename, e);
        ApiError::from(e)
    })?;
    Ok(Json(response))
}

async fn metrics_endpoint() -> Response {
    match crate::metrics::render() {
        Some(body) => body.into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

/// Create the HTTP server with all routes
pub fn create_server(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let max_upload_bytes = state.max_upload_bytes;

    Router::new()
        .route("/api/health", get(health))
        .route("/api/upload", post(upload))
        .route("/api/calculate", post(calculate))
        .route("/metrics", get(metrics_endpoint))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(Extension(state))
        .layer(ServiceBuilder::new().layer(cors))
}

/// Start the HTTP server on the given address
pub async fn start_server(state: Arc<AppState>, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_server(state);

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!("HTTP server listening on http://{addr}");
    info!("Health check: http://{addr}/api/health");

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}
