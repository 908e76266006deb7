use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use chrono::Utc;
use include_dir::{include_dir, Dir};
use std::sync::Arc;
use tower_http::{cors::{Any, CorsLayer}, trace::TraceLayer};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::{
    enrichment::Enricher,
    error::AppError,
    models::{Currency, ProductInput, ProductResult},
    pdf::{file_name, render_listing},
};

static ASSETS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/static");

const ALLOWED_HEADERS: [HeaderName; 4] = [
    header::AUTHORIZATION,
    HeaderName::from_static("x-client-info"),
    HeaderName::from_static("apikey"),
    header::CONTENT_TYPE,
];
const ALLOWED_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];

#[derive(Clone)]
pub struct AppState {
    pub enricher: Arc<Enricher>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/*path", get(static_asset))
        .route("/api/currencies", get(list_currencies))
        .route("/api/generate-from-text", post(generate_from_text))
        .route("/functions/v1/generate-from-text", post(generate_from_text))
        .route("/api/listing/pdf", post(export_pdf))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(ALLOWED_METHODS)
                .allow_headers(ALLOWED_HEADERS)
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn generate_from_text(
    State(state): State<AppState>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<ProductResult>, AppError> {
    let span = info_span!("generate_from_text", request_id = %Uuid::new_v4());
    async move {
        let Json(input) = payload?;
        info!(
            title = %input.title,
            currency = %input.currency,
            keywords = input.keywords.as_ref().map_or(0, Vec::len),
            "Processing text input"
        );
        let result = state.enricher.enrich(input).await?;
        info!(category = %result.product_info.category, "✅ Generated result");
        Ok(Json(result))
    }
    .instrument(span)
    .await
}

pub async fn list_currencies() -> Json<Vec<Currency>> {
    Json(Currency::ALL.to_vec())
}

pub async fn export_pdf(payload: Result<Json<ProductResult>, JsonRejection>) -> Result<Response, AppError> {
    let Json(listing) = payload?;
    let pdf_bytes = render_listing(&listing, Utc::now())?;
    info!("📄 Rendered listing PDF for '{}' ({} bytes)", listing.product_info.title, pdf_bytes.len());
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file_name(&listing)))
        .map_err(|e| AppError::Export(e.to_string()))?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(pdf_bytes),
    )
        .into_response())
}

pub async fn index() -> Response {
    serve_asset("index.html")
}

pub async fn static_asset(Path(path): Path<String>) -> Response {
    serve_asset(&path)
}

fn serve_asset(path: &str) -> Response {
    let Some(file) = ASSETS.get_file(path) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let mime = match path.rsplit('.').next() {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    };
    ([(header::CONTENT_TYPE, mime)], file.contents()).into_response()
}
