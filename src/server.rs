//! JSON HTTP API for the catalog.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/api/categories` | Category tree, course bodies omitted |
//! | `GET`  | `/api/categories/{slug}` | One category, course bodies omitted |
//! | `GET`  | `/api/courses/{id}?locale=zh\|en` | One course plus rendered HTML |
//! | `GET`  | `/api/search?q=&page=&limit=&locale=` | Ranked search page |
//! | `POST` | `/api/search/rebuild` | Drop and rebuild the search index |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "query must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).
//!
//! The catalog is rebuilt from disk on every tree request; only the search
//! index is cached. Filesystem work runs on the blocking pool.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use course_catalog_core::index::IndexCache;
use course_catalog_core::models::{Category, Locale, SearchPage};
use course_catalog_core::search::{search_page, SearchError};

use crate::catalog::{build_catalog, find_category};
use crate::config::Config;
use crate::get::{course_page, CoursePage};
use crate::search::build_search_index;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// The only shared mutable state: the cached search index.
    pub index: Arc<IndexCache>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            index: Arc::new(IndexCache::new()),
        }
    }
}

/// Builds the router with CORS open to all origins.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/categories", get(handle_categories))
        .route("/api/categories/{slug}", get(handle_category))
        .route("/api/courses/{id}", get(handle_course))
        .route("/api/search", get(handle_search))
        .route("/api/search/rebuild", post(handle_rebuild))
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP server on `[server].bind` and runs until the process
/// is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(AppState::new(config.clone()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(bind = %bind_addr, docs = %config.docs.root.display(), "catalog server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    let message = message.into();
    tracing::error!(error = %message, "request failed");
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message,
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        bad_request(err.to_string())
    }
}

/// Runs filesystem work on the blocking pool.
async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| internal(format!("worker failed: {}", e)))?
        .map_err(|e| internal(format!("{:#}", e)))
}

fn parse_locale(raw: Option<&str>) -> Result<Locale, AppError> {
    match raw {
        None | Some("") => Ok(Locale::default()),
        Some(s) => s.parse().map_err(|e: String| bad_request(e)),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ Categories ============

#[derive(Serialize)]
struct CategoriesResponse {
    categories: Vec<Category>,
}

async fn handle_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let config = state.config.clone();
    let mut categories = blocking(move || build_catalog(&config)).await?;
    categories.iter_mut().for_each(Category::strip_content);
    Ok(Json(CategoriesResponse { categories }))
}

async fn handle_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Category>, AppError> {
    let config = state.config.clone();
    let categories = blocking(move || build_catalog(&config)).await?;
    let mut category = find_category(&categories, &slug)
        .cloned()
        .ok_or_else(|| not_found(format!("category not found: {}", slug)))?;
    category.strip_content();
    Ok(Json(category))
}

// ============ Courses ============

#[derive(Deserialize)]
struct LocaleParams {
    locale: Option<String>,
}

async fn handle_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<LocaleParams>,
) -> Result<Json<CoursePage>, AppError> {
    let locale = parse_locale(params.locale.as_deref())?;
    let config = state.config.clone();
    let categories = blocking(move || build_catalog(&config)).await?;
    course_page(&categories, &id, locale)
        .map(Json)
        .ok_or_else(|| not_found(format!("course not found: {}", id)))
}

// ============ Search ============

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
    page: Option<usize>,
    limit: Option<usize>,
    locale: Option<String>,
}

async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchPage>, AppError> {
    let query = params.q.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(bad_request("query must not be empty"));
    }
    let locale = parse_locale(params.locale.as_deref())?;
    let limit = state.config.search.effective_limit(params.limit);

    let config = state.config.clone();
    let cache = state.index.clone();
    let index = blocking(move || cache.get_or_build(|| build_search_index(&config))).await?;

    let page = search_page(&query, &index.entries, params.page.unwrap_or(1), limit, locale)?;
    Ok(Json(page))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RebuildResponse {
    entries: usize,
    built_at: DateTime<Utc>,
}

async fn handle_rebuild(State(state): State<AppState>) -> Result<Json<RebuildResponse>, AppError> {
    let config = state.config.clone();
    let cache = state.index.clone();
    let index = blocking(move || cache.rebuild(|| build_search_index(&config))).await?;
    tracing::info!(entries = index.entries.len(), "search index rebuilt");
    Ok(Json(RebuildResponse {
        entries: index.entries.len(),
        built_at: index.built_at,
    }))
}
