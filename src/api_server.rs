// Axum API Server Module
//
// Purpose: read-only JSON projections of the item catalog (table rows,
// requirements, profitable crafts) plus a reload trigger.

#[cfg(feature = "api")]
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

#[cfg(feature = "api")]
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

#[cfg(feature = "api")]
use moka::future::Cache;

#[cfg(feature = "api")]
use std::sync::Arc;

#[cfg(feature = "api")]
use std::time::Duration;

#[cfg(feature = "api")]
use tokio::sync::Mutex;

#[cfg(feature = "api")]
use anyhow::Context;

#[cfg(feature = "api")]
use serde::Deserialize;

#[cfg(feature = "api")]
use crate::catalog::{Catalog, TableQuery};

#[cfg(feature = "api")]
use crate::categories::{
    default_category_set, filterable_categories, parse_category_list, ITEM_CATEGORIES,
};

#[cfg(feature = "api")]
use crate::config::EngineConfig;

#[cfg(feature = "api")]
use crate::loader::{DataSource, DirectorySource};

#[cfg(feature = "api")]
use crate::session_cache::SessionCache;

#[cfg(feature = "api")]
use crate::sorting::{SortColumn, SortState};

#[cfg(feature = "api")]
use crate::table_cache::UrlImageResolver;

#[cfg(feature = "api")]
use crate::utils::naming::wiki_url;

// ============================================================================
// Application State
// ============================================================================

#[cfg(feature = "api")]
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Mutex<Catalog>>,
    pub source: Arc<dyn DataSource>,
    /// Serialized responses keyed on the catalog revision they were built from
    pub cache: Cache<String, serde_json::Value>,
}

#[cfg(feature = "api")]
impl AppState {
    pub async fn new(config: &EngineConfig) -> anyhow::Result<Self> {
        tracing::info!("Opening data directory {}...", config.data_dir.display());
        let source: Arc<dyn DataSource> = Arc::new(
            DirectorySource::new(&config.data_dir)
                .with_cache(SessionCache::new(config.cache_ttl)),
        );

        tracing::info!("Loading catalog...");
        let loader = Arc::clone(&source);
        let catalog = tokio::task::spawn_blocking(move || Catalog::load(loader.as_ref()))
            .await
            .context("catalog loader task failed")?
            .with_context(|| {
                format!("failed to load catalog from {}", config.data_dir.display())
            })?
            .with_language(config.language.clone())
            .with_images(Arc::new(UrlImageResolver::new(config.image_base_url.clone())));
        tracing::info!("Loaded {} items", catalog.items().len());

        Ok(Self::from_parts(catalog, source))
    }

    /// State around an already-built catalog.
    pub fn from_parts(catalog: Catalog, source: Arc<dyn DataSource>) -> Self {
        tracing::info!("Initializing Moka response cache...");
        let cache = Cache::builder()
            .max_capacity(1_000)
            .time_to_live(Duration::from_secs(300))
            .build();

        Self {
            catalog: Arc::new(Mutex::new(catalog)),
            source,
            cache,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

#[cfg(feature = "api")]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Item table
        .route("/api/items", get(list_items))
        .route("/api/items/:id", get(get_item))

        // Derived views
        .route("/api/requirements/:id", get(get_requirements))
        .route("/api/profitable", get(get_profitable))
        .route("/api/categories", get(get_categories))

        // Refetch all collections
        .route("/api/reload", post(reload))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[cfg(feature = "api")]
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let items = state.catalog.lock().await.items().len();
    Json(serde_json::json!({
        "status": "healthy",
        "items": items,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Query string for `/api/items`
#[cfg(feature = "api")]
#[derive(Debug, Default, Deserialize)]
pub struct ItemListParams {
    /// Search term
    pub q: Option<String>,
    /// Comma-separated category names; filterable categories when absent
    pub categories: Option<String>,
    /// item | craftingStation | neededFor | value
    pub sort: Option<String>,
    pub desc: Option<bool>,
}

#[cfg(feature = "api")]
impl ItemListParams {
    fn cache_key(&self, revision: u64) -> String {
        format!(
            "items:{}:{}:{}:{}:{}",
            revision,
            self.q.as_deref().unwrap_or(""),
            self.categories.as_deref().unwrap_or("*"),
            self.sort.as_deref().unwrap_or(""),
            self.desc.unwrap_or(false)
        )
    }

    fn to_table_query(&self) -> Result<TableQuery, AppError> {
        let column = match self.sort.as_deref() {
            Some(raw) => raw
                .parse::<SortColumn>()
                .map_err(|e| AppError::BadRequest(e.to_string()))?,
            None => SortColumn::default(),
        };

        let categories = match self.categories.as_deref() {
            Some(raw) => parse_category_list(raw),
            None => default_category_set(),
        };

        Ok(TableQuery {
            search: self.q.clone().unwrap_or_default(),
            categories,
            sort: SortState::new(column, self.desc.unwrap_or(false)),
        })
    }
}

#[cfg(feature = "api")]
async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ItemListParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let query = params.to_table_query()?;

    let mut catalog = state.catalog.lock().await;
    let cache_key = params.cache_key(catalog.revision());
    if let Some(cached) = state.cache.get(&cache_key).await {
        tracing::debug!("Cache hit for {}", cache_key);
        return Ok(Json(cached));
    }

    let start = std::time::Instant::now();
    let view = catalog.table_view(&query);
    drop(catalog);
    tracing::debug!(
        "Table view '{}' returned {} of {} items in {:?}",
        query.search,
        view.counts.filtered,
        view.counts.total,
        start.elapsed()
    );

    let json = serde_json::to_value(&view).map_err(|e| AppError::Internal(e.to_string()))?;
    state.cache.insert(cache_key, json.clone()).await;
    Ok(Json(json))
}

#[cfg(feature = "api")]
async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut catalog = state.catalog.lock().await;
    let requirements = catalog.requirements();
    let bench_names = catalog.bench_names();

    let item = catalog
        .item(&id)
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", id)))?;
    let profit = catalog.crafting_profit(&id);

    Ok(Json(serde_json::json!({
        "item": item,
        "displayName": item.display_name(catalog.language()),
        "wikiUrl": wiki_url(&item.id),
        "craftingStation": bench_names.bench_label(item),
        "neededFor": requirements.get(&id),
        "profit": profit,
    })))
}

#[cfg(feature = "api")]
async fn get_requirements(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut catalog = state.catalog.lock().await;
    let requirements = catalog.requirements();

    match requirements.get(&id) {
        Some(entry) => Ok(Json(serde_json::json!(entry))),
        // A known item nothing requires
        None if catalog.item(&id).is_some() => Ok(Json(serde_json::json!({
            "totalQuantity": 0,
            "usedIn": []
        }))),
        None => Err(AppError::NotFound(format!("No requirements for {}", id))),
    }
}

#[cfg(feature = "api")]
async fn get_profitable(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (cache_key, json) = {
        let catalog = state.catalog.lock().await;
        let cache_key = format!("profitable:{}", catalog.revision());
        if let Some(cached) = state.cache.get(&cache_key).await {
            tracing::debug!("Cache hit for profitable crafts");
            return Ok(Json(cached));
        }

        let profitable = catalog.profitable_items();
        let json = serde_json::to_value(&profitable)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        (cache_key, json)
    };

    state.cache.insert(cache_key, json.clone()).await;
    Ok(Json(json))
}

#[cfg(feature = "api")]
async fn get_categories() -> impl IntoResponse {
    Json(serde_json::json!({
        "filterable": filterable_categories(),
        "all": ITEM_CATEGORIES,
    }))
}

#[cfg(feature = "api")]
async fn reload(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    tracing::info!("Reloading catalog...");
    let start = std::time::Instant::now();

    let source = Arc::clone(&state.source);
    let dataset = tokio::task::spawn_blocking(move || source.refresh())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Unavailable(e.to_string()))?;

    let items = {
        let mut catalog = state.catalog.lock().await;
        catalog.replace_dataset(dataset);
        catalog.items().len()
    };
    state.cache.invalidate_all();

    tracing::info!("Reloaded {} items in {:?}", items, start.elapsed());
    Ok(Json(serde_json::json!({
        "status": "reloaded",
        "items": items
    })))
}

// ============================================================================
// Error Handling
// ============================================================================

#[cfg(feature = "api")]
#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    /// Source data could not be fetched; the previous catalog stays live
    Unavailable(String),
    Internal(String),
}

#[cfg(feature = "api")]
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
