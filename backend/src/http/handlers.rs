//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! db service layer and the render pipeline.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use tracing::{debug, info, warn};

use super::dto::{
    HealthResponse, HeatmapDto, HeatmapListResponse, OAuthCallbackQuery, OAuthStartQuery,
    RenderResponse, ReorderRequest, UserQuery, ValidateRequest, YearQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::db::{HeatmapRecord, HeatmapUpdate, NewHeatmap, NotionConnection};
use crate::models::{HeatmapId, HeatmapPeriod, UserId};
use crate::notion::{DatabaseSchema, NotionError};
use crate::services::{build_heatmap, oauth, RenderKey};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the repository is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Heatmap CRUD
// =============================================================================

/// GET /v1/heatmaps?user_id=
pub async fn list_heatmaps(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> HandlerResult<HeatmapListResponse> {
    let user_id = UserId::new(query.user_id);
    let heatmaps = db_services::list_heatmaps(state.repository.as_ref(), &user_id).await?;
    Ok(Json(heatmaps.into()))
}

/// POST /v1/heatmaps
pub async fn create_heatmap(
    State(state): State<AppState>,
    Json(request): Json<NewHeatmap>,
) -> Result<(StatusCode, Json<HeatmapDto>), AppError> {
    let record = db_services::create_heatmap(state.repository.as_ref(), &request).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// GET /v1/heatmaps/{id}
pub async fn get_heatmap(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<HeatmapDto> {
    let record = db_services::get_heatmap(state.repository.as_ref(), HeatmapId::new(id)).await?;
    Ok(Json(record.into()))
}

/// PUT /v1/heatmaps/{id}
pub async fn update_heatmap(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<HeatmapUpdate>,
) -> HandlerResult<HeatmapDto> {
    let id = HeatmapId::new(id);
    let record = db_services::update_heatmap(state.repository.as_ref(), id, &update).await?;
    state.render_cache.invalidate(id);
    Ok(Json(record.into()))
}

/// DELETE /v1/heatmaps/{id}
pub async fn delete_heatmap(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let id = HeatmapId::new(id);
    db_services::delete_heatmap(state.repository.as_ref(), id).await?;
    state.render_cache.invalidate(id);
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /v1/heatmaps/order
///
/// Returns the user's heatmaps in their new order.
pub async fn reorder_heatmaps(
    State(state): State<AppState>,
    Json(request): Json<ReorderRequest>,
) -> HandlerResult<HeatmapListResponse> {
    let repo = state.repository.as_ref();
    db_services::reorder_heatmaps(repo, &request.user_id, &request.heatmap_ids).await?;
    let heatmaps = db_services::list_heatmaps(repo, &request.user_id).await?;
    Ok(Json(heatmaps.into()))
}

// =============================================================================
// Rendering
// =============================================================================

/// GET /v1/heatmaps/{id}/render?year=
pub async fn render_heatmap(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<YearQuery>,
) -> HandlerResult<RenderResponse> {
    let id = HeatmapId::new(id);
    let generation = state.render_cache.generation(id);
    let record = db_services::get_heatmap(state.repository.as_ref(), id).await?;
    let period = HeatmapPeriod::from_year_param(query.year);
    Ok(Json(render_record(&state, record, period, generation).await?))
}

/// GET /v1/embed/{id}?year=
///
/// Public heatmaps only; private ones answer 404. Frame headers are added by the router.
pub async fn embed_heatmap(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<YearQuery>,
) -> HandlerResult<RenderResponse> {
    let id = HeatmapId::new(id);
    let generation = state.render_cache.generation(id);
    let record = db_services::get_public_heatmap(state.repository.as_ref(), id).await?;
    let period = HeatmapPeriod::from_year_param(query.year);
    Ok(Json(render_record(&state, record, period, generation).await?))
}

/// Render `record`, going through the cache. `generation` must be read from
/// the cache before `record` was loaded.
async fn render_record(
    state: &AppState,
    record: HeatmapRecord,
    period: HeatmapPeriod,
    generation: u64,
) -> Result<RenderResponse, AppError> {
    let today = state.clock.today();
    let key = RenderKey::new(record.id, period, today);
    if let Some(cached) = state.render_cache.get(&key) {
        debug!(heatmap = %record.id, ?period, "render cache hit");
        return Ok(cached);
    }

    let token = db_services::resolve_access_token(state.repository.as_ref(), &record).await?;
    let records = state
        .notion
        .query_database(&token, &record.database_id)
        .await?;

    let config = record.config();
    let mapping = record.mapping.clone();
    let week_start = config.week_start;

    // Use spawn_blocking for the CPU-bound render pass
    let view = tokio::task::spawn_blocking(move || {
        build_heatmap(&records, &mapping, period, week_start, today)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    if view.skipped_records > 0 {
        warn!(
            heatmap = %record.id,
            skipped = view.skipped_records,
            "records skipped during extraction"
        );
    }

    let response = RenderResponse {
        insights: view.stats.insights(&config.insights),
        name: record.name,
        description: record.description,
        config,
        view,
    };
    state.render_cache.insert(key, generation, response.clone());
    Ok(response)
}

// =============================================================================
// Notion
// =============================================================================

/// POST /v1/notion/validate
///
/// Checks that the key can read the database and returns its columns.
pub async fn validate_notion(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> HandlerResult<DatabaseSchema> {
    let api_key = request.api_key.trim();
    let database_id = request.database_id.trim();
    if api_key.is_empty() || database_id.is_empty() {
        return Err(AppError::BadRequest(
            "api_key and database_id are required".to_string(),
        ));
    }

    let schema = state.notion.retrieve_database(api_key, database_id).await?;
    info!(database = %schema.id, columns = schema.properties.len(), "validated Notion database");
    Ok(Json(schema))
}

/// GET /v1/notion/oauth?user_id=
///
/// Stores a fresh state and sends the browser to Notion's consent page.
pub async fn notion_oauth_start(
    State(state): State<AppState>,
    Query(query): Query<OAuthStartQuery>,
) -> Result<Redirect, AppError> {
    let settings = state
        .config
        .oauth_settings()
        .ok_or(AppError::Notion(NotionError::OAuthNotConfigured))?;

    let user_id = UserId::new(query.user_id);
    let pending =
        db_services::begin_oauth(state.repository.as_ref(), &user_id, state.clock.now()).await?;
    let url = oauth::authorize_url(&state.config.notion.api_base, &settings, &pending.state)
        .map_err(AppError::Internal)?;

    info!(user = %user_id, "redirecting to Notion for authorization");
    Ok(Redirect::to(url.as_str()))
}

/// GET /v1/notion/callback?code=&state=
///
/// Always redirects back to the front end, with the outcome in the query string.
pub async fn notion_oauth_callback(
    State(state): State<AppState>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Redirect {
    let outcome = match complete_oauth(&state, query).await {
        Ok(()) => "connected=true",
        Err(OAuthFailure::InvalidState) => "error=invalid_state",
        Err(OAuthFailure::TokenExchange) => "error=token_exchange",
    };
    Redirect::to(&format!("{}/create?{}", state.config.app_url(), outcome))
}

enum OAuthFailure {
    InvalidState,
    TokenExchange,
}

async fn complete_oauth(state: &AppState, query: OAuthCallbackQuery) -> Result<(), OAuthFailure> {
    let repo = state.repository.as_ref();

    let Some(state_param) = query.state.filter(|s| !s.is_empty()) else {
        warn!("OAuth callback without state");
        return Err(OAuthFailure::InvalidState);
    };
    let user_id = db_services::consume_oauth_state(repo, &state_param, state.clock.now())
        .await
        .map_err(|e| {
            warn!("Rejected OAuth state: {}", e);
            OAuthFailure::InvalidState
        })?;

    if let Some(error) = query.error {
        warn!(user = %user_id, "Notion authorization declined: {}", error);
        return Err(OAuthFailure::TokenExchange);
    }
    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        return Err(OAuthFailure::TokenExchange);
    };

    let token = state
        .notion
        .exchange_code(&code, &state.config.notion.redirect_uri)
        .await
        .map_err(|e| {
            warn!(user = %user_id, "Notion token exchange failed: {}", e);
            OAuthFailure::TokenExchange
        })?;

    let connection = NotionConnection {
        user_id,
        access_token: token.access_token,
        workspace_id: token.workspace_id,
        workspace_name: token.workspace_name,
        bot_id: token.bot_id,
        connected_at: state.clock.now(),
    };
    db_services::store_connection(repo, &connection)
        .await
        .map_err(|e| {
            warn!("Could not store Notion connection: {}", e);
            OAuthFailure::TokenExchange
        })
}
