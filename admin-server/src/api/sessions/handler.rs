//! Session API Handlers
//!
//! GET / POST / PUT / PATCH(deactivate)，响应统一信封：
//! `{"success": true, "data": ...}` / `{"success": false, "error": ...}`

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::repository::session::{self, SessionListFilter};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, time};
use shared::models::{RecurrenceType, Session, SessionCreate, SessionDeactivate, SessionUpdate};
use shared::response::ApiResponse;

const RESOURCE: &str = "sessions";

/// List query params
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub franchise_id: Option<i64>,
    /// Session type; "all" means unrestricted
    pub session_type: Option<String>,
    #[serde(default)]
    pub active_only: bool,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

/// GET /api/sessions - 获取场次列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Session>>>> {
    // Bounds are validated up front so malformed dates fail loudly
    // instead of silently matching nothing.
    if let Some(start) = query.start_date.as_deref() {
        time::parse_date(start)?;
    }
    if let Some(end) = query.end_date.as_deref() {
        time::parse_date(end)?;
    }

    let session_type = shared::query::normalize_choice(query.session_type.as_deref());
    let filter = SessionListFilter {
        franchise_id: query.franchise_id,
        session_type: session_type.as_deref(),
        active_only: query.active_only,
        date_from: query.start_date.as_deref(),
        date_to: query.end_date.as_deref(),
        search: query.search.as_deref(),
        order_by: query.sort_by.as_deref(),
        descending: query.sort_dir.as_deref() == Some("desc"),
    };
    let sessions = session::find_all(&state.pool, &filter).await?;
    Ok(Json(ApiResponse::ok(sessions)))
}

/// GET /api/sessions/{id} - 获取单个场次
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Session>>> {
    let session = session::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Session {id}")))?;
    Ok(Json(ApiResponse::ok(session)))
}

fn validate_create(payload: &SessionCreate) -> AppResult<()> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    time::parse_time(&payload.start_time)?;
    if let Some(end_time) = payload.end_time.as_deref() {
        time::parse_time(end_time)?;
    }
    match (&payload.date, payload.recurrence_type) {
        // One-off sessions need a concrete date
        (None, RecurrenceType::None) => Err(AppError::validation(
            "date is required for non-recurring sessions",
        )),
        (Some(date), _) => time::parse_date(date).map(|_| ()),
        (None, _) => Ok(()),
    }?;
    if payload.max_capacity < 0 {
        return Err(AppError::validation("maxCapacity must not be negative"));
    }
    Ok(())
}

/// POST /api/sessions - 创建场次 (201)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SessionCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<Session>>)> {
    validate_create(&payload)?;

    let session = session::create(&state.pool, payload).await?;
    let id = session.id.to_string();

    state.broadcast_sync(RESOURCE, "created", &id, Some(&session));

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(session))))
}

/// PUT /api/sessions/{id} - 更新场次
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SessionUpdate>,
) -> AppResult<Json<ApiResponse<Session>>> {
    if let Some(name) = payload.name.as_deref() {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(date) = payload.date.as_deref() {
        time::parse_date(date)?;
    }
    if let Some(start_time) = payload.start_time.as_deref() {
        time::parse_time(start_time)?;
    }

    let session = session::update(&state.pool, id, payload).await?;
    let id_str = id.to_string();

    state.broadcast_sync(RESOURCE, "updated", &id_str, Some(&session));

    Ok(Json(ApiResponse::ok(session)))
}

/// Booked-count adjustment payload
#[derive(Debug, serde::Deserialize)]
pub struct BookedCountPayload {
    /// Positive on booking, negative on cancellation
    pub delta: i64,
}

/// POST /api/sessions/{id}/booked-count - 预订人数变更
pub async fn adjust_booked_count(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<BookedCountPayload>,
) -> AppResult<Json<ApiResponse<Session>>> {
    session::adjust_booked_count(&state.pool, id, payload.delta).await?;
    let session = session::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Session {id}")))?;
    let id_str = id.to_string();

    state.broadcast_sync(RESOURCE, "updated", &id_str, Some(&session));

    Ok(Json(ApiResponse::ok(session)))
}

/// PATCH /api/sessions/{id}/deactivate - 软停用 (需要 reason)
pub async fn deactivate(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SessionDeactivate>,
) -> AppResult<Json<ApiResponse<Session>>> {
    validate_required_text(&payload.reason, "reason", MAX_NOTE_LEN)?;

    let deactivated = session::deactivate(&state.pool, id, payload.reason.trim()).await?;
    if !deactivated {
        // Either absent or already inactive; disambiguate for the caller
        return match session::find_by_id(&state.pool, id).await? {
            Some(_) => Err(AppError::conflict(format!(
                "Session {id} is already deactivated"
            ))),
            None => Err(AppError::not_found(format!("Session {id}"))),
        };
    }

    let session = session::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Session {id}")))?;
    let id_str = id.to_string();

    state.broadcast_sync(RESOURCE, "deactivated", &id_str, Some(&session));

    Ok(Json(ApiResponse::ok(session)))
}
