//! Diary Routes
//!
//! Owner-scoped endpoints for diary entries. All of them sit behind
//! [`require_user`](crate::api::middleware::require_user).
//!
//! - POST /api/v1/diaries - Create an entry
//! - GET /api/v1/diaries - List entries, newest diary date first
//! - GET /api/v1/diaries/search?keyword= - Keyword search
//! - GET /api/v1/diaries/emotion/:emotion - Filter by emotion
//! - GET /api/v1/diaries/date/:date - Filter by diary date
//! - GET /api/v1/diaries/stats - Journaling statistics
//! - GET /api/v1/diaries/:id - Get an entry
//! - PATCH /api/v1/diaries/:id - Update an entry
//! - DELETE /api/v1/diaries/:id - Soft-delete an entry

use axum::{extract::State, http::StatusCode, Extension, Json};
use std::sync::Arc;

use crate::api::dto::SearchParams;
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery, DiaryIdPath};
use crate::api::middleware::AuthUser;
use crate::api::state::AppState;
use crate::diary::{parse_diary_date, CreateDiary, DiaryEntry, StatsReport, UpdateDiary};

/// POST /api/v1/diaries
pub async fn create_diary(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    ApiJson(req): ApiJson<CreateDiary>,
) -> ApiResult<(StatusCode, Json<DiaryEntry>)> {
    let entry = state.diaries.create(user_id, req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/v1/diaries
pub async fn list_diaries(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> ApiResult<Json<Vec<DiaryEntry>>> {
    Ok(Json(state.diaries.list_all(user_id).await?))
}

/// GET /api/v1/diaries/search?keyword=
///
/// A missing keyword behaves like an empty one and matches everything.
pub async fn search_diaries(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> ApiResult<Json<Vec<DiaryEntry>>> {
    Ok(Json(state.diaries.search(user_id, &params.keyword).await?))
}

/// GET /api/v1/diaries/emotion/:emotion
pub async fn diaries_by_emotion(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    ApiPath(emotion): ApiPath<String>,
) -> ApiResult<Json<Vec<DiaryEntry>>> {
    Ok(Json(state.diaries.filter_by_emotion(user_id, &emotion).await?))
}

/// GET /api/v1/diaries/date/:date
pub async fn diaries_by_date(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    ApiPath(date): ApiPath<String>,
) -> ApiResult<Json<Vec<DiaryEntry>>> {
    let date = parse_diary_date(&date)
        .ok_or_else(|| ApiError::invalid("date", "date must be a valid date (YYYY-MM-DD)"))?;

    Ok(Json(state.diaries.filter_by_date(user_id, date).await?))
}

/// GET /api/v1/diaries/stats
pub async fn diary_stats(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> ApiResult<Json<StatsReport>> {
    Ok(Json(state.diaries.stats(user_id).await?))
}

/// GET /api/v1/diaries/:id
pub async fn get_diary(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    DiaryIdPath(id): DiaryIdPath,
) -> ApiResult<Json<DiaryEntry>> {
    Ok(Json(state.diaries.get(id, user_id).await?))
}

/// PATCH /api/v1/diaries/:id
pub async fn update_diary(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    DiaryIdPath(id): DiaryIdPath,
    ApiJson(req): ApiJson<UpdateDiary>,
) -> ApiResult<Json<DiaryEntry>> {
    Ok(Json(state.diaries.update(id, user_id, req).await?))
}

/// DELETE /api/v1/diaries/:id
pub async fn delete_diary(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    DiaryIdPath(id): DiaryIdPath,
) -> ApiResult<StatusCode> {
    state.diaries.remove(id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
