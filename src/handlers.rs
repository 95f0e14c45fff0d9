use crate::avatar::encode_data_uri;
use crate::errors::{AppError, DiaryError};
use crate::models::{AvatarPayload, ChartResponse, Record, RecordInput};
use crate::state::AppState;
use crate::store::DiaryStore;
use crate::ui::render_index;
use crate::views::chart_response;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Html,
    Json,
};
use chrono::Local;
use std::sync::Arc;
use tracing::warn;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.pet_name, Local::now().date_naive()))
}

pub async fn list_records(State(state): State<AppState>) -> Json<Vec<Record>> {
    let store = state.store.lock().await;
    Json(store.history_view())
}

pub async fn create_record(
    State(state): State<AppState>,
    Json(input): Json<RecordInput>,
) -> Result<(StatusCode, Json<Record>), AppError> {
    let record = mutate(&state, move |store| {
        let date = input.date;
        store
            .add(input)
            .inspect_err(|err| warn!("rejected record for {date}: {err}"))
    })
    .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    mutate(&state, move |store| store.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_chart(State(state): State<AppState>) -> Json<ChartResponse> {
    let store = state.store.lock().await;
    Json(chart_response(store.records()))
}

pub async fn get_avatar(State(state): State<AppState>) -> Json<AvatarPayload> {
    let store = state.store.lock().await;
    Json(AvatarPayload {
        avatar: store.avatar().to_string(),
    })
}

pub async fn put_avatar(
    State(state): State<AppState>,
    Json(payload): Json<AvatarPayload>,
) -> Result<Json<AvatarPayload>, AppError> {
    let avatar = payload.avatar.trim().to_string();
    if avatar.is_empty() {
        return Err(AppError::bad_request("avatar must not be empty"));
    }

    let stored = avatar.clone();
    mutate(&state, move |store| store.set_avatar(stored)).await?;
    Ok(Json(AvatarPayload { avatar }))
}

/// Raw image body; the `Content-Type` header names the image format.
pub async fn upload_avatar(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AvatarPayload>, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let avatar = encode_data_uri(content_type, &body)?;

    let stored = avatar.clone();
    mutate(&state, move |store| store.set_avatar(stored)).await?;
    Ok(Json(AvatarPayload { avatar }))
}

/// Runs a store mutation on the blocking pool, since every mutation writes
/// its blob to disk. The lock is held until the write finishes.
async fn mutate<T, F>(state: &AppState, work: F) -> Result<T, AppError>
where
    F: FnOnce(&mut DiaryStore) -> Result<T, DiaryError> + Send + 'static,
    T: Send + 'static,
{
    let mut store = Arc::clone(&state.store).lock_owned().await;
    let outcome = tokio::task::spawn_blocking(move || work(&mut *store))
        .await
        .map_err(AppError::internal)?;
    Ok(outcome?)
}
