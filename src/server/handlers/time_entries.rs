use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use super::parse_id;
use crate::core::error::DeskResult;
use crate::core::validation::Validated;
use crate::dto::{CreateTimeEntry, TimeEntryResponse, UpdateTimeEntry};
use crate::entities::TimeEntry;
use crate::server::state::{AppState, ensure_exists, fetch};

pub async fn list_time_entries(
    State(state): State<AppState>,
) -> DeskResult<Json<Vec<TimeEntryResponse>>> {
    let entries = state.time_entries.list().await?;
    let names = state.name_index().await?;
    Ok(Json(
        entries
            .iter()
            .map(|entry| TimeEntryResponse::from_entity(entry, &names))
            .collect(),
    ))
}

pub async fn get_time_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> DeskResult<Json<TimeEntryResponse>> {
    let entry = fetch(&*state.time_entries, parse_id(&id)?).await?;
    let names = state.name_index().await?;
    Ok(Json(TimeEntryResponse::from_entity(&entry, &names)))
}

pub async fn create_time_entry(
    State(state): State<AppState>,
    Validated(dto): Validated<CreateTimeEntry>,
) -> DeskResult<(StatusCode, Json<TimeEntryResponse>)> {
    ensure_exists(&*state.tasks, Some(dto.task_id)).await?;
    ensure_exists(&*state.projects, dto.project_id).await?;

    let entry = state
        .time_entries
        .create(TimeEntry::from_create(dto, Utc::now()))
        .await?;

    tracing::info!(time_entry_id = entry.id, task_id = entry.task_id, "time entry created");
    let names = state.name_index().await?;
    Ok((
        StatusCode::CREATED,
        Json(TimeEntryResponse::from_entity(&entry, &names)),
    ))
}

pub async fn update_time_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Validated(update): Validated<UpdateTimeEntry>,
) -> DeskResult<Json<TimeEntryResponse>> {
    let id = parse_id(&id)?;
    let mut entry = fetch(&*state.time_entries, id).await?;
    ensure_exists(&*state.tasks, update.task_id.as_ref().into_option().copied()).await?;
    ensure_exists(&*state.projects, update.project_id.as_ref().into_option().copied()).await?;

    entry.apply(update, Utc::now());
    entry.validate_dates()?;
    let entry = state.time_entries.update(id, entry).await?;

    tracing::info!(time_entry_id = id, "time entry updated");
    let names = state.name_index().await?;
    Ok(Json(TimeEntryResponse::from_entity(&entry, &names)))
}

pub async fn delete_time_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> DeskResult<StatusCode> {
    let id = parse_id(&id)?;
    state.time_entries.delete(id).await?;

    tracing::info!(time_entry_id = id, "time entry deleted");
    Ok(StatusCode::NO_CONTENT)
}
