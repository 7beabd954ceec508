use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use super::parse_id;
use crate::core::error::DeskResult;
use crate::core::validation::Validated;
use crate::dto::{CreateTask, TaskResponse, UpdateTask};
use crate::entities::Task;
use crate::server::state::{AppState, ensure_exists, fetch};

pub async fn list_tasks(State(state): State<AppState>) -> DeskResult<Json<Vec<TaskResponse>>> {
    let tasks = state.tasks.list().await?;
    let names = state.name_index().await?;
    Ok(Json(
        tasks
            .iter()
            .map(|task| TaskResponse::from_entity(task, &names))
            .collect(),
    ))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> DeskResult<Json<TaskResponse>> {
    let task = fetch(&*state.tasks, parse_id(&id)?).await?;
    let names = state.name_index().await?;
    Ok(Json(TaskResponse::from_entity(&task, &names)))
}

pub async fn create_task(
    State(state): State<AppState>,
    Validated(dto): Validated<CreateTask>,
) -> DeskResult<(StatusCode, Json<TaskResponse>)> {
    ensure_exists(&*state.projects, dto.project_id).await?;

    let task = state.tasks.create(Task::from_create(dto, Utc::now())).await?;

    tracing::info!(task_id = task.id, "task created");
    let names = state.name_index().await?;
    Ok((
        StatusCode::CREATED,
        Json(TaskResponse::from_entity(&task, &names)),
    ))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Validated(update): Validated<UpdateTask>,
) -> DeskResult<Json<TaskResponse>> {
    let id = parse_id(&id)?;
    let mut task = fetch(&*state.tasks, id).await?;
    ensure_exists(&*state.projects, update.project_id.as_ref().into_option().copied()).await?;

    task.apply(update, Utc::now());
    let task = state.tasks.update(id, task).await?;

    tracing::info!(task_id = id, "task updated");
    let names = state.name_index().await?;
    Ok(Json(TaskResponse::from_entity(&task, &names)))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> DeskResult<StatusCode> {
    let id = parse_id(&id)?;
    state.tasks.delete(id).await?;

    tracing::info!(task_id = id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}
