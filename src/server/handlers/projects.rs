use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use super::parse_id;
use crate::core::error::DeskResult;
use crate::core::validation::Validated;
use crate::dto::{CreateProject, ProjectResponse, UpdateProject};
use crate::entities::Project;
use crate::server::state::{AppState, ensure_exists, fetch};

pub async fn list_projects(
    State(state): State<AppState>,
) -> DeskResult<Json<Vec<ProjectResponse>>> {
    let projects = state.projects.list().await?;
    Ok(Json(projects.iter().map(ProjectResponse::from).collect()))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> DeskResult<Json<ProjectResponse>> {
    let project = fetch(&*state.projects, parse_id(&id)?).await?;
    Ok(Json(ProjectResponse::from(&project)))
}

pub async fn create_project(
    State(state): State<AppState>,
    Validated(dto): Validated<CreateProject>,
) -> DeskResult<(StatusCode, Json<ProjectResponse>)> {
    ensure_exists(&*state.clients, dto.client_id).await?;

    let project = state
        .projects
        .create(Project::from_create(dto, Utc::now()))
        .await?;

    tracing::info!(project_id = project.id, "project created");
    Ok((StatusCode::CREATED, Json(ProjectResponse::from(&project))))
}

pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Validated(update): Validated<UpdateProject>,
) -> DeskResult<Json<ProjectResponse>> {
    let id = parse_id(&id)?;
    let mut project = fetch(&*state.projects, id).await?;
    ensure_exists(&*state.clients, update.client_id.as_ref().into_option().copied()).await?;

    project.apply(update, Utc::now());
    project.validate_dates()?;
    let project = state.projects.update(id, project).await?;

    tracing::info!(project_id = id, "project updated");
    Ok(Json(ProjectResponse::from(&project)))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> DeskResult<StatusCode> {
    let id = parse_id(&id)?;
    state.projects.delete(id).await?;

    tracing::info!(project_id = id, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}
