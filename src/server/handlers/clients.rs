use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use super::parse_id;
use crate::core::error::DeskResult;
use crate::core::validation::Validated;
use crate::dto::{ClientResponse, CreateClient, UpdateClient};
use crate::entities::Client;
use crate::server::state::{AppState, fetch};

pub async fn list_clients(State(state): State<AppState>) -> DeskResult<Json<Vec<ClientResponse>>> {
    let clients = state.clients.list().await?;
    Ok(Json(clients.iter().map(ClientResponse::from).collect()))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> DeskResult<Json<ClientResponse>> {
    let client = fetch(&*state.clients, parse_id(&id)?).await?;
    Ok(Json(ClientResponse::from(&client)))
}

pub async fn create_client(
    State(state): State<AppState>,
    Validated(dto): Validated<CreateClient>,
) -> DeskResult<(StatusCode, Json<ClientResponse>)> {
    let client = state
        .clients
        .create(Client::from_create(dto, Utc::now()))
        .await?;

    tracing::info!(client_id = client.id, "client created");
    Ok((StatusCode::CREATED, Json(ClientResponse::from(&client))))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Validated(update): Validated<UpdateClient>,
) -> DeskResult<Json<ClientResponse>> {
    let id = parse_id(&id)?;
    let mut client = fetch(&*state.clients, id).await?;
    client.apply(update, Utc::now());
    let client = state.clients.update(id, client).await?;

    tracing::info!(client_id = id, "client updated");
    Ok(Json(ClientResponse::from(&client)))
}

pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> DeskResult<StatusCode> {
    let id = parse_id(&id)?;
    state.clients.delete(id).await?;

    tracing::info!(client_id = id, "client deleted");
    Ok(StatusCode::NO_CONTENT)
}
