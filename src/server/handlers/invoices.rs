use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::parse_id;
use crate::core::error::{DeskError, DeskResult, EntityError};
use crate::core::numbering::invoice_number_exists;
use crate::core::validation::Validated;
use crate::dto::{CreateInvoice, InvoiceResponse, UpdateInvoice};
use crate::entities::Invoice;
use crate::server::state::{AppState, ensure_exists, fetch};

/// Attempts at issuing a generated number before giving up
const MAX_NUMBER_ATTEMPTS: usize = 3;

#[derive(Debug, Serialize, Deserialize)]
pub struct NextNumberResponse {
    pub invoice_number: String,
}

#[derive(Debug, Deserialize)]
pub struct NumberExistsQuery {
    pub number: String,
    pub exclude_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NumberExistsResponse {
    pub exists: bool,
}

async fn next_number(state: &AppState) -> DeskResult<String> {
    let invoices = state.invoices.list().await?;
    Ok(state
        .numbering
        .next(invoices.iter().map(|invoice| invoice.invoice_number.as_str())))
}

pub async fn list_invoices(
    State(state): State<AppState>,
) -> DeskResult<Json<Vec<InvoiceResponse>>> {
    let invoices = state.invoices.list().await?;
    let names = state.name_index().await?;
    Ok(Json(
        invoices
            .iter()
            .map(|invoice| InvoiceResponse::from_entity(invoice, &names))
            .collect(),
    ))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> DeskResult<Json<InvoiceResponse>> {
    let invoice = fetch(&*state.invoices, parse_id(&id)?).await?;
    let names = state.name_index().await?;
    Ok(Json(InvoiceResponse::from_entity(&invoice, &names)))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    Validated(dto): Validated<CreateInvoice>,
) -> DeskResult<(StatusCode, Json<InvoiceResponse>)> {
    ensure_exists(&*state.clients, Some(dto.client_id)).await?;
    ensure_exists(&*state.projects, dto.project_id).await?;

    let now = Utc::now();
    let invoice = match dto.invoice_number.clone() {
        Some(number) => state
            .invoices
            .create(Invoice::from_create(dto, number, now))
            .await
            .inspect_err(|e| {
                if let DeskError::Entity(EntityError::Conflict { value, .. }) = e {
                    tracing::warn!(invoice_number = %value, "invoice number already taken");
                }
            })?,
        None => {
            // The store has the final word on uniqueness: a number computed
            // from a stale snapshot is recomputed.
            let mut attempt = 1;
            loop {
                let number = next_number(&state).await?;
                match state
                    .invoices
                    .create(Invoice::from_create(dto.clone(), number.clone(), now))
                    .await
                {
                    Err(DeskError::Entity(EntityError::Conflict { .. }))
                        if attempt < MAX_NUMBER_ATTEMPTS =>
                    {
                        tracing::warn!(invoice_number = %number, attempt, "generated invoice number collided, retrying");
                        attempt += 1;
                    }
                    result => break result?,
                }
            }
        }
    };

    tracing::info!(
        invoice_id = invoice.id,
        invoice_number = %invoice.invoice_number,
        "invoice created"
    );
    let names = state.name_index().await?;
    Ok((
        StatusCode::CREATED,
        Json(InvoiceResponse::from_entity(&invoice, &names)),
    ))
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Validated(update): Validated<UpdateInvoice>,
) -> DeskResult<Json<InvoiceResponse>> {
    let id = parse_id(&id)?;
    let mut invoice = fetch(&*state.invoices, id).await?;
    ensure_exists(&*state.clients, update.client_id.as_ref().into_option().copied()).await?;
    ensure_exists(&*state.projects, update.project_id.as_ref().into_option().copied()).await?;

    invoice.apply(update, Utc::now());
    invoice.validate_dates()?;
    let invoice = state.invoices.update(id, invoice).await?;

    tracing::info!(invoice_id = id, "invoice updated");
    let names = state.name_index().await?;
    Ok(Json(InvoiceResponse::from_entity(&invoice, &names)))
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> DeskResult<StatusCode> {
    let id = parse_id(&id)?;
    state.invoices.delete(id).await?;

    tracing::info!(invoice_id = id, "invoice deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Number the next invoice would receive; nothing is reserved
pub async fn get_next_number(
    State(state): State<AppState>,
) -> DeskResult<Json<NextNumberResponse>> {
    Ok(Json(NextNumberResponse {
        invoice_number: next_number(&state).await?,
    }))
}

/// Advisory uniqueness check used by edit forms
pub async fn number_exists(
    State(state): State<AppState>,
    Query(query): Query<NumberExistsQuery>,
) -> DeskResult<Json<NumberExistsResponse>> {
    let invoices = state.invoices.list().await?;
    Ok(Json(NumberExistsResponse {
        exists: invoice_number_exists(query.number.trim(), &invoices, query.exclude_id),
    }))
}
