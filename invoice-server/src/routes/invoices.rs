use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::error::Error;
use crate::models::{settle_total, Invoice, NewInvoice, UpdateInvoice};
use crate::queries::invoices as queries;
use crate::AppState;

pub async fn list_invoices(State(state): State<AppState>) -> Result<Json<Vec<Invoice>>, Error> {
    let invoices = queries::list_invoices(&state.db).await?;
    Ok(Json(invoices))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Invoice>, Error> {
    queries::get_invoice(&state.db, &id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound("Invoice"))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    payload: Result<Json<NewInvoice>, JsonRejection>,
) -> Result<(StatusCode, Json<Invoice>), Error> {
    let Json(mut input) = payload?;
    input.total = settle_total(input.total, &input.items, state.recompute_totals)?;
    let invoice = queries::create_invoice(&state.db, input).await?;
    tracing::info!(invoice_id = %invoice.id, items = invoice.items.len(), "invoice created");
    Ok((StatusCode::CREATED, Json(invoice)))
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateInvoice>, JsonRejection>,
) -> Result<Json<Invoice>, Error> {
    let Json(mut input) = payload?;
    input.total = settle_total(input.total, &input.items, state.recompute_totals)?;
    let invoice = queries::update_invoice(&state.db, &id, input)
        .await?
        .ok_or(Error::NotFound("Invoice"))?;
    tracing::info!(invoice_id = %invoice.id, items = invoice.items.len(), "invoice updated");
    Ok(Json(invoice))
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error> {
    queries::delete_invoice(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
