use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::error::Error;
use crate::models::{Customer, CustomerInput};
use crate::queries::customers as queries;
use crate::AppState;

pub async fn list_customers(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, Error> {
    let customers = queries::list_customers(&state.db).await?;
    Ok(Json(customers))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, Error> {
    queries::get_customer(&state.db, &id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound("Customer"))
}

pub async fn create_customer(
    State(state): State<AppState>,
    payload: Result<Json<CustomerInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Customer>), Error> {
    let Json(input) = payload?;
    let customer = queries::create_customer(&state.db, input).await?;
    tracing::info!(customer_id = %customer.id, "customer created");
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CustomerInput>, JsonRejection>,
) -> Result<Json<Customer>, Error> {
    let Json(input) = payload?;
    let customer = queries::update_customer(&state.db, &id, input)
        .await?
        .ok_or(Error::NotFound("Customer"))?;
    tracing::info!(customer_id = %customer.id, "customer updated");
    Ok(Json(customer))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error> {
    queries::delete_customer(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
