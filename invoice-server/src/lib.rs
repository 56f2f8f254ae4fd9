//! REST backend for customers and invoices.
//!
//! Routes map one-to-one onto the functions in [`queries`]; the handlers only
//! extract input, apply the total policy and translate `None` into 404.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod queries;
mod routes;

use std::future::Future;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

pub use config::ServerConfig;
pub use db::Database;
pub use error::Error;
pub use models::{
    Customer, CustomerInput, Invoice, InvoiceItem, InvoiceStatus, NewInvoice, NewInvoiceItem,
    RecurringInterval, UpdateInvoice,
};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub recompute_totals: bool,
}

impl AppState {
    pub fn new(db: Database, config: &ServerConfig) -> Self {
        Self {
            db,
            recompute_totals: config.recompute_totals,
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/customers",
            get(routes::customers::list_customers).post(routes::customers::create_customer),
        )
        .route(
            "/customers/{id}",
            get(routes::customers::get_customer)
                .put(routes::customers::update_customer)
                .delete(routes::customers::delete_customer),
        )
        .route(
            "/invoices",
            get(routes::invoices::list_invoices).post(routes::invoices::create_invoice),
        )
        .route(
            "/invoices/{id}",
            get(routes::invoices::get_invoice)
                .put(routes::invoices::update_invoice)
                .delete(routes::invoices::delete_invoice),
        )
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

/// Like [`run`], but stops accepting connections once `shutdown` resolves
/// and waits for in-flight requests to finish.
pub async fn run_until<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
}
