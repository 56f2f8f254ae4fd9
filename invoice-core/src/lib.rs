//! Synchronous API client core for the invoice service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network. The caller executes the actual HTTP round-trip,
//! either directly or through a `Transport` handed to a `Backend`.
//!
//! # Design
//! - `InvoiceClient` is stateless and holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `Store` keeps the customer and invoice lists a front end renders.
//!   Every mutation goes through the API first; the local copy changes only
//!   once the server has answered.
//! - `form` turns user-entered drafts into request payloads.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod form;
pub mod http;
pub mod store;
pub mod types;

pub use client::InvoiceClient;
pub use error::ApiError;
pub use form::{CustomerDraft, DraftItem, FormError, InvoiceDraft};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use store::{Backend, Store, Transport};
pub use types::{
    Customer, CustomerInput, Invoice, InvoiceItem, InvoiceStatus, NewInvoice, NewInvoiceItem,
    RecurringInterval, UpdateInvoice,
};
