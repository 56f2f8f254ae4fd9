//! Stateless HTTP request builder and response parser for the invoice API.
//!
//! # Design
//! `InvoiceClient` holds only a `base_url` and carries no mutable state
//! between calls. Each endpoint is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the round-trip in between.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Customer, CustomerInput, Invoice, NewInvoice, UpdateInvoice};

/// Characters escaped in a path segment: the URL path set plus `/` and `%`.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Synchronous, stateless client for the invoice API.
#[derive(Debug, Clone)]
pub struct InvoiceClient {
    base_url: String,
}

impl InvoiceClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- customers ---

    pub fn build_list_customers(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "/customers".to_string())
    }

    pub fn build_get_customer(&self, id: &str) -> HttpRequest {
        self.bare(HttpMethod::Get, format!("/customers/{}", segment(id)))
    }

    pub fn build_create_customer(&self, input: &CustomerInput) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Post, "/customers".to_string(), input)
    }

    pub fn build_update_customer(
        &self,
        id: &str,
        input: &CustomerInput,
    ) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Put, format!("/customers/{}", segment(id)), input)
    }

    pub fn build_delete_customer(&self, id: &str) -> HttpRequest {
        self.bare(HttpMethod::Delete, format!("/customers/{}", segment(id)))
    }

    pub fn parse_list_customers(&self, response: HttpResponse) -> Result<Vec<Customer>, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_get_customer(&self, response: HttpResponse) -> Result<Customer, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_create_customer(&self, response: HttpResponse) -> Result<Customer, ApiError> {
        parse_json(response, 201)
    }

    pub fn parse_update_customer(&self, response: HttpResponse) -> Result<Customer, ApiError> {
        parse_json(response, 200)
    }

    /// Deleting an unknown customer also succeeds: the server answers 204.
    pub fn parse_delete_customer(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    // --- invoices ---

    pub fn build_list_invoices(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "/invoices".to_string())
    }

    pub fn build_get_invoice(&self, id: &str) -> HttpRequest {
        self.bare(HttpMethod::Get, format!("/invoices/{}", segment(id)))
    }

    pub fn build_create_invoice(&self, input: &NewInvoice) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Post, "/invoices".to_string(), input)
    }

    pub fn build_update_invoice(
        &self,
        id: &str,
        input: &UpdateInvoice,
    ) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Put, format!("/invoices/{}", segment(id)), input)
    }

    pub fn build_delete_invoice(&self, id: &str) -> HttpRequest {
        self.bare(HttpMethod::Delete, format!("/invoices/{}", segment(id)))
    }

    pub fn parse_list_invoices(&self, response: HttpResponse) -> Result<Vec<Invoice>, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_get_invoice(&self, response: HttpResponse) -> Result<Invoice, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_create_invoice(&self, response: HttpResponse) -> Result<Invoice, ApiError> {
        parse_json(response, 201)
    }

    pub fn parse_update_invoice(&self, response: HttpResponse) -> Result<Invoice, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_delete_invoice(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    fn bare(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_json<T: Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Encode an identifier so it stays a single path segment.
fn segment(id: &str) -> String {
    utf8_percent_encode(id, PATH_SEGMENT).to_string()
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
