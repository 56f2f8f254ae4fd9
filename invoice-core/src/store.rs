//! Client-side state: the two resource collections and the backend they sync
//! with.
//!
//! # Design
//! `Store` is an explicit value owned by the frontend. It starts empty,
//! `refresh` replaces both collections from the API, and every mutation goes
//! to the API first. Only a successful response touches the local
//! collections: creates append the returned row, updates replace the entry
//! in place, deletes remove it.

use crate::client::InvoiceClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Customer, CustomerInput, Invoice, NewInvoice, UpdateInvoice};

/// Executes one HTTP round-trip on behalf of the core.
///
/// Implementations return non-2xx responses as data; only failures to reach
/// the server at all should be `Err`.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// An `InvoiceClient` paired with a transport: one call per endpoint.
#[derive(Debug, Clone)]
pub struct Backend<T> {
    client: InvoiceClient,
    transport: T,
}

impl<T: Transport> Backend<T> {
    pub fn new(client: InvoiceClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &InvoiceClient {
        &self.client
    }

    pub fn list_customers(&self) -> Result<Vec<Customer>, ApiError> {
        let response = self.transport.execute(self.client.build_list_customers())?;
        self.client.parse_list_customers(response)
    }

    pub fn get_customer(&self, id: &str) -> Result<Customer, ApiError> {
        let response = self.transport.execute(self.client.build_get_customer(id))?;
        self.client.parse_get_customer(response)
    }

    pub fn create_customer(&self, input: &CustomerInput) -> Result<Customer, ApiError> {
        let response = self.transport.execute(self.client.build_create_customer(input)?)?;
        self.client.parse_create_customer(response)
    }

    pub fn update_customer(&self, id: &str, input: &CustomerInput) -> Result<Customer, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_update_customer(id, input)?)?;
        self.client.parse_update_customer(response)
    }

    pub fn delete_customer(&self, id: &str) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build_delete_customer(id))?;
        self.client.parse_delete_customer(response)
    }

    pub fn list_invoices(&self) -> Result<Vec<Invoice>, ApiError> {
        let response = self.transport.execute(self.client.build_list_invoices())?;
        self.client.parse_list_invoices(response)
    }

    pub fn get_invoice(&self, id: &str) -> Result<Invoice, ApiError> {
        let response = self.transport.execute(self.client.build_get_invoice(id))?;
        self.client.parse_get_invoice(response)
    }

    pub fn create_invoice(&self, input: &NewInvoice) -> Result<Invoice, ApiError> {
        let response = self.transport.execute(self.client.build_create_invoice(input)?)?;
        self.client.parse_create_invoice(response)
    }

    pub fn update_invoice(&self, id: &str, input: &UpdateInvoice) -> Result<Invoice, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_update_invoice(id, input)?)?;
        self.client.parse_update_invoice(response)
    }

    pub fn delete_invoice(&self, id: &str) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build_delete_invoice(id))?;
        self.client.parse_delete_invoice(response)
    }
}

/// In-memory copy of the customer and invoice collections.
#[derive(Debug, Clone, Default)]
pub struct Store {
    customers: Vec<Customer>,
    invoices: Vec<Invoice>,
}

impl Store {
    /// An empty store. Call [`Store::refresh`] to load it.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn invoice(&self, id: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|i| i.id == id)
    }

    /// Name of the invoice's customer: the loaded customer first, then the
    /// name the server joined onto the invoice.
    pub fn customer_name_for<'a>(&'a self, invoice: &'a Invoice) -> Option<&'a str> {
        self.customer(&invoice.customer_id)
            .map(|c| c.name.as_str())
            .or(invoice.customer_name.as_deref())
    }

    /// Replace both collections with the server's current state.
    pub fn refresh<T: Transport>(&mut self, backend: &Backend<T>) -> Result<(), ApiError> {
        self.refresh_customers(backend)?;
        self.refresh_invoices(backend)
    }

    pub fn refresh_customers<T: Transport>(&mut self, backend: &Backend<T>) -> Result<(), ApiError> {
        self.customers = backend.list_customers()?;
        tracing::debug!(count = self.customers.len(), "customers loaded");
        Ok(())
    }

    pub fn refresh_invoices<T: Transport>(&mut self, backend: &Backend<T>) -> Result<(), ApiError> {
        self.invoices = backend.list_invoices()?;
        tracing::debug!(count = self.invoices.len(), "invoices loaded");
        Ok(())
    }

    pub fn add_customer<T: Transport>(
        &mut self,
        backend: &Backend<T>,
        input: &CustomerInput,
    ) -> Result<&Customer, ApiError> {
        let customer = backend.create_customer(input)?;
        self.customers.push(customer);
        Ok(&self.customers[self.customers.len() - 1])
    }

    pub fn update_customer<T: Transport>(
        &mut self,
        backend: &Backend<T>,
        id: &str,
        input: &CustomerInput,
    ) -> Result<&Customer, ApiError> {
        let customer = backend.update_customer(id, input)?;
        Ok(upsert(&mut self.customers, customer, |c| c.id == id))
    }

    pub fn delete_customer<T: Transport>(
        &mut self,
        backend: &Backend<T>,
        id: &str,
    ) -> Result<(), ApiError> {
        backend.delete_customer(id)?;
        self.customers.retain(|c| c.id != id);
        Ok(())
    }

    pub fn add_invoice<T: Transport>(
        &mut self,
        backend: &Backend<T>,
        input: &NewInvoice,
    ) -> Result<&Invoice, ApiError> {
        let invoice = backend.create_invoice(input)?;
        self.invoices.push(invoice);
        Ok(&self.invoices[self.invoices.len() - 1])
    }

    pub fn update_invoice<T: Transport>(
        &mut self,
        backend: &Backend<T>,
        id: &str,
        input: &UpdateInvoice,
    ) -> Result<&Invoice, ApiError> {
        let invoice = backend.update_invoice(id, input)?;
        Ok(upsert(&mut self.invoices, invoice, |i| i.id == id))
    }

    pub fn delete_invoice<T: Transport>(
        &mut self,
        backend: &Backend<T>,
        id: &str,
    ) -> Result<(), ApiError> {
        backend.delete_invoice(id)?;
        self.invoices.retain(|i| i.id != id);
        Ok(())
    }
}

/// Replace the first entry matching `is_target`, or append if none does.
fn upsert<T>(entries: &mut Vec<T>, value: T, is_target: impl Fn(&T) -> bool) -> &T {
    match entries.iter().position(is_target) {
        Some(index) => {
            entries[index] = value;
            &entries[index]
        }
        None => {
            entries.push(value);
            &entries[entries.len() - 1]
        }
    }
}
