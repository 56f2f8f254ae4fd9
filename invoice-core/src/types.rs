//! Domain DTOs for the invoice API.
//!
//! # Design
//! These types mirror the server's JSON schema but are defined independently
//! of the server crate, so the client never links axum or rusqlite. The
//! integration tests catch any schema drift between the two crates.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A customer as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating or updating a customer. Every field is sent;
/// updates overwrite all four.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Paid,
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecurringInterval {
    Monthly,
    Quarterly,
    Yearly,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,
    pub description: String,
    pub quantity: i64,
    pub price: Decimal,
}

/// An invoice with its line items.
///
/// `customer_name` is filled in by the server's list and get endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: String,
    pub customer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    pub status: InvoiceStatus,
    pub due_date: NaiveDate,
    pub is_recurring: bool,
    pub recurring_interval: Option<RecurringInterval>,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewInvoiceItem {
    pub description: String,
    pub quantity: i64,
    pub price: Decimal,
}

/// Request payload for creating an invoice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewInvoice {
    pub customer_id: String,
    pub status: InvoiceStatus,
    pub due_date: NaiveDate,
    pub is_recurring: bool,
    pub recurring_interval: Option<RecurringInterval>,
    pub total: Decimal,
    pub items: Vec<NewInvoiceItem>,
}

/// Request payload for updating an invoice. Replaces every scalar field and
/// the whole item list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateInvoice {
    pub status: InvoiceStatus,
    pub due_date: NaiveDate,
    pub is_recurring: bool,
    pub recurring_interval: Option<RecurringInterval>,
    pub total: Decimal,
    pub items: Vec<NewInvoiceItem>,
}

/// Sum of quantity × price, or `None` if it overflows.
pub fn line_total<'a, I>(lines: I) -> Option<Decimal>
where
    I: IntoIterator<Item = (i64, &'a Decimal)>,
{
    lines.into_iter().try_fold(Decimal::ZERO, |sum, (quantity, price)| {
        Decimal::from(quantity)
            .checked_mul(*price)
            .and_then(|line| sum.checked_add(line))
    })
}

impl Invoice {
    /// Total recomputed from the items, for comparing against `total`.
    pub fn items_total(&self) -> Option<Decimal> {
        line_total(self.items.iter().map(|item| (item.quantity, &item.price)))
    }

    /// An update payload that rewrites this invoice unchanged. Callers tweak
    /// the fields they want before sending it.
    pub fn to_update(&self) -> UpdateInvoice {
        UpdateInvoice {
            status: self.status,
            due_date: self.due_date,
            is_recurring: self.is_recurring,
            recurring_interval: self.recurring_interval,
            total: self.total,
            items: self
                .items
                .iter()
                .map(|item| NewInvoiceItem {
                    description: item.description.clone(),
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_invoice() -> Invoice {
        serde_json::from_str(
            r#"{
                "id": "inv-1",
                "customer_id": "cus-1",
                "customer_name": "Ada",
                "status": "overdue",
                "due_date": "2024-02-29",
                "is_recurring": true,
                "recurring_interval": "monthly",
                "total": 25.0,
                "created_at": "2024-01-01T10:00:00Z",
                "updated_at": "2024-01-02T10:00:00Z",
                "items": [
                    {"id": "it-1", "invoice_id": "inv-1", "description": "Design", "quantity": 2, "price": 10.0},
                    {"id": "it-2", "invoice_id": "inv-1", "description": "Hosting", "quantity": 1, "price": 5.0}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn invoice_deserializes_server_shape() {
        let invoice = sample_invoice();
        assert_eq!(invoice.status, InvoiceStatus::Overdue);
        assert_eq!(invoice.recurring_interval, Some(RecurringInterval::Monthly));
        assert_eq!(invoice.customer_name.as_deref(), Some("Ada"));
        assert_eq!(invoice.due_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(invoice.items.len(), 2);
    }

    #[test]
    fn items_total_matches_sum() {
        let invoice = sample_invoice();
        assert_eq!(invoice.items_total(), Some(Decimal::new(25, 0)));
        assert_eq!(invoice.items_total(), Some(invoice.total));
    }

    #[test]
    fn to_update_preserves_fields_and_items() {
        let invoice = sample_invoice();
        let update = invoice.to_update();
        assert_eq!(update.status, invoice.status);
        assert_eq!(update.total, invoice.total);
        assert_eq!(update.items.len(), 2);
        assert_eq!(update.items[1].description, "Hosting");
    }

    #[test]
    fn customer_name_is_optional() {
        let mut value: serde_json::Value = serde_json::to_value(sample_invoice()).unwrap();
        value.as_object_mut().unwrap().remove("customer_name");
        let invoice: Invoice = serde_json::from_value(value).unwrap();
        assert!(invoice.customer_name.is_none());
    }

    #[test]
    fn status_uses_lowercase_names() {
        assert_eq!(InvoiceStatus::Pending.to_string(), "pending");
        assert_eq!("yearly".parse::<RecurringInterval>().unwrap(), RecurringInterval::Yearly);
    }
}
