//! Row types, request payloads and their SQLite conversions.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::Row;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /customers` and `PUT /customers/{id}`.
#[derive(Clone, Debug, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Paid,
    Overdue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecurringInterval {
    Monthly,
    Quarterly,
    Yearly,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,
    pub description: String,
    pub quantity: i64,
    pub price: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
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

#[derive(Clone, Debug, Deserialize)]
pub struct NewInvoiceItem {
    pub description: String,
    pub quantity: i64,
    pub price: Decimal,
}

/// Body of `POST /invoices`.
#[derive(Clone, Debug, Deserialize)]
pub struct NewInvoice {
    pub customer_id: String,
    pub status: InvoiceStatus,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurring_interval: Option<RecurringInterval>,
    pub total: Decimal,
    #[serde(default)]
    pub items: Vec<NewInvoiceItem>,
}

/// Body of `PUT /invoices/{id}`. The owning customer is fixed at creation,
/// so a `customer_id` field in the body is ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct UpdateInvoice {
    pub status: InvoiceStatus,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurring_interval: Option<RecurringInterval>,
    pub total: Decimal,
    #[serde(default)]
    pub items: Vec<NewInvoiceItem>,
}

/// Sum of quantity × price over `items`, or `None` if it overflows.
pub fn invoice_total(items: &[NewInvoiceItem]) -> Option<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |sum, item| {
        Decimal::from(item.quantity)
            .checked_mul(item.price)
            .and_then(|line| sum.checked_add(line))
    })
}

/// Apply the server's total policy to a caller-supplied total.
///
/// With `recompute` off the caller's figure is kept even when it disagrees
/// with the items or the item sum overflows. With it on, an overflowing sum
/// is an error.
pub fn settle_total(
    supplied: Decimal,
    items: &[NewInvoiceItem],
    recompute: bool,
) -> Result<Decimal, Error> {
    match (invoice_total(items), recompute) {
        (Some(computed), recompute) => {
            if supplied != computed {
                tracing::debug!(%supplied, %computed, recompute, "invoice total differs from item sum");
            }
            Ok(if recompute { computed } else { supplied })
        }
        (None, false) => {
            tracing::debug!(%supplied, "item sum overflows, keeping supplied total");
            Ok(supplied)
        }
        (None, true) => Err(Error::TotalOverflow),
    }
}

impl Customer {
    pub(crate) const COLUMNS: &'static str =
        "id, name, email, phone, address, created_at, updated_at";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            phone: row.get(3)?,
            address: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl Invoice {
    /// Column list for `from_row`. Expects `invoices` aliased `i` and
    /// `customers` aliased `c`.
    pub(crate) const COLUMNS: &'static str = "i.id, i.customer_id, c.name, i.status, \
         i.due_date, i.is_recurring, i.recurring_interval, i.total, i.created_at, i.updated_at";

    /// Build an invoice without items; callers attach them afterwards.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            customer_id: row.get(1)?,
            customer_name: row.get(2)?,
            status: row.get(3)?,
            due_date: row.get(4)?,
            is_recurring: row.get(5)?,
            recurring_interval: row.get(6)?,
            total: decimal_at(row, 7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
            items: Vec::new(),
        })
    }
}

impl InvoiceItem {
    pub(crate) const COLUMNS: &'static str = "id, invoice_id, description, quantity, price";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            invoice_id: row.get(1)?,
            description: row.get(2)?,
            quantity: row.get(3)?,
            price: decimal_at(row, 4)?,
        })
    }
}

/// Decimals are stored as text so the database never rounds them.
fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl ToSql for InvoiceStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for InvoiceStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for RecurringInterval {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for RecurringInterval {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i64, price: Decimal) -> NewInvoiceItem {
        NewInvoiceItem {
            description: "Widget".to_string(),
            quantity,
            price,
        }
    }

    #[test]
    fn total_sums_quantity_times_price() {
        let items = vec![item(2, Decimal::new(10, 0)), item(1, Decimal::new(5, 0))];
        assert_eq!(invoice_total(&items), Some(Decimal::new(25, 0)));
    }

    #[test]
    fn total_of_no_items_is_zero() {
        assert_eq!(invoice_total(&[]), Some(Decimal::ZERO));
    }

    #[test]
    fn total_keeps_cents_exact() {
        let items = vec![item(3, Decimal::new(1999, 2)), item(1, Decimal::new(1, 2))];
        assert_eq!(invoice_total(&items), Some(Decimal::new(5998, 2)));
    }

    #[test]
    fn settle_total_trusts_caller_by_default() {
        let items = vec![item(1, Decimal::new(5, 0))];
        assert_eq!(
            settle_total(Decimal::new(99, 0), &items, false).unwrap(),
            Decimal::new(99, 0)
        );
    }

    #[test]
    fn settle_total_recomputes_when_enabled() {
        let items = vec![item(1, Decimal::new(5, 0))];
        assert_eq!(
            settle_total(Decimal::new(99, 0), &items, true).unwrap(),
            Decimal::new(5, 0)
        );
    }

    #[test]
    fn overflowing_sum_keeps_supplied_total() {
        let items = vec![item(i64::MAX, Decimal::new(100_000_000_000, 0))];
        assert_eq!(invoice_total(&items), None);
        assert_eq!(
            settle_total(Decimal::new(5, 0), &items, false).unwrap(),
            Decimal::new(5, 0)
        );
    }

    #[test]
    fn overflowing_sum_is_an_error_when_recomputing() {
        let items = vec![item(i64::MAX, Decimal::MAX)];
        let result = settle_total(Decimal::new(5, 0), &items, true);
        assert!(matches!(result, Err(Error::TotalOverflow)));
    }

    #[test]
    fn status_round_trips_through_strum_and_serde() {
        assert_eq!(InvoiceStatus::Overdue.to_string(), "overdue");
        assert_eq!("paid".parse::<InvoiceStatus>().unwrap(), InvoiceStatus::Paid);
        let json = serde_json::to_value(InvoiceStatus::Draft).unwrap();
        assert_eq!(json, "draft");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result: Result<InvoiceStatus, _> = serde_json::from_str(r#""cancelled""#);
        assert!(result.is_err());
    }

    #[test]
    fn new_invoice_defaults_recurrence_and_items() {
        let input: NewInvoice = serde_json::from_str(
            r#"{"customer_id":"c1","status":"draft","due_date":"2024-03-01","total":0}"#,
        )
        .unwrap();
        assert!(!input.is_recurring);
        assert!(input.recurring_interval.is_none());
        assert!(input.items.is_empty());
        assert_eq!(input.due_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn new_invoice_rejects_missing_customer() {
        let result: Result<NewInvoice, _> =
            serde_json::from_str(r#"{"status":"draft","due_date":"2024-03-01","total":0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn customer_input_rejects_missing_field() {
        let result: Result<CustomerInput, _> =
            serde_json::from_str(r#"{"name":"Ada","email":"ada@example.com","phone":"1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn invoice_omits_absent_customer_name() {
        let invoice = Invoice {
            id: "i1".to_string(),
            customer_id: "c1".to_string(),
            customer_name: None,
            status: InvoiceStatus::Pending,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            is_recurring: true,
            recurring_interval: Some(RecurringInterval::Quarterly),
            total: Decimal::new(1250, 2),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            items: Vec::new(),
        };
        let json = serde_json::to_value(&invoice).unwrap();
        assert!(json.get("customer_name").is_none());
        assert_eq!(json["recurring_interval"], "quarterly");
        assert_eq!(json["due_date"], "2024-01-31");
        assert_eq!(json["total"], 12.5);
    }
}
