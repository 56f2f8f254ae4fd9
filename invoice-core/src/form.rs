//! Create-forms for customers and invoices.
//!
//! A draft holds exactly what the user typed. `submit` checks it and turns it
//! into the request payload, computing the invoice total from the items so
//! the server receives a consistent figure.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{
    line_total, CustomerInput, InvoiceStatus, NewInvoice, NewInvoiceItem, RecurringInterval,
};

/// One reason a draft cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("at least one item is required")]
    NoItems,

    #[error("item {index}: description is required")]
    ItemDescription { index: usize },

    #[error("item {index}: quantity must be at least 1")]
    ItemQuantity { index: usize },

    #[error("item {index}: price must be greater than 0")]
    ItemPrice { index: usize },

    #[error("recurring invoices need an interval")]
    MissingInterval,

    #[error("invoice total is too large")]
    TotalOverflow,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl CustomerDraft {
    pub fn submit(&self) -> Result<CustomerInput, Vec<FormError>> {
        let mut errors = Vec::new();
        for (value, field) in [
            (&self.name, "name"),
            (&self.email, "email"),
            (&self.phone, "phone"),
            (&self.address, "address"),
        ] {
            if value.trim().is_empty() {
                errors.push(FormError::Required(field));
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(CustomerInput {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftItem {
    pub description: String,
    pub quantity: i64,
    pub price: Decimal,
}

impl Default for DraftItem {
    /// A blank row: quantity 1, price 0.
    fn default() -> Self {
        Self {
            description: String::new(),
            quantity: 1,
            price: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    pub customer_id: String,
    pub due_date: Option<NaiveDate>,
    pub is_recurring: bool,
    pub recurring_interval: Option<RecurringInterval>,
    pub items: Vec<DraftItem>,
}

impl Default for InvoiceDraft {
    /// An empty form starts with one blank item and no recurrence.
    fn default() -> Self {
        Self {
            customer_id: String::new(),
            due_date: None,
            is_recurring: false,
            recurring_interval: None,
            items: vec![DraftItem::default()],
        }
    }
}

impl InvoiceDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self) -> &mut DraftItem {
        self.items.push(DraftItem::default());
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    /// Remove the item at `index`, if there is one.
    pub fn remove_item(&mut self, index: usize) -> Option<DraftItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Running total of the rows as currently entered. `None` when the sum
    /// does not fit in a `Decimal`.
    pub fn total(&self) -> Option<Decimal> {
        line_total(self.items.iter().map(|item| (item.quantity, &item.price)))
    }

    /// Validate and produce a `pending` invoice whose total is the item sum.
    pub fn submit(&self) -> Result<NewInvoice, Vec<FormError>> {
        let mut errors = Vec::new();
        let min_price = Decimal::new(1, 2);

        if self.customer_id.trim().is_empty() {
            errors.push(FormError::Required("customer"));
        }
        if self.due_date.is_none() {
            errors.push(FormError::Required("due date"));
        }
        if self.items.is_empty() {
            errors.push(FormError::NoItems);
        }
        for (index, item) in self.items.iter().enumerate() {
            if item.description.trim().is_empty() {
                errors.push(FormError::ItemDescription { index });
            }
            if item.quantity < 1 {
                errors.push(FormError::ItemQuantity { index });
            }
            if item.price < min_price {
                errors.push(FormError::ItemPrice { index });
            }
        }
        if self.is_recurring && self.recurring_interval.is_none() {
            errors.push(FormError::MissingInterval);
        }
        let total = self.total();
        if total.is_none() {
            errors.push(FormError::TotalOverflow);
        }

        let (due_date, total) = match (self.due_date, total) {
            (Some(date), Some(total)) if errors.is_empty() => (date, total),
            _ => return Err(errors),
        };

        Ok(NewInvoice {
            customer_id: self.customer_id.trim().to_string(),
            status: InvoiceStatus::Pending,
            due_date,
            is_recurring: self.is_recurring,
            recurring_interval: if self.is_recurring {
                self.recurring_interval
            } else {
                None
            },
            total,
            items: self
                .items
                .iter()
                .map(|item| NewInvoiceItem {
                    description: item.description.trim().to_string(),
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
        })
    }
}
