//! Plain-text tables for the terminal.

use std::fmt::Write;

use chrono::NaiveDate;
use invoice_core::{Customer, Invoice, InvoiceStatus, Store};
use rust_decimal::{Decimal, RoundingStrategy};

const UNKNOWN_CUSTOMER: &str = "Unknown Customer";

pub fn money(amount: &Decimal) -> String {
    format!(
        "${:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// `Jun 05, 2024`
pub fn due_date(date: &NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

pub fn status(status: InvoiceStatus) -> String {
    let lower = status.to_string();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => lower,
    }
}

pub fn customer_table(customers: &[Customer]) -> String {
    if customers.is_empty() {
        return "No customers.\n".to_string();
    }
    let rows: Vec<[String; 4]> = customers
        .iter()
        .map(|c| [c.id.clone(), c.name.clone(), c.email.clone(), c.phone.clone()])
        .collect();
    table(["ID", "Name", "Email", "Phone"], &rows)
}

pub fn invoice_table(store: &Store) -> String {
    if store.invoices().is_empty() {
        return "No invoices.\n".to_string();
    }
    let rows: Vec<[String; 5]> = store
        .invoices()
        .iter()
        .map(|invoice| {
            [
                invoice.id.clone(),
                store
                    .customer_name_for(invoice)
                    .unwrap_or(UNKNOWN_CUSTOMER)
                    .to_string(),
                status(invoice.status),
                due_date(&invoice.due_date),
                money(&invoice.total),
            ]
        })
        .collect();
    table(["ID", "Customer", "Status", "Due Date", "Total"], &rows)
}

pub fn invoice_detail(invoice: &Invoice) -> String {
    let mut out = String::new();
    let customer = invoice.customer_name.as_deref().unwrap_or(UNKNOWN_CUSTOMER);
    let _ = writeln!(out, "Invoice   {}", invoice.id);
    let _ = writeln!(out, "Customer  {customer} ({})", invoice.customer_id);
    let _ = writeln!(out, "Status    {}", status(invoice.status));
    let _ = writeln!(out, "Due       {}", due_date(&invoice.due_date));
    match (invoice.is_recurring, invoice.recurring_interval) {
        (true, Some(interval)) => {
            let _ = writeln!(out, "Recurring {interval}");
        }
        (true, None) => {
            let _ = writeln!(out, "Recurring yes");
        }
        (false, _) => {}
    }
    out.push('\n');

    let rows: Vec<[String; 4]> = invoice
        .items
        .iter()
        .map(|item| {
            [
                item.description.clone(),
                item.quantity.to_string(),
                money(&item.price),
                line_amount(item.quantity, &item.price),
            ]
        })
        .collect();
    out.push_str(&table(["Description", "Qty", "Price", "Amount"], &rows));
    let _ = writeln!(out, "\nTotal     {}", money(&invoice.total));
    out
}

/// quantity × price, or `-` when it does not fit in a `Decimal`.
fn line_amount(quantity: i64, price: &Decimal) -> String {
    Decimal::from(quantity)
        .checked_mul(*price)
        .map_or_else(|| "-".to_string(), |amount| money(&amount))
}

/// Left-aligned columns padded to the widest cell.
fn table<const N: usize>(headers: [&str; N], rows: &[[String; N]]) -> String {
    let mut widths = headers.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &headers, &widths);
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref()))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
