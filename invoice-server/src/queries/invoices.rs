//! Invoice CRUD, including the owned item rows.
//!
//! Create and update write the invoice row and its items in one transaction:
//! a failing item insert rolls back the whole write.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::Database;
use crate::error::{storage_err, Error};
use crate::models::{Invoice, InvoiceItem, NewInvoice, NewInvoiceItem, UpdateInvoice};

/// All invoices with customer names and items, newest first.
///
/// Items are read with one query per invoice.
pub async fn list_invoices(db: &Database) -> Result<Vec<Invoice>, Error> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM invoices i JOIN customers c ON c.id = i.customer_id
                 ORDER BY i.created_at DESC, i.rowid DESC",
                Invoice::COLUMNS
            ))?;
            let mut invoices = stmt
                .query_map([], Invoice::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            for invoice in &mut invoices {
                invoice.items = fetch_items(conn, &invoice.id)?;
            }
            Ok(invoices)
        })
        .await
        .map_err(storage_err)
}

pub async fn get_invoice(db: &Database, id: &str) -> Result<Option<Invoice>, Error> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| fetch_invoice(conn, &id))
        .await
        .map_err(storage_err)
}

/// Insert an invoice and its items, returning the stored invoice.
///
/// `total` is written as given; total policy is applied by the caller.
pub async fn create_invoice(db: &Database, input: NewInvoice) -> Result<Invoice, Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO invoices (id, customer_id, status, due_date, is_recurring,
                     recurring_interval, total, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    id,
                    input.customer_id,
                    input.status,
                    input.due_date,
                    input.is_recurring,
                    input.recurring_interval,
                    input.total.to_string(),
                    now,
                    now,
                ],
            )?;
            insert_items(&tx, &id, &input.items)?;
            let invoice = fetch_invoice(&tx, &id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
            tx.commit()?;
            Ok(invoice)
        })
        .await
        .map_err(storage_err)
}

/// Overwrite the invoice's scalar fields and replace its item set.
///
/// `None` when no invoice has `id`; nothing is written in that case.
pub async fn update_invoice(
    db: &Database,
    id: &str,
    input: UpdateInvoice,
) -> Result<Option<Invoice>, Error> {
    let id = id.to_string();
    let now = Utc::now();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let updated = tx.execute(
                "UPDATE invoices SET status = ?1, due_date = ?2, is_recurring = ?3,
                     recurring_interval = ?4, total = ?5, updated_at = ?6
                 WHERE id = ?7",
                params![
                    input.status,
                    input.due_date,
                    input.is_recurring,
                    input.recurring_interval,
                    input.total.to_string(),
                    now,
                    id,
                ],
            )?;
            if updated == 0 {
                // Dropping the transaction rolls it back.
                return Ok(None);
            }
            tx.execute("DELETE FROM invoice_items WHERE invoice_id = ?1", params![id])?;
            insert_items(&tx, &id, &input.items)?;
            let invoice = fetch_invoice(&tx, &id)?;
            tx.commit()?;
            Ok(invoice)
        })
        .await
        .map_err(storage_err)
}

/// Delete by identifier; items go with it through `ON DELETE CASCADE`.
pub async fn delete_invoice(db: &Database, id: &str) -> Result<(), Error> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let removed = conn.execute("DELETE FROM invoices WHERE id = ?1", params![id])?;
            tracing::debug!(invoice_id = %id, removed, "invoice delete");
            Ok(())
        })
        .await
        .map_err(storage_err)
}

fn insert_items(conn: &Connection, invoice_id: &str, items: &[NewInvoiceItem]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO invoice_items (id, invoice_id, description, quantity, price)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for item in items {
        stmt.execute(params![
            Uuid::new_v4().to_string(),
            invoice_id,
            item.description,
            item.quantity,
            item.price.to_string(),
        ])?;
    }
    Ok(())
}

fn fetch_invoice(conn: &Connection, id: &str) -> rusqlite::Result<Option<Invoice>> {
    let invoice = conn
        .query_row(
            &format!(
                "SELECT {} FROM invoices i LEFT JOIN customers c ON c.id = i.customer_id
                 WHERE i.id = ?1",
                Invoice::COLUMNS
            ),
            params![id],
            Invoice::from_row,
        )
        .optional()?;
    match invoice {
        Some(mut invoice) => {
            invoice.items = fetch_items(conn, id)?;
            Ok(Some(invoice))
        }
        None => Ok(None),
    }
}

fn fetch_items(conn: &Connection, invoice_id: &str) -> rusqlite::Result<Vec<InvoiceItem>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM invoice_items WHERE invoice_id = ?1 ORDER BY rowid",
        InvoiceItem::COLUMNS
    ))?;
    let items = stmt
        .query_map(params![invoice_id], InvoiceItem::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}
