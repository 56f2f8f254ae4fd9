//! Customer CRUD.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::Database;
use crate::error::{storage_err, Error};
use crate::models::{Customer, CustomerInput};

/// All customers, newest first.
pub async fn list_customers(db: &Database) -> Result<Vec<Customer>, Error> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM customers ORDER BY created_at DESC, rowid DESC",
                Customer::COLUMNS
            ))?;
            let customers = stmt
                .query_map([], Customer::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(customers)
        })
        .await
        .map_err(storage_err)
}

pub async fn get_customer(db: &Database, id: &str) -> Result<Option<Customer>, Error> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| fetch_customer(conn, &id))
        .await
        .map_err(storage_err)
}

/// Insert a customer under a fresh identifier and return the stored row.
pub async fn create_customer(db: &Database, input: CustomerInput) -> Result<Customer, Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO customers (id, name, email, phone, address, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![id, input.name, input.email, input.phone, input.address, now, now],
            )?;
            let customer = fetch_customer(conn, &id)?;
            customer.ok_or(rusqlite::Error::QueryReturnedNoRows)
        })
        .await
        .map_err(storage_err)
}

/// Overwrite every mutable field. `None` when no customer has `id`.
pub async fn update_customer(
    db: &Database,
    id: &str,
    input: CustomerInput,
) -> Result<Option<Customer>, Error> {
    let id = id.to_string();
    let now = Utc::now();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE customers SET name = ?1, email = ?2, phone = ?3, address = ?4, updated_at = ?5
                 WHERE id = ?6",
                params![input.name, input.email, input.phone, input.address, now, id],
            )?;
            fetch_customer(conn, &id)
        })
        .await
        .map_err(storage_err)
}

/// Delete by identifier. Deleting an unknown identifier is not an error.
pub async fn delete_customer(db: &Database, id: &str) -> Result<(), Error> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let removed = conn.execute("DELETE FROM customers WHERE id = ?1", params![id])?;
            tracing::debug!(customer_id = %id, removed, "customer delete");
            Ok(())
        })
        .await
        .map_err(storage_err)
}

fn fetch_customer(conn: &Connection, id: &str) -> rusqlite::Result<Option<Customer>> {
    conn.query_row(
        &format!("SELECT {} FROM customers WHERE id = ?1", Customer::COLUMNS),
        params![id],
        Customer::from_row,
    )
    .optional()
}
