//! Database handle, connection setup and embedded migrations.
//!
//! Every statement runs on tokio-rusqlite's single background thread, so
//! writes from concurrent requests are applied one at a time.

use std::sync::Arc;

use tokio_rusqlite::Connection;

use crate::error::{storage_err, Error};

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Shared handle to the invoice database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Connection>,
}

impl Database {
    /// Open (creating if needed) the database file at `path` and migrate it.
    pub async fn open(path: &str) -> Result<Self, Error> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| Error::Storage(Box::new(e)))?;
        Self::prepare(conn).await
    }

    /// Open a private in-memory database. Used by tests.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Storage(Box::new(e)))?;
        Self::prepare(conn).await
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    async fn prepare(conn: Connection) -> Result<Self, Error> {
        // SQLite ships with foreign keys off; cascade delete depends on them.
        conn.call(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"))
            .await
            .map_err(storage_err)?;

        let applied = conn
            .call(|conn| {
                Ok(embedded::migrations::runner()
                    .run(conn)
                    .map(|report| report.applied_migrations().len())
                    .map_err(|e| e.to_string()))
            })
            .await
            .map_err(storage_err)?
            .map_err(Error::Migration)?;
        tracing::debug!(applied, "database migrations complete");

        Ok(Self {
            conn: Arc::new(conn),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_create_all_tables() {
        let db = Database::open_in_memory().await.unwrap();
        let tables: Vec<String> = db
            .connection()
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' \
                     AND name IN ('customers', 'invoices', 'invoice_items') ORDER BY name",
                )?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(storage_err)
            .unwrap();
        assert_eq!(tables, vec!["customers", "invoice_items", "invoices"]);
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = Database::open_in_memory().await.unwrap();
        let enabled: i64 = db
            .connection()
            .call(|conn| conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0)))
            .await
            .map_err(storage_err)
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
