//! SQL for each resource. Every function runs its statements inside a single
//! `call` on the database thread.

pub mod customers;
pub mod invoices;
