pub mod customers;
pub mod invoices;
