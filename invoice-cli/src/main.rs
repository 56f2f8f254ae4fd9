//! `invoice`: terminal front end for the invoice service.

mod render;
mod transport;

use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use invoice_core::{
    ApiError, Backend, CustomerDraft, DraftItem, FormError, InvoiceClient, InvoiceDraft,
    InvoiceStatus, RecurringInterval, Store, Transport,
};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::transport::UreqTransport;

const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

/// Manage customers and invoices on an invoice server.
#[derive(Parser, Debug)]
#[command(name = "invoice", version, about, long_about = None)]
struct Cli {
    /// Base URL of the invoice server.
    #[arg(long, global = true, env = "INVOICE_API_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Customer records.
    #[command(subcommand)]
    Customers(CustomerCommand),
    /// Invoices and their line items.
    #[command(subcommand)]
    Invoices(InvoiceCommand),
}

#[derive(Subcommand, Debug)]
enum CustomerCommand {
    /// List every customer.
    List,
    /// Create a customer.
    Add(CustomerFields),
    /// Change some or all of a customer's fields.
    Update {
        id: String,
        #[command(flatten)]
        fields: CustomerPatch,
    },
    /// Delete a customer. Fails while the customer still has invoices.
    Remove { id: String },
}

#[derive(Args, Debug)]
struct CustomerFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: String,
}

#[derive(Args, Debug)]
struct CustomerPatch {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    address: Option<String>,
}

#[derive(Subcommand, Debug)]
enum InvoiceCommand {
    /// List invoices, newest first.
    List,
    /// Show one invoice with its items.
    Show { id: String },
    /// Create a pending invoice.
    New {
        /// Customer id.
        #[arg(long)]
        customer: String,
        /// Due date, YYYY-MM-DD.
        #[arg(long)]
        due: NaiveDate,
        /// Line item as "description:quantity:price". Repeatable.
        #[arg(long = "item", required = true, value_parser = parse_item)]
        items: Vec<DraftItem>,
        /// Make the invoice recurring: monthly, quarterly or yearly.
        #[arg(long)]
        recurring: Option<RecurringInterval>,
    },
    /// Set an invoice's status: draft, pending, paid or overdue.
    Status { id: String, status: InvoiceStatus },
    /// Delete an invoice and its items.
    Remove { id: String },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{}", join_errors(.0))]
    Invalid(Vec<FormError>),
}

fn join_errors(errors: &[FormError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse `description:quantity:price`. The description may itself contain
/// colons; the last two fields may not.
fn parse_item(raw: &str) -> Result<DraftItem, String> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(price), Some(quantity), Some(description)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected description:quantity:price, got {raw:?}"));
    };
    let quantity = quantity
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("bad quantity {quantity:?}: {e}"))?;
    let price = price
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("bad price {price:?}: {e}"))?;
    Ok(DraftItem {
        description: description.to_string(),
        quantity,
        price,
    })
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let backend = Backend::new(InvoiceClient::new(&cli.server), UreqTransport::new());

    match run(cli.command, &backend) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("invoice: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Execute one command and return what should be printed.
fn run<T: Transport>(command: Commands, backend: &Backend<T>) -> Result<String, CliError> {
    let mut store = Store::new();
    match command {
        Commands::Customers(cmd) => customers(cmd, backend, &mut store),
        Commands::Invoices(cmd) => invoices(cmd, backend, &mut store),
    }
}

fn customers<T: Transport>(
    command: CustomerCommand,
    backend: &Backend<T>,
    store: &mut Store,
) -> Result<String, CliError> {
    match command {
        CustomerCommand::List => {
            store.refresh_customers(backend)?;
            Ok(render::customer_table(store.customers()))
        }
        CustomerCommand::Add(fields) => {
            let input = CustomerDraft {
                name: fields.name,
                email: fields.email,
                phone: fields.phone,
                address: fields.address,
            }
            .submit()
            .map_err(CliError::Invalid)?;
            let customer = store.add_customer(backend, &input)?;
            Ok(format!("Created customer {} ({})\n", customer.id, customer.name))
        }
        CustomerCommand::Update { id, fields } => {
            let current = backend.get_customer(&id)?;
            let input = CustomerDraft {
                name: fields.name.unwrap_or(current.name),
                email: fields.email.unwrap_or(current.email),
                phone: fields.phone.unwrap_or(current.phone),
                address: fields.address.unwrap_or(current.address),
            }
            .submit()
            .map_err(CliError::Invalid)?;
            let customer = store.update_customer(backend, &id, &input)?;
            Ok(format!("Updated customer {} ({})\n", customer.id, customer.name))
        }
        CustomerCommand::Remove { id } => {
            store.delete_customer(backend, &id)?;
            Ok(format!("Deleted customer {id}\n"))
        }
    }
}

fn invoices<T: Transport>(
    command: InvoiceCommand,
    backend: &Backend<T>,
    store: &mut Store,
) -> Result<String, CliError> {
    match command {
        InvoiceCommand::List => {
            store.refresh(backend)?;
            Ok(render::invoice_table(store))
        }
        InvoiceCommand::Show { id } => {
            let invoice = backend.get_invoice(&id)?;
            Ok(render::invoice_detail(&invoice))
        }
        InvoiceCommand::New {
            customer,
            due,
            items,
            recurring,
        } => {
            let input = InvoiceDraft {
                customer_id: customer,
                due_date: Some(due),
                is_recurring: recurring.is_some(),
                recurring_interval: recurring,
                items,
            }
            .submit()
            .map_err(CliError::Invalid)?;
            let invoice = store.add_invoice(backend, &input)?;
            Ok(format!(
                "Created invoice {} for {}\n",
                invoice.id,
                render::money(&invoice.total)
            ))
        }
        InvoiceCommand::Status { id, status } => {
            let mut update = backend.get_invoice(&id)?.to_update();
            update.status = status;
            let invoice = store.update_invoice(backend, &id, &update)?;
            Ok(format!(
                "Invoice {} is now {}\n",
                invoice.id,
                render::status(invoice.status)
            ))
        }
        InvoiceCommand::Remove { id } => {
            store.delete_invoice(backend, &id)?;
            Ok(format!("Deleted invoice {id}\n"))
        }
    }
}
