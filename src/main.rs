mod cmd;
mod core;
mod mail;
mod paths;
mod render;

use clap::{Parser, Subcommand};
use log::LevelFilter;

/// Rent receipts and payment emails as PDF
#[derive(Parser, Debug)]
#[command(name = "rentc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a rent receipt PDF
    Receipt(cmd::receipt::ReceiptCommand),
    /// List the known rentals
    Rentals(cmd::rentals::RentalsCommand),
    /// Print the JSON Schema of the rentals file
    Schema(cmd::schema::SchemaCommand),
    /// Convert the latest matching email to PDF
    EmailPdf(cmd::email_pdf::EmailPdfCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Receipt(receipt) => receipt.exec(),
        Command::Rentals(rentals) => rentals.exec(),
        Command::Schema(schema) => schema.exec(),
        Command::EmailPdf(email_pdf) => email_pdf.exec(),
    }
}
