//! Rentals command - list the known rentals

use crate::cmd::read_rentals;
use crate::core::RentalDirectory;
use clap::Args;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct RentalsCommand {
    /// JSON rentals file (default: built-in rentals)
    #[arg(long)]
    rentals: Option<PathBuf>,

    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output the directory as JSON, in the rentals file format
    #[arg(long)]
    json: bool,
}

impl RentalsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let directory = read_rentals(self.rentals.as_deref())?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&directory)?);
            return Ok(());
        }

        let rows = rental_rows(&directory);
        if self.csv {
            write_csv(&rows, io::stdout())
        } else {
            print_table(&directory.landlord, &rows);
            Ok(())
        }
    }
}

/// Row for the rentals table output
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct RentalRow {
    #[tabled(rename = "Key")]
    pub key: String,

    #[tabled(rename = "Address")]
    pub address: String,

    #[tabled(rename = "Tenants")]
    pub tenants: String,

    #[tabled(rename = "Rent")]
    pub rent: String,
}

fn rental_rows(directory: &RentalDirectory) -> Vec<RentalRow> {
    directory
        .rentals
        .iter()
        .map(|(key, record)| RentalRow {
            key: key.clone(),
            address: record.address.clone(),
            tenants: record.tenants.join(", "),
            rent: record.rent.to_string(),
        })
        .collect()
}

fn print_table(landlord: &str, rows: &[RentalRow]) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..)).with(Alignment::right()))
        .to_string();
    println!("Landlord: {}", landlord);
    println!("{}", table);
}

fn write_csv<W: io::Write>(rows: &[RentalRow], writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
