//! Schema command - print the rentals file format

use crate::core::RentalDirectory;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Print a filled-in example instead of the JSON Schema
    #[arg(long)]
    example: bool,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        if self.example {
            let example = RentalDirectory::builtin();
            println!("{}", serde_json::to_string_pretty(&example)?);
        } else {
            let schema = schema_for!(RentalDirectory);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Ok(())
    }
}
