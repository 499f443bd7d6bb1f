pub mod email_pdf;
pub mod receipt;
pub mod rentals;
pub mod schema;

use crate::core::RentalDirectory;
use crate::paths;
use anyhow::Context;
use std::path::Path;

/// The rentals file if one is given, otherwise the built-in table.
pub fn read_rentals(path: Option<&Path>) -> anyhow::Result<RentalDirectory> {
    match path {
        Some(path) => {
            let path = paths::resolve(path)?;
            log::debug!("Loading rentals from {}", path.display());
            RentalDirectory::load(&path)
                .with_context(|| format!("loading rentals from {}", path.display()))
        }
        None => Ok(RentalDirectory::builtin()),
    }
}
