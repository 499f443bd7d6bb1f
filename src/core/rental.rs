use super::amount::Amount;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::config::ConfigError;

/// A rental unit and the people renting it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RentalRecord {
    /// Full street address printed on the receipt
    pub address: String,
    /// Tenant names, printed in this order
    pub tenants: Vec<String>,
    /// Base monthly rent, e.g. "$2,740.00"
    #[schemars(with = "String")]
    pub rent: Amount,
}

/// All known rentals keyed by a short address key, plus the landlord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RentalDirectory {
    /// Name printed on the landlord line
    pub landlord: String,
    /// Rentals by address key (e.g. "723")
    pub rentals: BTreeMap<String, RentalRecord>,
}

impl RentalDirectory {
    /// The table used when no rentals file is given.
    pub fn builtin() -> Self {
        let mut rentals = BTreeMap::new();
        rentals.insert(
            "723".to_string(),
            RentalRecord {
                address: "723 Chesapeake Dr. Waterloo, ON, N2K 4G4".to_string(),
                tenants: vec!["Lindsay Demars".to_string(), "Grady Meston".to_string()],
                rent: Amount::dollars(2740),
            },
        );
        rentals.insert(
            "2".to_string(),
            RentalRecord {
                address: "2 Lesgay Crescent, North York, ON M2J 2H8".to_string(),
                tenants: vec![
                    "Mei Lam Ho".to_string(),
                    "On Lai Chan".to_string(),
                    "Wai Yin Poon".to_string(),
                    "Hoi Hin Mo".to_string(),
                ],
                rent: Amount::dollars(4300),
            },
        );

        RentalDirectory {
            landlord: "Yizheng Ding".to_string(),
            rentals,
        }
    }

    /// Load a rentals file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)
            .map_err(|e| ConfigError::InvalidDirectory(format!("{}: {}", path.display(), e)))?;
        Self::read_json(BufReader::new(file))
    }

    /// Read a directory from JSON and check every record is usable.
    pub fn read_json<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let directory: RentalDirectory = serde_json::from_reader(reader)
            .map_err(|e| ConfigError::InvalidDirectory(e.to_string()))?;
        directory.check()?;
        Ok(directory)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.rentals.is_empty() {
            return Err(ConfigError::InvalidDirectory(
                "no rentals defined".to_string(),
            ));
        }
        if self.landlord.trim().is_empty() {
            return Err(ConfigError::InvalidDirectory(
                "landlord must not be empty".to_string(),
            ));
        }
        for (key, record) in &self.rentals {
            if record.tenants.iter().all(|t| t.trim().is_empty()) {
                return Err(ConfigError::NoTenants { key: key.clone() });
            }
        }
        Ok(())
    }

    pub fn lookup(&self, key: &str) -> Result<&RentalRecord, ConfigError> {
        self.rentals
            .get(key)
            .ok_or_else(|| ConfigError::UnknownAddress {
                key: key.to_string(),
                known: self.keys().join(", "),
            })
    }

    pub fn keys(&self) -> Vec<&str> {
        self.rentals.keys().map(String::as_str).collect()
    }
}
