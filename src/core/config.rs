use super::amount::Amount;
use super::payment::{PaymentMethod, PaymentPurpose};
use super::rental::{RentalDirectory, RentalRecord};
use chrono::Month;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown address '{key}' (known: {known})")]
    UnknownAddress { key: String, known: String },
    #[error("{field} must be provided when payment purpose is {purpose}")]
    MissingField {
        purpose: PaymentPurpose,
        field: &'static str,
    },
    #[error("rental '{key}' has no tenants")]
    NoTenants { key: String },
    #[error("tenant list must contain at least one name")]
    EmptyTenantOverride,
    #[error("invalid rentals file: {0}")]
    InvalidDirectory(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid month '{0}', expected a month and optional year like \"Apr\" or \"Apr 2026\"")]
pub struct MonthError(String);

/// Explicit rent month, e.g. `Apr` or `Apr 2026`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthOverride {
    pub month: Month,
    pub year: Option<i32>,
}

impl FromStr for MonthOverride {
    type Err = MonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MonthError(s.to_string());
        let mut parts = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty());

        let month = parts
            .next()
            .and_then(|m| m.parse::<Month>().ok())
            .ok_or_else(err)?;
        let year = match parts.next() {
            Some(y) => Some(y.parse::<i32>().map_err(|_| err())?),
            None => None,
        };
        if parts.next().is_some() {
            return Err(err());
        }

        Ok(MonthOverride { month, year })
    }
}

/// Everything needed to describe one payment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentConfig {
    pub address_key: String,
    pub method: PaymentMethod,
    pub purpose: PaymentPurpose,
    pub month: Option<MonthOverride>,
    /// Format: "<first month> and <last month>"
    pub rent_deposit_months: Option<String>,
    pub note: Option<String>,
    pub amount: Option<Amount>,
    pub tenants: Option<Vec<String>>,
}

impl PaymentConfig {
    /// Check the fields required by the payment purpose and resolve the rental.
    ///
    /// Blank strings count as missing.
    pub fn validate<'a>(
        &self,
        directory: &'a RentalDirectory,
    ) -> Result<&'a RentalRecord, ConfigError> {
        let record = directory.lookup(&self.address_key)?;

        let missing = |field| ConfigError::MissingField {
            purpose: self.purpose,
            field,
        };

        if self.purpose == PaymentPurpose::RentDeposit && is_blank(&self.rent_deposit_months) {
            return Err(missing("rent_deposit_months"));
        }
        if self.purpose.requires_note() && is_blank(&self.note) {
            return Err(missing("note"));
        }
        if self.purpose.requires_amount() && self.amount.is_none() {
            return Err(missing(self.purpose.amount_field()));
        }
        if let Some(tenants) = &self.tenants {
            if tenants.iter().all(|t| t.trim().is_empty()) {
                return Err(ConfigError::EmptyTenantOverride);
            }
        }

        Ok(record)
    }

    /// Tenant names to print, the override winning over the rental record.
    pub fn tenants<'a>(&'a self, record: &'a RentalRecord) -> Vec<&'a str> {
        self.tenants
            .as_ref()
            .unwrap_or(&record.tenants)
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Amount paid: the explicit amount, else the base rent for rent payments.
    pub fn amount(&self, record: &RentalRecord) -> Option<Amount> {
        match (self.amount, self.purpose) {
            (Some(amount), _) => Some(amount),
            (None, PaymentPurpose::Rent) => Some(record.rent),
            (None, _) => None,
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
