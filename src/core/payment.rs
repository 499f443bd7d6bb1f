use super::checkbox::Checkboxes;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the payment was made
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, Checkboxes,
)]
#[serde(rename_all = "snake_case")]
#[checkbox(unmarked = "Other")]
pub enum PaymentMethod {
    /// Interac e-transfer
    #[default]
    #[checkbox(label = "E-transfer")]
    Emt,
    Cheque,
    #[value(name = "bank_draft", alias = "bank-draft")]
    #[checkbox(label = "Bank Draft")]
    BankDraft,
    Cash,
}

/// What the payment was for
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, Checkboxes,
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPurpose {
    /// Monthly rent, defaults to the rental's base rent
    #[default]
    Rent,
    /// Deposit covering the given rent months
    #[value(name = "rent_deposit", alias = "rent-deposit")]
    #[checkbox(label = "Rent Deposit")]
    RentDeposit,
    #[value(name = "key_deposit", alias = "key-deposit")]
    #[checkbox(label = "Key Deposit")]
    KeyDeposit,
    Utility,
    Other,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Emt => "emt",
            PaymentMethod::Cheque => "cheque",
            PaymentMethod::BankDraft => "bank_draft",
            PaymentMethod::Cash => "cash",
        }
    }
}

impl PaymentPurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentPurpose::Rent => "rent",
            PaymentPurpose::RentDeposit => "rent_deposit",
            PaymentPurpose::KeyDeposit => "key_deposit",
            PaymentPurpose::Utility => "utility",
            PaymentPurpose::Other => "other",
        }
    }

    /// Whether the note must come from the user
    pub fn requires_note(self) -> bool {
        matches!(self, PaymentPurpose::Utility | PaymentPurpose::Other)
    }

    /// Whether the amount must come from the user rather than the base rent
    pub fn requires_amount(self) -> bool {
        !matches!(self, PaymentPurpose::Rent)
    }

    /// Name of the amount option for this purpose.
    pub fn amount_field(self) -> &'static str {
        match self {
            PaymentPurpose::Rent => "payment_amount",
            PaymentPurpose::RentDeposit => "rent_deposit_amount",
            PaymentPurpose::KeyDeposit => "key_deposit_amount",
            PaymentPurpose::Utility | PaymentPurpose::Other => "other_amount",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PaymentPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::checkbox::checkbox_row;

    #[test]
    fn purpose_row_order() {
        assert_eq!(
            checkbox_row(&PaymentPurpose::Rent),
            "[x] Rent [ ] Rent Deposit [ ] Key Deposit [ ] Utility [ ] Other"
        );
        assert_eq!(
            checkbox_row(&PaymentPurpose::Utility),
            "[ ] Rent [ ] Rent Deposit [ ] Key Deposit [x] Utility [ ] Other"
        );
    }

    #[test]
    fn method_row_has_blank_trailing_other() {
        assert_eq!(
            checkbox_row(&PaymentMethod::Emt),
            "[x] E-transfer [ ] Cheque [ ] Bank Draft [ ] Cash [ ] Other"
        );
        assert_eq!(
            checkbox_row(&PaymentMethod::Cash),
            "[ ] E-transfer [ ] Cheque [ ] Bank Draft [x] Cash [ ] Other"
        );
    }

    #[test]
    fn exactly_one_marker_per_row() {
        for purpose in PaymentPurpose::options() {
            assert_eq!(checkbox_row(purpose).matches("[x]").count(), 1);
        }
        for method in PaymentMethod::options() {
            assert_eq!(checkbox_row(method).matches("[x]").count(), 1);
        }
    }

    #[test]
    fn flag_values_use_underscores() {
        assert_eq!(
            PaymentPurpose::from_str("rent_deposit", false),
            Ok(PaymentPurpose::RentDeposit)
        );
        assert_eq!(
            PaymentPurpose::from_str("rent-deposit", false),
            Ok(PaymentPurpose::RentDeposit)
        );
        assert_eq!(
            PaymentMethod::from_str("bank_draft", false),
            Ok(PaymentMethod::BankDraft)
        );
        assert!(PaymentMethod::from_str("bitcoin", false).is_err());
    }

    #[test]
    fn amount_field_names_the_purpose_option() {
        assert_eq!(PaymentPurpose::RentDeposit.amount_field(), "rent_deposit_amount");
        assert_eq!(PaymentPurpose::KeyDeposit.amount_field(), "key_deposit_amount");
        assert_eq!(PaymentPurpose::Utility.amount_field(), "other_amount");
        assert_eq!(PaymentPurpose::Other.amount_field(), "other_amount");
    }

    #[test]
    fn display_matches_flag_value() {
        for purpose in PaymentPurpose::value_variants() {
            let value = purpose.to_possible_value().unwrap();
            assert_eq!(value.get_name(), purpose.as_str());
        }
        for method in PaymentMethod::value_variants() {
            let value = method.to_possible_value().unwrap();
            assert_eq!(value.get_name(), method.as_str());
        }
    }
}
