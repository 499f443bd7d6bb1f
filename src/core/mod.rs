pub mod amount;
pub mod checkbox;
pub mod config;
pub mod content;
pub mod payment;
pub mod rental;

// Flat public surface for domain types and functions.
#[allow(unused_imports)]
pub use amount::{Amount, AmountError};
#[allow(unused_imports)]
pub use config::{ConfigError, MonthOverride, PaymentConfig};
pub use content::{build, LineStyle, ReceiptLine, Rollover};
pub use payment::{PaymentMethod, PaymentPurpose};
#[allow(unused_imports)]
pub use rental::{RentalDirectory, RentalRecord};
