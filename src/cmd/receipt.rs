//! Receipt command - fill in a receipt and write it as a PDF

use crate::cmd::read_rentals;
use crate::core::{
    self, Amount, MonthOverride, PaymentConfig, PaymentMethod, PaymentPurpose, Rollover,
};
use crate::paths;
use crate::render::PdfRenderer;
use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ReceiptCommand {
    /// Address key of the rental (see `rentc rentals`)
    #[arg(long, default_value = "723")]
    address: String,

    /// How the payment was made
    #[arg(long, alias = "payment_method", value_enum, default_value_t = PaymentMethod::Emt)]
    payment_method: PaymentMethod,

    /// What the payment was for
    #[arg(long, alias = "payment_purpose", value_enum, default_value_t = PaymentPurpose::Rent)]
    payment_purpose: PaymentPurpose,

    /// Rent month, e.g. "Apr" or "Apr 2026" (default: inferred from the date)
    #[arg(long)]
    month: Option<MonthOverride>,

    /// Months covered by a rent deposit, e.g. "May and Apr"
    #[arg(long, alias = "rent_deposit_months")]
    rent_deposit_months: Option<String>,

    /// Note for utility and other payments
    #[arg(long, aliases = ["note-for-other", "note_for_other"])]
    note: Option<String>,

    /// Amount paid (default for rent: the rental's base rent)
    #[arg(long, alias = "payment_amount")]
    payment_amount: Option<Amount>,

    /// Amount of a rent deposit
    #[arg(long, alias = "rent_deposit_amount")]
    rent_deposit_amount: Option<Amount>,

    /// Amount of a key deposit
    #[arg(long, alias = "key_deposit_amount")]
    key_deposit_amount: Option<Amount>,

    /// Amount of a utility or other payment
    #[arg(long, alias = "other_amount")]
    other_amount: Option<Amount>,

    /// Comma separated tenant names, replacing the rental's tenants
    #[arg(long, value_delimiter = ',')]
    tenants: Option<Vec<String>>,

    /// Directory the receipt is written to
    #[arg(long, alias = "output_dir", default_value = "~/Downloads")]
    output_dir: PathBuf,

    /// File name of the receipt
    #[arg(long, alias = "file_name", default_value = "receipt.pdf")]
    file_name: String,

    /// Image drawn beside the signature line
    #[arg(long, alias = "signature_image_path", default_value = "signature.png")]
    signature_image_path: PathBuf,

    /// Leave the signature line blank
    #[arg(long, alias = "no_signature")]
    no_signature: bool,

    /// JSON rentals file (default: built-in rentals)
    #[arg(long)]
    rentals: Option<PathBuf>,

    /// Day of month from which rent counts for the next month
    #[arg(
        long,
        alias = "rollover_day",
        default_value_t = 24,
        value_parser = clap::value_parser!(u32).range(1..=31)
    )]
    rollover_day: u32,

    /// Receipt date as YYYY-MM-DD (default: today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Open the receipt once written
    #[arg(long)]
    open: bool,
}

impl ReceiptCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let directory = read_rentals(self.rentals.as_deref())?;
        let config = self.payment_config();
        for flag in self.ignored_amount_flags() {
            log::warn!(
                "--{} is ignored when payment purpose is {}",
                flag,
                self.payment_purpose
            );
        }
        let record = config.validate(&directory)?;

        let signature = self.signature()?;
        let output = paths::resolve(&self.output_dir.join(&self.file_name))?;

        let today = self.date.unwrap_or_else(|| Local::now().date_naive());
        let rollover = Rollover {
            cutoff_day: self.rollover_day,
        };
        let lines = core::build(&config, record, &directory.landlord, today, rollover);
        for line in &lines {
            log::debug!("{}", line.render());
        }

        PdfRenderer::default()
            .write(&lines, signature.as_deref(), &output)
            .with_context(|| format!("writing receipt to {}", output.display()))?;
        log::info!(
            "{} receipt for {} written",
            config.purpose,
            record.address
        );
        println!("Receipt written to: {}", output.display());

        if self.open {
            opener::open(&output)?;
        }
        Ok(())
    }

    fn payment_config(&self) -> PaymentConfig {
        PaymentConfig {
            address_key: self.address.trim().to_string(),
            method: self.payment_method,
            purpose: self.payment_purpose,
            month: self.month,
            rent_deposit_months: self.rent_deposit_months.clone(),
            note: self.note.clone(),
            amount: self.amount(),
            tenants: self.tenants.clone(),
        }
    }

    /// The purpose-specific amount if given, else `--payment-amount`.
    fn amount(&self) -> Option<Amount> {
        let specific = match self.payment_purpose {
            PaymentPurpose::Rent => None,
            PaymentPurpose::RentDeposit => self.rent_deposit_amount,
            PaymentPurpose::KeyDeposit => self.key_deposit_amount,
            PaymentPurpose::Utility | PaymentPurpose::Other => self.other_amount,
        };
        specific.or(self.payment_amount)
    }

    /// Amount options given for a purpose other than the selected one.
    fn ignored_amount_flags(&self) -> Vec<String> {
        [
            (PaymentPurpose::RentDeposit, self.rent_deposit_amount),
            (PaymentPurpose::KeyDeposit, self.key_deposit_amount),
            (PaymentPurpose::Other, self.other_amount),
        ]
        .into_iter()
        .filter(|(purpose, amount)| {
            amount.is_some() && purpose.amount_field() != self.payment_purpose.amount_field()
        })
        .map(|(purpose, _)| purpose.amount_field().replace('_', "-"))
        .collect()
    }

    fn signature(&self) -> anyhow::Result<Option<PathBuf>> {
        if self.no_signature {
            return Ok(None);
        }
        let path = paths::resolve(&self.signature_image_path)?;
        check_exists(&path)?;
        Ok(Some(path))
    }
}

fn check_exists(path: &Path) -> anyhow::Result<()> {
    if !path.is_file() {
        anyhow::bail!(
            "signature image {} not found (use --no-signature to leave it blank)",
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        receipt: ReceiptCommand,
    }

    fn parse(args: &[&str]) -> ReceiptCommand {
        let mut argv = vec!["rentc"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().receipt
    }

    #[test]
    fn defaults() {
        let cmd = parse(&[]);
        assert_eq!(cmd.address, "723");
        assert_eq!(cmd.payment_method, PaymentMethod::Emt);
        assert_eq!(cmd.payment_purpose, PaymentPurpose::Rent);
        assert_eq!(cmd.output_dir, PathBuf::from("~/Downloads"));
        assert_eq!(cmd.file_name, "receipt.pdf");
        assert_eq!(cmd.rollover_day, 24);
        assert!(cmd.amount().is_none());
    }

    #[test]
    fn underscore_aliases() {
        let cmd = parse(&[
            "--payment_method",
            "bank_draft",
            "--payment_purpose",
            "rent_deposit",
            "--rent_deposit_months",
            "May and Apr",
            "--note_for_other",
            "n",
            "--output_dir",
            "/tmp",
        ]);
        assert_eq!(cmd.payment_method, PaymentMethod::BankDraft);
        assert_eq!(cmd.payment_purpose, PaymentPurpose::RentDeposit);
        assert_eq!(cmd.rent_deposit_months.as_deref(), Some("May and Apr"));
        assert_eq!(cmd.note.as_deref(), Some("n"));
        assert_eq!(cmd.output_dir, PathBuf::from("/tmp"));
    }

    #[test]
    fn purpose_specific_amount_wins() {
        let cmd = parse(&[
            "--payment-purpose",
            "key_deposit",
            "--payment-amount",
            "100",
            "--key-deposit-amount",
            "$250",
        ]);
        assert_eq!(cmd.amount(), Some(Amount::dollars(250)));

        let cmd = parse(&["--payment-purpose", "utility", "--payment-amount", "80"]);
        assert_eq!(cmd.amount(), Some(Amount::dollars(80)));

        // another purpose's amount is ignored
        let cmd = parse(&["--payment-purpose", "utility", "--key-deposit-amount", "80"]);
        assert_eq!(cmd.amount(), None);
    }

    #[test]
    fn reports_amounts_for_other_purposes() {
        let cmd = parse(&["--other-amount", "50"]);
        assert_eq!(cmd.ignored_amount_flags(), vec!["other-amount"]);
        assert_eq!(cmd.amount(), None);

        let cmd = parse(&[
            "--payment-purpose",
            "other",
            "--other-amount",
            "50",
            "--key-deposit-amount",
            "100",
        ]);
        assert_eq!(cmd.ignored_amount_flags(), vec!["key-deposit-amount"]);

        let cmd = parse(&["--payment-purpose", "utility", "--other-amount", "50"]);
        assert!(cmd.ignored_amount_flags().is_empty());
    }

    #[test]
    fn tenants_are_comma_separated() {
        let cmd = parse(&["--tenants", "Alex Doe,Sam Roe"]);
        let config = cmd.payment_config();
        assert_eq!(
            config.tenants,
            Some(vec!["Alex Doe".to_string(), "Sam Roe".to_string()])
        );
    }

    #[test]
    fn rejects_out_of_range_rollover_day() {
        assert!(Cli::try_parse_from(["rentc", "--rollover-day", "0"]).is_err());
        assert!(Cli::try_parse_from(["rentc", "--rollover-day", "32"]).is_err());
    }

    #[test]
    fn rejects_unknown_method() {
        assert!(Cli::try_parse_from(["rentc", "--payment-method", "bitcoin"]).is_err());
    }

    #[test]
    fn parses_month_and_date() {
        let cmd = parse(&["--month", "Apr 2026", "--date", "2026-03-25"]);
        assert_eq!(cmd.month.unwrap().year, Some(2026));
        assert_eq!(cmd.date, NaiveDate::from_ymd_opt(2026, 3, 25));
    }

    #[test]
    fn missing_signature_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("signature.png");
        let err = check_exists(&missing).unwrap_err();
        assert!(err.to_string().contains("--no-signature"));

        let cmd = parse(&["--no-signature"]);
        assert!(cmd.signature().unwrap().is_none());
    }
}
