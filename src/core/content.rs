//! Receipt content: the ordered, labelled lines of a receipt.

use super::checkbox::checkbox_row;
use super::config::PaymentConfig;
use super::payment::PaymentPurpose;
use super::rental::RentalRecord;
use chrono::{Datelike, Months, NaiveDate};

/// Width of the label column, so values line up in a fixed-width font.
pub const LABEL_WIDTH: usize = 14;

/// Day of month from which a rent payment counts for the following month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rollover {
    pub cutoff_day: u32,
}

impl Default for Rollover {
    fn default() -> Self {
        Rollover { cutoff_day: 24 }
    }
}

impl Rollover {
    /// First day of the month the rent paid on `today` is for.
    pub fn rent_period(&self, today: NaiveDate) -> NaiveDate {
        let first = today.with_day(1).unwrap_or(today);
        if today.day() >= self.cutoff_day {
            first.checked_add_months(Months::new(1)).unwrap_or(first)
        } else {
            first
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Centered, bold heading
    Title,
    Field,
    /// The line the signature image is drawn beside
    Signature,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    pub label: Option<&'static str>,
    pub text: String,
    pub style: LineStyle,
}

impl ReceiptLine {
    fn title(text: &str) -> Self {
        ReceiptLine {
            label: None,
            text: text.to_string(),
            style: LineStyle::Title,
        }
    }

    fn field(label: &'static str, text: impl Into<String>) -> Self {
        ReceiptLine {
            label: Some(label),
            text: text.into(),
            style: LineStyle::Field,
        }
    }

    /// Label padded to the label column, followed by the text.
    pub fn render(&self) -> String {
        match self.label {
            Some(label) => {
                let label = format!("{}:", label);
                let line = format!("{:<width$}{}", label, self.text, width = LABEL_WIDTH);
                line.trim_end().to_string()
            }
            None => self.text.clone(),
        }
    }

    /// The rendered line broken into rows of at most `columns` characters.
    ///
    /// Breaks at spaces, never between a checkbox and its label. Rows after
    /// the first are indented to the value column.
    pub fn wrap(&self, columns: usize) -> Vec<String> {
        let indent = if self.label.is_some() { LABEL_WIDTH } else { 0 };
        wrap_text(&self.render(), columns.max(indent + 1), indent)
    }
}

fn wrap_text(text: &str, columns: usize, indent: usize) -> Vec<String> {
    let mut rows = Vec::new();
    let mut rest: Vec<char> = text.chars().collect();
    let mut first = true;

    loop {
        let prefix = if first { 0 } else { indent };
        let width = columns - prefix;
        let pad = " ".repeat(prefix);

        if rest.len() <= width {
            rows.push(format!("{}{}", pad, rest.iter().collect::<String>()));
            return rows;
        }

        // on the first row the label and its padding are not break points
        let lowest = if first { indent + 1 } else { 1 };
        let cut = (lowest..=width)
            .rev()
            .find(|&i| rest[i] == ' ' && !matches!(rest[i - 1], '[' | ']'));
        let (row, next) = match cut {
            Some(i) => (&rest[..i], &rest[i..]),
            None => rest.split_at(width),
        };

        let row: String = row.iter().collect();
        rows.push(format!("{}{}", pad, row.trim_end()));
        rest = next.iter().copied().skip_while(|c| *c == ' ').collect();
        first = false;

        if rest.is_empty() {
            return rows;
        }
    }
}

/// Build the receipt lines for a validated config.
///
/// Deterministic: the date is passed in, never read from the clock.
pub fn build(
    config: &PaymentConfig,
    record: &RentalRecord,
    landlord: &str,
    today: NaiveDate,
    rollover: Rollover,
) -> Vec<ReceiptLine> {
    let amount = config
        .amount(record)
        .map(|a| a.to_string())
        .unwrap_or_default();

    vec![
        ReceiptLine::title("RECEIPT"),
        ReceiptLine::field("Date", today.format("%b %-d, %Y").to_string()),
        ReceiptLine::field("Address", record.address.as_str()),
        ReceiptLine::field("Tenant(s)", config.tenants(record).join(", ")),
        ReceiptLine::field("Payment For", checkbox_row(&config.purpose)),
        ReceiptLine::field("Payment Note", note(config, today, rollover)),
        ReceiptLine::field("Payment Type", checkbox_row(&config.method)),
        ReceiptLine::field("Amount", amount),
        ReceiptLine::field("Landlord", landlord),
        ReceiptLine {
            label: Some("Signature"),
            text: String::new(),
            style: LineStyle::Signature,
        },
    ]
}

/// The payment note line for the config's purpose.
pub fn note(config: &PaymentConfig, today: NaiveDate, rollover: Rollover) -> String {
    match config.purpose {
        PaymentPurpose::Rent => {
            let period = match config.month {
                Some(month) => {
                    let year = month.year.unwrap_or_else(|| today.year());
                    format!("{}, {}", short_month(month.month), year)
                }
                None => rollover.rent_period(today).format("%b, %Y").to_string(),
            };
            format!("Rent for {}", period)
        }
        PaymentPurpose::RentDeposit => format!(
            "Rent for {}",
            config.rent_deposit_months.as_deref().unwrap_or_default().trim()
        ),
        PaymentPurpose::KeyDeposit => "Key deposit".to_string(),
        PaymentPurpose::Utility | PaymentPurpose::Other => {
            config.note.as_deref().unwrap_or_default().trim().to_string()
        }
    }
}

fn short_month(month: chrono::Month) -> &'static str {
    &month.name()[..3]
}
