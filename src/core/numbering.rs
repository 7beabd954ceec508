//! Sequential invoice numbering
//!
//! Invoice numbers look like `INV-0042`: an uppercase prefix, a hyphen and a
//! zero-padded counter. The next number is derived from a snapshot of the
//! numbers already issued, so it is only a proposal: uniqueness is enforced
//! by the store.

use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_PREFIX: &str = "INV";
pub const DEFAULT_PADDING: usize = 4;

/// Anything that carries an id and an invoice number
pub trait NumberedInvoice {
    fn invoice_id(&self) -> i64;
    fn invoice_number(&self) -> &str;
}

impl NumberedInvoice for (i64, &str) {
    fn invoice_id(&self) -> i64 {
        self.0
    }

    fn invoice_number(&self) -> &str {
        self.1
    }
}

impl NumberedInvoice for (i64, String) {
    fn invoice_id(&self) -> i64 {
        self.0
    }

    fn invoice_number(&self) -> &str {
        &self.1
    }
}

fn trailing_digits() -> &'static Regex {
    static TRAILING: OnceLock<Regex> = OnceLock::new();
    TRAILING.get_or_init(|| Regex::new(r"(\d+)$").expect("trailing digits regex is valid"))
}

fn number_format() -> &'static Regex {
    static FORMAT: OnceLock<Regex> = OnceLock::new();
    FORMAT.get_or_init(|| {
        Regex::new(r"^[A-Z]{1,10}-?[0-9]{1,10}$").expect("invoice number regex is valid")
    })
}

/// Counter encoded in the trailing digits of an invoice number
///
/// Numbers without a numeric suffix count as 0. A suffix too large for `u64`
/// saturates, so it still ranks above every other counter.
pub fn trailing_number(invoice_number: &str) -> u64 {
    trailing_digits()
        .captures(invoice_number)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().parse().unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Next invoice number after the highest counter in `existing`
///
/// An empty list yields counter 1. The counter is zero-padded to `padding`
/// digits and never truncated.
pub fn next_invoice_number<'a>(
    existing: impl IntoIterator<Item = &'a str>,
    prefix: &str,
    padding: usize,
) -> String {
    let highest = existing.into_iter().map(trailing_number).max().unwrap_or(0);
    format_invoice_number(prefix, highest.saturating_add(1), padding)
}

pub fn format_invoice_number(prefix: &str, counter: u64, padding: usize) -> String {
    format!("{}-{:0>width$}", prefix, counter, width = padding)
}

/// Whether `number` is already used by an invoice other than `exclude_id`
///
/// `exclude_id` is the invoice being edited, so it may keep its own number.
pub fn invoice_number_exists<I: NumberedInvoice>(
    number: &str,
    invoices: &[I],
    exclude_id: Option<i64>,
) -> bool {
    invoices
        .iter()
        .filter(|invoice| Some(invoice.invoice_id()) != exclude_id)
        .any(|invoice| invoice.invoice_number() == number)
}

/// Check the `PREFIX-NNNN` shape: 1-10 uppercase letters, optional hyphen, 1-10 digits
pub fn validate_invoice_number(number: &str) -> Result<(), String> {
    if number_format().is_match(number) {
        Ok(())
    } else {
        Err(format!(
            "must be 1-10 uppercase letters, an optional hyphen and 1-10 digits (got '{}')",
            number
        ))
    }
}

/// Prefix and padding used when issuing new numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceNumbering {
    pub prefix: String,
    pub padding: usize,
}

impl InvoiceNumbering {
    pub fn new(prefix: impl Into<String>, padding: usize) -> Self {
        Self {
            prefix: prefix.into(),
            padding,
        }
    }

    pub fn next<'a>(&self, existing: impl IntoIterator<Item = &'a str>) -> String {
        next_invoice_number(existing, &self.prefix, self.padding)
    }
}

impl Default for InvoiceNumbering {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, DEFAULT_PADDING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_number_extraction() {
        assert_eq!(trailing_number("INV-0042"), 42);
        assert_eq!(trailing_number("2024-17"), 17);
        assert_eq!(trailing_number("INV-SPECIAL"), 0);
        assert_eq!(trailing_number(""), 0);
    }

    #[test]
    fn test_trailing_number_overflow_counts_as_zero() {
        assert_eq!(trailing_number("INV-99999999999999999999999"), 0);
    }

    #[test]
    fn test_padding_uses_zeros() {
        assert_eq!(format_invoice_number("INV", 1, 6), "INV-000001");
    }

    #[test]
    fn test_counter_wider_than_padding_is_not_truncated() {
        assert_eq!(next_invoice_number(["INV-9999"], "INV", 4), "INV-10000");
    }

    #[test]
    fn test_default_numbering() {
        let numbering = InvoiceNumbering::default();
        assert_eq!(numbering.next(["INV-0002", "INV-0010"]), "INV-0011");
    }

    #[test]
    fn test_format_validation() {
        assert!(validate_invoice_number("INV-0001").is_ok());
        assert!(validate_invoice_number("INV0001").is_ok());
        assert!(validate_invoice_number("ABCDEFGHIJ-1234567890").is_ok());
        assert!(validate_invoice_number("inv-0001").is_err());
        assert!(validate_invoice_number("INV-").is_err());
        assert!(validate_invoice_number("ABCDEFGHIJK-1").is_err());
        assert!(validate_invoice_number("INV-12345678901").is_err());
        assert!(validate_invoice_number("0001").is_err());
    }
}
