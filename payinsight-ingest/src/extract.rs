//! Heuristic field extraction from activity entry text.
//!
//! Every field is recovered independently and degrades to `None`/`Unknown`
//! on a miss. Extraction never fails.
//!
//! Typical entry text (body cell joined with spaces):
//!   Paid ₹250.00 to Swiggy using Bank Account XXXXXX1234 12 Jan 2024, 14:35:22 GMT+05:30
//!   Received ₹1,000.00 from Rahul using Bank Account XXXXXX1234 3 Feb 2024, 09:12:44 GMT+05:30

use payinsight_core::{TransactionRecord, TxKind, TxStatus};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::debug;

use crate::document::{FragmentSource, RawFragment};

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[₹$€£](?P<num>[\d,]+(?:\.\d+)?)").expect("invalid amount regex"))
}

fn account_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Account\s+(?P<account>[A-Z0-9*•]+)").expect("invalid account regex")
    })
}

fn merchant_to_using_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\bto\s+(?P<merchant>.+?)\s+using\b").expect("invalid merchant regex")
    })
}

fn merchant_after_amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^(?:Sent|Paid|Received|Used)\s+[₹$€£][\d,]+(?:\.\d+)?\s+",
            r"(?:(?:to|from|at)\s+)?(?P<merchant>.+?)\s+using\b"
        ))
        .expect("invalid merchant fallback regex")
    })
}

fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\d{1,2} \w+ \d{4}, [\d:]+ GMT[+\-]\d{2}:\d{2}")
            .expect("invalid timestamp regex")
    })
}

fn status_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?P<status>Completed|Failed|Cancelled|Pending)\b")
            .expect("invalid status regex")
    })
}

/// Leading alphabetic run of the text, matched against the known verbs
fn extract_kind(text: &str) -> TxKind {
    text.trim_start()
        .split(|c: char| !c.is_alphabetic())
        .next()
        .map(TxKind::from_word)
        .unwrap_or(TxKind::Unknown)
}

/// First currency-prefixed number. A match that does not parse is a miss.
pub fn extract_amount(text: &str) -> Option<Decimal> {
    let caps = amount_re().captures(text)?;
    let digits = caps["num"].replace(',', "");
    Decimal::from_str(&digits).ok()
}

fn extract_account(text: &str) -> Option<String> {
    account_re()
        .captures(text)
        .map(|caps| caps["account"].to_string())
}

fn merchant_between_to_and_using(text: &str) -> Option<String> {
    merchant_to_using_re()
        .captures(text)
        .map(|caps| caps["merchant"].trim().to_string())
}

fn merchant_after_leading_amount(text: &str) -> Option<String> {
    merchant_after_amount_re()
        .captures(text)
        .map(|caps| caps["merchant"].trim().to_string())
}

/// Tried in order; the first non-empty result wins.
static MERCHANT_STRATEGIES: [fn(&str) -> Option<String>; 2] =
    [merchant_between_to_and_using, merchant_after_leading_amount];

/// Counterparty name, or `None` when no strategy recognizes the phrasing
pub fn extract_merchant(text: &str) -> Option<String> {
    MERCHANT_STRATEGIES
        .iter()
        .filter_map(|strategy| strategy(text))
        .find(|m| !m.is_empty())
}

fn extract_date(text: &str) -> Option<String> {
    timestamp_re().find(text).map(|m| m.as_str().to_string())
}

fn extract_status(caption: Option<&str>) -> TxStatus {
    caption
        .and_then(|c| status_re().captures(c))
        .map(|caps| TxStatus::from_word(&caps["status"]))
        .unwrap_or(TxStatus::Unknown)
}

/// Build a record from entry text and an optional caption. Category stays unset.
pub fn extract_text(text: &str, caption: Option<&str>) -> TransactionRecord {
    TransactionRecord {
        kind: extract_kind(text),
        amount: extract_amount(text),
        account: extract_account(text),
        merchant: extract_merchant(text),
        date: extract_date(text),
        status: extract_status(caption),
        raw: text.to_string(),
        category: None,
    }
}

/// `None` when the fragment carries no usable primary text
pub fn extract_fragment(fragment: &RawFragment) -> Option<TransactionRecord> {
    let text = fragment.text.as_deref()?.trim();
    if text.is_empty() {
        return None;
    }
    Some(extract_text(text, fragment.caption.as_deref()))
}

/// Extract records from every fragment, in document order, without deduplication
pub fn extract<S: FragmentSource + ?Sized>(source: &S) -> Vec<TransactionRecord> {
    let fragments = source.fragments();
    let records: Vec<TransactionRecord> = fragments.iter().filter_map(extract_fragment).collect();
    debug!(
        blocks = fragments.len(),
        records = records.len(),
        "extracted activity records"
    );
    records
}
