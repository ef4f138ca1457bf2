//! Transaction records recovered from payment activity exports.
//!
//! Only `raw` is guaranteed; every other field is best-effort and stays
//! `None`/`Unknown` when the source phrasing was not recognized.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::time::parse_timestamp;

/// Leading verb of an activity entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TxKind {
    Sent,
    Paid,
    Received,
    Used,
    Unknown,
}

impl TxKind {
    /// Match a single word exactly against the known verbs.
    pub fn from_word(word: &str) -> Self {
        match word {
            "Sent" => TxKind::Sent,
            "Paid" => TxKind::Paid,
            "Received" => TxKind::Received,
            "Used" => TxKind::Used,
            _ => TxKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Sent => "Sent",
            TxKind::Paid => "Paid",
            TxKind::Received => "Received",
            TxKind::Used => "Used",
            TxKind::Unknown => "Unknown",
        }
    }

    /// Sent and Paid count as spend
    pub fn is_outbound(&self) -> bool {
        matches!(self, TxKind::Sent | TxKind::Paid)
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement status, taken from the entry caption
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TxStatus {
    Completed,
    Failed,
    Cancelled,
    Pending,
    Unknown,
}

impl TxStatus {
    pub fn from_word(word: &str) -> Self {
        match word {
            "Completed" => TxStatus::Completed,
            "Failed" => TxStatus::Failed,
            "Cancelled" => TxStatus::Cancelled,
            "Pending" => TxStatus::Pending,
            _ => TxStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Completed => "Completed",
            TxStatus::Failed => "Failed",
            TxStatus::Cancelled => "Cancelled",
            TxStatus::Pending => "Pending",
            TxStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One payment activity entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    #[serde(rename = "type")]
    pub kind: TxKind,
    /// Unit-less, non-negative
    pub amount: Option<Decimal>,
    /// Masked account token, e.g. "XXXXXX1234"
    pub account: Option<String>,
    /// Counterparty name
    pub merchant: Option<String>,
    /// Verbatim timestamp text, e.g. "12 Jan 2024, 14:35:22 GMT+05:30"
    pub date: Option<String>,
    pub status: TxStatus,
    /// Original entry text
    pub raw: String,
    /// Assigned by a categorizer; `None` until then
    pub category: Option<String>,
}

impl TransactionRecord {
    /// Create a record carrying only its raw text
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            kind: TxKind::Unknown,
            amount: None,
            account: None,
            merchant: None,
            date: None,
            status: TxStatus::Unknown,
            raw: raw.into(),
            category: None,
        }
    }

    pub fn with_kind(mut self, kind: TxKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_status(mut self, status: TxStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Parse `date` into an offset-aware time. Unparsable text yields `None`.
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.date.as_deref().and_then(parse_timestamp)
    }

    pub fn is_outbound(&self) -> bool {
        self.kind.is_outbound()
    }

    /// Amount, or zero when it could not be extracted
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }
}
