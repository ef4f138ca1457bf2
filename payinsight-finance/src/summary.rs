//! Whole-table activity summary and year filtering.

use chrono::Datelike;
use payinsight_core::{TransactionRecord, TxKind, TxStatus};
use rust_decimal::Decimal;
use serde::Serialize;

const TOP_MERCHANT_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MerchantCount {
    pub merchant: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: TxStatus,
    pub count: usize,
}

/// Totals and breakdowns over every record, dated or not
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub total_transactions: usize,
    /// Sent + Paid
    pub total_spent: Decimal,
    pub total_received: Decimal,
    /// Most frequent counterparties, at most ten
    pub top_merchants: Vec<MerchantCount>,
    pub status_breakdown: Vec<StatusCount>,
}

/// Sum that pins at `Decimal::MAX` instead of overflowing
pub(crate) fn saturating_sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, a| acc.saturating_add(a))
}

/// Count occurrences, most frequent first; ties keep first appearance
fn count_by<K: PartialEq + Clone>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: Vec<(K, usize)> = Vec::new();
    for key in keys {
        match counts.iter().position(|(k, _)| *k == key) {
            Some(i) => counts[i].1 += 1,
            None => counts.push((key, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub fn summarize(records: &[TransactionRecord]) -> ActivitySummary {
    let total_spent = saturating_sum(
        records
            .iter()
            .filter(|r| r.is_outbound())
            .map(TransactionRecord::amount_or_zero),
    );
    let total_received = saturating_sum(
        records
            .iter()
            .filter(|r| r.kind == TxKind::Received)
            .map(TransactionRecord::amount_or_zero),
    );

    let top_merchants = count_by(records.iter().filter_map(|r| r.merchant.as_deref()))
        .into_iter()
        .take(TOP_MERCHANT_COUNT)
        .map(|(merchant, count)| MerchantCount {
            merchant: merchant.to_string(),
            count,
        })
        .collect();

    let status_breakdown = count_by(records.iter().map(|r| r.status))
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect();

    ActivitySummary {
        total_transactions: records.len(),
        total_spent,
        total_received,
        top_merchants,
        status_breakdown,
    }
}

/// Distinct years with at least one parseable timestamp, ascending
pub fn available_years(records: &[TransactionRecord]) -> Vec<i32> {
    let mut years: Vec<i32> = records
        .iter()
        .filter_map(|r| r.timestamp().map(|ts| ts.year()))
        .collect();
    years.sort_unstable();
    years.dedup();
    years
}

/// Records whose timestamp falls in `year`; undated records are dropped
pub fn filter_year(records: &[TransactionRecord], year: i32) -> Vec<TransactionRecord> {
    records
        .iter()
        .filter(|r| r.timestamp().is_some_and(|ts| ts.year() == year))
        .cloned()
        .collect()
}
