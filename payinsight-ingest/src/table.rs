//! Row-oriented table form of transaction records.
//!
//! Columns, in order: type, amount, account, merchant, date, status, raw, category.
//! Absent fields are written as empty cells and read back as `None`/`Unknown`.

use payinsight_core::{TransactionRecord, TxKind, TxStatus};
use rust_decimal::Decimal;
use std::io;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Column names, in the order they are written
pub const COLUMNS: [&str; 8] = [
    "type", "amount", "account", "merchant", "date", "status", "raw", "category",
];

fn opt_cell(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

fn kind_cell(kind: TxKind) -> &'static str {
    match kind {
        TxKind::Unknown => "",
        k => k.as_str(),
    }
}

fn status_cell(status: TxStatus) -> &'static str {
    match status {
        TxStatus::Unknown => "",
        s => s.as_str(),
    }
}

/// Write records with a header row
pub fn write_table<W: io::Write>(writer: W, records: &[TransactionRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(COLUMNS)?;

    for r in records {
        let amount = r.amount.map(|a| a.to_string()).unwrap_or_default();
        wtr.write_record([
            kind_cell(r.kind),
            amount.as_str(),
            opt_cell(r.account.as_deref()),
            opt_cell(r.merchant.as_deref()),
            opt_cell(r.date.as_deref()),
            status_cell(r.status),
            r.raw.as_str(),
            opt_cell(r.category.as_deref()),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_table_path(path: impl AsRef<Path>, records: &[TransactionRecord]) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    write_table(file, records)
}

/// Column positions resolved from the header row
struct ColumnIndex {
    kind: Option<usize>,
    amount: Option<usize>,
    account: Option<usize>,
    merchant: Option<usize>,
    date: Option<usize>,
    status: Option<usize>,
    raw: usize,
    category: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        Ok(Self {
            kind: find("type"),
            amount: find("amount"),
            account: find("account"),
            merchant: find("merchant"),
            date: find("date"),
            status: find("status"),
            raw: find("raw").ok_or(IngestError::MissingColumn("raw"))?,
            category: find("category"),
        })
    }
}

fn cell(row: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Amounts are non-negative; anything else reads as absent
fn parse_amount(cell: &str) -> Option<Decimal> {
    Decimal::from_str(cell).ok().filter(|a| !a.is_sign_negative())
}

/// Read records from a table with a header row.
///
/// Only `raw` is required; other columns may be missing. Rows with an empty
/// `raw` cell are skipped. Cells that do not parse become `None`/`Unknown`.
pub fn read_table<R: io::Read>(reader: R) -> Result<Vec<TransactionRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let cols = ColumnIndex::from_headers(rdr.headers()?)?;
    let mut out = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.records() {
        let row = result?;

        let Some(raw) = cell(&row, Some(cols.raw)) else {
            skipped += 1;
            continue;
        };

        out.push(TransactionRecord {
            kind: cell(&row, cols.kind)
                .map(|k| TxKind::from_word(&k))
                .unwrap_or(TxKind::Unknown),
            amount: cell(&row, cols.amount).and_then(|a| parse_amount(&a)),
            account: cell(&row, cols.account),
            merchant: cell(&row, cols.merchant),
            date: cell(&row, cols.date),
            status: cell(&row, cols.status)
                .map(|s| TxStatus::from_word(&s))
                .unwrap_or(TxStatus::Unknown),
            raw,
            category: cell(&row, cols.category),
        });
    }

    debug!(records = out.len(), skipped, "loaded transaction table");
    Ok(out)
}

pub fn read_table_path(path: impl AsRef<Path>) -> Result<Vec<TransactionRecord>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_table(file)
}
