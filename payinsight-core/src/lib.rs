//! payinsight-core: transaction record model, calendar periods and timestamp parsing

pub mod period;
pub mod record;
pub mod time;

pub use period::{Period, PeriodUnit};
pub use record::{TransactionRecord, TxKind, TxStatus};
pub use time::parse_timestamp;
