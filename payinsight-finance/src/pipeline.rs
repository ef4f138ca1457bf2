//! Pipeline orchestration: extraction, categorization, then aggregation.
//!
//! A `Pipeline` holds only its chosen categorization strategy and period unit.
//! Every run is a pure function of its input.

use payinsight_core::{PeriodUnit, TransactionRecord};
use payinsight_ingest::{extract, FragmentSource};
use serde::Serialize;
use tracing::debug;

use crate::categorizer::{CategorizationMethod, Categorizer, ClassifierDelegate, Result};
use crate::insights::aggregate;
use crate::summary::{summarize, ActivitySummary};

/// Summary plus insight statements for a set of classified records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summary: ActivitySummary,
    pub insights: Vec<String>,
}

/// Outcome of a full run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub method: CategorizationMethod,
    pub records: Vec<TransactionRecord>,
    pub report: Report,
}

#[derive(Clone, Copy)]
pub struct Pipeline<'a> {
    categorizer: Categorizer<'a>,
    unit: PeriodUnit,
}

impl<'a> Pipeline<'a> {
    /// Rule-table categorization
    pub fn new(unit: PeriodUnit) -> Self {
        Self {
            categorizer: Categorizer::default(),
            unit,
        }
    }

    /// Delegate categorization when one is supplied
    pub fn select(unit: PeriodUnit, delegate: Option<&'a dyn ClassifierDelegate>) -> Self {
        Self {
            categorizer: Categorizer::select(delegate),
            unit,
        }
    }

    pub fn unit(&self) -> PeriodUnit {
        self.unit
    }

    /// "N/A" when there is nothing to categorize
    pub fn method_for(&self, records: &[TransactionRecord]) -> CategorizationMethod {
        if records.is_empty() {
            CategorizationMethod::NotApplicable
        } else {
            self.categorizer.method()
        }
    }

    /// Assign a category to every record
    pub fn classify(&self, mut records: Vec<TransactionRecord>) -> Result<Vec<TransactionRecord>> {
        for r in &mut records {
            r.category = Some(self.categorizer.categorize(r)?);
        }
        Ok(records)
    }

    /// Assign a category only where none is present
    pub fn classify_missing(
        &self,
        mut records: Vec<TransactionRecord>,
    ) -> Result<Vec<TransactionRecord>> {
        let mut assigned = 0usize;
        for r in records.iter_mut().filter(|r| r.category.is_none()) {
            r.category = Some(self.categorizer.categorize(r)?);
            assigned += 1;
        }
        debug!(assigned, total = records.len(), "categorized uncategorized rows");
        Ok(records)
    }

    /// Extract records from a document and categorize them
    pub fn extract<S: FragmentSource + ?Sized>(&self, source: &S) -> Result<Vec<TransactionRecord>> {
        self.classify(extract(source))
    }

    pub fn report(&self, records: &[TransactionRecord]) -> Report {
        Report {
            summary: summarize(records),
            insights: aggregate(records, self.unit),
        }
    }

    /// Document in, classified table and insights out
    pub fn run_document<S: FragmentSource + ?Sized>(&self, source: &S) -> Result<Analysis> {
        let records = self.extract(source)?;
        Ok(self.finish(records))
    }

    /// Table in; rows that already carry a category keep it
    pub fn run_table(&self, records: Vec<TransactionRecord>) -> Result<Analysis> {
        let records = self.classify_missing(records)?;
        Ok(self.finish(records))
    }

    fn finish(&self, records: Vec<TransactionRecord>) -> Analysis {
        let report = self.report(&records);
        Analysis {
            method: self.method_for(&records),
            records,
            report,
        }
    }
}
