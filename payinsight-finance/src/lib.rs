//! payinsight-finance: spending categorization, period-over-period insights
//! and the extraction-to-insight pipeline.

pub mod categorizer;
pub mod category_rules;
pub mod insights;
pub mod pipeline;
pub mod summary;

pub use categorizer::{
    categorize, CategorizationMethod, Categorizer, ClassifierDelegate, ClassifierError,
};
pub use category_rules::{CategoryRule, RuleTable, OTHERS};
pub use insights::{aggregate, analyze_periods, PeriodInsights, NO_TRANSACTIONS};
pub use pipeline::{Analysis, Pipeline, Report};
pub use summary::{available_years, filter_year, summarize, ActivitySummary};
