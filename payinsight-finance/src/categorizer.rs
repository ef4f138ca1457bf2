//! Categorization strategies: the built-in rule table or a caller-supplied
//! classifier. The strategy is chosen once per pipeline run.

use payinsight_core::TransactionRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category_rules::RuleTable;

/// A delegate classifier failed. Never masked by a rule-table fallback.
#[derive(Debug, Error)]
#[error("classifier failed: {message}")]
pub struct ClassifierError {
    message: String,
}

impl ClassifierError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassifierError>;

/// External text classifier, e.g. a trained model. Its label is trusted as-is.
pub trait ClassifierDelegate {
    fn predict(&self, text: &str) -> Result<String>;
}

impl<F> ClassifierDelegate for F
where
    F: Fn(&str) -> Result<String>,
{
    fn predict(&self, text: &str) -> Result<String> {
        self(text)
    }
}

/// Which strategy produced the categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategorizationMethod {
    #[serde(rename = "rule-based")]
    RuleBased,
    #[serde(rename = "AI/ML model")]
    Model,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl CategorizationMethod {
    pub fn label(&self) -> &'static str {
        match self {
            CategorizationMethod::RuleBased => "rule-based",
            CategorizationMethod::Model => "AI/ML model",
            CategorizationMethod::NotApplicable => "N/A",
        }
    }
}

/// Text handed to a delegate: lowercased merchant, a space, lowercased entry text
pub fn delegate_text(record: &TransactionRecord) -> String {
    format!(
        "{} {}",
        record.merchant.as_deref().unwrap_or("").to_lowercase(),
        record.raw.to_lowercase()
    )
}

#[derive(Clone, Copy)]
pub enum Categorizer<'a> {
    Rules(&'static RuleTable),
    Delegate(&'a dyn ClassifierDelegate),
}

impl<'a> Categorizer<'a> {
    /// Delegate when one is supplied, otherwise the built-in rule table
    pub fn select(delegate: Option<&'a dyn ClassifierDelegate>) -> Self {
        match delegate {
            Some(d) => Categorizer::Delegate(d),
            None => Categorizer::Rules(RuleTable::builtin()),
        }
    }

    pub fn method(&self) -> CategorizationMethod {
        match self {
            Categorizer::Rules(_) => CategorizationMethod::RuleBased,
            Categorizer::Delegate(_) => CategorizationMethod::Model,
        }
    }

    /// Label for one record. Only a delegate can fail.
    pub fn categorize(&self, record: &TransactionRecord) -> Result<String> {
        match self {
            Categorizer::Rules(table) => Ok(table
                .classify(record.merchant.as_deref(), &record.raw)
                .to_string()),
            Categorizer::Delegate(delegate) => delegate.predict(&delegate_text(record)),
        }
    }
}

impl Default for Categorizer<'_> {
    fn default() -> Self {
        Categorizer::Rules(RuleTable::builtin())
    }
}

/// Categorize a single record with an optional delegate
pub fn categorize(
    record: &TransactionRecord,
    delegate: Option<&dyn ClassifierDelegate>,
) -> Result<String> {
    Categorizer::select(delegate).categorize(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn swiggy() -> TransactionRecord {
        TransactionRecord::new("Paid ₹250 to Swiggy using Bank Account XXXX1234")
            .with_merchant("Swiggy")
    }

    #[test]
    fn test_rules_without_delegate() {
        assert_eq!(categorize(&swiggy(), None).unwrap(), "food delivery");
        assert_eq!(
            Categorizer::default().method(),
            CategorizationMethod::RuleBased
        );
    }

    #[test]
    fn test_delegate_receives_lowercased_text_and_label_is_verbatim() {
        let seen = RefCell::new(Vec::new());
        let model = |text: &str| -> Result<String> {
            seen.borrow_mut().push(text.to_string());
            Ok("Dining Out!".to_string())
        };

        let label = categorize(&swiggy(), Some(&model)).unwrap();
        assert_eq!(label, "Dining Out!");
        assert_eq!(
            seen.borrow().as_slice(),
            ["swiggy paid ₹250 to swiggy using bank account xxxx1234"]
        );
    }

    #[test]
    fn test_delegate_without_merchant() {
        let r = TransactionRecord::new("Sent ₹10");
        assert_eq!(delegate_text(&r), " sent ₹10");
    }

    #[test]
    fn test_delegate_failure_is_not_masked() {
        let broken = |_: &str| -> Result<String> { Err(ClassifierError::new("model unavailable")) };
        let categorizer = Categorizer::select(Some(&broken));
        assert_eq!(categorizer.method(), CategorizationMethod::Model);

        let err = categorizer.categorize(&swiggy()).unwrap_err();
        assert!(err.to_string().contains("model unavailable"));
    }
}
