//! Period-over-period spending insights.
//!
//! Records are bucketed by the local calendar date of their timestamp. The
//! latest bucket present is the current period; the bucket before it is the
//! previous period even when no data falls there. Records without a parseable
//! timestamp take no part.

use payinsight_core::{Period, PeriodUnit, TransactionRecord};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::HashMap;

use crate::summary::saturating_sum;

/// Returned for an empty record set
pub const NO_TRANSACTIONS: &str = "No transactions to analyze.";

/// Category changes at or below this percentage are not reported
const MIN_CHANGE_PCT: Decimal = Decimal::TEN;

const TOP_MERCHANTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increased,
    Decreased,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Increased => "increased",
            Direction::Decreased => "decreased",
        }
    }
}

/// Outbound spend of one category, current vs previous period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryChange {
    pub category: String,
    pub current_total: Decimal,
    pub previous_total: Decimal,
    pub direction: Direction,
    /// Absolute change, rounded half to even
    pub percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchantTotal {
    pub merchant: String,
    pub total: Decimal,
}

/// Structured form of the insight statements
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodInsights {
    pub unit: PeriodUnit,
    pub current: Option<Period>,
    pub previous: Option<Period>,
    pub changes: Vec<CategoryChange>,
    pub top_merchants: Vec<MerchantTotal>,
}

/// Sum of outbound amounts matching `filter`; missing amounts count as zero.
/// Saturates at `Decimal::MAX`.
fn outbound_total(
    dated: &[(Period, &TransactionRecord)],
    period: Period,
    filter: impl Fn(&TransactionRecord) -> bool,
) -> Decimal {
    saturating_sum(
        dated
            .iter()
            .filter(|(p, r)| *p == period && r.is_outbound() && filter(*r))
            .map(|(_, r)| r.amount_or_zero()),
    )
}

/// `None` unless the previous total is positive, the current total is
/// positive and the change exceeds the threshold. A change too large to
/// represent is not reported.
fn category_change(category: &str, current: Decimal, previous: Decimal) -> Option<CategoryChange> {
    if previous <= Decimal::ZERO || current <= Decimal::ZERO {
        return None;
    }

    let pct = (current - previous)
        .checked_div(previous)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    if pct.abs() <= MIN_CHANGE_PCT {
        return None;
    }

    let direction = if pct > Decimal::ZERO {
        Direction::Increased
    } else {
        Direction::Decreased
    };

    Some(CategoryChange {
        category: category.to_string(),
        current_total: current,
        previous_total: previous,
        direction,
        percent: pct
            .abs()
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            .normalize(),
    })
}

/// Outbound totals per merchant in `period`, descending; ties keep first appearance
fn rank_merchants(dated: &[(Period, &TransactionRecord)], period: Period) -> Vec<MerchantTotal> {
    let mut totals: Vec<MerchantTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (p, r) in dated {
        if *p != period || !r.is_outbound() {
            continue;
        }
        let Some(merchant) = r.merchant.as_deref() else {
            continue;
        };
        let i = *index.entry(merchant).or_insert_with(|| {
            totals.push(MerchantTotal {
                merchant: merchant.to_string(),
                total: Decimal::ZERO,
            });
            totals.len() - 1
        });
        totals[i].total = totals[i].total.saturating_add(r.amount_or_zero());
    }

    // Stable sort keeps first-appearance order among equal totals
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}

/// Compute category changes and the merchant ranking for the latest period
pub fn analyze_periods(records: &[TransactionRecord], unit: PeriodUnit) -> PeriodInsights {
    let dated: Vec<(Period, &TransactionRecord)> = records
        .iter()
        .filter_map(|r| {
            r.timestamp()
                .map(|ts| (Period::containing(unit, ts.date_naive()), r))
        })
        .collect();

    let Some(current) = dated.iter().map(|(p, _)| *p).max() else {
        return PeriodInsights {
            unit,
            current: None,
            previous: None,
            changes: Vec::new(),
            top_merchants: Vec::new(),
        };
    };
    let previous = current.previous();

    // Categories in order of first appearance
    let mut categories: Vec<&str> = Vec::new();
    for (_, r) in &dated {
        if let Some(c) = r.category.as_deref() {
            if !categories.contains(&c) {
                categories.push(c);
            }
        }
    }

    let mut changes = Vec::new();
    if let Some(previous) = previous {
        for category in categories {
            let in_category = |r: &TransactionRecord| r.category.as_deref() == Some(category);
            let this_total = outbound_total(&dated, current, in_category);
            let last_total = outbound_total(&dated, previous, in_category);
            changes.extend(category_change(category, this_total, last_total));
        }
    }

    let mut top_merchants = rank_merchants(&dated, current);
    top_merchants.truncate(TOP_MERCHANTS);

    PeriodInsights {
        unit,
        current: Some(current),
        previous,
        changes,
        top_merchants,
    }
}

/// Render statements: category changes first, then the merchant ranking
pub fn render(insights: &PeriodInsights) -> Vec<String> {
    let noun = insights.unit.noun();
    let mut out: Vec<String> = insights
        .changes
        .iter()
        .map(|c| {
            format!(
                "Your {} expenses {} by {}% this {}.",
                c.category,
                c.direction.as_str(),
                c.percent,
                noun
            )
        })
        .collect();

    if let Some(top) = insights.top_merchants.first() {
        let names: Vec<&str> = insights
            .top_merchants
            .iter()
            .map(|m| m.merchant.as_str())
            .collect();
        out.push(format!("Top 3 merchants this {}: {}", noun, names.join(", ")));
        out.push(format!("You spent most on {} this {}.", top.merchant, noun));
    }

    out
}

/// Insight statements for classified records at the requested granularity
pub fn aggregate(records: &[TransactionRecord], unit: PeriodUnit) -> Vec<String> {
    if records.is_empty() {
        return vec![NO_TRANSACTIONS.to_string()];
    }
    render(&analyze_periods(records, unit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use payinsight_core::TxKind;

    fn paid(amount: i64, merchant: &str, category: &str, date: &str) -> TransactionRecord {
        TransactionRecord::new(format!("Paid ₹{amount} to {merchant}"))
            .with_kind(TxKind::Paid)
            .with_amount(Decimal::from(amount))
            .with_merchant(merchant)
            .with_category(category)
            .with_date(date)
    }

    #[test]
    fn test_empty_input_sentinel() {
        for unit in [PeriodUnit::Week, PeriodUnit::Month, PeriodUnit::Year] {
            assert_eq!(aggregate(&[], unit), vec![NO_TRANSACTIONS.to_string()]);
        }
    }

    #[test]
    fn test_food_delivery_doubles() {
        let records = vec![
            paid(500, "Zomato", "food delivery", "10 Jan 2024, 12:00:00 GMT+05:30"),
            paid(1000, "Zomato", "food delivery", "10 Feb 2024, 12:00:00 GMT+05:30"),
        ];
        let out = aggregate(&records, PeriodUnit::Month);
        assert_eq!(
            out,
            vec![
                "Your food delivery expenses increased by 100% this month.".to_string(),
                "Top 3 merchants this month: Zomato".to_string(),
                "You spent most on Zomato this month.".to_string(),
            ]
        );
    }

    #[test]
    fn test_decrease_and_small_change() {
        let records = vec![
            paid(1000, "Uber", "travel", "5 Jan 2024, 09:00:00 GMT+05:30"),
            paid(1000, "Swiggy", "food delivery", "6 Jan 2024, 09:00:00 GMT+05:30"),
            paid(250, "Uber", "travel", "5 Feb 2024, 09:00:00 GMT+05:30"),
            paid(1050, "Swiggy", "food delivery", "6 Feb 2024, 09:00:00 GMT+05:30"),
        ];
        let insights = analyze_periods(&records, PeriodUnit::Month);
        assert_eq!(insights.changes.len(), 1);
        let travel = &insights.changes[0];
        assert_eq!(travel.category, "travel");
        assert_eq!(travel.direction, Direction::Decreased);
        assert_eq!(travel.percent, Decimal::from(75));

        let out = render(&insights);
        assert_eq!(out[0], "Your travel expenses decreased by 75% this month.");
        assert_eq!(out[1], "Top 3 merchants this month: Swiggy, Uber");
    }

    #[test]
    fn test_zero_previous_spend_is_not_reported() {
        let records = vec![
            paid(400, "Apollo", "health", "3 Mar 2024, 10:00:00 GMT+05:30"),
            paid(100, "Ola", "travel", "3 Feb 2024, 10:00:00 GMT+05:30"),
            paid(300, "Ola", "travel", "4 Mar 2024, 10:00:00 GMT+05:30"),
        ];
        let out = aggregate(&records, PeriodUnit::Month);
        assert!(out.iter().all(|s| !s.contains("health expenses")));
        assert!(out.contains(&"Your travel expenses increased by 200% this month.".to_string()));
    }

    #[test]
    fn test_previous_period_is_calendar_predecessor() {
        // Data in Jan and Mar only: previous of Mar is Feb, which is empty.
        let records = vec![
            paid(500, "Zomato", "food delivery", "10 Jan 2024, 12:00:00 GMT+05:30"),
            paid(900, "Zomato", "food delivery", "10 Mar 2024, 12:00:00 GMT+05:30"),
        ];
        let insights = analyze_periods(&records, PeriodUnit::Month);
        assert!(insights.changes.is_empty());
        assert_eq!(insights.previous.unwrap().to_string(), "2024-02");
    }

    #[test]
    fn test_inbound_and_undated_records_are_ignored() {
        let received = TransactionRecord::new("Received ₹5000 from Rahul")
            .with_kind(TxKind::Received)
            .with_amount(Decimal::from(5000))
            .with_merchant("Rahul")
            .with_category("others")
            .with_date("11 Feb 2024, 12:00:00 GMT+05:30");
        let undated = paid(9999, "Myntra", "shopping", "not a date");
        let records = vec![
            paid(200, "Amazon", "shopping", "11 Feb 2024, 12:00:00 GMT+05:30"),
            received,
            undated,
        ];
        let out = aggregate(&records, PeriodUnit::Month);
        assert_eq!(
            out,
            vec![
                "Top 3 merchants this month: Amazon".to_string(),
                "You spent most on Amazon this month.".to_string(),
            ]
        );
    }

    #[test]
    fn test_top_three_ranked_with_stable_ties() {
        let d = "20 Jun 2024, 12:00:00 GMT+05:30";
        let records = vec![
            paid(100, "A", "others", d),
            paid(300, "B", "others", d),
            paid(100, "C", "others", d),
            paid(50, "D", "others", d),
            paid(250, "A", "others", d),
        ];
        let insights = analyze_periods(&records, PeriodUnit::Week);
        let names: Vec<_> = insights.top_merchants.iter().map(|m| m.merchant.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert_eq!(insights.top_merchants[0].total, Decimal::from(350));
        assert_eq!(render(&insights)[1], "You spent most on A this week.");
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let records = vec![
            paid(500, "Zomato", "food delivery", "10 Jan 2024, 12:00:00 GMT+05:30"),
            paid(700, "Uber", "travel", "12 Jan 2024, 12:00:00 GMT+05:30"),
            paid(1000, "Zomato", "food delivery", "10 Feb 2024, 12:00:00 GMT+05:30"),
            paid(100, "Uber", "travel", "11 Feb 2024, 12:00:00 GMT+05:30"),
        ];
        let first = aggregate(&records, PeriodUnit::Month);
        let second = aggregate(&records, PeriodUnit::Month);
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    fn paid_exact(amount: &str, merchant: &str, category: &str, date: &str) -> TransactionRecord {
        TransactionRecord::new(format!("Paid ₹{amount} to {merchant}"))
            .with_kind(TxKind::Paid)
            .with_amount(Decimal::from_str_exact(amount).unwrap())
            .with_merchant(merchant)
            .with_category(category)
            .with_date(date)
    }

    #[test]
    fn test_category_absent_this_period_is_not_reported() {
        let records = vec![
            paid(1000, "Uber", "travel", "5 Jan 2024, 09:00:00 GMT+05:30"),
            paid(500, "Zomato", "food delivery", "6 Jan 2024, 09:00:00 GMT+05:30"),
            paid(1000, "Zomato", "food delivery", "6 Feb 2024, 09:00:00 GMT+05:30"),
        ];
        let out = aggregate(&records, PeriodUnit::Month);
        assert!(out.iter().all(|s| !s.contains("travel expenses")));
        assert_eq!(out[0], "Your food delivery expenses increased by 100% this month.");
    }

    #[test]
    fn test_exactly_ten_percent_is_not_reported() {
        let records = vec![
            paid(1000, "Uber", "travel", "5 Jan 2024, 09:00:00 GMT+05:30"),
            paid(1100, "Uber", "travel", "5 Feb 2024, 09:00:00 GMT+05:30"),
            paid(1000, "Swiggy", "food delivery", "6 Jan 2024, 09:00:00 GMT+05:30"),
            paid(900, "Swiggy", "food delivery", "6 Feb 2024, 09:00:00 GMT+05:30"),
        ];
        let insights = analyze_periods(&records, PeriodUnit::Month);
        assert!(insights.changes.is_empty());
    }

    #[test]
    fn test_half_percent_rounds_to_even() {
        let records = vec![
            paid(800, "Uber", "travel", "5 Jan 2024, 09:00:00 GMT+05:30"),
            paid(900, "Uber", "travel", "5 Feb 2024, 09:00:00 GMT+05:30"),
            paid(800, "Swiggy", "food delivery", "6 Jan 2024, 09:00:00 GMT+05:30"),
            paid(1100, "Swiggy", "food delivery", "6 Feb 2024, 09:00:00 GMT+05:30"),
        ];
        let out = aggregate(&records, PeriodUnit::Month);
        assert_eq!(out[0], "Your travel expenses increased by 12% this month.");
        assert_eq!(out[1], "Your food delivery expenses increased by 38% this month.");
    }

    #[test]
    fn test_unrepresentable_change_is_skipped() {
        let records = vec![
            paid(1, "Vault", "others", "10 Jan 2024, 12:00:00 GMT+05:30"),
            paid_exact(
                "1000000000000000000000000000",
                "Vault",
                "others",
                "10 Feb 2024, 12:00:00 GMT+05:30",
            ),
        ];
        let insights = analyze_periods(&records, PeriodUnit::Month);
        assert!(insights.changes.is_empty());
        assert_eq!(render(&insights)[1], "You spent most on Vault this month.");
    }

    #[test]
    fn test_overflowing_totals_saturate() {
        let big = "50000000000000000000000000000";
        let records = vec![
            paid(1, "Vault", "others", "10 Jan 2024, 12:00:00 GMT+05:30"),
            paid_exact(big, "Vault", "others", "10 Feb 2024, 12:00:00 GMT+05:30"),
            paid_exact(big, "Vault", "others", "11 Feb 2024, 12:00:00 GMT+05:30"),
        ];
        let insights = analyze_periods(&records, PeriodUnit::Month);
        assert!(insights.changes.is_empty());
        assert_eq!(insights.top_merchants[0].total, Decimal::MAX);
    }

    #[test]
    fn test_all_undated_yields_no_statements() {
        let records = vec![paid(10, "X", "others", "someday")];
        assert!(aggregate(&records, PeriodUnit::Month).is_empty());
    }
}
