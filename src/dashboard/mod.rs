//! Dashboard aggregation over a user's subscriptions.
//!
//! Pure, synchronous functions over records the route layer has already
//! fetched. Costs are summed as their monthly equivalents so mixed billing
//! frequencies compare on the same axis.

use crate::database::entities::SubscriptionRecord;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Look-ahead window for renewal alerts
pub const RENEWAL_WINDOW_DAYS: i64 = 14;

/// Largest accepted renewal window override, a century out
pub const MAX_RENEWAL_WINDOW_DAYS: i64 = 36_500;

/// Sum of monthly cost equivalents across all subscriptions.
/// Empty input yields zero.
pub fn total_monthly_cost(subscriptions: &[SubscriptionRecord]) -> Decimal {
    subscriptions
        .iter()
        .fold(Decimal::ZERO, |acc, sub| acc + sub.monthly_cost())
}

/// Subscriptions due within `[today, today + window_days]` inclusive,
/// ascending by due date. The sort is stable, so ties keep input order.
pub fn upcoming_renewals<'a>(
    subscriptions: &'a [SubscriptionRecord],
    today: NaiveDate,
    window_days: i64,
) -> Vec<&'a SubscriptionRecord> {
    // Windows too large to represent as a date include every future due date
    let horizon = Duration::try_days(window_days)
        .and_then(|window| today.checked_add_signed(window))
        .unwrap_or(NaiveDate::MAX);

    let mut due: Vec<&SubscriptionRecord> = subscriptions
        .iter()
        .filter(|sub| sub.next_due_date >= today && sub.next_due_date <= horizon)
        .collect();

    due.sort_by_key(|sub| sub.next_due_date);
    due
}

/// Monthly cost equivalents grouped by category, for chart consumption.
pub fn spending_by_category(subscriptions: &[SubscriptionRecord]) -> HashMap<String, Decimal> {
    let mut by_category: HashMap<String, Decimal> = HashMap::new();

    for sub in subscriptions {
        let entry = by_category
            .entry(sub.category.clone())
            .or_insert(Decimal::ZERO);
        *entry += sub.monthly_cost();
    }

    by_category
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::entities::BillingFrequency;
    use rust_decimal_macros::dec;

    fn sub(
        id: i32,
        cost: Decimal,
        frequency: BillingFrequency,
        due: NaiveDate,
        category: &str,
    ) -> SubscriptionRecord {
        SubscriptionRecord::new(1, format!("sub-{}", id), cost, frequency, due)
            .with_category(category)
            .with_id(id)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_total_monthly_cost_empty_is_zero() {
        assert_eq!(total_monthly_cost(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_total_monthly_cost_mixes_frequencies() {
        let subs = vec![
            sub(
                1,
                dec!(15),
                BillingFrequency::Monthly,
                date(2026, 9, 1),
                "Entertainment",
            ),
            sub(
                2,
                dec!(120),
                BillingFrequency::Annual,
                date(2026, 9, 5),
                "Productivity",
            ),
            sub(
                3,
                dec!(30),
                BillingFrequency::Quarterly,
                date(2026, 9, 9),
                "Fitness",
            ),
        ];

        // 15 + 120/12 + 30/3 = 35
        assert_eq!(total_monthly_cost(&subs), dec!(35));
    }

    #[test]
    fn test_total_equals_sum_of_individual_normalizations() {
        let subs = vec![
            sub(
                1,
                dec!(2),
                BillingFrequency::Weekly,
                date(2026, 9, 1),
                "Other",
            ),
            sub(
                2,
                dec!(9.99),
                BillingFrequency::Monthly,
                date(2026, 9, 2),
                "Other",
            ),
        ];

        let by_hand: Decimal = subs.iter().map(|s| s.monthly_cost()).sum();
        assert_eq!(total_monthly_cost(&subs), by_hand);
        assert!(total_monthly_cost(&subs) >= Decimal::ZERO);
    }

    #[test]
    fn test_upcoming_renewals_empty() {
        let out = upcoming_renewals(&[], date(2026, 9, 1), RENEWAL_WINDOW_DAYS);
        assert!(out.is_empty());
    }

    #[test]
    fn test_upcoming_renewals_window_is_inclusive() {
        let today = date(2026, 9, 1);
        let subs = vec![
            sub(
                1,
                dec!(1),
                BillingFrequency::Monthly,
                date(2026, 8, 31),
                "Other",
            ), // yesterday
            sub(2, dec!(1), BillingFrequency::Monthly, today, "Other"), // today
            sub(
                3,
                dec!(1),
                BillingFrequency::Monthly,
                date(2026, 9, 15),
                "Other",
            ), // today + 14
            sub(
                4,
                dec!(1),
                BillingFrequency::Monthly,
                date(2026, 9, 16),
                "Other",
            ), // today + 15
        ];

        let out = upcoming_renewals(&subs, today, RENEWAL_WINDOW_DAYS);
        let ids: Vec<i32> = out.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_upcoming_renewals_never_outside_window() {
        let today = date(2026, 9, 1);
        let horizon = today + Duration::days(RENEWAL_WINDOW_DAYS);
        let subs = vec![
            sub(
                1,
                dec!(1),
                BillingFrequency::Monthly,
                date(2026, 10, 1),
                "Other",
            ),
            sub(
                2,
                dec!(1),
                BillingFrequency::Monthly,
                date(2026, 9, 3),
                "Other",
            ),
            sub(
                3,
                dec!(1),
                BillingFrequency::Monthly,
                date(2025, 1, 1),
                "Other",
            ),
        ];

        for renewal in upcoming_renewals(&subs, today, RENEWAL_WINDOW_DAYS) {
            assert!(renewal.next_due_date >= today);
            assert!(renewal.next_due_date <= horizon);
        }
    }

    #[test]
    fn test_upcoming_renewals_sorted_with_stable_ties() {
        let today = date(2026, 9, 1);
        let subs = vec![
            sub(
                10,
                dec!(1),
                BillingFrequency::Monthly,
                date(2026, 9, 5),
                "Other",
            ),
            sub(
                11,
                dec!(1),
                BillingFrequency::Monthly,
                date(2026, 9, 2),
                "Other",
            ),
            sub(
                12,
                dec!(1),
                BillingFrequency::Monthly,
                date(2026, 9, 5),
                "Other",
            ), // ties with 10
        ];

        let ids: Vec<i32> = upcoming_renewals(&subs, today, RENEWAL_WINDOW_DAYS)
            .iter()
            .map(|s| s.id)
            .collect();
        // Ascending by date; 10 before 12 because it came first in the input
        assert_eq!(ids, vec![11, 10, 12]);
    }

    #[test]
    fn test_upcoming_renewals_huge_window_does_not_overflow() {
        let today = date(2026, 9, 1);
        let subs = vec![
            sub(
                1,
                dec!(1),
                BillingFrequency::Monthly,
                date(2030, 1, 1),
                "Other",
            ),
            sub(
                2,
                dec!(1),
                BillingFrequency::Monthly,
                date(2026, 8, 1),
                "Other",
            ), // past
        ];

        // A window beyond the representable date range covers all future dates
        let ids: Vec<i32> = upcoming_renewals(&subs, today, i64::MAX)
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_spending_by_category_empty() {
        assert!(spending_by_category(&[]).is_empty());
    }

    #[test]
    fn test_spending_by_category_groups_and_sums() {
        let subs = vec![
            sub(
                1,
                dec!(10),
                BillingFrequency::Monthly,
                date(2026, 9, 1),
                "Entertainment",
            ),
            sub(
                2,
                dec!(120),
                BillingFrequency::Annual,
                date(2026, 9, 2),
                "Entertainment",
            ),
            sub(
                3,
                dec!(5),
                BillingFrequency::Monthly,
                date(2026, 9, 3),
                "Fitness",
            ),
        ];

        let by_category = spending_by_category(&subs);
        assert_eq!(by_category.len(), 2);
        assert_eq!(by_category["Entertainment"], dec!(20));
        assert_eq!(by_category["Fitness"], dec!(5));
    }
}
