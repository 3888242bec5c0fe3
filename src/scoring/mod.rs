//! Value scoring: a 0-100 heuristic for how cost-effective a subscription
//! is, combining how much it costs against how much it gets used.
//!
//! The constants are product policy, not contracts: 60/40 usage/cost
//! weighting with a $2/day cost ceiling, usage levels spread linearly
//! across the scale.

use crate::database::entities::{SubscriptionRecord, UsageFrequency};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Scores below this recommend cancellation
pub const DEFAULT_CANCEL_THRESHOLD: f64 = 40.0;

const USAGE_SHARE: f64 = 0.6;
const COST_SHARE: f64 = 0.4;
/// Daily cost at which the cost component bottoms out at zero
const DAILY_COST_CEILING: f64 = 2.0;
const DAYS_PER_MONTH: f64 = 30.0;

/// Weight for a usage level, spread linearly over 0..=100
pub fn usage_weight(usage: UsageFrequency) -> f64 {
    match usage {
        UsageFrequency::Never => 0.0,
        UsageFrequency::Rarely => 25.0,
        UsageFrequency::Sometimes => 50.0,
        UsageFrequency::Often => 75.0,
        UsageFrequency::Always => 100.0,
    }
}

/// Value score in [0, 100] from a monthly cost equivalent and a usage
/// level. Non-decreasing in usage, non-increasing in cost.
pub fn value_score(monthly_cost: Decimal, usage: UsageFrequency) -> f64 {
    let daily_cost = monthly_cost.to_f64().unwrap_or(0.0) / DAYS_PER_MONTH;
    let cost_score = (100.0 - (daily_cost / DAILY_COST_CEILING) * 100.0).max(0.0);

    let score = USAGE_SHARE * usage_weight(usage) + COST_SHARE * cost_score;
    score.clamp(0.0, 100.0)
}

/// Score a subscription record directly
pub fn score_subscription(subscription: &SubscriptionRecord) -> f64 {
    value_score(subscription.monthly_cost(), subscription.usage_frequency)
}

/// True when the score falls strictly below the threshold.
/// A score exactly at the threshold is not flagged.
pub fn recommend_cancel(score: f64, threshold: f64) -> bool {
    score < threshold
}

/// Monthly cost equivalent recoverable by cancelling every subscription
/// whose score falls below the threshold.
pub fn potential_savings(subscriptions: &[SubscriptionRecord], threshold: f64) -> Decimal {
    subscriptions
        .iter()
        .filter(|sub| recommend_cancel(score_subscription(sub), threshold))
        .fold(Decimal::ZERO, |acc, sub| acc + sub.monthly_cost())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::entities::BillingFrequency;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sub(cost: Decimal, frequency: BillingFrequency, usage: UsageFrequency) -> SubscriptionRecord {
        SubscriptionRecord::new(
            1,
            "test",
            cost,
            frequency,
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        )
        .with_usage_frequency(usage)
    }

    #[test]
    fn test_score_bounds() {
        // Free and always used: both components maxed
        assert_eq!(value_score(dec!(0), UsageFrequency::Always), 100.0);
        // Expensive and never used: both components floored
        assert_eq!(value_score(dec!(500), UsageFrequency::Never), 0.0);
        // Everything in between stays in range
        for cost in [dec!(0), dec!(1), dec!(10), dec!(60), dec!(500)] {
            for usage in [
                UsageFrequency::Never,
                UsageFrequency::Rarely,
                UsageFrequency::Sometimes,
                UsageFrequency::Often,
                UsageFrequency::Always,
            ] {
                let score = value_score(cost, usage);
                assert!((0.0..=100.0).contains(&score));
            }
        }
    }

    #[test]
    fn test_score_monotone_in_usage() {
        let cost = dec!(20);
        let levels = [
            UsageFrequency::Never,
            UsageFrequency::Rarely,
            UsageFrequency::Sometimes,
            UsageFrequency::Often,
            UsageFrequency::Always,
        ];

        for pair in levels.windows(2) {
            assert!(value_score(cost, pair[0]) <= value_score(cost, pair[1]));
        }
    }

    #[test]
    fn test_score_monotone_in_cost() {
        let costs = [dec!(0), dec!(5), dec!(20), dec!(60), dec!(100), dec!(500)];

        for pair in costs.windows(2) {
            assert!(
                value_score(pair[0], UsageFrequency::Sometimes)
                    >= value_score(pair[1], UsageFrequency::Sometimes)
            );
        }
    }

    #[test]
    fn test_score_known_values() {
        // $30/month is $1/day: cost component is 50, usage is 100
        // 0.6 * 100 + 0.4 * 50 = 80
        assert_eq!(value_score(dec!(30), UsageFrequency::Always), 80.0);
        // Never used, $1/day: 0.6 * 0 + 0.4 * 50 = 20
        assert_eq!(value_score(dec!(30), UsageFrequency::Never), 20.0);
    }

    #[test]
    fn test_recommend_cancel_strict_boundary() {
        assert!(recommend_cancel(39.9, DEFAULT_CANCEL_THRESHOLD));
        // Exactly at the threshold is not flagged
        assert!(!recommend_cancel(40.0, DEFAULT_CANCEL_THRESHOLD));
        assert!(!recommend_cancel(40.1, DEFAULT_CANCEL_THRESHOLD));
    }

    #[test]
    fn test_potential_savings_empty() {
        assert_eq!(potential_savings(&[], DEFAULT_CANCEL_THRESHOLD), dec!(0));
    }

    #[test]
    fn test_potential_savings_sums_flagged_monthly_costs() {
        let subs = vec![
            // $60/month never used: score 0.4 * max(0, 100 - 100) = 0 -> flagged
            sub(dec!(60), BillingFrequency::Monthly, UsageFrequency::Never),
            // $120/year always used: ~$0.33/day, score well above threshold
            sub(dec!(120), BillingFrequency::Annual, UsageFrequency::Always),
            // $30/month rarely used: 0.6*25 + 0.4*50 = 35 -> flagged
            sub(dec!(30), BillingFrequency::Monthly, UsageFrequency::Rarely),
        ];

        assert_eq!(
            potential_savings(&subs, DEFAULT_CANCEL_THRESHOLD),
            dec!(90)
        );
    }

    #[test]
    fn test_score_subscription_uses_monthly_equivalent() {
        // $360/year is $30/month is $1/day
        let annual = sub(dec!(360), BillingFrequency::Annual, UsageFrequency::Always);
        let monthly = sub(dec!(30), BillingFrequency::Monthly, UsageFrequency::Always);
        assert_eq!(score_subscription(&annual), score_subscription(&monthly));
    }
}
