use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, sea_query::StringLen};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How often a subscription bills
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum BillingFrequency {
    #[sea_orm(string_value = "weekly")]
    #[serde(rename = "weekly")]
    Weekly,
    #[sea_orm(string_value = "monthly")]
    #[serde(rename = "monthly")]
    Monthly,
    #[sea_orm(string_value = "quarterly")]
    #[serde(rename = "quarterly")]
    Quarterly,
    #[sea_orm(string_value = "annual")]
    #[serde(rename = "annual")]
    Annual,
}

impl BillingFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingFrequency::Weekly => "weekly",
            BillingFrequency::Monthly => "monthly",
            BillingFrequency::Quarterly => "quarterly",
            BillingFrequency::Annual => "annual",
        }
    }

    /// Normalize a per-period cost to its monthly equivalent.
    pub fn monthly_equivalent(&self, cost: Decimal) -> Decimal {
        match self {
            // 52 weeks / 12 months
            BillingFrequency::Weekly => cost * Decimal::new(433, 2),
            BillingFrequency::Monthly => cost,
            BillingFrequency::Quarterly => cost / Decimal::from(3),
            BillingFrequency::Annual => cost / Decimal::from(12),
        }
    }
}

/// How often the owner actually uses the subscription
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum UsageFrequency {
    #[sea_orm(string_value = "never")]
    #[serde(rename = "never")]
    #[default]
    Never,
    #[sea_orm(string_value = "rarely")]
    #[serde(rename = "rarely")]
    Rarely,
    #[sea_orm(string_value = "sometimes")]
    #[serde(rename = "sometimes")]
    Sometimes,
    #[sea_orm(string_value = "often")]
    #[serde(rename = "often")]
    Often,
    #[sea_orm(string_value = "always")]
    #[serde(rename = "always")]
    Always,
}

impl UsageFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageFrequency::Never => "never",
            UsageFrequency::Rarely => "rarely",
            UsageFrequency::Sometimes => "sometimes",
            UsageFrequency::Often => "often",
            UsageFrequency::Always => "always",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    /// Raw cost per billing period
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub cost: Decimal,
    pub billing_frequency: BillingFrequency,
    pub next_due_date: NaiveDate,
    pub usage_frequency: UsageFrequency,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Default for Model {
    fn default() -> Self {
        let now = chrono::Utc::now();
        Self {
            id: 0, // Will be auto-assigned by database
            user_id: 0,
            name: String::new(),
            cost: Decimal::ZERO,
            billing_frequency: BillingFrequency::Monthly,
            next_due_date: now.date_naive(),
            usage_frequency: UsageFrequency::Never,
            category: "Other".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Model {
    /// Create a new subscription record with required fields
    pub fn new(
        user_id: i32,
        name: impl Into<String>,
        cost: Decimal,
        billing_frequency: BillingFrequency,
        next_due_date: NaiveDate,
    ) -> Self {
        Self {
            user_id,
            name: name.into(),
            cost,
            billing_frequency,
            next_due_date,
            ..Default::default()
        }
    }

    /// Monthly cost equivalent, always derived from the raw cost and the
    /// billing frequency. It is never stored, so it cannot drift from its
    /// source fields.
    pub fn monthly_cost(&self) -> Decimal {
        self.billing_frequency.monthly_equivalent(self.cost)
    }

    /// Builder method to set usage frequency
    pub fn with_usage_frequency(mut self, usage_frequency: UsageFrequency) -> Self {
        self.usage_frequency = usage_frequency;
        self
    }

    /// Builder method to set category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder method to set ID (for tests)
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_cost_monthly_is_identity() {
        let sub = Model::new(
            1,
            "Streamflix",
            dec!(15.99),
            BillingFrequency::Monthly,
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        );
        assert_eq!(sub.monthly_cost(), dec!(15.99));
    }

    #[test]
    fn test_monthly_cost_annual_divides_by_twelve() {
        let sub = Model::new(
            1,
            "Domain",
            dec!(10),
            BillingFrequency::Annual,
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        );
        // $10/year is roughly $0.833/month
        assert_eq!(sub.monthly_cost().round_dp(3), dec!(0.833));
    }

    #[test]
    fn test_monthly_cost_quarterly_divides_by_three() {
        let sub = Model::new(
            1,
            "Box",
            dec!(30),
            BillingFrequency::Quarterly,
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        );
        assert_eq!(sub.monthly_cost(), dec!(10));
    }

    #[test]
    fn test_monthly_cost_weekly_multiplies() {
        let sub = Model::new(
            1,
            "Paper",
            dec!(2),
            BillingFrequency::Weekly,
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        );
        assert_eq!(sub.monthly_cost(), dec!(8.66));
    }

    #[test]
    fn test_usage_frequency_ordering() {
        assert!(UsageFrequency::Never < UsageFrequency::Rarely);
        assert!(UsageFrequency::Rarely < UsageFrequency::Sometimes);
        assert!(UsageFrequency::Sometimes < UsageFrequency::Often);
        assert!(UsageFrequency::Often < UsageFrequency::Always);
    }

    #[test]
    fn test_enum_string_values() {
        assert_eq!(BillingFrequency::Quarterly.as_str(), "quarterly");
        assert_eq!(UsageFrequency::Sometimes.as_str(), "sometimes");
    }
}
