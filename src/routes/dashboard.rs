use crate::{
    auth::middleware::UserExtractor,
    dashboard::{
        MAX_RENEWAL_WINDOW_DAYS, RENEWAL_WINDOW_DAYS, spending_by_category, total_monthly_cost,
        upcoming_renewals,
    },
    error::AppError,
    routes::subscriptions::SubscriptionResponse,
    scoring::{self, DEFAULT_CANCEL_THRESHOLD},
    server::Server,
};
use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::{IntoParams, ToSchema};

/// Create dashboard routes
pub fn create_dashboard_routes() -> Router<Server> {
    Router::new().route("/dashboard", get(get_dashboard))
}

/// Query parameters for the dashboard
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct DashboardQuery {
    /// Renewal look-ahead in days (default 14)
    pub window_days: Option<i64>,
    /// Value score below which cancellation is recommended (default 40)
    pub threshold: Option<f64>,
}

/// A subscription flagged for cancellation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CancelRecommendation {
    pub subscription: SubscriptionResponse,
    pub score: f64,
    /// Monthly cost recovered by cancelling this one
    pub monthly_savings: Decimal,
}

/// Aggregate dashboard for the caller's subscriptions
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    /// The "today" used for the renewal window
    pub as_of: NaiveDate,
    /// Sum of monthly cost equivalents
    pub monthly_total: Decimal,
    /// Monthly spending grouped by category, for chart consumption
    pub spending_by_category: HashMap<String, Decimal>,
    /// Renewals due inside the look-ahead window, soonest first
    pub upcoming_renewals: Vec<SubscriptionResponse>,
    /// Subscriptions scoring below the cancel threshold
    pub recommendations: Vec<CancelRecommendation>,
    /// Combined monthly savings across all recommendations
    pub potential_savings: Decimal,
}

/// Dashboard aggregates for the caller
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    params(DashboardQuery),
    responses(
        (status = 200, description = "Aggregated dashboard", body = DashboardResponse),
        (status = 400, description = "Bad query parameters", body = crate::routes::ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::routes::ApiErrorResponse)
    )
)]
pub async fn get_dashboard(
    State(server): State<Server>,
    UserExtractor(user): UserExtractor,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let window_days = params.window_days.unwrap_or(RENEWAL_WINDOW_DAYS);
    if !(0..=MAX_RENEWAL_WINDOW_DAYS).contains(&window_days) {
        return Err(AppError::Validation(format!(
            "window_days must be between 0 and {}",
            MAX_RENEWAL_WINDOW_DAYS
        )));
    }

    let threshold = params.threshold.unwrap_or(DEFAULT_CANCEL_THRESHOLD);
    if !threshold.is_finite() {
        return Err(AppError::Validation(
            "threshold must be a finite number".to_string(),
        ));
    }

    let records = server.database.subscriptions().find_by_user(user.id).await?;
    let today = Utc::now().date_naive();

    let monthly_total = total_monthly_cost(&records);
    let by_category = spending_by_category(&records);
    let renewals: Vec<SubscriptionResponse> = upcoming_renewals(&records, today, window_days)
        .into_iter()
        .cloned()
        .map(SubscriptionResponse::from)
        .collect();

    let potential_savings = scoring::potential_savings(&records, threshold);
    let recommendations: Vec<CancelRecommendation> = records
        .into_iter()
        .filter_map(|record| {
            let score = scoring::score_subscription(&record);
            if scoring::recommend_cancel(score, threshold) {
                let monthly_savings = record.monthly_cost();
                Some(CancelRecommendation {
                    subscription: record.into(),
                    score,
                    monthly_savings,
                })
            } else {
                None
            }
        })
        .collect();

    Ok(Json(DashboardResponse {
        as_of: today,
        monthly_total,
        spending_by_category: by_category,
        upcoming_renewals: renewals,
        recommendations,
        potential_savings,
    }))
}
