use crate::{
    auth::middleware::UserExtractor,
    database::entities::{BillingFrequency, SubscriptionRecord, UsageFrequency},
    error::AppError,
    scoring,
    server::Server,
};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

/// Create subscription CRUD routes
pub fn create_subscription_routes() -> Router<Server> {
    Router::new()
        .route(
            "/subscriptions",
            get(list_subscriptions).post(create_subscription),
        )
        .route(
            "/subscriptions/{id}",
            get(get_subscription)
                .put(update_subscription)
                .delete(delete_subscription),
        )
}

fn default_category() -> String {
    "Other".to_string()
}

/// Create/update request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubscriptionRequest {
    pub name: String,
    /// Raw cost per billing period
    pub cost: Decimal,
    pub billing_frequency: BillingFrequency,
    pub next_due_date: NaiveDate,
    #[serde(default)]
    pub usage_frequency: UsageFrequency,
    #[serde(default = "default_category")]
    pub category: String,
}

impl SubscriptionRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name must not be empty".to_string()));
        }
        if self.cost < Decimal::ZERO {
            return Err(AppError::Validation(
                "cost must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Subscription representation for API responses, with the derived
/// monthly cost and value score attached
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: i32,
    pub name: String,
    pub cost: Decimal,
    pub billing_frequency: BillingFrequency,
    /// Derived: cost normalized to a monthly equivalent
    pub monthly_cost: Decimal,
    pub next_due_date: NaiveDate,
    pub usage_frequency: UsageFrequency,
    pub category: String,
    /// Derived: 0-100 cost-effectiveness heuristic
    pub value_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SubscriptionRecord> for SubscriptionResponse {
    fn from(record: SubscriptionRecord) -> Self {
        let monthly_cost = record.monthly_cost();
        let value_score = scoring::score_subscription(&record);
        Self {
            id: record.id,
            name: record.name,
            cost: record.cost,
            billing_frequency: record.billing_frequency,
            monthly_cost,
            next_due_date: record.next_due_date,
            usage_frequency: record.usage_frequency,
            category: record.category,
            value_score,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Response for subscription list endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionListResponse {
    pub subscriptions: Vec<SubscriptionResponse>,
    pub total: usize,
}

/// Fetch a record and enforce ownership
async fn fetch_owned(
    server: &Server,
    user_id: i32,
    subscription_id: i32,
) -> Result<SubscriptionRecord, AppError> {
    let record = server
        .database
        .subscriptions()
        .find_by_id(subscription_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("subscription {}", subscription_id)))?;

    if record.user_id != user_id {
        return Err(AppError::Forbidden(
            "subscription belongs to another user".to_string(),
        ));
    }

    Ok(record)
}

/// List the caller's subscriptions, ordered by ascending due date
#[utoipa::path(
    get,
    path = "/api/subscriptions",
    tag = "Subscriptions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Subscriptions owned by the caller", body = SubscriptionListResponse),
        (status = 401, description = "Missing or invalid token", body = crate::routes::ApiErrorResponse)
    )
)]
pub async fn list_subscriptions(
    State(server): State<Server>,
    UserExtractor(user): UserExtractor,
) -> Result<Json<SubscriptionListResponse>, AppError> {
    let records = server.database.subscriptions().find_by_user(user.id).await?;

    let subscriptions: Vec<SubscriptionResponse> =
        records.into_iter().map(SubscriptionResponse::from).collect();
    let total = subscriptions.len();

    Ok(Json(SubscriptionListResponse {
        subscriptions,
        total,
    }))
}

/// Create a subscription owned by the caller
#[utoipa::path(
    post,
    path = "/api/subscriptions",
    tag = "Subscriptions",
    security(("bearer_auth" = [])),
    request_body = SubscriptionRequest,
    responses(
        (status = 201, description = "Subscription created", body = SubscriptionResponse),
        (status = 400, description = "Validation failed", body = crate::routes::ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::routes::ApiErrorResponse)
    )
)]
pub async fn create_subscription(
    State(server): State<Server>,
    UserExtractor(user): UserExtractor,
    Json(request): Json<SubscriptionRequest>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), AppError> {
    request.validate()?;

    let record = SubscriptionRecord::new(
        user.id,
        request.name.trim(),
        request.cost,
        request.billing_frequency,
        request.next_due_date,
    )
    .with_usage_frequency(request.usage_frequency)
    .with_category(request.category);

    let stored = server.database.subscriptions().create(&record).await?;

    info!(user_id = %user.id, subscription_id = %stored.id, name = %stored.name, "Subscription created");

    Ok((StatusCode::CREATED, Json(stored.into())))
}

/// Get one subscription
#[utoipa::path(
    get,
    path = "/api/subscriptions/{id}",
    tag = "Subscriptions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Subscription ID")),
    responses(
        (status = 200, description = "Subscription", body = SubscriptionResponse),
        (status = 403, description = "Owned by another user", body = crate::routes::ApiErrorResponse),
        (status = 404, description = "Unknown subscription", body = crate::routes::ApiErrorResponse)
    )
)]
pub async fn get_subscription(
    State(server): State<Server>,
    UserExtractor(user): UserExtractor,
    Path(id): Path<i32>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let record = fetch_owned(&server, user.id, id).await?;
    Ok(Json(record.into()))
}

/// Update one subscription
#[utoipa::path(
    put,
    path = "/api/subscriptions/{id}",
    tag = "Subscriptions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Subscription ID")),
    request_body = SubscriptionRequest,
    responses(
        (status = 200, description = "Updated subscription", body = SubscriptionResponse),
        (status = 400, description = "Validation failed", body = crate::routes::ApiErrorResponse),
        (status = 403, description = "Owned by another user", body = crate::routes::ApiErrorResponse),
        (status = 404, description = "Unknown subscription", body = crate::routes::ApiErrorResponse)
    )
)]
pub async fn update_subscription(
    State(server): State<Server>,
    UserExtractor(user): UserExtractor,
    Path(id): Path<i32>,
    Json(request): Json<SubscriptionRequest>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    request.validate()?;

    let mut record = fetch_owned(&server, user.id, id).await?;
    record.name = request.name.trim().to_string();
    record.cost = request.cost;
    record.billing_frequency = request.billing_frequency;
    record.next_due_date = request.next_due_date;
    record.usage_frequency = request.usage_frequency;
    record.category = request.category;
    record.updated_at = Utc::now();

    let updated = server.database.subscriptions().update(&record).await?;

    info!(user_id = %user.id, subscription_id = %updated.id, "Subscription updated");

    Ok(Json(updated.into()))
}

/// Delete one subscription
#[utoipa::path(
    delete,
    path = "/api/subscriptions/{id}",
    tag = "Subscriptions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Subscription ID")),
    responses(
        (status = 204, description = "Subscription deleted"),
        (status = 403, description = "Owned by another user", body = crate::routes::ApiErrorResponse),
        (status = 404, description = "Unknown subscription", body = crate::routes::ApiErrorResponse)
    )
)]
pub async fn delete_subscription(
    State(server): State<Server>,
    UserExtractor(user): UserExtractor,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let record = fetch_owned(&server, user.id, id).await?;
    server.database.subscriptions().delete(record.id).await?;

    info!(user_id = %user.id, subscription_id = %record.id, "Subscription deleted");

    Ok(StatusCode::NO_CONTENT)
}
