pub mod auth;
pub mod dashboard;
pub mod docs;
pub mod health;
pub mod subscriptions;

pub use auth::{create_auth_routes, create_protected_auth_routes};
pub use dashboard::create_dashboard_routes;
pub use docs::create_docs_routes;
pub use health::create_health_routes;
pub use subscriptions::create_subscription_routes;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body shape shared by every endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Short error category
    pub error: String,
    /// Human-readable detail
    pub message: String,
}
