use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Subtrack API",
        version = "1.0.0",
        description = "JWT-authenticated API for tracking personal subscriptions: accounts, subscription CRUD, and dashboard aggregates with value scoring"
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::auth::delete_account,
        crate::routes::subscriptions::list_subscriptions,
        crate::routes::subscriptions::create_subscription,
        crate::routes::subscriptions::get_subscription,
        crate::routes::subscriptions::update_subscription,
        crate::routes::subscriptions::delete_subscription,
        crate::routes::dashboard::get_dashboard,
    ),
    components(schemas(
        crate::routes::ApiErrorResponse,
        crate::health::HealthResponse,
        crate::health::HealthStatus,
        crate::health::HealthCheckResult,
        crate::routes::auth::RegisterRequest,
        crate::routes::auth::LoginRequest,
        crate::routes::auth::TokenResponse,
        crate::routes::auth::UserResponse,
        crate::routes::subscriptions::SubscriptionRequest,
        crate::routes::subscriptions::SubscriptionResponse,
        crate::routes::subscriptions::SubscriptionListResponse,
        crate::routes::dashboard::DashboardQuery,
        crate::routes::dashboard::DashboardResponse,
        crate::routes::dashboard::CancelRecommendation,
        crate::database::entities::BillingFrequency,
        crate::database::entities::UsageFrequency,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Account registration and token issuance"),
        (name = "Subscriptions", description = "Owner-scoped subscription CRUD"),
        (name = "Dashboard", description = "Aggregated spending and recommendations"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// Swagger UI mounted at /docs, spec at /api-docs/openapi.json
pub fn create_docs_routes() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().unwrap();
        assert!(json.contains("/api/subscriptions"));
        assert!(json.contains("/api/dashboard"));
        assert!(json.contains("bearer_auth"));
    }
}
