use crate::health::HealthResponse;
use crate::server::Server;
use axum::{Router, extract::State, response::Json, routing::get};

/// Create health check routes
pub fn create_health_routes() -> Router<Server> {
    Router::new().route("/", get(health_check))
}

/// Overall service health
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Health report for all components", body = HealthResponse)
    )
)]
pub async fn health_check(State(server): State<Server>) -> Json<HealthResponse> {
    Json(server.health_service.check_all().await)
}
