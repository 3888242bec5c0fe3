use crate::{
    auth::{
        jwt::{JwtService, JwtServiceImpl, parse_algorithm},
        middleware::jwt_auth_middleware,
    },
    config::Config,
    database::{DatabaseManager, DatabaseManagerImpl},
    error::AppError,
    health::HealthService,
    routes::{
        create_auth_routes, create_dashboard_routes, create_docs_routes, create_health_routes,
        create_protected_auth_routes, create_subscription_routes,
    },
};
use axum::{Router, middleware};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Clone)]
pub struct Server {
    pub config: Arc<Config>,
    pub jwt_service: Arc<dyn JwtService>,
    pub database: Arc<dyn DatabaseManager>,
    pub health_service: Arc<HealthService>,
}

impl Server {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        // Initialize JWT service
        let jwt_algorithm = parse_algorithm(&config.jwt.algorithm)?;
        let jwt_service_impl = JwtServiceImpl::new(config.jwt.secret.clone(), jwt_algorithm)?;
        let jwt_service: Arc<dyn JwtService> = Arc::new(jwt_service_impl.clone());

        // Initialize database
        let database_impl = Arc::new(
            DatabaseManagerImpl::new_from_config(&config)
                .await
                .map_err(AppError::Database)?,
        );
        let database: Arc<dyn DatabaseManager> = database_impl.clone();

        // Initialize health service
        let health_service = Arc::new(HealthService::new());
        health_service.register(database_impl).await;
        health_service
            .register(jwt_service_impl.health_checker())
            .await;

        Ok(Self {
            config: Arc::new(config),
            jwt_service,
            database,
            health_service,
        })
    }

    pub async fn run(&self) -> Result<(), AppError> {
        // Run database migrations on startup to ensure tables exist
        info!("Running database migrations");
        self.database.migrate().await?;
        info!("Database migrations completed successfully");

        let app = self.create_app();

        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

        info!("Server listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

        info!("Server shutdown complete");
        Ok(())
    }

    // Creates an application router
    pub fn create_app(&self) -> Router {
        Router::new()
            // Account routes
            .nest("/auth", create_auth_routes())
            .nest("/auth", self.protected_auth_routes())
            // Health check routes
            .nest("/health", create_health_routes())
            // API routes
            .nest("/api", self.api_routes())
            // API documentation
            .merge(create_docs_routes())
            // All routes use Server as state
            .with_state(self.clone())
    }

    /// Helper method for protected auth routes
    fn protected_auth_routes(&self) -> Router<Server> {
        create_protected_auth_routes().layer(middleware::from_fn_with_state(
            self.clone(),
            jwt_auth_middleware,
        ))
    }

    /// Helper method for JWT-protected API routes
    fn api_routes(&self) -> Router<Server> {
        create_subscription_routes()
            .merge(create_dashboard_routes())
            .layer(middleware::from_fn_with_state(
                self.clone(),
                jwt_auth_middleware,
            ))
    }
}

/// Resolve on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Graceful shutdown initiated");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn create_test_server() -> Server {
        crate::test_utils::TestServerBuilder::new().build().await
    }

    #[tokio::test]
    async fn test_server_creation() {
        let server = create_test_server().await;
        assert_eq!(server.config.database.url, "sqlite::memory:");
    }

    #[tokio::test]
    async fn test_health_check_without_token() {
        let server = create_test_server().await;
        let app = server.create_app();

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_requires_token() {
        let server = create_test_server().await;
        let app = server.create_app();

        let request = Request::builder()
            .uri("/api/subscriptions")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_dashboard_requires_token() {
        let server = create_test_server().await;
        let app = server.create_app();

        let request = Request::builder()
            .uri("/api/dashboard")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
