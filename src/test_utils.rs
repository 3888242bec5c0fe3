use crate::{
    auth::{
        hash_password,
        jwt::{Claims, JwtService, JwtServiceImpl},
    },
    config::Config,
    database::{
        DatabaseManager,
        entities::{BillingFrequency, SubscriptionRecord, UsageFrequency, UserAccount},
    },
    server::Server,
};
use chrono::{NaiveDate, Utc};
use jsonwebtoken::Algorithm;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Test server builder for creating test instances with an in-memory database
pub struct TestServerBuilder {
    config: Config,
    jwt_secret: Option<String>,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            jwt_secret: Some("test-secret".to_string()),
        }
    }

    /// Set a custom JWT secret for testing
    pub fn with_jwt_secret(mut self, secret: String) -> Self {
        self.jwt_secret = Some(secret);
        self
    }

    /// Set a custom configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Build the test server with configured settings
    pub async fn build(self) -> Server {
        let mut config = self.config;

        config.database.url = "sqlite::memory:".to_string();

        if let Some(secret) = &self.jwt_secret {
            config.jwt.secret = secret.clone();
            config.jwt.algorithm = "HS256".to_string();
        }

        let server = Server::new(config).await.unwrap();
        server.database.migrate().await.unwrap();
        server
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a test user in the database, password is "password123"
pub async fn create_test_user(database: &Arc<dyn DatabaseManager>) -> i32 {
    create_test_user_with_data(database, "test_user", "test@example.com").await
}

/// Create a test user with custom username and email, password is "password123"
pub async fn create_test_user_with_data(
    database: &Arc<dyn DatabaseManager>,
    username: &str,
    email: &str,
) -> i32 {
    let account = UserAccount::new(username, email, hash_password("password123").unwrap())
        .with_last_login(Utc::now());
    database.users().create(&account).await.unwrap()
}

/// Create a test subscription owned by the given user
pub async fn create_test_subscription(
    database: &Arc<dyn DatabaseManager>,
    user_id: i32,
    name: &str,
    cost: Decimal,
    billing_frequency: BillingFrequency,
    next_due_date: NaiveDate,
    usage_frequency: UsageFrequency,
    category: &str,
) -> SubscriptionRecord {
    let record = SubscriptionRecord::new(user_id, name, cost, billing_frequency, next_due_date)
        .with_usage_frequency(usage_frequency)
        .with_category(category.to_string());
    database.subscriptions().create(&record).await.unwrap()
}

/// Create a test JWT token for the given user
pub fn create_test_jwt(jwt_service: &Arc<dyn JwtService>, user_id: i32) -> String {
    let claims = Claims::new(user_id, 3600);
    jwt_service.create_token(&claims).unwrap()
}

/// Create a test JWT token with a custom lifetime
pub fn create_test_jwt_with_expiry(
    jwt_service: &Arc<dyn JwtService>,
    user_id: i32,
    expires_in: u64,
) -> String {
    let claims = Claims::new(user_id, expires_in);
    jwt_service.create_token(&claims).unwrap()
}

/// Create a JWT service for testing
pub fn create_test_jwt_service() -> JwtServiceImpl {
    JwtServiceImpl::new("test-secret".to_string(), Algorithm::HS256).unwrap()
}
