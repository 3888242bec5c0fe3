use crate::{
    auth::{Claims, hash_password, middleware::UserExtractor, verify_password},
    database::entities::UserAccount,
    error::AppError,
    server::Server,
};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

/// Create public authentication routes
pub fn create_auth_routes() -> Router<Server> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Create authentication routes that require a valid token
pub fn create_protected_auth_routes() -> Router<Server> {
    Router::new()
        .route("/me", get(me))
        .route("/account", delete(delete_account))
}

/// Registration request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Issued access token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: u64,
}

/// Account representation for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<UserAccount> for UserResponse {
    fn from(user: UserAccount) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

fn validate_registration(request: &RegisterRequest) -> Result<(), AppError> {
    // Character count, not byte length, so multi-byte names measure as read
    let username_chars = request.username.trim().chars().count();
    if !(4..=20).contains(&username_chars) {
        return Err(AppError::Validation(
            "username must be 4 to 20 characters".to_string(),
        ));
    }
    if !request.email.contains('@') {
        return Err(AppError::Validation(
            "email address is not valid".to_string(),
        ));
    }
    if request.password.len() < 6 {
        return Err(AppError::Validation(
            "password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

/// Create a new account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation failed", body = crate::routes::ApiErrorResponse),
        (status = 409, description = "Username or email already registered", body = crate::routes::ApiErrorResponse)
    )
)]
pub async fn register(
    State(server): State<Server>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    validate_registration(&request)?;

    let users = server.database.users();

    if users.find_by_username(request.username.trim()).await?.is_some() {
        return Err(AppError::Conflict("username already taken".to_string()));
    }
    if users.find_by_email(&request.email).await?.is_some() {
        return Err(AppError::Conflict("email already registered".to_string()));
    }

    let password_hash = hash_password(&request.password)?;
    let mut account = UserAccount::new(request.username.trim(), request.email, password_hash);
    account.id = users.create(&account).await?;

    info!(user_id = %account.id, username = %account.username, "Account registered");

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// Exchange credentials for an access token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Bad credentials", body = crate::routes::ApiErrorResponse)
    )
)]
pub async fn login(
    State(server): State<Server>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let users = server.database.users();

    // Same error for unknown email and wrong password, no account probing
    let user = users
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let expires_in = server.config.jwt.expires_in;
    let claims = Claims::new(user.id, expires_in);
    let access_token = server.jwt_service.create_token(&claims)?;

    users.update_last_login(user.id).await?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in,
    }))
}

/// Current account
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Authenticated account", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = crate::routes::ApiErrorResponse)
    )
)]
pub async fn me(UserExtractor(user): UserExtractor) -> Json<UserResponse> {
    Json(user.into())
}

/// Delete the current account and all of its subscriptions
#[utoipa::path(
    delete,
    path = "/auth/account",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Missing or invalid token", body = crate::routes::ApiErrorResponse)
    )
)]
pub async fn delete_account(
    State(server): State<Server>,
    UserExtractor(user): UserExtractor,
) -> Result<StatusCode, AppError> {
    server.database.users().delete(user.id).await?;

    info!(user_id = %user.id, "Account deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_validate_registration_accepts_good_input() {
        assert!(validate_registration(&request("sam_doe", "sam@example.com", "secret1")).is_ok());
    }

    #[test]
    fn test_validate_registration_username_length() {
        assert!(validate_registration(&request("abc", "a@b.com", "secret1")).is_err());
        assert!(
            validate_registration(&request("a-very-long-username-here", "a@b.com", "secret1"))
                .is_err()
        );
    }

    #[test]
    fn test_validate_registration_counts_characters_not_bytes() {
        // Four Cyrillic characters, eight bytes
        assert!(validate_registration(&request("пётр", "p@example.com", "secret1")).is_ok());
        // Twenty characters is the ceiling regardless of encoding width
        let at_limit = "ё".repeat(20);
        assert!(validate_registration(&request(&at_limit, "p@example.com", "secret1")).is_ok());
        let over_limit = "ё".repeat(21);
        assert!(validate_registration(&request(&over_limit, "p@example.com", "secret1")).is_err());
    }

    #[test]
    fn test_validate_registration_email_shape() {
        assert!(validate_registration(&request("sam_doe", "not-an-email", "secret1")).is_err());
    }

    #[test]
    fn test_validate_registration_password_length() {
        assert!(validate_registration(&request("sam_doe", "a@b.com", "short")).is_err());
    }
}
