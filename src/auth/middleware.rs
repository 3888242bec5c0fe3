use crate::auth::jwt::JwtService;
use crate::database::DatabaseManager;
use crate::database::entities::UserAccount;
use crate::error::AppError;
use crate::server::Server;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{trace, warn};

/// JWT authentication middleware. Validates the Bearer token, resolves the
/// owning account, and injects it into request extensions for handlers.
pub async fn jwt_auth_middleware(
    State(server): State<Server>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing authentication credentials".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization format".to_string()))?;

    let user = authenticate_with_jwt(token, &server.database, &server.jwt_service).await?;

    // Add UserAccount to request extensions for downstream handlers
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Validate a JWT and resolve its account
async fn authenticate_with_jwt(
    token: &str,
    database: &Arc<dyn DatabaseManager>,
    jwt_service: &Arc<dyn JwtService>,
) -> Result<UserAccount, AppError> {
    let claims = jwt_service.validate_token(token)?;
    let user_id = claims.sub;

    let user = database
        .users()
        .find_by_id(user_id)
        .await
        .map_err(|e| AppError::Internal(format!("Database error: {}", e)))?
        .ok_or_else(|| {
            warn!(user_id = %user_id, "Token references unknown user");
            AppError::Unauthorized("User not found".to_string())
        })?;

    trace!(user_id = %user.id, email = %user.email, "User authentication successful");
    Ok(user)
}

/// Extractor pulling the authenticated account out of request extensions
pub struct UserExtractor(pub UserAccount);

impl<S> FromRequestParts<S> for UserExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserAccount>()
            .cloned()
            .map(UserExtractor)
            .ok_or_else(|| AppError::Unauthorized("Missing authentication".to_string()))
    }
}
