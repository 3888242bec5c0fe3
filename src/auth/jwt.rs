use crate::error::AppError;
use crate::health::{HealthCheckResult, HealthChecker};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

pub fn parse_algorithm(alg: &str) -> Result<Algorithm, AppError> {
    let algorithm = Algorithm::from_str(alg)
        .map_err(|_| AppError::Validation(format!("Unsupported JWT algorithm: {}", alg)))?;

    // The configured key is a shared secret string, which only works for
    // the HMAC family.
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => Err(AppError::Validation(format!(
            "JWT algorithm {:?} requires key material this service does not manage; use HS256/HS384/HS512",
            other
        ))),
    }
}

/// JWT claims carried by access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // Database user ID
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    pub fn new(user_id: i32, expires_in_seconds: u64) -> Self {
        let now = Utc::now().timestamp() as usize;
        Self {
            sub: user_id,
            iat: now,
            exp: now + expires_in_seconds as usize,
        }
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as usize;
        self.exp <= now
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp as i64, 0).unwrap_or_else(Utc::now)
    }
}

/// JWT service trait for dependency injection and testing
pub trait JwtService: Send + Sync {
    /// Create an access token from claims
    fn create_token(&self, claims: &Claims) -> Result<String, AppError>;

    /// Validate an access token and return its claims
    fn validate_token(&self, token: &str) -> Result<Claims, AppError>;

    /// Get algorithm used by this service
    fn algorithm(&self) -> Algorithm;
}

#[derive(Clone)]
pub struct JwtServiceImpl {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtServiceImpl {
    pub fn new(secret: String, algorithm: Algorithm) -> Result<Self, AppError> {
        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {}
            other => {
                return Err(AppError::Validation(format!(
                    "Unsupported JWT algorithm: {:?}",
                    other
                )));
            }
        }

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        })
    }

    /// Create a health checker for this JWT service
    pub fn health_checker(&self) -> Arc<JwtHealthChecker> {
        Arc::new(JwtHealthChecker {
            service: self.clone(),
        })
    }
}

impl JwtService for JwtServiceImpl {
    fn create_token(&self, claims: &Claims) -> Result<String, AppError> {
        let header = Header::new(self.algorithm);
        encode(&header, claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(token_data.claims)
    }

    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

/// Health checker implementation for JWT service
pub struct JwtHealthChecker {
    service: JwtServiceImpl,
}

#[async_trait]
impl HealthChecker for JwtHealthChecker {
    fn name(&self) -> &str {
        "jwt"
    }

    async fn check(&self) -> HealthCheckResult {
        // Exercise the service with a create/validate round trip
        let test_claims = Claims::new(1, 60);

        match self.service.create_token(&test_claims) {
            Ok(token) => match self.service.validate_token(&token) {
                Ok(validated_claims) if validated_claims.sub == test_claims.sub => {
                    HealthCheckResult::healthy_with_details(serde_json::json!({
                        "algorithm": format!("{:?}", self.service.algorithm),
                        "token_roundtrip": "success"
                    }))
                }
                Ok(_) => HealthCheckResult::unhealthy("Token claims mismatch".to_string()),
                Err(e) => HealthCheckResult::unhealthy(format!("Token validation failed: {}", e)),
            },
            Err(e) => HealthCheckResult::unhealthy(format!("Token creation failed: {}", e)),
        }
    }
}
