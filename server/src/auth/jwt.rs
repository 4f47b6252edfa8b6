//! JWT token service

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::AppError;

/// Actor role asserted by the authentication collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Restaurant,
    Admin,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Actor id (customer id or restaurant id, per role)
    pub sub: i64,
    pub role: Role,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

/// Authenticated actor attached to every request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub role: Role,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    Invalid(String),
}

impl From<JwtError> for AppError {
    fn from(_: JwtError) -> Self {
        AppError::InvalidToken
    }
}

/// HS256 token service
#[derive(Clone)]
pub struct JwtService {
    secret: String,
}

impl JwtService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Issue a token (used by tests and tooling; login lives elsewhere)
    pub fn issue(&self, id: i64, role: Role, ttl_secs: i64) -> Result<String, JwtError> {
        let claims = Claims {
            sub: id,
            role,
            exp: chrono::Utc::now().timestamp() + ttl_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| JwtError::Invalid(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| JwtError::Invalid(e.to_string()))
    }
}
