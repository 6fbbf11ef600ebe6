use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// Claims carried by both access and refresh tokens. `token_type`
/// distinguishes them so a refresh token can never authenticate a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub username: String,
    pub token_type: String,
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    fn new(
        user_id: Uuid,
        email: &str,
        username: &str,
        token_type: &str,
        lifetime: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email: email.to_string(),
            username: username.to_string(),
            token_type: token_type.to_string(),
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT secret not configured")]
    MissingSecret,
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Expected {expected} token, got {actual}")]
    WrongTokenType { expected: String, actual: String },
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

/// A freshly issued access + refresh pair. The refresh token's `jti` and
/// expiry are exposed so the caller can persist the rotation record.
#[derive(Debug)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    pub refresh_jti: Uuid,
    pub refresh_expires_at: DateTime<Utc>,
    /// Access token lifetime in seconds, for the response body.
    pub access_expires_in: i64,
}

/// Issue an access + refresh token pair for an authenticated user.
pub fn issue_token_pair(user_id: Uuid, email: &str, username: &str) -> Result<TokenPair, AuthError> {
    let security = &config::config().security;
    let access_lifetime = Duration::minutes(security.access_token_minutes);
    let refresh_lifetime = Duration::days(security.refresh_token_days);

    let access_claims = Claims::new(user_id, email, username, TOKEN_TYPE_ACCESS, access_lifetime);
    let refresh_claims = Claims::new(user_id, email, username, TOKEN_TYPE_REFRESH, refresh_lifetime);

    let secret = current_secret()?;
    let refresh_expires_at = DateTime::from_timestamp(refresh_claims.exp, 0)
        .ok_or_else(|| AuthError::TokenGeneration("refresh expiry out of range".to_string()))?;

    Ok(TokenPair {
        access: encode_with_secret(&access_claims, secret)?,
        refresh_jti: refresh_claims.jti,
        refresh: encode_with_secret(&refresh_claims, secret)?,
        refresh_expires_at,
        access_expires_in: access_lifetime.num_seconds(),
    })
}

/// Validate a token's signature, expiry and type, returning its claims.
pub fn decode_token(token: &str, expected_type: &str) -> Result<Claims, AuthError> {
    decode_with_secret(token, expected_type, current_secret()?)
}

fn current_secret() -> Result<&'static [u8], AuthError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }
    Ok(secret.as_bytes())
}

fn encode_with_secret(claims: &Claims, secret: &[u8]) -> Result<String, AuthError> {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret))
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

fn decode_with_secret(token: &str, expected_type: &str, secret: &[u8]) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )
    .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    let claims = token_data.claims;
    if claims.token_type != expected_type {
        return Err(AuthError::WrongTokenType {
            expected: expected_type.to_string(),
            actual: claims.token_type,
        });
    }

    Ok(claims)
}

/// Hash a password for storage using argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Verify a password against a stored PHC hash string.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
