use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::{self, AuthError, TokenPair, TOKEN_TYPE_REFRESH};
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Profile, RefreshTokenRow, User};
use crate::database::profiles::ProfileRepository;
use crate::database::users::{NewUser, UserRepository};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Validation failed")]
    Validation(HashMap<String, String>),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Refresh token is invalid, expired or revoked")]
    InvalidRefreshToken,
    #[error("No profile exists for user {0}")]
    ProfileMissing(Uuid),
    #[error(transparent)]
    Token(#[from] AuthError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Manager(#[from] DatabaseError),
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password2: String,
}

/// A signed-in account: the user, its profile, and a fresh token pair
#[derive(Debug)]
pub struct AccountSession {
    pub user: User,
    pub profile: Profile,
    pub tokens: TokenPair,
}

pub struct AccountService {
    pool: PgPool,
    users: UserRepository,
    profiles: ProfileRepository,
}

impl AccountService {
    pub async fn new() -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self {
            users: UserRepository::new(pool.clone()),
            profiles: ProfileRepository::new(pool.clone()),
            pool,
        })
    }

    /// Register a new account. The user row and its profile are created in
    /// one transaction; a partial account can never persist.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AccountSession, AccountError> {
        let mut field_errors = validate_registration(request);

        // Uniqueness pre-checks only once the shape of the input is sane;
        // a concurrent duplicate still trips the unique index as a conflict.
        if field_errors.is_empty() {
            if self.users.email_taken(&request.email).await? {
                field_errors.insert("email".into(), "This email is already registered".into());
            }
            if self.users.username_taken(&request.username).await? {
                field_errors.insert("username".into(), "This username is already taken".into());
            }
        }

        if !field_errors.is_empty() {
            return Err(AccountError::Validation(field_errors));
        }

        let new_user = NewUser {
            email: request.email.clone(),
            username: request.username.clone(),
            password_hash: auth::hash_password(&request.password)?,
            is_staff: false,
            is_superuser: false,
        };

        let mut tx = self.pool.begin().await?;
        let user = UserRepository::insert(&mut *tx, &new_user).await?;
        let profile = ProfileRepository::insert(&mut *tx, user.id).await?;
        tx.commit().await?;

        let tokens = self.issue_session(&user).await?;
        Ok(AccountSession { user, profile, tokens })
    }

    /// Authenticate by email + password. Failures are indistinguishable to
    /// the caller: unknown email, bad password and deactivated account all
    /// surface as InvalidCredentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<AccountSession, AccountError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !user.is_active || !auth::verify_password(password, &user.password_hash)? {
            return Err(AccountError::InvalidCredentials);
        }

        let profile = self
            .profiles
            .find_by_user_id(user.id)
            .await?
            .ok_or(AccountError::ProfileMissing(user.id))?;

        let tokens = self.issue_session(&user).await?;
        Ok(AccountSession { user, profile, tokens })
    }

    /// Exchange a refresh token for a new pair, rotating on use: the
    /// presented token is revoked in the same transaction that records its
    /// successor, so a replay can never mint another credential.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AccountError> {
        let claims = auth::decode_token(refresh_token, TOKEN_TYPE_REFRESH).map_err(|e| match e {
            AuthError::MissingSecret => AccountError::Token(e),
            _ => AccountError::InvalidRefreshToken,
        })?;

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AccountError::InvalidRefreshToken)?;

        let tokens = auth::issue_token_pair(user.id, &user.email, &user.username)?;

        let mut tx = self.pool.begin().await?;

        let row: Option<RefreshTokenRow> = sqlx::query_as(
            "SELECT jti, user_id, expires_at, revoked_at, created_at
             FROM refresh_tokens WHERE jti = $1 FOR UPDATE",
        )
        .bind(claims.jti)
        .fetch_optional(&mut *tx)
        .await?;

        let row = row.ok_or(AccountError::InvalidRefreshToken)?;
        if row.user_id != user.id || !row.is_usable(Utc::now()) {
            return Err(AccountError::InvalidRefreshToken);
        }

        sqlx::query("UPDATE refresh_tokens SET revoked_at = now() WHERE jti = $1")
            .bind(row.jti)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO refresh_tokens (jti, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(tokens.refresh_jti)
            .bind(user.id)
            .bind(tokens.refresh_expires_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(tokens)
    }

    /// Bootstrap a staff account from the CLI. Replaces the kind of
    /// fixed-credential admin endpoint that has no place in a routed API.
    pub async fn create_admin(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<User, AccountError> {
        let mut field_errors = HashMap::new();
        validate_email(email, &mut field_errors);
        validate_username(username, &mut field_errors);
        validate_password(password, &mut field_errors);

        if field_errors.is_empty() {
            if self.users.email_taken(email).await? {
                field_errors.insert("email".into(), "This email is already registered".into());
            }
            if self.users.username_taken(username).await? {
                field_errors.insert("username".into(), "This username is already taken".into());
            }
        }

        if !field_errors.is_empty() {
            return Err(AccountError::Validation(field_errors));
        }

        let new_user = NewUser {
            email: email.to_string(),
            username: username.to_string(),
            password_hash: auth::hash_password(password)?,
            is_staff: true,
            is_superuser: true,
        };

        let mut tx = self.pool.begin().await?;
        let user = UserRepository::insert(&mut *tx, &new_user).await?;
        ProfileRepository::insert(&mut *tx, user.id).await?;
        tx.commit().await?;

        tracing::info!("Created staff account {}", user.email);
        Ok(user)
    }

    async fn issue_session(&self, user: &User) -> Result<TokenPair, AccountError> {
        let tokens = auth::issue_token_pair(user.id, &user.email, &user.username)?;

        sqlx::query("INSERT INTO refresh_tokens (jti, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(tokens.refresh_jti)
            .bind(user.id)
            .bind(tokens.refresh_expires_at)
            .execute(&self.pool)
            .await?;

        Ok(tokens)
    }
}

fn validate_registration(request: &RegisterRequest) -> HashMap<String, String> {
    let mut field_errors = HashMap::new();

    validate_email(&request.email, &mut field_errors);
    validate_username(&request.username, &mut field_errors);
    validate_password(&request.password, &mut field_errors);

    if request.password != request.password2 {
        field_errors.insert("password2".into(), "Passwords do not match".into());
    }

    field_errors
}

fn validate_email(email: &str, field_errors: &mut HashMap<String, String>) {
    if email.is_empty() {
        field_errors.insert("email".into(), "Email cannot be empty".into());
        return;
    }

    let parts: Vec<&str> = email.split('@').collect();
    let valid = parts.len() == 2
        && !parts[0].is_empty()
        && parts[1].contains('.')
        && !parts[1].starts_with('.')
        && !parts[1].ends_with('.');

    if !valid {
        field_errors.insert("email".into(), "Invalid email format".into());
    }
}

fn validate_username(username: &str, field_errors: &mut HashMap<String, String>) {
    if username.len() < MIN_USERNAME_LENGTH {
        field_errors.insert(
            "username".into(),
            format!("Username must be at least {} characters", MIN_USERNAME_LENGTH),
        );
        return;
    }

    if username.len() > MAX_USERNAME_LENGTH {
        field_errors.insert(
            "username".into(),
            format!("Username must be at most {} characters", MAX_USERNAME_LENGTH),
        );
        return;
    }

    if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        field_errors.insert(
            "username".into(),
            "Username can only contain letters, numbers, underscore, and hyphen".into(),
        );
        return;
    }

    if !username.chars().next().is_some_and(|c| c.is_alphanumeric()) {
        field_errors.insert(
            "username".into(),
            "Username must start with a letter or number".into(),
        );
    }
}

fn validate_password(password: &str, field_errors: &mut HashMap<String, String>) {
    if password.len() < MIN_PASSWORD_LENGTH {
        field_errors.insert(
            "password".into(),
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        );
    } else if password.len() > MAX_PASSWORD_LENGTH {
        field_errors.insert(
            "password".into(),
            format!("Password must be at most {} characters", MAX_PASSWORD_LENGTH),
        );
    }
}
