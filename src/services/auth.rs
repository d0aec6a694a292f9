//! Authentication service: password hashing, JWT, registration and login.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::MemoryStore;
use crate::errors::AppError;
use crate::models::user::{RegisterUser, User, UserResponse, UserRole};

/// JWT claims embedded in access tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The user's email.
    pub sub: String,
    pub user_id: String,
    pub name: String,
    pub role: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
}

/// Returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Hash a plaintext password with argon2id.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Issue an access token for `user`.
pub fn generate_token(
    user: &User,
    jwt_secret: &str,
    expiry_secs: i64,
) -> Result<AuthResponse, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.email.clone(),
        user_id: user.id.to_string(),
        name: user.name.clone(),
        role: user.role.as_str().to_string(),
        token_type: "access".to_string(),
        exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        iat: now.timestamp(),
    };

    let access_token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))?;

    Ok(AuthResponse {
        user: user.clone().into(),
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: expiry_secs,
    })
}

/// Validate a JWT and return the claims.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let validation = Validation::default();

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
}

/// Register a new user with the `user` role.
pub async fn register(
    store: &MemoryStore,
    input: RegisterUser,
    jwt_secret: &str,
    expiry_secs: i64,
) -> Result<AuthResponse, AppError> {
    input.validate()?;

    let user = User {
        id: Uuid::now_v7(),
        name: input.name.trim().to_string(),
        email: input.email.trim().to_string(),
        password_hash: hash_password(&input.password)?,
        role: UserRole::User,
        created_at: Utc::now(),
    };
    let user = store.users.insert(user).await?;
    tracing::info!(user_id = %user.id, "User registered");

    generate_token(&user, jwt_secret, expiry_secs)
}

/// Authenticate by email and password.
pub async fn login(
    store: &MemoryStore,
    email: &str,
    password: &str,
    jwt_secret: &str,
    expiry_secs: i64,
) -> Result<AuthResponse, AppError> {
    let user = store
        .users
        .find_by_email(email.trim())
        .await
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "Failed login attempt");
        return Err(AppError::Unauthorized);
    }

    generate_token(&user, jwt_secret, expiry_secs)
}

/// Find a user by ID.
pub async fn find_user_by_id(store: &MemoryStore, id: Uuid) -> Result<User, AppError> {
    store
        .users
        .find_by_id(id)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
