/// Account and session handling
///
/// Passwords are stored as argon2 PHC strings; sessions are stateless
/// HS256 bearer tokens whose subject is the user id.
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::models::User;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
}

pub fn verify_password(hash: &str, password: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

pub fn issue_token(secret: &str, user_id: Uuid, ttl_hours: i64) -> Result<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::hours(ttl_hours)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("token encoding failed: {}", e)))
}

/// Decode a session token; any invalid or expired token is treated as an
/// anonymous caller.
pub fn decode_token(secret: &str, token: &str) -> Option<Uuid> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .and_then(|data| Uuid::parse_str(&data.claims.sub).ok())
}

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    secret: String,
    token_ttl_hours: i64,
}

impl AuthService {
    pub fn new(pool: PgPool, config: &AuthConfig) -> Self {
        Self {
            pool,
            secret: config.jwt_secret.clone(),
            token_ttl_hours: config.token_ttl_hours,
        }
    }

    pub async fn signup(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> Result<User> {
        if user_repo::find_by_username(&self.pool, username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                username
            )));
        }

        let password_hash = hash_password(password)?;
        let user =
            user_repo::create_user(&self.pool, username, first_name, last_name, &password_hash)
                .await?;

        Ok(user)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(User, String)> {
        let user = user_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("invalid username or password".to_string()))?;

        if !verify_password(&user.password_hash, password) {
            return Err(AppError::Unauthorized(
                "invalid username or password".to_string(),
            ));
        }

        let token = issue_token(&self.secret, user.id, self.token_ttl_hours)?;
        Ok((user, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip_verifies() {
        let hash = hash_password("correct horse").expect("hash");
        assert!(verify_password(&hash, "correct horse"));
        assert!(!verify_password(&hash, "wrong horse"));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("not-a-phc-string", "anything"));
    }

    #[test]
    fn token_roundtrip_returns_the_user_id() {
        let user_id = Uuid::new_v4();
        let token = issue_token("secret", user_id, 1).expect("token");
        assert_eq!(decode_token("secret", &token), Some(user_id));
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let token = issue_token("secret", Uuid::new_v4(), 1).expect("token");
        assert_eq!(decode_token("other-secret", &token), None);
        assert_eq!(decode_token("secret", "garbage"), None);
    }
}
