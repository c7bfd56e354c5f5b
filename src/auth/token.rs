use crate::config::AuthConfig;
use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token, the user's unique identifier.
    pub sub: Uuid,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: usize,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Random token id; keeps two tokens minted in the same second distinct.
    pub jti: Uuid,
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Mints and checks the two kinds of session tokens.
///
/// Access and refresh tokens are HS256 JWTs signed with different secrets, so
/// neither kind verifies as the other.
pub struct TokenIssuer {
    access: SigningKeys,
    refresh: SigningKeys,
    access_ttl: Duration,
    refresh_ttl: Duration,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; no clock-skew allowance.
        validation.leeway = 0;

        Self {
            access: SigningKeys::from_secret(&config.access_secret),
            refresh: SigningKeys::from_secret(&config.refresh_secret),
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            validation,
        }
    }

    /// Generates a short-lived access token for `user_id`.
    pub fn issue_access(&self, user_id: Uuid) -> Result<String, AppError> {
        sign(&self.access, user_id, self.access_ttl)
    }

    /// Generates a long-lived refresh token for `user_id`.
    pub fn issue_refresh(&self, user_id: Uuid) -> Result<String, AppError> {
        sign(&self.refresh, user_id, self.refresh_ttl)
    }

    /// Verifies an access token's signature and expiry.
    ///
    /// Returns `AppError::Unauthorized` if the token is malformed, its signature is
    /// invalid, or it has expired.
    pub fn verify_access(&self, token: &str) -> Result<Claims, AppError> {
        Ok(decode::<Claims>(token, &self.access.decoding, &self.validation)?.claims)
    }

    /// Same as [`TokenIssuer::verify_access`], against the refresh secret.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AppError> {
        Ok(decode::<Claims>(token, &self.refresh.decoding, &self.validation)?.claims)
    }
}

fn sign(keys: &SigningKeys, user_id: Uuid, ttl: Duration) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
        AppError::InternalServerError(format!("Token lifetime out of range: {}", ttl))
    })?;
    let claims = Claims {
        sub: user_id,
        exp: expires_at.timestamp().max(0) as usize,
        iat: now.timestamp() as usize,
        jti: Uuid::new_v4(),
    };

    encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
        .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}
