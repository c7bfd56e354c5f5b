//! The session authority: registration, login, token refresh, logout and
//! access-token verification.
//!
//! Access tokens are stateless and short-lived. Refresh tokens are tracked
//! server side, one per user, so logging out (or logging in again elsewhere)
//! stops any further access tokens from being minted with the old one.

use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::password::{hash_password, hash_password_off_thread, verify_password_off_thread};
use super::token::TokenIssuer;
use super::TokenPair;
use crate::config::AuthConfig;
use crate::error::AppError;
use crate::models::{User, UserInput};
use crate::store::{
    InMemoryRefreshTokens, InMemoryUsers, RefreshTokenRepository, UserRepository,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const DUMMY_PASSWORD: &str = "not-a-real-password";

pub struct SessionAuthority {
    users: Arc<dyn UserRepository>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    tokens: TokenIssuer,
    bcrypt_cost: u32,
    /// Hash at the configured cost, checked against when the username is
    /// unknown so both login failures cost the same.
    dummy_hash: String,
}

impl SessionAuthority {
    pub fn new(
        config: &AuthConfig,
        users: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
    ) -> Self {
        let dummy_hash = hash_password(DUMMY_PASSWORD, config.bcrypt_cost).unwrap_or_else(|e| {
            log::error!("could not prepare login hash: {:?}", e);
            String::new()
        });

        Self {
            users,
            refresh_tokens,
            tokens: TokenIssuer::new(config),
            bcrypt_cost: config.bcrypt_cost,
            dummy_hash,
        }
    }

    /// An authority over fresh, empty in-memory tables.
    pub fn in_memory(config: &AuthConfig) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryUsers::new()),
            Arc::new(InMemoryRefreshTokens::new()),
        )
    }

    /// Creates an account. No token is issued; the caller logs in separately.
    pub async fn register(&self, input: UserInput) -> Result<User, AppError> {
        let input = input.normalized();
        input.validate()?;

        if self.users.find_by_username(&input.username).await?.is_some() {
            return Err(AppError::Conflict("Username already exists.".into()));
        }

        let password_hash = hash_password_off_thread(input.password, self.bcrypt_cost).await?;
        let user = User::new(input.username, password_hash);
        // A concurrent registration may have won the race while we were hashing.
        self.users.insert(user.clone()).await?;

        log::info!("registered user {}", user.id);
        Ok(user)
    }

    /// Checks the credentials and issues a fresh token pair. The new refresh
    /// token replaces whatever refresh token the user held before.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AppError> {
        let user = match self.users.find_by_username(username.trim()).await? {
            Some(user) => user,
            None => {
                // Outcome is ignored; only the time spent matters.
                let _ =
                    verify_password_off_thread(password.to_string(), self.dummy_hash.clone()).await;
                log::warn!("login rejected: unknown username");
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
            }
        };

        if !verify_password_off_thread(password.to_string(), user.password_hash.clone()).await? {
            log::warn!("login rejected: wrong password for user {}", user.id);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        let access_token = self.tokens.issue_access(user.id)?;
        let refresh_token = self.tokens.issue_refresh(user.id)?;
        self.refresh_tokens
            .store(user.id, refresh_token.clone())
            .await?;

        log::info!("user {} logged in", user.id);
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Mints a new access token from the user's current refresh token.
    /// The refresh token itself is left as is.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        if self.refresh_tokens.find_owner(refresh_token).await?.is_none() {
            return Err(AppError::Unauthorized("Invalid refresh token".into()));
        }

        let claims = self.tokens.verify_refresh(refresh_token)?;
        let access_token = self.tokens.issue_access(claims.sub)?;

        log::info!("issued access token for user {} from refresh token", claims.sub);
        Ok(access_token)
    }

    /// Revokes the refresh token if it is some user's current one. Unknown
    /// tokens are ignored.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        if let Some(user_id) = self.refresh_tokens.find_owner(refresh_token).await? {
            self.refresh_tokens.revoke(user_id).await?;
            log::info!("user {} logged out", user_id);
        }
        Ok(())
    }

    /// Resolves an access token to its user id.
    pub fn verify_access(&self, access_token: Option<&str>) -> Result<Uuid, AppError> {
        let token = access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Unauthorized - No token provided".into()))?;
        Ok(self.tokens.verify_access(token)?.sub)
    }
}
