use crate::{
    auth::{AccessTokenResponse, LoginRequest, RefreshRequest, SessionAuthority},
    error::AppError,
    models::UserInput,
};
use actix_web::{post, web, HttpResponse, Responder};
use serde_json::json;

/// Register a new user
///
/// Creates a new user account. No token is returned; the client logs in next.
///
/// ## Responses:
/// - `201 Created`: `{"message": ...}`.
/// - `400 Bad Request`: validation failure (`{"message", "errors"}`) or a taken username.
#[post("/register")]
pub async fn register(
    authority: web::Data<SessionAuthority>,
    register_data: web::Json<UserInput>,
) -> Result<impl Responder, AppError> {
    authority.register(register_data.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully"
    })))
}

/// Login user
///
/// Authenticates a user and returns an access token and a refresh token.
///
/// ## Responses:
/// - `200 OK`: `{"accessToken", "refreshToken"}`.
/// - `401 Unauthorized`: unknown username or wrong password, indistinguishably.
#[post("/login")]
pub async fn login(
    authority: web::Data<SessionAuthority>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let tokens = authority
        .login(&login_data.username, &login_data.password)
        .await?;

    Ok(HttpResponse::Ok().json(tokens))
}

/// Exchange a refresh token for a new access token.
///
/// ## Responses:
/// - `200 OK`: `{"accessToken"}`.
/// - `403 Forbidden`: the token is missing, not the user's current one, or invalid.
#[post("/refresh")]
pub async fn refresh(
    authority: web::Data<SessionAuthority>,
    refresh_data: web::Json<RefreshRequest>,
) -> Result<impl Responder, AppError> {
    let refresh_token = match refresh_data.refresh_token.as_deref() {
        Some(token) if !token.is_empty() => token,
        _ => return Err(AppError::Forbidden("Refresh token required".into())),
    };

    let access_token = authority
        .refresh(refresh_token)
        .await
        .map_err(|err| match err {
            AppError::Unauthorized(_) => AppError::Forbidden("Invalid refresh token".into()),
            other => other,
        })?;

    Ok(HttpResponse::Ok().json(AccessTokenResponse { access_token }))
}

/// Revoke a refresh token.
///
/// Always answers `200 OK`, whether or not the token was known.
#[post("/logout")]
pub async fn logout(
    authority: web::Data<SessionAuthority>,
    logout_data: Option<web::Json<RefreshRequest>>,
) -> Result<impl Responder, AppError> {
    if let Some(token) = logout_data.and_then(|data| data.into_inner().refresh_token) {
        authority.logout(&token).await?;
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Logged out successfully"
    })))
}
