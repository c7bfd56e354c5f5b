//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! It centralizes error management for the session authority, the task store and the
//! HTTP layer, so every failure maps to exactly one status code and JSON body.
//!
//! `AppError` implements `actix_web::error::ResponseError` to convert application errors
//! into HTTP responses shaped as `{"message": ...}` (plus an `errors` array for
//! validation failures). It also provides `From` implementations for
//! `validator::ValidationErrors`, `jsonwebtoken::errors::Error`, `bcrypt::BcryptError`
//! and `actix_web::error::BlockingError`, allowing easy conversion with `?`.

use actix_web::{error::BlockingError, error::ResponseError, http::StatusCode, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// A single failed input field, reported back to the caller so the request can be fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field as it appears in the request body.
    pub field: String,
    /// Human readable reason.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Represents all possible errors that can occur within the application.
///
/// Each variant corresponds to a specific class of failure. These errors are
/// converted into HTTP responses by the `ResponseError` implementation below.
#[derive(Debug)]
pub enum AppError {
    /// Bad credentials, or a missing, malformed, forged or expired token (HTTP 401).
    Unauthorized(String),
    /// Authenticated but not entitled to the resource (HTTP 403).
    Forbidden(String),
    /// A malformed request that could not be parsed (HTTP 400).
    BadRequest(String),
    /// A resource with the same identity already exists (HTTP 400).
    Conflict(String),
    /// One or more input fields failed validation (HTTP 400).
    ValidationError(Vec<FieldError>),
    /// An unexpected server-side failure (HTTP 500).
    /// The message is logged but never sent to the client.
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::ValidationError(errors) => {
                let fields: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation Error: {}", fields.join("; "))
            }
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Internal errors are logged here, once, and replaced by an opaque message.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) | AppError::Conflict(_) | AppError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg) => builder.json(json!({ "message": msg })),
            AppError::ValidationError(errors) => builder.json(json!({
                "message": "Validation failed",
                "errors": errors
            })),
            AppError::InternalServerError(msg) => {
                log::error!("internal error: {}", msg);
                builder.json(json!({ "message": "Server error" }))
            }
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// Every failing field is kept, ordered by field name so responses are stable.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    FieldError::new(field, message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::ValidationError(fields)
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {:?}", error.kind()))
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

/// The blocking pool was shut down or the closure panicked.
impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::InternalServerError(format!("Blocking task failed: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use validator::Validate;

    #[test]
    fn test_error_responses() {
        let error = AppError::Unauthorized("Invalid token".into());
        assert_eq!(error.error_response().status(), 401);

        let error = AppError::Forbidden("Not yours".into());
        assert_eq!(error.error_response().status(), 403);

        let error = AppError::BadRequest("Invalid input".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::Conflict("Username already exists.".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::ValidationError(vec![FieldError::new("title", "too short")]);
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::InternalServerError("Server error".into());
        assert_eq!(error.error_response().status(), 500);
    }

    #[actix_rt::test]
    async fn test_internal_error_body_is_opaque() {
        let error = AppError::InternalServerError("cipher exploded at byte 12".into());
        let body = to_bytes(error.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "message": "Server error" }));
    }

    #[actix_rt::test]
    async fn test_validation_body_lists_fields() {
        let error = AppError::ValidationError(vec![
            FieldError::new("description", "too short"),
            FieldError::new("title", "too long"),
        ]);
        let body = to_bytes(error.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["errors"][0]["field"], "description");
        assert_eq!(json["errors"][1]["message"], "too long");
    }

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 3, message = "needs three"))]
        name: String,
        #[validate(length(min = 5))]
        secret: String,
    }

    #[test]
    fn test_from_validation_errors_keeps_every_field() {
        let probe = Probe {
            name: "ab".into(),
            secret: "abc".into(),
        };
        match AppError::from(probe.validate().unwrap_err()) {
            AppError::ValidationError(fields) => {
                assert_eq!(
                    fields,
                    vec![
                        FieldError::new("name", "needs three"),
                        FieldError::new("secret", "length"),
                    ]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
