use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use bigdecimal::BigDecimal;
use serde_json::json;
use thiserror::Error;

use crate::database::models::money;
use crate::handlers::shared::MessageResponse;

/// Failures of the session issuer.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingFields,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthenticated(String),

    #[error("Access denied. {0} only.")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Failures of the budget ledger and employee management.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("You already have a pending budget request")]
    DuplicatePendingRequest,

    #[error("Request already processed")]
    AlreadyProcessed,

    #[error("Insufficient balance")]
    InsufficientBalance {
        balance: BigDecimal,
        requested: BigDecimal,
    },

    #[error("Email already exists")]
    EmailExists,

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Insufficient balance")]
    InsufficientBalance {
        balance: BigDecimal,
        requested: BigDecimal,
    },

    #[error("Internal server error: {0}")]
    Internal(anyhow::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::InsufficientBalance { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        match self {
            AppError::Internal(err) => {
                log::error!("Request failed with status {}: {:#}", status_code, err);
                HttpResponse::build(status_code).json(MessageResponse::new("Server error"))
            }
            AppError::InsufficientBalance { balance, requested } => {
                log::info!(
                    "Rejected expense of {} against balance {}",
                    requested,
                    balance
                );
                HttpResponse::build(status_code).json(json!({
                    "message": self.to_string(),
                    "balance": money::to_number(balance),
                    "requested": money::to_number(requested),
                }))
            }
            _ => {
                log::warn!("Request failed with status {}: {}", status_code, self);
                HttpResponse::build(status_code).json(MessageResponse::new(self.to_string()))
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal(error)
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::MissingFields => AppError::BadRequest(error.to_string()),
            AuthError::InvalidCredentials | AuthError::Unauthenticated(_) => {
                AppError::Unauthorized(error.to_string())
            }
            AuthError::Forbidden(_) => AppError::Forbidden(error.to_string()),
            AuthError::Storage(err) => AppError::Internal(err),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::InvalidInput(message) => AppError::BadRequest(message),
            LedgerError::NotFound(message) => AppError::NotFound(message),
            LedgerError::DuplicatePendingRequest
            | LedgerError::AlreadyProcessed
            | LedgerError::EmailExists => AppError::BadRequest(error.to_string()),
            LedgerError::InsufficientBalance { balance, requested } => {
                AppError::InsufficientBalance { balance, requested }
            }
            LedgerError::Storage(err) => AppError::Internal(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use anyhow::anyhow;
    use pretty_assertions::assert_eq;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn internal_errors_hide_details() {
        let (status, body) = body_json(AppError::from(anyhow!("connection refused"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Server error" }));
    }

    #[actix_web::test]
    async fn insufficient_balance_carries_amounts() {
        let error = AppError::from(LedgerError::InsufficientBalance {
            balance: BigDecimal::from(800),
            requested: BigDecimal::from(900),
        });
        let (status, body) = body_json(error).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "message": "Insufficient balance", "balance": 800.0, "requested": 900.0 })
        );
    }

    #[actix_web::test]
    async fn conflicts_map_to_bad_request() {
        let (status, body) = body_json(LedgerError::AlreadyProcessed.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Request already processed");

        let (status, _) = body_json(AuthError::InvalidCredentials.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = body_json(AuthError::Forbidden("Employer".to_string()).into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Access denied. Employer only.");
    }
}
