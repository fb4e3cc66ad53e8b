// webhooks/src/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use giftline_core::FlowError;
use serde_json::json;
use thiserror::Error;

use crate::services::commerce::CommerceError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Commerce API Error: {0}")]
  Commerce(#[from] CommerceError),

  #[error("Workflow Error: {0}")]
  Workflow(FlowError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

// Handler errors that travelled through the engine as `FlowError::HandlerError`
// are unwrapped so the caller sees the original variant.
impl From<FlowError> for AppError {
  fn from(err: FlowError) -> Self {
    match err {
      FlowError::HandlerError { source } => match source.downcast::<AppError>() {
        Ok(app_err) => app_err,
        Err(source) => match source.downcast::<CommerceError>() {
          Ok(commerce_err) => AppError::Commerce(commerce_err),
          Err(source) => AppError::Workflow(FlowError::HandlerError { source }),
        },
      },
      other => AppError::Workflow(other),
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    AppError::from(FlowError::from(err))
  }
}

impl AppError {
  fn summary(&self) -> &'static str {
    match self {
      AppError::Validation(_) => "Invalid webhook payload",
      AppError::Auth(_) => "Unauthorized",
      AppError::Config(_) => "Configuration issue",
      AppError::Commerce(_) => "Commerce API request failed",
      AppError::Workflow(_) => "Workflow processing error",
      AppError::Internal(_) => "An internal error occurred",
    }
  }

  fn details(&self) -> String {
    match self {
      AppError::Validation(m) | AppError::Auth(m) | AppError::Config(m) | AppError::Internal(m) => m.clone(),
      AppError::Commerce(e) => e.to_string(),
      AppError::Workflow(e) => e.to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Config(_) | AppError::Commerce(_) | AppError::Workflow(_) | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    match self.status_code() {
      status if status.is_server_error() => tracing::error!(application_error = %self, "Responding with error"),
      _ => tracing::warn!(application_error = %self, "Rejecting webhook"),
    }
    HttpResponse::build(self.status_code()).json(json!({
      "error": self.summary(),
      "details": self.details(),
    }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
