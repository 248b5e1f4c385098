use axum::body::Body;
use axum::http::{StatusCode, header::CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use log::*;
use thiserror::Error;

use pgrest_qs::TranslateError;

pub(crate) const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Publicly visible errors. Kept deliberately close to HTTP status codes so
/// the mapping stays obvious and internals never leak through the wire.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("invalid identifier: {0}")]
  InvalidIdentifier(String),
  #[error("unknown operator: {0}")]
  UnknownOperator(String),
  #[error("malformed join clause")]
  MalformedJoin,
  #[error("invalid pagination parameters")]
  BadPagination,
  #[error("projection contains no columns")]
  EmptyProjection,
  #[error("permission denied")]
  PermissionDenied,
  #[error("constraint violation: {0}")]
  ConstraintViolation(String),
  #[error("malformed statement")]
  MalformedStatement,
  #[error("execution error: {0}")]
  ExecutionError(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    return match self {
      Self::InvalidIdentifier(_)
      | Self::UnknownOperator(_)
      | Self::MalformedJoin
      | Self::BadPagination
      | Self::EmptyProjection
      | Self::ConstraintViolation(_) => StatusCode::BAD_REQUEST,
      Self::PermissionDenied => StatusCode::FORBIDDEN,
      Self::MalformedStatement | Self::ExecutionError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
  }
}

impl From<TranslateError> for ApiError {
  fn from(err: TranslateError) -> Self {
    return match err {
      TranslateError::InvalidIdentifier(token) => Self::InvalidIdentifier(token),
      TranslateError::UnknownOperator(token) => Self::UnknownOperator(token),
      TranslateError::MalformedJoin => Self::MalformedJoin,
      TranslateError::BadPagination => Self::BadPagination,
      TranslateError::EmptyProjection => Self::EmptyProjection,
    };
  }
}

impl From<tokio_postgres::Error> for ApiError {
  fn from(err: tokio_postgres::Error) -> Self {
    if let Some(db) = err.as_db_error() {
      // SQLSTATE class 23 covers integrity constraint violations (unique,
      // fk, not-null, check).
      if db.code().code().starts_with("23") {
        return Self::ConstraintViolation(db.message().to_string());
      }
      return Self::ExecutionError(db.message().to_string());
    }

    return Self::ExecutionError(err.to_string());
  }
}

impl From<deadpool_postgres::PoolError> for ApiError {
  fn from(err: deadpool_postgres::PoolError) -> Self {
    return Self::ExecutionError(err.to_string());
  }
}

pub(crate) fn json_response(status: StatusCode, value: &serde_json::Value) -> Response {
  let body = serde_json::to_vec(value).unwrap_or_default();

  return Response::builder()
    .status(status)
    .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
    .body(Body::from(body))
    .unwrap_or_default();
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      error!("request failed: {self}");
    }

    return json_response(status, &serde_json::json!({"error": self.to_string()}));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_status_mapping() {
    assert_eq!(
      ApiError::InvalidIdentifier("x".to_string()).status(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::UnknownOperator("$x".to_string()).status(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(ApiError::MalformedJoin.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ApiError::BadPagination.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ApiError::EmptyProjection.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ApiError::PermissionDenied.status(), StatusCode::FORBIDDEN);
    assert_eq!(
      ApiError::ConstraintViolation("dup".to_string()).status(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::MalformedStatement.status(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
      ApiError::ExecutionError("boom".to_string()).status(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_translate_error_conversion() {
    let err: ApiError = TranslateError::InvalidIdentifier("a;b".to_string()).into();
    assert!(matches!(err, ApiError::InvalidIdentifier(t) if t == "a;b"));

    let err: ApiError = TranslateError::BadPagination.into();
    assert!(matches!(err, ApiError::BadPagination));
  }
}
