use thiserror::Error;

/// Translation failures. Every variant maps to a client error upstream; the
/// translator never produces SQL from input it could not fully vet.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TranslateError {
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
}
