use base64::prelude::*;
use deadpool_postgres::Pool;
use log::*;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::str::FromStr;
use tokio_postgres::types::{IsNull, Json, Kind, ToSql, Type};
use tokio_postgres::{CancelToken, NoTls};

use pgrest_qs::statement_is_clean;

use crate::error::ApiError;
use crate::row::rows_to_json;

/// Bridges query-string values into the JSON value space the executor binds
/// from; the body of a write request is already JSON.
pub(crate) fn qs_value_to_json(value: pgrest_qs::Value) -> JsonValue {
  return match value {
    pgrest_qs::Value::Text(s) => JsonValue::String(s),
    pgrest_qs::Value::Integer(i) => JsonValue::from(i),
    pgrest_qs::Value::Double(d) => JsonValue::from(d),
    pgrest_qs::Value::Bool(b) => JsonValue::Bool(b),
  };
}

pub(crate) fn qs_values_to_json(values: Vec<pgrest_qs::Value>) -> Vec<JsonValue> {
  return values.into_iter().map(qs_value_to_json).collect();
}

/// A NULL that binds against any parameter type.
#[derive(Debug)]
struct AnyNull;

impl ToSql for AnyNull {
  fn to_sql(
    &self,
    _ty: &Type,
    _out: &mut bytes::BytesMut,
  ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
    return Ok(IsNull::Yes);
  }

  fn accepts(_ty: &Type) -> bool {
    return true;
  }

  tokio_postgres::types::to_sql_checked!();
}

/// One coerced positional parameter. The variant is chosen from the
/// statement's inferred parameter type, not from the client value, so a
/// text `"42"` binds cleanly against an integer column and vice versa.
#[derive(Debug)]
enum BoundParam {
  Null(AnyNull),
  Bool(bool),
  Int16(i16),
  Int32(i32),
  Int64(i64),
  Float32(f32),
  Float64(f64),
  Numeric(Decimal),
  Text(String),
  Bytes(Vec<u8>),
  Uuid(uuid::Uuid),
  Date(chrono::NaiveDate),
  Time(chrono::NaiveTime),
  Timestamp(chrono::NaiveDateTime),
  TimestampTz(chrono::DateTime<chrono::Utc>),
  Json(Json<JsonValue>),
}

fn base_type(ty: &Type) -> &Type {
  return match ty.kind() {
    Kind::Domain(inner) => base_type(inner),
    _ => ty,
  };
}

fn coercion_error(pos: usize, ty: &Type) -> ApiError {
  return ApiError::ConstraintViolation(format!(
    "parameter ${pos} cannot be encoded as {}",
    ty.name()
  ));
}

fn coerce_one(value: &JsonValue, ty: &Type, pos: usize) -> Result<BoundParam, ApiError> {
  let ty = base_type(ty);
  let fail = || coercion_error(pos, ty);

  if value.is_null() {
    return Ok(BoundParam::Null(AnyNull));
  }

  return Ok(match *ty {
    Type::BOOL => BoundParam::Bool(parse_bool(value).ok_or_else(&fail)?),
    Type::INT2 => BoundParam::Int16(
      parse_i64(value)
        .and_then(|i| i16::try_from(i).ok())
        .ok_or_else(&fail)?,
    ),
    Type::INT4 => BoundParam::Int32(
      parse_i64(value)
        .and_then(|i| i32::try_from(i).ok())
        .ok_or_else(&fail)?,
    ),
    Type::INT8 => BoundParam::Int64(parse_i64(value).ok_or_else(&fail)?),
    Type::FLOAT4 => BoundParam::Float32(parse_f64(value).ok_or_else(&fail)? as f32),
    Type::FLOAT8 => BoundParam::Float64(parse_f64(value).ok_or_else(&fail)?),
    Type::NUMERIC => BoundParam::Numeric(parse_decimal(value).ok_or_else(&fail)?),
    Type::JSON | Type::JSONB => BoundParam::Json(Json(value.clone())),
    Type::BYTEA => {
      let encoded = value.as_str().ok_or_else(&fail)?;
      BoundParam::Bytes(BASE64_STANDARD.decode(encoded).map_err(|_| fail())?)
    }
    Type::UUID => BoundParam::Uuid(
      value
        .as_str()
        .and_then(|s| uuid::Uuid::parse_str(s).ok())
        .ok_or_else(&fail)?,
    ),
    Type::DATE => BoundParam::Date(
      value
        .as_str()
        .and_then(|s| chrono::NaiveDate::from_str(s).ok())
        .ok_or_else(&fail)?,
    ),
    Type::TIME => BoundParam::Time(
      value
        .as_str()
        .and_then(|s| chrono::NaiveTime::from_str(s).ok())
        .ok_or_else(&fail)?,
    ),
    Type::TIMESTAMP => {
      BoundParam::Timestamp(value.as_str().and_then(parse_timestamp).ok_or_else(&fail)?)
    }
    Type::TIMESTAMPTZ => BoundParam::TimestampTz(
      value
        .as_str()
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .ok_or_else(&fail)?,
    ),
    // TEXT, VARCHAR, NAME and anything else textual.
    _ => BoundParam::Text(parse_text(value)),
  });
}

fn parse_bool(value: &JsonValue) -> Option<bool> {
  return match value {
    JsonValue::Bool(b) => Some(*b),
    JsonValue::String(s) => s.parse::<bool>().ok(),
    _ => None,
  };
}

fn parse_i64(value: &JsonValue) -> Option<i64> {
  return match value {
    JsonValue::Number(n) => n.as_i64(),
    JsonValue::String(s) => s.parse::<i64>().ok(),
    _ => None,
  };
}

fn parse_f64(value: &JsonValue) -> Option<f64> {
  return match value {
    JsonValue::Number(n) => n.as_f64(),
    JsonValue::String(s) => s.parse::<f64>().ok(),
    _ => None,
  };
}

fn parse_decimal(value: &JsonValue) -> Option<Decimal> {
  return match value {
    JsonValue::Number(n) => Decimal::from_str(&n.to_string()).ok(),
    JsonValue::String(s) => Decimal::from_str(s).ok(),
    _ => None,
  };
}

fn parse_timestamp(s: &str) -> Option<chrono::NaiveDateTime> {
  if let Ok(ts) = chrono::NaiveDateTime::from_str(s) {
    return Some(ts);
  }
  return chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").ok();
}

fn parse_text(value: &JsonValue) -> String {
  return match value {
    JsonValue::String(s) => s.clone(),
    other => other.to_string(),
  };
}

fn coerce(values: &[JsonValue], expected: &[Type]) -> Result<Vec<BoundParam>, ApiError> {
  return values
    .iter()
    .enumerate()
    .map(|(idx, value)| {
      let ty = expected.get(idx).unwrap_or(&Type::TEXT);
      return coerce_one(value, ty, idx + 1);
    })
    .collect();
}

fn param_refs(params: &[BoundParam]) -> Vec<&(dyn ToSql + Sync)> {
  return params
    .iter()
    .map(|param| match param {
      BoundParam::Null(v) => v as &(dyn ToSql + Sync),
      BoundParam::Bool(v) => v as &(dyn ToSql + Sync),
      BoundParam::Int16(v) => v as &(dyn ToSql + Sync),
      BoundParam::Int32(v) => v as &(dyn ToSql + Sync),
      BoundParam::Int64(v) => v as &(dyn ToSql + Sync),
      BoundParam::Float32(v) => v as &(dyn ToSql + Sync),
      BoundParam::Float64(v) => v as &(dyn ToSql + Sync),
      BoundParam::Numeric(v) => v as &(dyn ToSql + Sync),
      BoundParam::Text(v) => v as &(dyn ToSql + Sync),
      BoundParam::Bytes(v) => v as &(dyn ToSql + Sync),
      BoundParam::Uuid(v) => v as &(dyn ToSql + Sync),
      BoundParam::Date(v) => v as &(dyn ToSql + Sync),
      BoundParam::Time(v) => v as &(dyn ToSql + Sync),
      BoundParam::Timestamp(v) => v as &(dyn ToSql + Sync),
      BoundParam::TimestampTz(v) => v as &(dyn ToSql + Sync),
      BoundParam::Json(v) => v as &(dyn ToSql + Sync),
    })
    .collect();
}

/// Fires the driver's cancellation channel if the request future is dropped
/// while a statement is still in flight. Best effort: the spawned cancel may
/// itself fail, in which case the statement runs to completion server-side.
struct CancelGuard {
  token: Option<CancelToken>,
}

impl CancelGuard {
  fn new(token: CancelToken) -> Self {
    return CancelGuard { token: Some(token) };
  }

  fn disarm(&mut self) {
    self.token = None;
  }
}

impl Drop for CancelGuard {
  fn drop(&mut self) {
    if let Some(token) = self.token.take() {
      tokio::spawn(async move {
        if let Err(err) = token.cancel_query(NoTls).await {
          debug!("query cancellation failed: {err}");
        }
      });
    }
  }
}

/// Runs one trusted, fully assembled statement and buffers all rows into
/// JSON. The surface scan is defense in depth: statements reaching this
/// point are composed from vetted identifiers and constant templates, so a
/// scan failure means an assembly bug, not a client error.
pub(crate) async fn query_json(
  pool: &Pool,
  sql: &str,
  params: &[JsonValue],
) -> Result<Vec<JsonValue>, ApiError> {
  if !statement_is_clean(sql) {
    return Err(ApiError::MalformedStatement);
  }

  debug!("executing: {sql}");

  let client = pool.get().await?;

  let statement = client.prepare(sql).await?;
  if statement.params().len() != params.len() {
    return Err(ApiError::ExecutionError(format!(
      "placeholder count mismatch: statement wants {}, got {}",
      statement.params().len(),
      params.len()
    )));
  }

  let bound = coerce(params, statement.params())?;
  let refs = param_refs(&bound);

  // Arm cancellation only around the in-flight statement: a dropped request
  // future must not leave a long-running query behind.
  let mut guard = CancelGuard::new(client.cancel_token());
  let rows = client.query(&statement, &refs).await;
  guard.disarm();

  return rows_to_json(&rows?);
}

/// Like [`query_json`] but expects exactly one returned row (INSERT ...
/// RETURNING).
pub(crate) async fn query_one_json(
  pool: &Pool,
  sql: &str,
  params: &[JsonValue],
) -> Result<JsonValue, ApiError> {
  let mut rows = query_json(pool, sql, params).await?;

  return match rows.len() {
    1 => Ok(rows.remove(0)),
    n => Err(ApiError::ExecutionError(format!(
      "expected a single returned row, got {n}"
    ))),
  };
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_qs_value_conversion() {
    assert_eq!(
      qs_value_to_json(pgrest_qs::Value::Text("prest".to_string())),
      json!("prest")
    );
    assert_eq!(qs_value_to_json(pgrest_qs::Value::Integer(42)), json!(42));
    assert_eq!(qs_value_to_json(pgrest_qs::Value::Double(0.5)), json!(0.5));
    assert_eq!(qs_value_to_json(pgrest_qs::Value::Bool(true)), json!(true));
  }

  #[test]
  fn test_coerce_by_expected_type() {
    // A text value against an integer parameter parses; the reverse renders.
    assert!(matches!(
      coerce_one(&json!("42"), &Type::INT8, 1).unwrap(),
      BoundParam::Int64(42)
    ));
    assert!(matches!(
      coerce_one(&json!(42), &Type::TEXT, 1).unwrap(),
      BoundParam::Text(s) if s == "42"
    ));
    assert!(matches!(
      coerce_one(&json!("2.5"), &Type::FLOAT8, 1).unwrap(),
      BoundParam::Float64(f) if f == 2.5
    ));
    assert!(matches!(
      coerce_one(&json!(true), &Type::BOOL, 1).unwrap(),
      BoundParam::Bool(true)
    ));
    assert!(matches!(
      coerce_one(&json!(null), &Type::INT4, 1).unwrap(),
      BoundParam::Null(_)
    ));
    assert!(matches!(
      coerce_one(&json!({"a": 1}), &Type::JSONB, 1).unwrap(),
      BoundParam::Json(_)
    ));
  }

  #[test]
  fn test_coerce_failures_are_client_errors() {
    let err = coerce_one(&json!("not a number"), &Type::INT8, 3).unwrap_err();
    assert!(matches!(err, ApiError::ConstraintViolation(_)));

    let err = coerce_one(&json!([1, 2]), &Type::BOOL, 1).unwrap_err();
    assert!(matches!(err, ApiError::ConstraintViolation(_)));
  }

  #[test]
  fn test_int_range_checks() {
    assert!(coerce_one(&json!(70000), &Type::INT2, 1).is_err());
    assert!(coerce_one(&json!(70000), &Type::INT4, 1).is_ok());
  }
}
