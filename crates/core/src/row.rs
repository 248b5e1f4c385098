use base64::prelude::*;
use log::*;
use rust_decimal::Decimal;
use serde_json::json;
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, Kind, Type};

use crate::error::ApiError;

/// One decoded result cell. Implementing `FromSql` ourselves lets the
/// decoder dispatch on the column's type from the result descriptor, unwrap
/// domains, and map database NULL to JSON null without per-column plumbing.
pub(crate) struct JsonCell(pub serde_json::Value);

fn base_type(ty: &Type) -> &Type {
  return match ty.kind() {
    Kind::Domain(inner) => base_type(inner),
    _ => ty,
  };
}

impl<'a> FromSql<'a> for JsonCell {
  fn from_sql(
    ty: &Type,
    raw: &'a [u8],
  ) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
    let ty = base_type(ty);

    let value = match *ty {
      Type::BOOL => json!(bool::from_sql(ty, raw)?),
      Type::INT2 => json!(i16::from_sql(ty, raw)?),
      Type::INT4 => json!(i32::from_sql(ty, raw)?),
      Type::INT8 => json!(i64::from_sql(ty, raw)?),
      Type::OID => json!(u32::from_sql(ty, raw)?),
      Type::FLOAT4 => json!(f32::from_sql(ty, raw)?),
      Type::FLOAT8 => json!(f64::from_sql(ty, raw)?),
      // Arbitrary precision does not fit a JSON number; render as text.
      Type::NUMERIC => json!(Decimal::from_sql(ty, raw)?.to_string()),
      Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
        json!(String::from_sql(ty, raw)?)
      }
      // JSON/JSONB are forwarded structurally, never re-quoted.
      Type::JSON | Type::JSONB => serde_json::Value::from_sql(ty, raw)?,
      Type::BYTEA => json!(BASE64_STANDARD.encode(<&[u8]>::from_sql(ty, raw)?)),
      Type::UUID => json!(uuid::Uuid::from_sql(ty, raw)?.to_string()),
      Type::DATE => json!(chrono::NaiveDate::from_sql(ty, raw)?.to_string()),
      Type::TIME => json!(chrono::NaiveTime::from_sql(ty, raw)?.to_string()),
      Type::TIMESTAMP => json!(chrono::NaiveDateTime::from_sql(ty, raw)?.to_string()),
      Type::TIMESTAMPTZ => {
        json!(chrono::DateTime::<chrono::Utc>::from_sql(ty, raw)?.to_rfc3339())
      }
      _ => {
        warn!("unsupported column type {}, serializing as null", ty.name());
        serde_json::Value::Null
      }
    };

    return Ok(JsonCell(value));
  }

  fn from_sql_null(_ty: &Type) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
    return Ok(JsonCell(serde_json::Value::Null));
  }

  fn accepts(_ty: &Type) -> bool {
    return true;
  }
}

/// One JSON object per row, keyed by the descriptor's column names in
/// descriptor order.
pub(crate) fn row_to_json(row: &Row) -> Result<serde_json::Value, ApiError> {
  let mut object = serde_json::Map::with_capacity(row.len());

  for (idx, column) in row.columns().iter().enumerate() {
    let cell: JsonCell = row
      .try_get(idx)
      .map_err(|err| ApiError::ExecutionError(err.to_string()))?;
    object.insert(column.name().to_string(), cell.0);
  }

  return Ok(serde_json::Value::Object(object));
}

pub(crate) fn rows_to_json(rows: &[Row]) -> Result<Vec<serde_json::Value>, ApiError> {
  return rows.iter().map(row_to_json).collect();
}
