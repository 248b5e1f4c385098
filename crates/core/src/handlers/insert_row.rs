use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;

use crate::access::Permission;
use crate::app_state::AppState;
use crate::error::{ApiError, json_response};
use crate::exec;
use crate::handlers::check_database;
use crate::sql::{build_insert, vet_identifier};

/// `POST /{database}/{schema}/{table}` with a column→value JSON body.
/// Returns the inserted row as reported by `RETURNING *`.
pub(crate) async fn insert_row_handler(
  State(state): State<AppState>,
  Path((database, schema, table)): Path<(String, String, String)>,
  Json(body): Json<serde_json::Map<String, serde_json::Value>>,
) -> Result<Response, ApiError> {
  check_database(&state, &database)?;
  vet_identifier(&schema)?;
  vet_identifier(&table)?;
  state.access().check(&table, Permission::Write)?;

  let (sql, params) = build_insert(&schema, &table, &body)?;
  let row = exec::query_one_json(state.pool(), &sql, &params).await?;

  return Ok(json_response(StatusCode::CREATED, &row));
}
