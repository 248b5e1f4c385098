use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::Response;

use pgrest_qs::Query;

use crate::access::Permission;
use crate::app_state::AppState;
use crate::error::{ApiError, json_response};
use crate::exec;
use crate::handlers::check_database;
use crate::sql::{build_delete, vet_identifier};

/// `DELETE /{database}/{schema}/{table}`. An unfiltered request deletes the
/// whole table; deleted rows are returned.
pub(crate) async fn delete_rows_handler(
  State(state): State<AppState>,
  Path((database, schema, table)): Path<(String, String, String)>,
  RawQuery(raw_query): RawQuery,
) -> Result<Response, ApiError> {
  check_database(&state, &database)?;
  vet_identifier(&schema)?;
  vet_identifier(&table)?;
  state.access().check(&table, Permission::Delete)?;

  let query = Query::parse(raw_query.as_deref().unwrap_or(""));
  let filter = query.where_clause(1)?;

  let sql = build_delete(&schema, &table, &filter.clause);
  let rows = exec::query_json(
    state.pool(),
    &sql,
    &exec::qs_values_to_json(filter.params),
  )
  .await?;

  return Ok(json_response(
    StatusCode::OK,
    &serde_json::Value::Array(rows),
  ));
}
