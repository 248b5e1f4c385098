use axum::Json;
use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::Response;

use pgrest_qs::Query;

use crate::access::Permission;
use crate::app_state::AppState;
use crate::error::{ApiError, json_response};
use crate::exec;
use crate::handlers::check_database;
use crate::sql::{build_update, vet_identifier};

/// `PUT/PATCH /{database}/{schema}/{table}`. The WHERE clause is synthesized
/// first and owns the leading placeholder indices; the SET list continues
/// numbering after it.
pub(crate) async fn update_rows_handler(
  State(state): State<AppState>,
  Path((database, schema, table)): Path<(String, String, String)>,
  RawQuery(raw_query): RawQuery,
  Json(body): Json<serde_json::Map<String, serde_json::Value>>,
) -> Result<Response, ApiError> {
  check_database(&state, &database)?;
  vet_identifier(&schema)?;
  vet_identifier(&table)?;
  state.access().check(&table, Permission::Write)?;

  let query = Query::parse(raw_query.as_deref().unwrap_or(""));
  let filter = query.where_clause(1)?;

  let (sql, params) = build_update(
    &schema,
    &table,
    &filter.clause,
    exec::qs_values_to_json(filter.params),
    filter.next_index,
    &body,
  )?;

  let rows = exec::query_json(state.pool(), &sql, &params).await?;

  return Ok(json_response(
    StatusCode::OK,
    &serde_json::Value::Array(rows),
  ));
}
