use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::Response;

use pgrest_qs::{Query, select_clause};

use crate::app_state::AppState;
use crate::catalog::{TABLES_FIELDS, schema_tables_statement, tables_statement};
use crate::error::{ApiError, json_response};
use crate::exec;
use crate::handlers::{check_database, default_projection};
use crate::sql::vet_identifier;

/// `GET /tables`: every user table and view, with free-form WHERE on the
/// projected catalog columns.
pub(crate) async fn list_tables_handler(
  State(state): State<AppState>,
  RawQuery(raw_query): RawQuery,
) -> Result<Response, ApiError> {
  let query = Query::parse(raw_query.as_deref().unwrap_or(""));
  let fragments = query.fragments(1)?;

  let head = if fragments.count.is_empty() {
    let fields = default_projection(fragments.select_fields.clone(), TABLES_FIELDS);
    select_clause(&fields)?
  } else {
    fragments.count.clone()
  };

  let sql = tables_statement(
    &head,
    &fragments.where_clause,
    &fragments.order,
    &fragments.pagination,
  );

  let rows = exec::query_json(
    state.pool(),
    &sql,
    &exec::qs_values_to_json(fragments.params),
  )
  .await?;

  return Ok(json_response(
    StatusCode::OK,
    &serde_json::Value::Array(rows),
  ));
}

/// `GET /{database}/{schema}`: tables of one schema. The schema binds as
/// `$1`, so client filters start numbering at 2.
pub(crate) async fn list_schema_tables_handler(
  State(state): State<AppState>,
  Path((database, schema)): Path<(String, String)>,
  RawQuery(raw_query): RawQuery,
) -> Result<Response, ApiError> {
  check_database(&state, &database)?;
  vet_identifier(&schema)?;

  let query = Query::parse(raw_query.as_deref().unwrap_or(""));
  let fragments = query.fragments(2)?;

  let head = if fragments.count.is_empty() {
    let fields = default_projection(fragments.select_fields.clone(), TABLES_FIELDS);
    select_clause(&fields)?
  } else {
    fragments.count.clone()
  };

  let sql = schema_tables_statement(
    &head,
    &fragments.where_clause,
    &fragments.order,
    &fragments.pagination,
  );

  let mut params = vec![serde_json::Value::String(schema)];
  params.extend(exec::qs_values_to_json(fragments.params));

  let rows = exec::query_json(state.pool(), &sql, &params).await?;

  return Ok(json_response(
    StatusCode::OK,
    &serde_json::Value::Array(rows),
  ));
}
