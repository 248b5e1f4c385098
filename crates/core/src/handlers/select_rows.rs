use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::Response;

use pgrest_qs::{Query, select_clause};

use crate::access::Permission;
use crate::app_state::AppState;
use crate::error::{ApiError, json_response};
use crate::exec;
use crate::handlers::check_database;
use crate::sql::{build_select, vet_identifier};

/// `GET /{database}/{schema}/{table}`.
pub(crate) async fn select_rows_handler(
  State(state): State<AppState>,
  Path((database, schema, table)): Path<(String, String, String)>,
  RawQuery(raw_query): RawQuery,
) -> Result<Response, ApiError> {
  return select_impl(state, database, schema, table, raw_query).await;
}

/// `GET /_VIEW/{database}/{schema}/{view}`. A view is selectable like a
/// table; only the route differs.
pub(crate) async fn select_view_handler(
  State(state): State<AppState>,
  Path((database, schema, view)): Path<(String, String, String)>,
  RawQuery(raw_query): RawQuery,
) -> Result<Response, ApiError> {
  return select_impl(state, database, schema, view, raw_query).await;
}

async fn select_impl(
  state: AppState,
  database: String,
  schema: String,
  relation: String,
  raw_query: Option<String>,
) -> Result<Response, ApiError> {
  check_database(&state, &database)?;
  vet_identifier(&schema)?;
  vet_identifier(&relation)?;
  state.access().check(&relation, Permission::Read)?;

  let query = Query::parse(raw_query.as_deref().unwrap_or(""));
  let fragments = query.fragments(1)?;

  let head = if fragments.count.is_empty() {
    let allowed = state
      .access()
      .filter_columns(&relation, &fragments.select_fields);
    select_clause(&allowed)?
  } else {
    fragments.count.clone()
  };

  let sql = build_select(
    &head,
    &format!("{schema}.{relation}"),
    &fragments.joins,
    &fragments.where_clause,
    &fragments.group_by,
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
