use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::Response;

use pgrest_qs::{Query, select_clause};

use crate::app_state::AppState;
use crate::catalog::{DATABASES_FIELD, databases_statement};
use crate::error::{ApiError, json_response};
use crate::exec;
use crate::handlers::default_projection;

/// `GET /databases`: the "list databases" template specialized by the same
/// translator path as table reads.
pub(crate) async fn list_databases_handler(
  State(state): State<AppState>,
  RawQuery(raw_query): RawQuery,
) -> Result<Response, ApiError> {
  let query = Query::parse(raw_query.as_deref().unwrap_or(""));
  let fragments = query.fragments(1)?;

  let head = if fragments.count.is_empty() {
    let fields = default_projection(fragments.select_fields.clone(), &[DATABASES_FIELD]);
    select_clause(&fields)?
  } else {
    fragments.count.clone()
  };

  let sql = databases_statement(
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
