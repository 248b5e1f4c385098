use axum::{
  Router,
  routing::get,
};

pub(crate) mod databases;
pub(crate) mod delete_rows;
pub(crate) mod health;
pub(crate) mod insert_row;
pub(crate) mod schemas;
pub(crate) mod select_rows;
pub(crate) mod tables;
pub(crate) mod update_rows;

use crate::AppState;
use crate::error::ApiError;

pub(crate) fn router() -> Router<AppState> {
  return Router::new()
    .route("/_health", get(health::health_handler))
    .route("/databases", get(databases::list_databases_handler))
    .route("/schemas", get(schemas::list_schemas_handler))
    .route("/tables", get(tables::list_tables_handler))
    .route(
      "/_VIEW/{database}/{schema}/{view}",
      get(select_rows::select_view_handler),
    )
    .route(
      "/{database}/{schema}",
      get(tables::list_schema_tables_handler),
    )
    .route(
      "/{database}/{schema}/{table}",
      get(select_rows::select_rows_handler)
        .post(insert_row::insert_row_handler)
        .put(update_rows::update_rows_handler)
        .patch(update_rows::update_rows_handler)
        .delete(delete_rows::delete_rows_handler),
    );
}

/// Requests address the database by name; the pool is bound to the
/// configured one, so anything else is off limits.
pub(crate) fn check_database(state: &AppState, database: &str) -> Result<(), ApiError> {
  crate::sql::vet_identifier(database)?;

  if database != state.config().database.dbname {
    return Err(ApiError::PermissionDenied);
  }

  return Ok(());
}

/// Replaces a wildcard request with the endpoint's default projection;
/// explicit column lists pass through untouched.
pub(crate) fn default_projection(requested: Vec<String>, default: &[&str]) -> Vec<String> {
  if requested.iter().any(|column| column == "*") {
    return default.iter().map(|column| column.to_string()).collect();
  }
  return requested;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_projection() {
    assert_eq!(
      default_projection(vec!["*".to_string()], &["datname"]),
      vec!["datname".to_string()]
    );
    assert_eq!(
      default_projection(vec!["datname".to_string()], &["other"]),
      vec!["datname".to_string()]
    );
  }
}
