use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;

use crate::app_state::AppState;
use crate::error::{ApiError, json_response};
use crate::exec;

/// `GET /_health`: one pool round-trip.
pub(crate) async fn health_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
  exec::query_json(state.pool(), "SELECT 1", &[]).await?;

  return Ok(json_response(
    StatusCode::OK,
    &serde_json::json!({"status": "ok"}),
  ));
}
