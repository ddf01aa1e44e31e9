//! Curriculum catalog endpoint.

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::db::{self, LogOnError};
use crate::state::AppState;

/// GET /api/catalog
///
/// The full subject -> semester -> unit -> lesson tree with per-lesson
/// question counts, for building the exam configuration screen.
pub async fn get_catalog(State(state): State<AppState>) -> impl IntoResponse {
  let conn = match db::try_lock(&state.pool) {
    Ok(conn) => conn,
    Err(e) => {
      return (
        axum::http::StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": e.to_string() })),
      )
        .into_response();
    }
  };

  let subjects = db::get_catalog_tree(&conn).log_warn_default("failed to load catalog");
  Json(json!({ "subjects": subjects })).into_response()
}
