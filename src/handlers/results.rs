//! Result history and mistake notebook endpoints.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::json;

use crate::db::{self, LogOnError};
use crate::state::AppState;

/// GET /api/results/{user_id}
pub async fn get_results(
  State(state): State<AppState>,
  Path(user_id): Path<i64>,
) -> impl IntoResponse {
  let conn = match db::try_lock(&state.pool) {
    Ok(conn) => conn,
    Err(e) => return db_unavailable(e),
  };

  let results = db::get_results_for_user(&conn, user_id).log_warn_default("failed to load results");
  Json(json!({ "results": results })).into_response()
}

/// GET /api/mistakes/{user_id}
///
/// The mistake notebook: every question the user has ever answered
/// wrongly, enriched with the question itself so it can be re-practiced.
pub async fn get_mistakes(
  State(state): State<AppState>,
  Path(user_id): Path<i64>,
) -> impl IntoResponse {
  let conn = match db::try_lock(&state.pool) {
    Ok(conn) => conn,
    Err(e) => return db_unavailable(e),
  };

  let mistakes = db::get_mistakes_for_user(&conn, user_id).log_warn_default("failed to load mistakes");
  let entries: Vec<serde_json::Value> = mistakes
    .iter()
    .map(|m| {
      let question = db::get_question(&conn, m.question_id)
        .log_warn("failed to load mistake question")
        .flatten();
      json!({
        "id": m.id,
        "question_id": m.question_id,
        "timestamp": m.timestamp,
        "question": question,
      })
    })
    .collect();

  Json(json!({ "mistakes": entries })).into_response()
}

/// DELETE /api/mistakes/{mistake_id}
pub async fn delete_mistake(
  State(state): State<AppState>,
  Path(mistake_id): Path<i64>,
) -> impl IntoResponse {
  let conn = match db::try_lock(&state.pool) {
    Ok(conn) => conn,
    Err(e) => return db_unavailable(e),
  };

  match db::delete_mistake(&conn, mistake_id).log_warn_default("failed to delete mistake") {
    true => Json(json!({ "deleted": true })).into_response(),
    false => (
      StatusCode::NOT_FOUND,
      Json(json!({ "error": "Mistake not found" })),
    )
      .into_response(),
  }
}

fn db_unavailable(e: db::DbLockError) -> axum::response::Response {
  (
    StatusCode::SERVICE_UNAVAILABLE,
    Json(json!({ "error": e.to_string() })),
  )
    .into_response()
}
