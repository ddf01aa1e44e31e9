pub mod account;
pub mod catalog;
pub mod exam;
pub mod results;

use axum::{Router, routing::get, routing::post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full API router
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/api/exam/start", post(exam::start_exam))
    .route("/api/exam/{session_id}", get(exam::get_exam))
    .route("/api/exam/{session_id}/answer", post(exam::answer_question))
    .route("/api/exam/{session_id}/navigate", post(exam::navigate))
    .route("/api/exam/{session_id}/hint", post(exam::use_hint))
    .route("/api/exam/{session_id}/submit", post(exam::submit_exam))
    .route("/api/catalog", get(catalog::get_catalog))
    .route("/api/account/{user_id}", get(account::get_account))
    .route("/api/leaderboard", get(account::get_leaderboard))
    .route("/api/results/{user_id}", get(results::get_results))
    .route(
      "/api/mistakes/{id}",
      get(results::get_mistakes).delete(results::delete_mistake),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
