//! Account and leaderboard endpoints.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::json;

use crate::db::{self, LogOnError};
use crate::domain::{UserAccount, calculate_level};
use crate::state::AppState;

fn account_json(account: &UserAccount) -> serde_json::Value {
  let level = calculate_level(account.xp);
  json!({
    "id": account.id,
    "username": account.username,
    "xp": account.xp,
    "coins": account.coins,
    "streak": account.streak,
    "hints_count": account.hints_count,
    "last_active": account.last_active,
    "level": level.level,
    "level_progress": level.progress,
    "rank_name": level.rank_name,
    "next_level_xp": level.next_level_xp,
  })
}

/// GET /api/account/{user_id}
pub async fn get_account(
  State(state): State<AppState>,
  Path(user_id): Path<i64>,
) -> impl IntoResponse {
  let conn = match db::try_lock(&state.pool) {
    Ok(conn) => conn,
    Err(e) => {
      return (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": e.to_string() })),
      )
        .into_response();
    }
  };

  match db::get_account(&conn, user_id).log_warn("failed to load account").flatten() {
    Some(account) => Json(account_json(&account)).into_response(),
    None => (
      StatusCode::NOT_FOUND,
      Json(json!({ "error": "User not found" })),
    )
      .into_response(),
  }
}

/// GET /api/leaderboard
pub async fn get_leaderboard(State(state): State<AppState>) -> impl IntoResponse {
  let conn = match db::try_lock(&state.pool) {
    Ok(conn) => conn,
    Err(e) => {
      return (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": e.to_string() })),
      )
        .into_response();
    }
  };

  let entries: Vec<serde_json::Value> = db::get_leaderboard(&conn, 10)
    .log_warn_default("failed to load leaderboard")
    .iter()
    .map(account_json)
    .collect();

  Json(json!({ "leaderboard": entries })).into_response()
}
