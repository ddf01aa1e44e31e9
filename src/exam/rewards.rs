//! Applies a submission's outcome to durable state.
//!
//! The exam core produces an [`ExamOutcome`] and stops there; this is
//! the bridge that persists it and performs the room exit side effect.
//! Failures are logged and swallowed so a storage hiccup never wedges
//! the session store or the background ticker.

use super::ExamOutcome;
use crate::db::{self, DbPool, LogOnError};
use crate::rooms::RoomRegistry;

/// Persist the result, mistakes, XP and streak, then leave the
/// challenge room if the exam was part of one.
pub fn apply(pool: &DbPool, rooms: &RoomRegistry, outcome: &ExamOutcome) {
  match db::try_lock(pool) {
    Ok(conn) => {
      db::record_exam_outcome(&conn, outcome).log_warn("failed to record exam outcome");
    }
    Err(e) => {
      tracing::warn!("could not persist exam outcome for user {}: {}", outcome.user_id, e);
    }
  }

  if let Some(room_id) = &outcome.room_id {
    rooms.leave(room_id, outcome.user_id);
    tracing::debug!("user {} left room {} after finishing", outcome.user_id, room_id);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::accounts;
  use crate::domain::Difficulty;
  use chrono::Utc;
  use rusqlite::Connection;
  use std::sync::{Arc, Mutex};

  fn test_pool() -> DbPool {
    let conn = Connection::open_in_memory().unwrap();
    db::run_migrations(&conn).unwrap();
    Arc::new(Mutex::new(conn))
  }

  fn outcome(user_id: i64, room_id: Option<String>) -> ExamOutcome {
    ExamOutcome {
      user_id,
      subject_name: "الرياضيات".to_string(),
      unit_name: "الوحدة الأولى".to_string(),
      score: 4,
      total_points: 5,
      percentage: 80.0,
      date: Utc::now().to_rfc3339(),
      lesson_names: vec!["قواعد الاشتقاق".to_string()],
      wrong_question_ids: vec![],
      difficulty: Difficulty::Medium,
      earned_xp: 40,
      room_id,
    }
  }

  #[test]
  fn test_apply_persists_and_grants_xp() {
    let pool = test_pool();
    let rooms = RoomRegistry::new();
    let user = {
      let conn = pool.lock().unwrap();
      accounts::create_user(&conn, "lina").unwrap()
    };

    apply(&pool, &rooms, &outcome(user, None));

    let conn = pool.lock().unwrap();
    let account = accounts::get_account(&conn, user).unwrap().unwrap();
    assert_eq!(account.xp, 40);
    assert_eq!(db::get_results_for_user(&conn, user).unwrap().len(), 1);
  }

  #[test]
  fn test_apply_leaves_room() {
    let pool = test_pool();
    let rooms = RoomRegistry::new();
    let user = {
      let conn = pool.lock().unwrap();
      accounts::create_user(&conn, "lina").unwrap()
    };
    rooms.join("r1", user);

    apply(&pool, &rooms, &outcome(user, Some("r1".to_string())));

    assert!(rooms.participants("r1").is_empty());
  }
}
