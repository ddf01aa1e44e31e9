use serde::{Deserialize, Serialize};

/// A persisted exam outcome. Created exactly once per session and
/// immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamResult {
  pub id: i64,
  pub user_id: i64,
  pub subject_name: String,
  pub unit_name: String,
  pub score: i64,
  pub total_points: i64,
  /// Exact, unrounded; rounding is left to presentation
  pub percentage: f64,
  /// RFC 3339 submission timestamp
  pub date: String,
  pub lesson_names: Vec<String>,
  pub wrong_question_ids: Vec<i64>,
  pub difficulty: super::Difficulty,
  pub earned_xp: i64,
}

/// A question the user got wrong, kept until they mark it mastered.
/// At most one live record per (user, question) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mistake {
  pub id: i64,
  pub user_id: i64,
  pub question_id: i64,
  pub timestamp: String,
}
