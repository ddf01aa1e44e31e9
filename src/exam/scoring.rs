//! Pure scoring: correctness, percentage and XP for a finished session.
//!
//! Scoring never touches storage; it produces an [`ExamOutcome`] that the
//! reward path applies as one logical unit.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::ExamConfig;
use crate::config;
use crate::domain::{Difficulty, Question};

/// Everything the reward engine needs to persist after a submission.
#[derive(Debug, Clone)]
pub struct ExamOutcome {
  pub user_id: i64,
  pub subject_name: String,
  pub unit_name: String,
  pub score: i64,
  pub total_points: i64,
  /// Exact, unrounded; rounding is presentation-only
  pub percentage: f64,
  /// RFC 3339 submission timestamp
  pub date: String,
  pub lesson_names: Vec<String>,
  /// Question ids answered wrongly or not at all, in exam order
  pub wrong_question_ids: Vec<i64>,
  pub difficulty: Difficulty,
  pub earned_xp: i64,
  pub room_id: Option<String>,
}

/// Score a finished exam. An unanswered question counts as wrong.
///
/// `questions` is never empty: the empty-pool case is rejected before a
/// session enters the running phase.
pub fn score_exam(
  user_id: i64,
  questions: &[Question],
  answers: &HashMap<i64, usize>,
  config: &ExamConfig,
  submitted_at: DateTime<Utc>,
) -> ExamOutcome {
  let mut score: i64 = 0;
  let mut wrong_question_ids = Vec::new();

  for q in questions {
    if answers.get(&q.id) == Some(&q.correct_answer) {
      score += 1;
    } else {
      wrong_question_ids.push(q.id);
    }
  }

  let mut earned_xp = score * config::XP_PER_CORRECT_ANSWER;
  if config.is_challenge {
    earned_xp += config::CHALLENGE_BONUS_XP;
  }

  let total_points = questions.len() as i64;
  let percentage = score as f64 / total_points as f64 * 100.0;

  ExamOutcome {
    user_id,
    subject_name: config.subject_name.clone(),
    unit_name: config.unit_name.clone(),
    score,
    total_points,
    percentage,
    date: submitted_at.to_rfc3339(),
    lesson_names: config.lesson_names.clone(),
    wrong_question_ids,
    difficulty: config.difficulty,
    earned_xp,
    room_id: config.room_id.clone(),
  }
}
