//! The exam session core: question sampling, countdown timer, 50:50
//! hints, answer tracking and the scoring/reward engine.

pub mod hints;
pub mod rewards;
pub mod sampler;
pub mod scoring;
pub mod session;
pub mod timer;

pub use sampler::sample_questions;
pub use scoring::{ExamOutcome, score_exam};
pub use session::{ExamSession, Phase};
pub use timer::{ExamTimer, TimerTick, adjusted_duration_seconds};

use crate::domain::Difficulty;

/// Everything fixed before a session starts. Immutable thereafter.
#[derive(Debug, Clone)]
pub struct ExamConfig {
  pub lesson_ids: Vec<i64>,
  pub lesson_names: Vec<String>,
  pub subject_name: String,
  pub unit_name: String,
  pub question_count: usize,
  pub duration_minutes: u32,
  pub difficulty: Difficulty,
  /// Challenge exams add a flat XP bonus
  pub is_challenge: bool,
  /// Group-study room to leave when the exam ends
  pub room_id: Option<String>,
}

/// Errors surfaced by the exam core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamError {
  /// No eligible questions for the configured lessons; terminal for the
  /// session, surfaced as an empty-exam state
  EmptyQuestionPool,
  /// Hint requested with zero balance; the session continues unaffected
  InsufficientHints,
  /// Question has too few options for a 50:50 hint
  TooFewOptions,
  /// Question id is not part of this session
  UnknownQuestion,
  /// Option index out of range for the question
  InvalidOption,
  /// Operation only valid while the session is running
  NotRunning,
}

impl std::fmt::Display for ExamError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::EmptyQuestionPool => write!(f, "No questions available for the selected lessons"),
      Self::InsufficientHints => write!(f, "Hint balance is empty"),
      Self::TooFewOptions => write!(f, "Question has too few options for a hint"),
      Self::UnknownQuestion => write!(f, "Question is not part of this exam"),
      Self::InvalidOption => write!(f, "Option index out of range"),
      Self::NotRunning => write!(f, "Exam session is not running"),
    }
  }
}

impl std::error::Error for ExamError {}
