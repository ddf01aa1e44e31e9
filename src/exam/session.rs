//! The exam session state machine.
//!
//! Lifecycle: `Configuring -> Running -> Finished`. Configuring is
//! instantaneous (sampling and timer start happen in [`ExamSession::start`]);
//! `Finished` is terminal. Submission executes at most once: a stale
//! timer tick or a repeated submit call after the transition is a no-op.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::HashMap;

use super::timer::{ExamTimer, TimerTick, adjusted_duration_seconds};
use super::{ExamConfig, ExamError, ExamOutcome, sample_questions, score_exam};
use crate::domain::Question;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Configuring,
  Running,
  Finished,
}

impl Phase {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Configuring => "configuring",
      Self::Running => "running",
      Self::Finished => "finished",
    }
  }
}

/// Mutable state of one exam attempt, owned by the in-memory store.
#[derive(Debug, Clone)]
pub struct ExamSession {
  pub user_id: i64,
  pub config: ExamConfig,
  /// Fixed once sampled; may be shorter than the requested count
  questions: Vec<Question>,
  /// question id -> chosen option index; overwritten on change of mind
  answers: HashMap<i64, usize>,
  /// question id -> hidden option pair; never cleared once set
  hidden_options: HashMap<i64, [usize; 2]>,
  current_index: usize,
  timer: ExamTimer,
  phase: Phase,
  outcome: Option<ExamOutcome>,
}

impl ExamSession {
  /// Sample the pool and enter the running phase with the timer started.
  pub fn start(
    user_id: i64,
    config: ExamConfig,
    catalog: &[Question],
    rng: &mut impl Rng,
  ) -> Result<Self, ExamError> {
    let questions = sample_questions(catalog, &config, rng)?;
    let total = adjusted_duration_seconds(config.duration_minutes, config.difficulty);

    Ok(Self {
      user_id,
      questions,
      answers: HashMap::new(),
      hidden_options: HashMap::new(),
      current_index: 0,
      timer: ExamTimer::new(total),
      phase: Phase::Running,
      outcome: None,
      config,
    })
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn is_running(&self) -> bool {
    self.phase == Phase::Running
  }

  pub fn questions(&self) -> &[Question] {
    &self.questions
  }

  pub fn current_index(&self) -> usize {
    self.current_index
  }

  pub fn current_question(&self) -> &Question {
    &self.questions[self.current_index]
  }

  pub fn time_remaining_seconds(&self) -> u32 {
    self.timer.remaining()
  }

  pub fn answer_for(&self, question_id: i64) -> Option<usize> {
    self.answers.get(&question_id).copied()
  }

  pub fn answered_count(&self) -> usize {
    self.answers.len()
  }

  pub fn hidden_for(&self, question_id: i64) -> Option<[usize; 2]> {
    self.hidden_options.get(&question_id).copied()
  }

  /// The stored result, present once the session is finished
  pub fn outcome(&self) -> Option<&ExamOutcome> {
    self.outcome.as_ref()
  }

  /// Record (or overwrite) the chosen option for a sampled question.
  /// Hidden options are deliberately not checked here; scoring only ever
  /// compares against the correct index.
  pub fn set_answer(&mut self, question_id: i64, option_index: usize) -> Result<(), ExamError> {
    if !self.is_running() {
      return Err(ExamError::NotRunning);
    }
    let question = self
      .questions
      .iter()
      .find(|q| q.id == question_id)
      .ok_or(ExamError::UnknownQuestion)?;
    if option_index >= question.options.len() {
      return Err(ExamError::InvalidOption);
    }
    self.answers.insert(question_id, option_index);
    Ok(())
  }

  /// Move to the next question; no-op on the last one
  pub fn next(&mut self) {
    if self.current_index + 1 < self.questions.len() {
      self.current_index += 1;
    }
  }

  /// Move to the previous question; no-op on the first one
  pub fn previous(&mut self) {
    self.current_index = self.current_index.saturating_sub(1);
  }

  pub fn on_last_question(&self) -> bool {
    self.current_index + 1 == self.questions.len()
  }

  /// Store the hidden pair chosen for a question. Once set it is
  /// permanent; a second hint on the same question must be a no-op
  /// upstream (checked via [`Self::hidden_for`] before charging).
  pub fn record_hint(&mut self, question_id: i64, hidden: [usize; 2]) {
    self.hidden_options.entry(question_id).or_insert(hidden);
  }

  /// Advance the countdown by one second. Returns the outcome of a
  /// forced submission when the timer just expired, `None` otherwise.
  pub fn tick(&mut self, now: DateTime<Utc>) -> Option<ExamOutcome> {
    if !self.is_running() {
      return None;
    }
    match self.timer.tick() {
      TimerTick::Expired => self.submit(now),
      TimerTick::Running(_) | TimerTick::Stopped => None,
    }
  }

  /// Transition `Running -> Finished` and produce the outcome, exactly
  /// once. Subsequent calls (duplicate submit, stale tick) return `None`.
  pub fn submit(&mut self, now: DateTime<Utc>) -> Option<ExamOutcome> {
    if !self.is_running() {
      return None;
    }
    self.timer.stop();
    let outcome = score_exam(self.user_id, &self.questions, &self.answers, &self.config, now);
    self.phase = Phase::Finished;
    self.outcome = Some(outcome.clone());
    Some(outcome)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Difficulty;
  use rand::SeedableRng;
  use rand::rngs::StdRng;

  fn catalog(n: i64) -> Vec<Question> {
    (1..=n)
      .map(|i| Question {
        id: i,
        lesson_id: 1,
        text: format!("q{}", i),
        options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        correct_answer: 0,
        difficulty: Difficulty::Medium,
      })
      .collect()
  }

  fn config(count: usize, minutes: u32) -> ExamConfig {
    ExamConfig {
      lesson_ids: vec![1],
      lesson_names: vec!["درس".to_string()],
      subject_name: "الفيزياء".to_string(),
      unit_name: "الوحدة".to_string(),
      question_count: count,
      duration_minutes: minutes,
      difficulty: Difficulty::Medium,
      is_challenge: false,
      room_id: None,
    }
  }

  fn session(count: usize, minutes: u32) -> ExamSession {
    let mut rng = StdRng::seed_from_u64(9);
    ExamSession::start(1, config(count, minutes), &catalog(10), &mut rng).unwrap()
  }

  #[test]
  fn test_start_samples_and_runs() {
    let s = session(5, 10);
    assert_eq!(s.phase(), Phase::Running);
    assert_eq!(s.questions().len(), 5);
    assert_eq!(s.current_index(), 0);
    assert_eq!(s.time_remaining_seconds(), 600);
  }

  #[test]
  fn test_start_empty_pool() {
    let mut rng = StdRng::seed_from_u64(9);
    let cfg = ExamConfig {
      lesson_ids: vec![42],
      ..config(5, 10)
    };
    let err = ExamSession::start(1, cfg, &catalog(10), &mut rng).unwrap_err();
    assert_eq!(err, ExamError::EmptyQuestionPool);
  }

  #[test]
  fn test_set_answer_overwrites() {
    let mut s = session(3, 10);
    let qid = s.questions()[0].id;
    s.set_answer(qid, 1).unwrap();
    s.set_answer(qid, 3).unwrap();
    assert_eq!(s.answer_for(qid), Some(3));
    assert_eq!(s.answered_count(), 1);
  }

  #[test]
  fn test_set_answer_unknown_question() {
    let mut s = session(3, 10);
    assert_eq!(s.set_answer(999, 0).unwrap_err(), ExamError::UnknownQuestion);
  }

  #[test]
  fn test_set_answer_invalid_option() {
    let mut s = session(3, 10);
    let qid = s.questions()[0].id;
    assert_eq!(s.set_answer(qid, 4).unwrap_err(), ExamError::InvalidOption);
  }

  #[test]
  fn test_navigation_bounds() {
    let mut s = session(3, 10);
    s.previous();
    assert_eq!(s.current_index(), 0);

    s.next();
    s.next();
    assert_eq!(s.current_index(), 2);
    assert!(s.on_last_question());

    s.next();
    assert_eq!(s.current_index(), 2, "next is a no-op on the last question");
  }

  #[test]
  fn test_record_hint_is_permanent() {
    let mut s = session(3, 10);
    let qid = s.questions()[0].id;
    s.record_hint(qid, [1, 2]);
    s.record_hint(qid, [2, 3]);
    assert_eq!(s.hidden_for(qid), Some([1, 2]));
  }

  #[test]
  fn test_submit_idempotent() {
    let mut s = session(3, 10);
    let qid = s.questions()[0].id;
    s.set_answer(qid, 0).unwrap();

    let first = s.submit(Utc::now());
    assert!(first.is_some());
    assert_eq!(s.phase(), Phase::Finished);

    let second = s.submit(Utc::now());
    assert!(second.is_none(), "duplicate submit is a silent no-op");
    assert!(s.outcome().is_some());
  }

  #[test]
  fn test_timer_expiry_forces_single_submission() {
    let mut s = session(2, 1); // 60 seconds
    let mut submissions = 0;
    for _ in 0..120 {
      if s.tick(Utc::now()).is_some() {
        submissions += 1;
      }
    }
    assert_eq!(submissions, 1);
    assert_eq!(s.phase(), Phase::Finished);
    assert_eq!(s.time_remaining_seconds(), 0);
  }

  #[test]
  fn test_tick_ignored_after_finish() {
    let mut s = session(2, 10);
    s.submit(Utc::now());
    assert!(s.tick(Utc::now()).is_none());
    assert_eq!(s.time_remaining_seconds(), 600, "timer stops at finish");
  }

  #[test]
  fn test_mutations_rejected_after_finish() {
    let mut s = session(2, 10);
    let qid = s.questions()[0].id;
    s.submit(Utc::now());
    assert_eq!(s.set_answer(qid, 0).unwrap_err(), ExamError::NotRunning);
  }

  #[test]
  fn test_short_exam_scored_on_sampled_length() {
    // Pool of 10, request 20: the exam runs with 10 and percentage uses 10
    let mut s = session(20, 10);
    assert_eq!(s.questions().len(), 10);
    for q in s.questions().to_vec() {
      s.set_answer(q.id, q.correct_answer).unwrap();
    }
    let outcome = s.submit(Utc::now()).unwrap();
    assert_eq!(outcome.total_points, 10);
    assert!((outcome.percentage - 100.0).abs() < f64::EPSILON);
  }
}
