//! Question pool selection for a new exam session.
//!
//! The sampler prefers questions matching the requested difficulty and
//! tops the pool up with other difficulties only when there are not
//! enough matches. It never fabricates questions: a short exam is valid
//! and every downstream component works off the sampled length.

use rand::Rng;
use rand::seq::SliceRandom;

use super::{ExamConfig, ExamError};
use crate::domain::Question;

/// Sample the ordered question list for a session.
///
/// Matching-difficulty questions are always kept ahead of the rest, so a
/// request that can be satisfied from matches alone never leaks other
/// difficulties, and a shortfall still includes every match.
pub fn sample_questions(
  catalog: &[Question],
  config: &ExamConfig,
  rng: &mut impl Rng,
) -> Result<Vec<Question>, ExamError> {
  let pool: Vec<&Question> = catalog
    .iter()
    .filter(|q| config.lesson_ids.contains(&q.lesson_id))
    .collect();

  if pool.is_empty() {
    return Err(ExamError::EmptyQuestionPool);
  }

  let (mut matching, mut others): (Vec<&Question>, Vec<&Question>) =
    pool.into_iter().partition(|q| q.difficulty == config.difficulty);

  matching.shuffle(rng);

  let mut selected = matching;
  if selected.len() < config.question_count {
    others.shuffle(rng);
    selected.extend(others);
  }
  selected.truncate(config.question_count);

  Ok(selected.into_iter().cloned().collect())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Difficulty;
  use rand::SeedableRng;
  use rand::rngs::StdRng;

  fn question(id: i64, lesson_id: i64, difficulty: Difficulty) -> Question {
    Question {
      id,
      lesson_id,
      text: format!("q{}", id),
      options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
      correct_answer: 0,
      difficulty,
    }
  }

  fn config(lesson_ids: Vec<i64>, count: usize, difficulty: Difficulty) -> ExamConfig {
    ExamConfig {
      lesson_ids,
      lesson_names: vec![],
      subject_name: String::new(),
      unit_name: String::new(),
      question_count: count,
      duration_minutes: 10,
      difficulty,
      is_challenge: false,
      room_id: None,
    }
  }

  #[test]
  fn test_sample_all_matching_difficulty() {
    let catalog: Vec<Question> = (0..10)
      .map(|i| question(i, 1, Difficulty::Hard))
      .chain((10..20).map(|i| question(i, 1, Difficulty::Easy)))
      .collect();
    let cfg = config(vec![1], 5, Difficulty::Hard);
    let mut rng = StdRng::seed_from_u64(7);

    let sampled = sample_questions(&catalog, &cfg, &mut rng).unwrap();

    assert_eq!(sampled.len(), 5);
    assert!(sampled.iter().all(|q| q.difficulty == Difficulty::Hard));

    let mut ids: Vec<i64> = sampled.iter().map(|q| q.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5, "sampled questions must be distinct");
  }

  #[test]
  fn test_sample_shortfall_includes_all_matching() {
    // Only 2 hard questions but 8 others; a 5-question exam must keep
    // both hard ones and fill from the rest
    let catalog: Vec<Question> = (0..2)
      .map(|i| question(i, 1, Difficulty::Hard))
      .chain((2..10).map(|i| question(i, 1, Difficulty::Medium)))
      .collect();
    let cfg = config(vec![1], 5, Difficulty::Hard);
    let mut rng = StdRng::seed_from_u64(3);

    let sampled = sample_questions(&catalog, &cfg, &mut rng).unwrap();

    assert_eq!(sampled.len(), 5);
    assert!(sampled.iter().any(|q| q.id == 0));
    assert!(sampled.iter().any(|q| q.id == 1));
  }

  #[test]
  fn test_sample_filters_by_lesson() {
    let catalog = vec![
      question(1, 1, Difficulty::Medium),
      question(2, 2, Difficulty::Medium),
      question(3, 3, Difficulty::Medium),
    ];
    let cfg = config(vec![1, 3], 10, Difficulty::Medium);
    let mut rng = StdRng::seed_from_u64(1);

    let sampled = sample_questions(&catalog, &cfg, &mut rng).unwrap();

    assert_eq!(sampled.len(), 2);
    assert!(sampled.iter().all(|q| q.lesson_id == 1 || q.lesson_id == 3));
  }

  #[test]
  fn test_sample_short_exam_when_pool_small() {
    let catalog = vec![question(1, 1, Difficulty::Medium)];
    let cfg = config(vec![1], 20, Difficulty::Medium);
    let mut rng = StdRng::seed_from_u64(1);

    let sampled = sample_questions(&catalog, &cfg, &mut rng).unwrap();
    assert_eq!(sampled.len(), 1);
  }

  #[test]
  fn test_sample_empty_pool() {
    let catalog = vec![question(1, 1, Difficulty::Medium)];
    let cfg = config(vec![99], 5, Difficulty::Medium);
    let mut rng = StdRng::seed_from_u64(1);

    assert_eq!(
      sample_questions(&catalog, &cfg, &mut rng).unwrap_err(),
      ExamError::EmptyQuestionPool
    );
  }

  #[test]
  fn test_sample_empty_catalog() {
    let cfg = config(vec![1], 5, Difficulty::Medium);
    let mut rng = StdRng::seed_from_u64(1);

    assert_eq!(
      sample_questions(&[], &cfg, &mut rng).unwrap_err(),
      ExamError::EmptyQuestionPool
    );
  }
}
