//! 50:50 hint mechanic: permanently hide two incorrect options on the
//! current question, in exchange for one hint from the user's balance.

use rand::Rng;
use rand::seq::SliceRandom;

use super::ExamError;
use crate::config;
use crate::domain::Question;

/// Whether a question can receive a 50:50 hint. Questions with fewer
/// than 4 options are rejected: hiding two of three would leave the
/// correct answer standing alone.
pub fn is_hint_eligible(question: &Question) -> bool {
  question.options.len() >= config::MIN_OPTIONS_FOR_HINT
}

/// Choose the two incorrect option indices to hide, uniformly at random.
/// The correct option is never a candidate. Returned pair is sorted for
/// stable presentation.
pub fn pick_hidden_options(
  question: &Question,
  rng: &mut impl Rng,
) -> Result<[usize; 2], ExamError> {
  if !is_hint_eligible(question) {
    return Err(ExamError::TooFewOptions);
  }

  let mut wrong = question.incorrect_indices();
  wrong.shuffle(rng);
  wrong.truncate(config::HIDDEN_OPTIONS_PER_HINT);
  wrong.sort();

  Ok([wrong[0], wrong[1]])
}
