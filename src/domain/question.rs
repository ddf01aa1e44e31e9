use serde::{Deserialize, Serialize};

/// Question difficulty tag. Questions without an explicit tag are medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

impl Difficulty {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "easy" => Some(Self::Easy),
      "medium" => Some(Self::Medium),
      "hard" => Some(Self::Hard),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Easy => "easy",
      Self::Medium => "medium",
      Self::Hard => "hard",
    }
  }
}

impl Default for Difficulty {
  fn default() -> Self {
    Self::Medium
  }
}

/// A multiple-choice question. Immutable while an exam session holds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
  pub id: i64,
  pub lesson_id: i64,
  pub text: String,
  /// Ordered answer options, 4 or more for hint-eligible questions
  pub options: Vec<String>,
  /// Index into `options`
  pub correct_answer: usize,
  pub difficulty: Difficulty,
}

impl Question {
  /// Indices of the options that are not the correct answer
  pub fn incorrect_indices(&self) -> Vec<usize> {
    (0..self.options.len())
      .filter(|&i| i != self.correct_answer)
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_difficulty_from_str() {
    assert_eq!(Difficulty::from_str("easy"), Some(Difficulty::Easy));
    assert_eq!(Difficulty::from_str("medium"), Some(Difficulty::Medium));
    assert_eq!(Difficulty::from_str("hard"), Some(Difficulty::Hard));
  }

  #[test]
  fn test_difficulty_from_str_invalid() {
    assert_eq!(Difficulty::from_str("EASY"), None);
    assert_eq!(Difficulty::from_str(""), None);
    assert_eq!(Difficulty::from_str("extreme"), None);
  }

  #[test]
  fn test_difficulty_default_is_medium() {
    assert_eq!(Difficulty::default(), Difficulty::Medium);
  }

  #[test]
  fn test_difficulty_as_str_roundtrip() {
    for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
      assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
    }
  }

  fn question(options: Vec<String>, correct_answer: usize) -> Question {
    Question {
      id: 1,
      lesson_id: 1,
      text: "2 + 2 = ?".to_string(),
      options,
      correct_answer,
      difficulty: Difficulty::Easy,
    }
  }

  #[test]
  fn test_incorrect_indices_excludes_correct() {
    let q = question(vec!["3".into(), "4".into(), "5".into(), "6".into()], 1);
    assert_eq!(q.incorrect_indices(), vec![0, 2, 3]);
  }

  #[test]
  fn test_incorrect_indices_three_options() {
    let q = question(vec!["a".into(), "b".into(), "c".into()], 0);
    assert_eq!(q.incorrect_indices(), vec![1, 2]);
  }
}
