//! In-memory store of live exam sessions.
//!
//! Sessions are keyed by a generated ID handed back to the client at
//! start. Finished sessions stay around (so a duplicate submit can
//! return the stored outcome) until they expire from inactivity.

use crate::config;
use crate::exam::{ExamOutcome, ExamSession};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// Session entry with last access time for expiration
struct SessionEntry {
  session: ExamSession,
  last_access: DateTime<Utc>,
}

#[derive(Default)]
pub struct SessionStore {
  sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Store a freshly started session and return its ID
  pub fn insert(&self, session: ExamSession) -> String {
    let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());

    // Clean up expired sessions occasionally (~10% chance)
    if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
      cleanup_expired(&mut sessions);
    }

    let session_id = generate_session_id();
    sessions.insert(
      session_id.clone(),
      SessionEntry {
        session,
        last_access: Utc::now(),
      },
    );
    session_id
  }

  /// Run a closure against a session, refreshing its access time.
  /// Returns `None` when the ID is unknown or expired.
  pub fn with_session<T>(
    &self,
    session_id: &str,
    f: impl FnOnce(&mut ExamSession) -> T,
  ) -> Option<T> {
    let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
    let entry = sessions.get_mut(session_id)?;
    entry.last_access = Utc::now();
    Some(f(&mut entry.session))
  }

  /// Advance every running timer by one second and collect the
  /// outcomes of sessions the expiry forced to submit.
  pub fn tick_all(&self) -> Vec<ExamOutcome> {
    let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
    let now = Utc::now();
    sessions
      .values_mut()
      .filter_map(|entry| entry.session.tick(now))
      .collect()
  }

  pub fn len(&self) -> usize {
    let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
    sessions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Clean up expired sessions
fn cleanup_expired(sessions: &mut HashMap<String, SessionEntry>) {
  let expiry = Utc::now() - Duration::hours(config::SESSION_EXPIRY_HOURS);
  sessions.retain(|_, entry| entry.last_access > expiry);
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Difficulty, Question};
  use crate::exam::ExamConfig;
  use rand::SeedableRng;
  use rand::rngs::StdRng;

  fn started_session(minutes: u32) -> ExamSession {
    let catalog: Vec<Question> = (1..=5)
      .map(|i| Question {
        id: i,
        lesson_id: 1,
        text: format!("q{}", i),
        options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        correct_answer: 0,
        difficulty: Difficulty::Medium,
      })
      .collect();
    let config = ExamConfig {
      lesson_ids: vec![1],
      lesson_names: vec!["درس".to_string()],
      subject_name: "الرياضيات".to_string(),
      unit_name: "الوحدة".to_string(),
      question_count: 5,
      duration_minutes: minutes,
      difficulty: Difficulty::Medium,
      is_challenge: false,
      room_id: None,
    };
    let mut rng = StdRng::seed_from_u64(3);
    ExamSession::start(1, config, &catalog, &mut rng).unwrap()
  }

  #[test]
  fn test_insert_and_access() {
    let store = SessionStore::new();
    let id = store.insert(started_session(10));
    assert_eq!(id.len(), 32);

    let count = store.with_session(&id, |s| s.questions().len());
    assert_eq!(count, Some(5));
  }

  #[test]
  fn test_unknown_session() {
    let store = SessionStore::new();
    assert!(store.with_session("missing", |_| ()).is_none());
  }

  #[test]
  fn test_session_ids_unique() {
    let store = SessionStore::new();
    let a = store.insert(started_session(10));
    let b = store.insert(started_session(10));
    assert_ne!(a, b);
    assert_eq!(store.len(), 2);
  }

  #[test]
  fn test_tick_all_collects_forced_submissions() {
    let store = SessionStore::new();
    store.insert(started_session(1)); // 60 seconds
    store.insert(started_session(10));

    let mut outcomes = Vec::new();
    for _ in 0..90 {
      outcomes.extend(store.tick_all());
    }
    assert_eq!(outcomes.len(), 1, "only the one-minute exam expired");

    // The finished session stays queryable
    assert_eq!(store.len(), 2);
  }
}
