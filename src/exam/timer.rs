//! Countdown clock for a running exam session.

use crate::config;
use crate::domain::Difficulty;

/// Total seconds for an exam, adjusted by difficulty: easy exams get 20%
/// more time, hard exams 20% less, both floored.
///
/// Arithmetic stays in f64 so an out-of-range request can never overflow;
/// the cast back saturates at `u32::MAX`.
pub fn adjusted_duration_seconds(base_minutes: u32, difficulty: Difficulty) -> u32 {
  let base = base_minutes as f64 * 60.0;
  match difficulty {
    Difficulty::Easy => (base * config::EASY_TIME_MULTIPLIER).floor() as u32,
    Difficulty::Hard => (base * config::HARD_TIME_MULTIPLIER).floor() as u32,
    Difficulty::Medium => base as u32,
  }
}

/// Outcome of a one-second tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
  /// Still counting; seconds remaining
  Running(u32),
  /// Just hit zero; the caller must force a submission
  Expired,
  /// Already expired; ticks are ignored
  Stopped,
}

/// One-second countdown. Remaining time never goes negative and the
/// `Expired` edge fires exactly once.
#[derive(Debug, Clone)]
pub struct ExamTimer {
  remaining: u32,
  expired: bool,
}

impl ExamTimer {
  pub fn new(total_seconds: u32) -> Self {
    Self {
      remaining: total_seconds,
      expired: false,
    }
  }

  pub fn remaining(&self) -> u32 {
    self.remaining
  }

  pub fn tick(&mut self) -> TimerTick {
    if self.expired {
      return TimerTick::Stopped;
    }
    self.remaining = self.remaining.saturating_sub(1);
    if self.remaining == 0 {
      self.expired = true;
      TimerTick::Expired
    } else {
      TimerTick::Running(self.remaining)
    }
  }

  /// Stop counting without firing the expiry edge (manual submit)
  pub fn stop(&mut self) {
    self.expired = true;
  }
}
