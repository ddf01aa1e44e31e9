use serde::{Deserialize, Serialize};

/// A student account as the identity provider exposes it.
///
/// Hint balance, coins and XP are shared mutable state owned by the
/// accounts table; the exam core only reads snapshots of them and asks
/// for increments/decrements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
  pub id: i64,
  pub username: String,
  pub xp: i64,
  pub coins: i64,
  pub streak: i64,
  pub hints_count: i64,
  /// Last day (YYYY-MM-DD) the user completed an exam; empty when never
  pub last_active: String,
}

/// Level standing derived from cumulative XP
#[derive(Debug, Clone, Serialize)]
pub struct LevelInfo {
  pub level: i64,
  /// Percentage progress toward the next level, 0-100
  pub progress: f64,
  pub rank_name: &'static str,
  pub next_level_xp: i64,
}

/// Compute level standing: level = floor(sqrt(xp / 100)) + 1, with each
/// level requiring level^2 * 100 cumulative XP.
pub fn calculate_level(xp: i64) -> LevelInfo {
  let xp = xp.max(0);
  let level = ((xp as f64 / 100.0).sqrt().floor() as i64) + 1;
  let current_level_xp = (level - 1).pow(2) * 100;
  let next_level_xp = level.pow(2) * 100;
  let span = (next_level_xp - current_level_xp) as f64;
  let progress = (xp - current_level_xp) as f64 / span * 100.0;

  let rank_name = if level >= 50 {
    "أسطورة المنصة 🔥"
  } else if level >= 20 {
    "خبير توجيهي 🎓"
  } else if level >= 10 {
    "مكافح 🛡️"
  } else if level >= 5 {
    "طالب مجتهد ✨"
  } else {
    "مبتدئ 🐣"
  };

  LevelInfo {
    level,
    progress,
    rank_name,
    next_level_xp,
  }
}
