//! Application configuration constants.
//!
//! Centralizes the values that tune exam sessions, rewards and the server
//! itself.

use serde::Deserialize;
use std::path::PathBuf;

// ==================== Database Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
  database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
  path: Option<String>,
}

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
  // Load .env file if present
  let _ = dotenvy::dotenv();

  // Priority 1: config.toml
  if let Ok(contents) = std::fs::read_to_string("config.toml") {
    if let Ok(config) = toml::from_str::<AppConfig>(&contents) {
      if let Some(db) = config.database {
        if let Some(path) = db.path {
          tracing::info!("Using database from config.toml: {}", path);
          return PathBuf::from(path);
        }
      }
    }
  }

  // Priority 2: .env DATABASE_PATH
  if let Ok(path) = std::env::var("DATABASE_PATH") {
    tracing::info!("Using database from DATABASE_PATH env: {}", path);
    return PathBuf::from(path);
  }

  // Default
  let default = PathBuf::from("data/tawjihi_quiz.db");
  tracing::info!("Using default database path: {}", default.display());
  default
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 5000;

/// Get the full server bind address
pub fn server_bind_addr() -> String {
  format!("{}:{}", SERVER_ADDR, SERVER_PORT)
}

// ==================== Exam Configuration ====================

/// Maximum questions a single exam may request
pub const MAX_QUESTION_COUNT: usize = 100;

/// Maximum base duration a single exam may request
pub const MAX_DURATION_MINUTES: u32 = 300;

/// Easy exams get 20% more time
pub const EASY_TIME_MULTIPLIER: f64 = 1.2;

/// Hard exams get 20% less time
pub const HARD_TIME_MULTIPLIER: f64 = 0.8;

// ==================== Rewards Configuration ====================

/// XP awarded per correctly answered question
pub const XP_PER_CORRECT_ANSWER: i64 = 10;

/// Flat XP bonus for completing a challenge exam
pub const CHALLENGE_BONUS_XP: i64 = 100;

// ==================== Hint Configuration ====================

/// Options removed by the 50:50 hint
pub const HIDDEN_OPTIONS_PER_HINT: usize = 2;

/// Minimum option count for a question to be hint-eligible.
/// Hiding two of three options would leave only the correct answer.
pub const MIN_OPTIONS_FOR_HINT: usize = 4;

// ==================== Account Configuration ====================

/// Coins a fresh account starts with
pub const STARTING_COINS: i64 = 50;

/// Hints a fresh account starts with
pub const STARTING_HINTS: i64 = 3;

// ==================== Session Store Configuration ====================

/// Abandoned session expiration time in hours
pub const SESSION_EXPIRY_HOURS: i64 = 6;

/// Probability threshold for session cleanup (0-255, lower = more frequent)
/// Value of 25 means ~10% chance (25/256) on each session access
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;
