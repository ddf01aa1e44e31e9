use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  // Create tables with COMPLETE schema for new databases
  // Migrations below handle upgrades for existing databases
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS users (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      username TEXT NOT NULL UNIQUE,
      xp INTEGER NOT NULL DEFAULT 0,
      coins INTEGER NOT NULL DEFAULT 50,
      streak INTEGER NOT NULL DEFAULT 0,
      hints_count INTEGER NOT NULL DEFAULT 3,
      last_active TEXT NOT NULL DEFAULT ''
    );

    CREATE TABLE IF NOT EXISTS subjects (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS semesters (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      subject_id INTEGER NOT NULL,
      name TEXT NOT NULL,
      FOREIGN KEY (subject_id) REFERENCES subjects(id)
    );

    CREATE TABLE IF NOT EXISTS units (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      semester_id INTEGER NOT NULL,
      name TEXT NOT NULL,
      FOREIGN KEY (semester_id) REFERENCES semesters(id)
    );

    CREATE TABLE IF NOT EXISTS lessons (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      unit_id INTEGER NOT NULL,
      name TEXT NOT NULL,
      FOREIGN KEY (unit_id) REFERENCES units(id)
    );

    CREATE TABLE IF NOT EXISTS questions (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      lesson_id INTEGER NOT NULL,
      text TEXT NOT NULL,
      -- JSON array of option strings
      options TEXT NOT NULL,
      correct_answer INTEGER NOT NULL,
      difficulty TEXT NOT NULL DEFAULT 'medium',
      FOREIGN KEY (lesson_id) REFERENCES lessons(id)
    );

    CREATE TABLE IF NOT EXISTS results (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      user_id INTEGER NOT NULL,
      subject_name TEXT NOT NULL,
      unit_name TEXT NOT NULL,
      score INTEGER NOT NULL,
      total_points INTEGER NOT NULL,
      percentage REAL NOT NULL,
      date TEXT NOT NULL,
      -- JSON arrays
      lesson_names TEXT NOT NULL DEFAULT '[]',
      wrong_question_ids TEXT NOT NULL DEFAULT '[]',
      difficulty TEXT NOT NULL DEFAULT 'medium',
      earned_xp INTEGER NOT NULL DEFAULT 0,
      FOREIGN KEY (user_id) REFERENCES users(id)
    );

    CREATE TABLE IF NOT EXISTS mistakes (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      user_id INTEGER NOT NULL,
      question_id INTEGER NOT NULL,
      timestamp TEXT NOT NULL,
      UNIQUE(user_id, question_id),
      FOREIGN KEY (user_id) REFERENCES users(id),
      FOREIGN KEY (question_id) REFERENCES questions(id)
    );

    -- Indexes
    CREATE INDEX IF NOT EXISTS idx_questions_lesson ON questions(lesson_id);
    CREATE INDEX IF NOT EXISTS idx_results_user ON results(user_id);
    CREATE INDEX IF NOT EXISTS idx_results_date ON results(date);
    CREATE INDEX IF NOT EXISTS idx_mistakes_user ON mistakes(user_id);
    CREATE INDEX IF NOT EXISTS idx_users_xp ON users(xp);
    "#,
  )?;

  // ============================================================
  // MIGRATIONS FOR EXISTING DATABASES
  // These are no-ops for new databases (columns already exist)
  // ============================================================

  // Migration: difficulty tags landed after the first release
  add_column_if_missing(conn, "questions", "difficulty", "TEXT NOT NULL DEFAULT 'medium'")?;
  add_column_if_missing(conn, "results", "difficulty", "TEXT NOT NULL DEFAULT 'medium'")?;

  // Migration: XP rewards on results
  add_column_if_missing(conn, "results", "earned_xp", "INTEGER NOT NULL DEFAULT 0")?;

  // Migration: lesson breakdown on results
  add_column_if_missing(conn, "results", "lesson_names", "TEXT NOT NULL DEFAULT '[]'")?;
  add_column_if_missing(conn, "results", "wrong_question_ids", "TEXT NOT NULL DEFAULT '[]'")?;

  Ok(())
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
  conn
    .prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
    .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
  if !column_exists(conn, table, column) {
    conn.execute(
      &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
      [],
    )?;
  }
  Ok(())
}
