pub mod accounts;
pub mod catalog;
pub mod results;
pub mod schema;

use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::Difficulty;

// Re-export all public items from submodules
pub use accounts::*;
pub use catalog::*;
pub use results::*;
pub use schema::run_migrations;

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
  /// Log the error at warn level and return None
  fn log_warn(self, context: &str) -> Option<T>;
  /// Log the error at warn level and return the default
  fn log_warn_default(self, context: &str) -> T
  where
    T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
  fn log_warn(self, context: &str) -> Option<T> {
    match self {
      Ok(v) => Some(v),
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        None
      }
    }
  }

  fn log_warn_default(self, context: &str) -> T
  where
    T: Default,
  {
    match self {
      Ok(v) => v,
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        T::default()
      }
    }
  }
}

/// Error returned when database lock cannot be acquired
#[derive(Debug)]
pub struct DbLockError;

impl std::fmt::Display for DbLockError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Database unavailable")
  }
}

impl std::error::Error for DbLockError {}

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> std::result::Result<MutexGuard<'_, Connection>, DbLockError> {
  pool.lock().map_err(|_: PoisonError<_>| {
    tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
    DbLockError
  })
}

pub fn init_db(path: &Path) -> Result<DbPool> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).ok();
  }

  // Create backup before migrations if database exists
  if path.exists() {
    let backup_path = path.with_extension("db.backup");
    if let Err(e) = std::fs::copy(path, &backup_path) {
      tracing::warn!("Could not create database backup: {}", e);
    }
  }

  let conn = Connection::open(path)?;
  run_migrations(&conn)?;
  Ok(Arc::new(Mutex::new(conn)))
}

/// Seed the starter curriculum and demo accounts on first run.
pub fn seed_initial_data(conn: &Connection) -> Result<()> {
  let count: i64 = conn.query_row("SELECT COUNT(*) FROM subjects", [], |row| row.get(0))?;
  if count > 0 {
    return Ok(());
  }

  seed_curriculum(conn)?;
  seed_demo_users(conn)?;
  Ok(())
}

fn seed_curriculum(conn: &Connection) -> Result<()> {
  // Arabic
  let arabic = catalog::insert_subject(conn, "اللغة العربية")?;
  let arabic_sem1 = catalog::insert_semester(conn, arabic, "الفصل الدراسي الأول")?;
  catalog::insert_semester(conn, arabic, "الفصل الدراسي الثاني")?;

  let arabic_u1 = catalog::insert_unit(conn, arabic_sem1, "الوحدة الأولى: آيات من سورة آل عمران")?;
  let arabic_u2 = catalog::insert_unit(conn, arabic_sem1, "الوحدة الثانية: فن السرور")?;

  let tafsir = catalog::insert_lesson(conn, arabic_u1, "تفسير الآيات الكريمة")?;
  let lugha = catalog::insert_lesson(conn, arabic_u1, "القضايا اللغوية")?;
  let adab = catalog::insert_lesson(conn, arabic_u2, "تحليل النص الأدبي")?;

  // Math
  let math = catalog::insert_subject(conn, "الرياضيات")?;
  let math_sem1 = catalog::insert_semester(conn, math, "الفصل الدراسي الأول")?;
  let math_u1 = catalog::insert_unit(conn, math_sem1, "الوحدة الأولى: التفاضل")?;
  let ishtiqaq = catalog::insert_lesson(conn, math_u1, "قواعد الاشتقاق")?;

  // History
  let history = catalog::insert_subject(conn, "تاريخ الأردن")?;
  catalog::insert_semester(conn, history, "الفصل الدراسي الأول")?;

  // Physics (no seeded content yet)
  catalog::insert_subject(conn, "الفيزياء")?;

  let questions: [(i64, &str, [&str; 4], usize, Difficulty); 10] = [
    (
      ishtiqaq,
      "ما مشتقة الدالة س³؟",
      ["3س²", "س²", "3س", "س³ / 3"],
      0,
      Difficulty::Medium,
    ),
    (
      ishtiqaq,
      "مشتقة الدالة الثابتة تساوي",
      ["صفر", "واحد", "الدالة نفسها", "غير معرفة"],
      0,
      Difficulty::Easy,
    ),
    (
      ishtiqaq,
      "ما مشتقة جا(س)؟",
      ["جتا(س)", "-جتا(س)", "ظا(س)", "-جا(س)"],
      0,
      Difficulty::Medium,
    ),
    (
      ishtiqaq,
      "إذا كانت ص = 5س² فإن ص' تساوي",
      ["10س", "5س", "25س", "10س²"],
      0,
      Difficulty::Easy,
    ),
    (
      ishtiqaq,
      "مشتقة حاصل ضرب دالتين ق(س) × ك(س) هي",
      [
        "ق'(س)ك(س) + ق(س)ك'(س)",
        "ق'(س)ك'(س)",
        "ق'(س) + ك'(س)",
        "ق(س)ك(س)",
      ],
      0,
      Difficulty::Hard,
    ),
    (
      tafsir,
      "بم وصف الله عيسى عليه السلام في الآيات الكريمة؟",
      ["وجيهاً في الدنيا والآخرة", "خاتم الأنبياء", "أبا الأنبياء", "كليم الله"],
      0,
      Difficulty::Medium,
    ),
    (
      tafsir,
      "معنى كلمة (محرراً) في الآيات هو",
      ["خالصاً للعبادة", "مكتوباً", "معتوقاً من الرق", "مسافراً"],
      0,
      Difficulty::Hard,
    ),
    (
      lugha,
      "جمع كلمة (محراب) هو",
      ["محاريب", "محارب", "حروب", "أحربة"],
      0,
      Difficulty::Easy,
    ),
    (
      lugha,
      "إعراب كلمة (مصدقاً) في قوله تعالى (مصدقاً بكلمة من الله) هو",
      ["حال منصوبة", "مفعول به", "تمييز", "نعت مجرور"],
      0,
      Difficulty::Medium,
    ),
    (
      adab,
      "يرى الكاتب في مقالة فن السرور أن السرور",
      ["فن يُتعلم ويُكتسب", "هبة لا تُكتسب", "مرتبط بالغنى", "غاية لا تدرك"],
      0,
      Difficulty::Medium,
    ),
  ];

  for (lesson_id, text, options, correct, difficulty) in questions {
    let options: Vec<String> = options.iter().map(|s| s.to_string()).collect();
    catalog::insert_question(conn, lesson_id, text, &options, correct, difficulty)?;
  }

  Ok(())
}

fn seed_demo_users(conn: &Connection) -> Result<()> {
  let jacoub = accounts::create_user(conn, "jacoub")?;
  conn.execute(
    "UPDATE users SET xp = 1500, coins = 250, streak = 5, hints_count = 5 WHERE id = ?1",
    [jacoub],
  )?;
  accounts::create_user(conn, "sara")?;
  Ok(())
}
