//! Question bank and curriculum hierarchy queries.
//!
//! The hierarchy is subject -> semester -> unit -> lesson -> question.
//! The exam core only ever reads from here; administration of the bank
//! is an external concern.

use rusqlite::{Connection, Result, params, params_from_iter};
use serde::Serialize;

use crate::domain::{Difficulty, Question};

pub fn insert_subject(conn: &Connection, name: &str) -> Result<i64> {
  conn.execute("INSERT INTO subjects (name) VALUES (?1)", params![name])?;
  Ok(conn.last_insert_rowid())
}

pub fn insert_semester(conn: &Connection, subject_id: i64, name: &str) -> Result<i64> {
  conn.execute(
    "INSERT INTO semesters (subject_id, name) VALUES (?1, ?2)",
    params![subject_id, name],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn insert_unit(conn: &Connection, semester_id: i64, name: &str) -> Result<i64> {
  conn.execute(
    "INSERT INTO units (semester_id, name) VALUES (?1, ?2)",
    params![semester_id, name],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn insert_lesson(conn: &Connection, unit_id: i64, name: &str) -> Result<i64> {
  conn.execute(
    "INSERT INTO lessons (unit_id, name) VALUES (?1, ?2)",
    params![unit_id, name],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn insert_question(
  conn: &Connection,
  lesson_id: i64,
  text: &str,
  options: &[String],
  correct_answer: usize,
  difficulty: Difficulty,
) -> Result<i64> {
  let options_json = serde_json::to_string(options)
    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
  conn.execute(
    r#"
    INSERT INTO questions (lesson_id, text, options, correct_answer, difficulty)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
    params![lesson_id, text, options_json, correct_answer as i64, difficulty.as_str()],
  )?;
  Ok(conn.last_insert_rowid())
}

/// All questions belonging to the given lessons, in id order.
pub fn get_questions_for_lessons(conn: &Connection, lesson_ids: &[i64]) -> Result<Vec<Question>> {
  if lesson_ids.is_empty() {
    return Ok(Vec::new());
  }

  let placeholders = vec!["?"; lesson_ids.len()].join(", ");
  let mut stmt = conn.prepare(&format!(
    r#"
    SELECT id, lesson_id, text, options, correct_answer, difficulty
    FROM questions
    WHERE lesson_id IN ({})
    ORDER BY id
    "#,
    placeholders
  ))?;

  let questions = stmt
    .query_map(params_from_iter(lesson_ids.iter()), row_to_question)?
    .collect::<Result<Vec<_>>>()?;

  Ok(questions)
}

pub fn get_question(conn: &Connection, question_id: i64) -> Result<Option<Question>> {
  use rusqlite::OptionalExtension;
  conn
    .query_row(
      r#"
      SELECT id, lesson_id, text, options, correct_answer, difficulty
      FROM questions WHERE id = ?1
      "#,
      params![question_id],
      row_to_question,
    )
    .optional()
}

/// Lesson display names for the given ids, in the order requested
pub fn get_lesson_names(conn: &Connection, lesson_ids: &[i64]) -> Result<Vec<String>> {
  let mut names = Vec::with_capacity(lesson_ids.len());
  let mut stmt = conn.prepare("SELECT name FROM lessons WHERE id = ?1")?;
  for id in lesson_ids {
    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
      names.push(row.get(0)?);
    }
  }
  Ok(names)
}

/// Resolve the unit and subject names a lesson belongs to
pub fn get_lesson_context(conn: &Connection, lesson_id: i64) -> Result<Option<(String, String)>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT un.name, su.name
    FROM lessons le
    JOIN units un ON le.unit_id = un.id
    JOIN semesters se ON un.semester_id = se.id
    JOIN subjects su ON se.subject_id = su.id
    WHERE le.id = ?1
    "#,
  )?;

  let mut rows = stmt.query(params![lesson_id])?;
  if let Some(row) = rows.next()? {
    Ok(Some((row.get(0)?, row.get(1)?)))
  } else {
    Ok(None)
  }
}

// ==================== Catalog tree ====================

#[derive(Debug, Serialize)]
pub struct CatalogLesson {
  pub id: i64,
  pub name: String,
  pub question_count: i64,
}

#[derive(Debug, Serialize)]
pub struct CatalogUnit {
  pub id: i64,
  pub name: String,
  pub lessons: Vec<CatalogLesson>,
}

#[derive(Debug, Serialize)]
pub struct CatalogSemester {
  pub id: i64,
  pub name: String,
  pub units: Vec<CatalogUnit>,
}

#[derive(Debug, Serialize)]
pub struct CatalogSubject {
  pub id: i64,
  pub name: String,
  pub semesters: Vec<CatalogSemester>,
}

/// The full curriculum tree with per-lesson question counts
pub fn get_catalog_tree(conn: &Connection) -> Result<Vec<CatalogSubject>> {
  let mut subjects_stmt = conn.prepare("SELECT id, name FROM subjects ORDER BY id")?;
  let mut semesters_stmt =
    conn.prepare("SELECT id, name FROM semesters WHERE subject_id = ?1 ORDER BY id")?;
  let mut units_stmt =
    conn.prepare("SELECT id, name FROM units WHERE semester_id = ?1 ORDER BY id")?;
  let mut lessons_stmt = conn.prepare(
    r#"
    SELECT l.id, l.name, COUNT(q.id)
    FROM lessons l
    LEFT JOIN questions q ON q.lesson_id = l.id
    WHERE l.unit_id = ?1
    GROUP BY l.id
    ORDER BY l.id
    "#,
  )?;

  let subject_rows = subjects_stmt
    .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
    .collect::<Result<Vec<_>>>()?;

  let mut subjects = Vec::with_capacity(subject_rows.len());
  for (subject_id, subject_name) in subject_rows {
    let semester_rows = semesters_stmt
      .query_map(params![subject_id], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
      })?
      .collect::<Result<Vec<_>>>()?;

    let mut semesters = Vec::with_capacity(semester_rows.len());
    for (semester_id, semester_name) in semester_rows {
      let unit_rows = units_stmt
        .query_map(params![semester_id], |row| {
          Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>>>()?;

      let mut units = Vec::with_capacity(unit_rows.len());
      for (unit_id, unit_name) in unit_rows {
        let lessons = lessons_stmt
          .query_map(params![unit_id], |row| {
            Ok(CatalogLesson {
              id: row.get(0)?,
              name: row.get(1)?,
              question_count: row.get(2)?,
            })
          })?
          .collect::<Result<Vec<_>>>()?;

        units.push(CatalogUnit {
          id: unit_id,
          name: unit_name,
          lessons,
        });
      }

      semesters.push(CatalogSemester {
        id: semester_id,
        name: semester_name,
        units,
      });
    }

    subjects.push(CatalogSubject {
      id: subject_id,
      name: subject_name,
      semesters,
    });
  }

  Ok(subjects)
}

/// Convert a database row to a Question
fn row_to_question(row: &rusqlite::Row) -> Result<Question> {
  let options_json: String = row.get(3)?;
  let options: Vec<String> = serde_json::from_str(&options_json).unwrap_or_default();
  let difficulty_str: String = row.get(5)?;

  Ok(Question {
    id: row.get(0)?,
    lesson_id: row.get(1)?,
    text: row.get(2)?,
    options,
    correct_answer: row.get::<_, i64>(4)? as usize,
    difficulty: Difficulty::from_str(&difficulty_str).unwrap_or_default(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::run_migrations;

  fn test_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    conn
  }

  fn seed_lesson(conn: &Connection) -> i64 {
    let subject = insert_subject(conn, "الرياضيات").unwrap();
    let semester = insert_semester(conn, subject, "الفصل الأول").unwrap();
    let unit = insert_unit(conn, semester, "التفاضل").unwrap();
    insert_lesson(conn, unit, "قواعد الاشتقاق").unwrap()
  }

  #[test]
  fn test_insert_and_fetch_questions() {
    let conn = test_conn();
    let lesson = seed_lesson(&conn);
    let options: Vec<String> = vec!["a".into(), "b".into(), "c".into(), "d".into()];

    insert_question(&conn, lesson, "q1", &options, 2, Difficulty::Hard).unwrap();
    insert_question(&conn, lesson, "q2", &options, 0, Difficulty::Medium).unwrap();

    let questions = get_questions_for_lessons(&conn, &[lesson]).unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].text, "q1");
    assert_eq!(questions[0].correct_answer, 2);
    assert_eq!(questions[0].difficulty, Difficulty::Hard);
    assert_eq!(questions[0].options, options);
  }

  #[test]
  fn test_fetch_questions_empty_lesson_list() {
    let conn = test_conn();
    assert!(get_questions_for_lessons(&conn, &[]).unwrap().is_empty());
  }

  #[test]
  fn test_lesson_context_joins_names() {
    let conn = test_conn();
    let lesson = seed_lesson(&conn);

    let (unit_name, subject_name) = get_lesson_context(&conn, lesson).unwrap().unwrap();
    assert_eq!(unit_name, "التفاضل");
    assert_eq!(subject_name, "الرياضيات");
  }

  #[test]
  fn test_lesson_context_missing() {
    let conn = test_conn();
    assert!(get_lesson_context(&conn, 999).unwrap().is_none());
  }

  #[test]
  fn test_catalog_tree_counts_questions() {
    let conn = test_conn();
    let lesson = seed_lesson(&conn);
    let options: Vec<String> = vec!["a".into(), "b".into(), "c".into(), "d".into()];
    insert_question(&conn, lesson, "q1", &options, 0, Difficulty::Medium).unwrap();

    let tree = get_catalog_tree(&conn).unwrap();
    assert_eq!(tree.len(), 1);
    let lessons = &tree[0].semesters[0].units[0].lessons;
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0].question_count, 1);
  }
}
