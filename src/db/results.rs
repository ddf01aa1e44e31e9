//! Exam result history and the mistake notebook.
//!
//! [`record_exam_outcome`] is the single write path after a submission:
//! result row, mistake rows, XP and streak in one transaction.

use rusqlite::{Connection, Result, params};

use crate::db::accounts;
use crate::domain::{Difficulty, ExamResult, Mistake};
use crate::exam::ExamOutcome;

pub fn insert_result(conn: &Connection, outcome: &ExamOutcome) -> Result<i64> {
    let lesson_names = serde_json::to_string(&outcome.lesson_names)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    let wrong_ids = serde_json::to_string(&outcome.wrong_question_ids)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    conn.execute(
        r#"
        INSERT INTO results
          (user_id, subject_name, unit_name, score, total_points, percentage,
           date, lesson_names, wrong_question_ids, difficulty, earned_xp)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
        params![
            outcome.user_id,
            outcome.subject_name,
            outcome.unit_name,
            outcome.score,
            outcome.total_points,
            outcome.percentage,
            outcome.date,
            lesson_names,
            wrong_ids,
            outcome.difficulty.as_str(),
            outcome.earned_xp,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Result history for a user, most recent first
pub fn get_results_for_user(conn: &Connection, user_id: i64) -> Result<Vec<ExamResult>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, user_id, subject_name, unit_name, score, total_points,
               percentage, date, lesson_names, wrong_question_ids, difficulty, earned_xp
        FROM results
        WHERE user_id = ?1
        ORDER BY date DESC, id DESC
        "#,
    )?;

    let results = stmt
        .query_map(params![user_id], |row| {
            let lesson_names: String = row.get(8)?;
            let wrong_ids: String = row.get(9)?;
            let difficulty: String = row.get(10)?;
            Ok(ExamResult {
                id: row.get(0)?,
                user_id: row.get(1)?,
                subject_name: row.get(2)?,
                unit_name: row.get(3)?,
                score: row.get(4)?,
                total_points: row.get(5)?,
                percentage: row.get(6)?,
                date: row.get(7)?,
                lesson_names: serde_json::from_str(&lesson_names).unwrap_or_default(),
                wrong_question_ids: serde_json::from_str(&wrong_ids).unwrap_or_default(),
                difficulty: Difficulty::from_str(&difficulty).unwrap_or_default(),
                earned_xp: row.get(11)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(results)
}

/// Record a wrong answer; a repeat of the same question is a no-op
/// thanks to the UNIQUE(user_id, question_id) constraint.
pub fn insert_mistake(conn: &Connection, user_id: i64, question_id: i64, timestamp: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO mistakes (user_id, question_id, timestamp)
         VALUES (?1, ?2, ?3)",
        params![user_id, question_id, timestamp],
    )?;
    Ok(())
}

pub fn get_mistakes_for_user(conn: &Connection, user_id: i64) -> Result<Vec<Mistake>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, question_id, timestamp
         FROM mistakes WHERE user_id = ?1 ORDER BY timestamp DESC, id DESC",
    )?;
    let mistakes = stmt
        .query_map(params![user_id], |row| {
            Ok(Mistake {
                id: row.get(0)?,
                user_id: row.get(1)?,
                question_id: row.get(2)?,
                timestamp: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;
    Ok(mistakes)
}

/// Remove a mistake once the student has re-mastered the question.
/// Returns whether a row was deleted.
pub fn delete_mistake(conn: &Connection, mistake_id: i64) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM mistakes WHERE id = ?1", params![mistake_id])?;
    Ok(deleted > 0)
}

/// Persist everything a submission produces: the result row, mistake
/// entries for wrong answers, the XP grant and the daily streak bump.
pub fn record_exam_outcome(conn: &Connection, outcome: &ExamOutcome) -> Result<i64> {
    conn.execute_batch("BEGIN")?;
    let applied = (|| {
        let result_id = insert_result(conn, outcome)?;
        for question_id in &outcome.wrong_question_ids {
            insert_mistake(conn, outcome.user_id, *question_id, &outcome.date)?;
        }
        accounts::add_xp(conn, outcome.user_id, outcome.earned_xp)?;
        accounts::update_streak(conn, outcome.user_id, &accounts::today_string())?;
        Ok(result_id)
    })();
    match applied {
        Ok(result_id) => {
            conn.execute_batch("COMMIT")?;
            Ok(result_id)
        }
        Err(e) => {
            conn.execute_batch("ROLLBACK").ok();
            Err(e)
        }
    }
}
