//! Exam session endpoints: start, inspect, answer, navigate, hint, submit.
//!
//! Sessions live in memory; the client only ever sees question views
//! with the correct answer stripped while the exam is running.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::db::{self, LogOnError};
use crate::domain::Difficulty;
use crate::exam::{self, ExamConfig, ExamError, ExamOutcome, ExamSession, Phase, rewards};
use crate::state::AppState;

// ============================================================================
// Start
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartExamRequest {
  pub user_id: i64,
  pub lesson_ids: Vec<i64>,
  pub question_count: usize,
  pub duration_minutes: u32,
  #[serde(default)]
  pub difficulty: Difficulty,
  #[serde(default)]
  pub is_challenge: bool,
  #[serde(default)]
  pub room_id: Option<String>,
}

/// POST /api/exam/start
pub async fn start_exam(
  State(state): State<AppState>,
  Json(request): Json<StartExamRequest>,
) -> impl IntoResponse {
  if request.question_count == 0 || request.duration_minutes == 0 {
    return (
      StatusCode::BAD_REQUEST,
      Json(json!({ "error": "question_count and duration_minutes must be positive" })),
    )
      .into_response();
  }

  let (question_pool, lesson_names, subject_name, unit_name) = {
    let conn = match db::try_lock(&state.pool) {
      Ok(conn) => conn,
      Err(e) => return db_unavailable(e),
    };

    let question_pool = db::get_questions_for_lessons(&conn, &request.lesson_ids)
      .log_warn_default("failed to load question pool");
    let lesson_names = db::get_lesson_names(&conn, &request.lesson_ids)
      .log_warn_default("failed to load lesson names");
    let (unit_name, subject_name) = request
      .lesson_ids
      .first()
      .and_then(|&id| db::get_lesson_context(&conn, id).log_warn("failed to load lesson context")?)
      .unwrap_or_default();

    (question_pool, lesson_names, subject_name, unit_name)
  };

  let config = ExamConfig {
    lesson_ids: request.lesson_ids,
    lesson_names,
    subject_name,
    unit_name,
    question_count: request.question_count.min(crate::config::MAX_QUESTION_COUNT),
    duration_minutes: request.duration_minutes.min(crate::config::MAX_DURATION_MINUTES),
    difficulty: request.difficulty,
    is_challenge: request.is_challenge,
    room_id: request.room_id,
  };

  let session = match ExamSession::start(request.user_id, config, &question_pool, &mut rand::rng()) {
    Ok(session) => session,
    Err(ExamError::EmptyQuestionPool) => {
      // An empty pool is a normal outcome of lesson selection, not a
      // client error: the UI shows an empty-exam state.
      return Json(json!({
        "session_id": null,
        "error": ExamError::EmptyQuestionPool.to_string(),
      }))
      .into_response();
    }
    Err(e) => {
      return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response();
    }
  };

  if let Some(room_id) = &session.config.room_id {
    state.rooms.join(room_id, session.user_id);
  }

  let view = session_view(&session);
  let session_id = state.sessions.insert(session);
  tracing::info!("exam session {} started", session_id);

  Json(json!({ "session_id": session_id, "session": view })).into_response()
}

// ============================================================================
// Views
// ============================================================================

/// A question as shown to the client while the exam is running
#[derive(Debug, Serialize)]
struct QuestionView {
  id: i64,
  lesson_id: i64,
  text: String,
  options: Vec<String>,
  difficulty: Difficulty,
  /// Option indices removed by a 50:50 hint
  hidden_options: Vec<usize>,
  /// The option the student currently has selected
  chosen_option: Option<usize>,
}

fn session_view(session: &ExamSession) -> serde_json::Value {
  let questions: Vec<QuestionView> = session
    .questions()
    .iter()
    .map(|q| QuestionView {
      id: q.id,
      lesson_id: q.lesson_id,
      text: q.text.clone(),
      options: q.options.clone(),
      difficulty: q.difficulty,
      hidden_options: session.hidden_for(q.id).map(|h| h.to_vec()).unwrap_or_default(),
      chosen_option: session.answer_for(q.id),
    })
    .collect();

  let mut view = json!({
    "user_id": session.user_id,
    "phase": session.phase().as_str(),
    "subject_name": session.config.subject_name,
    "unit_name": session.config.unit_name,
    "is_challenge": session.config.is_challenge,
    "time_remaining_seconds": session.time_remaining_seconds(),
    "current_index": session.current_index(),
    "answered_count": session.answered_count(),
    "questions": questions,
  });

  // After finishing the correct answers are revealed for review
  if session.phase() == Phase::Finished {
    view["review"] = json!(
      session
        .questions()
        .iter()
        .map(|q| {
          let chosen = session.answer_for(q.id);
          json!({
            "question_id": q.id,
            "correct_answer": q.correct_answer,
            "chosen_option": chosen,
            "is_correct": chosen == Some(q.correct_answer),
          })
        })
        .collect::<Vec<_>>()
    );
    if let Some(outcome) = session.outcome() {
      view["outcome"] = outcome_json(outcome);
    }
  }

  view
}

fn outcome_json(outcome: &ExamOutcome) -> serde_json::Value {
  json!({
    "score": outcome.score,
    "total_points": outcome.total_points,
    "percentage": outcome.percentage,
    "earned_xp": outcome.earned_xp,
    "wrong_question_ids": outcome.wrong_question_ids,
    "date": outcome.date,
  })
}

/// GET /api/exam/{session_id}
pub async fn get_exam(
  State(state): State<AppState>,
  Path(session_id): Path<String>,
) -> impl IntoResponse {
  match state.sessions.with_session(&session_id, |session| session_view(session)) {
    Some(view) => Json(view).into_response(),
    None => session_not_found(),
  }
}

// ============================================================================
// Answer / navigate
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
  pub question_id: i64,
  pub option_index: usize,
}

/// POST /api/exam/{session_id}/answer
pub async fn answer_question(
  State(state): State<AppState>,
  Path(session_id): Path<String>,
  Json(request): Json<AnswerRequest>,
) -> impl IntoResponse {
  let result = state.sessions.with_session(&session_id, |session| {
    session
      .set_answer(request.question_id, request.option_index)
      .map(|()| session.answered_count())
  });

  match result {
    Some(Ok(answered_count)) => Json(json!({ "answered_count": answered_count })).into_response(),
    Some(Err(e)) => exam_error(e),
    None => session_not_found(),
  }
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
  pub direction: Direction,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Next,
  Previous,
}

/// POST /api/exam/{session_id}/navigate
pub async fn navigate(
  State(state): State<AppState>,
  Path(session_id): Path<String>,
  Json(request): Json<NavigateRequest>,
) -> impl IntoResponse {
  let result = state.sessions.with_session(&session_id, |session| {
    match request.direction {
      Direction::Next => session.next(),
      Direction::Previous => session.previous(),
    }
    (session.current_index(), session.on_last_question())
  });

  match result {
    Some((current_index, on_last)) => Json(json!({
      "current_index": current_index,
      "on_last_question": on_last,
    }))
    .into_response(),
    None => session_not_found(),
  }
}

// ============================================================================
// Hints
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct HintRequest {
  pub question_id: i64,
}

enum HintFailure {
  Exam(ExamError),
  DbUnavailable(db::DbLockError),
}

impl From<ExamError> for HintFailure {
  fn from(e: ExamError) -> Self {
    Self::Exam(e)
  }
}

/// POST /api/exam/{session_id}/hint
///
/// Spends one hint from the user's balance and permanently hides two
/// incorrect options. A repeat request for the same question returns
/// the already-hidden pair without charging again.
pub async fn use_hint(
  State(state): State<AppState>,
  Path(session_id): Path<String>,
  Json(request): Json<HintRequest>,
) -> impl IntoResponse {
  let pool = state.pool.clone();
  let result = state.sessions.with_session(&session_id, |session| {
    if !session.is_running() {
      return Err(HintFailure::from(ExamError::NotRunning));
    }
    let question = session
      .questions()
      .iter()
      .find(|q| q.id == request.question_id)
      .cloned()
      .ok_or(ExamError::UnknownQuestion)?;

    // Already hinted: free replay of the stored pair
    if let Some(hidden) = session.hidden_for(question.id) {
      return Ok((hidden, false));
    }

    if !exam::hints::is_hint_eligible(&question) {
      return Err(ExamError::TooFewOptions.into());
    }

    // Charge before revealing; the WHERE guard makes the spend atomic
    let conn = db::try_lock(&pool).map_err(HintFailure::DbUnavailable)?;
    if !db::try_spend_hint(&conn, session.user_id).log_warn_default("hint spend failed") {
      return Err(ExamError::InsufficientHints.into());
    }
    drop(conn);

    let hidden = match exam::hints::pick_hidden_options(&question, &mut rand::rng()) {
      Ok(hidden) => hidden,
      Err(e) => {
        // Eligibility was checked above; refund to be safe
        if let Ok(conn) = db::try_lock(&pool) {
          db::refund_hint(&conn, session.user_id).log_warn("hint refund failed");
        }
        return Err(e.into());
      }
    };
    session.record_hint(question.id, hidden);
    Ok((hidden, true))
  });

  match result {
    Some(Ok((hidden, charged))) => Json(json!({
      "hidden_options": hidden.to_vec(),
      "charged": charged,
    }))
    .into_response(),
    Some(Err(HintFailure::Exam(e))) => exam_error(e),
    Some(Err(HintFailure::DbUnavailable(e))) => db_unavailable(e),
    None => session_not_found(),
  }
}

// ============================================================================
// Submit
// ============================================================================

/// POST /api/exam/{session_id}/submit
///
/// Finishes the session and applies rewards. A duplicate submit is a
/// no-op that returns the stored result again.
pub async fn submit_exam(
  State(state): State<AppState>,
  Path(session_id): Path<String>,
) -> impl IntoResponse {
  let result = state.sessions.with_session(&session_id, |session| {
    match session.submit(Utc::now()) {
      Some(outcome) => (Some(outcome), session_view(session)),
      None => (None, session_view(session)),
    }
  });

  let Some((fresh_outcome, view)) = result else {
    return session_not_found();
  };

  // Rewards run outside the store lock; a slow disk must not stall
  // other sessions.
  if let Some(outcome) = fresh_outcome {
    rewards::apply(&state.pool, &state.rooms, &outcome);
    tracing::info!(
      "exam session {} submitted: {}/{} for user {}",
      session_id,
      outcome.score,
      outcome.total_points,
      outcome.user_id
    );
  }

  Json(view).into_response()
}

// ============================================================================
// Error mapping
// ============================================================================

fn exam_error(e: ExamError) -> axum::response::Response {
  let status = match e {
    ExamError::InsufficientHints | ExamError::TooFewOptions => StatusCode::BAD_REQUEST,
    ExamError::UnknownQuestion | ExamError::InvalidOption => StatusCode::BAD_REQUEST,
    ExamError::NotRunning => StatusCode::CONFLICT,
    ExamError::EmptyQuestionPool => StatusCode::BAD_REQUEST,
  };
  (status, Json(json!({ "error": e.to_string() }))).into_response()
}

fn session_not_found() -> axum::response::Response {
  (
    StatusCode::NOT_FOUND,
    Json(json!({ "error": "Exam session not found or expired" })),
  )
    .into_response()
}

fn db_unavailable(e: db::DbLockError) -> axum::response::Response {
  (
    StatusCode::SERVICE_UNAVAILABLE,
    Json(json!({ "error": e.to_string() })),
  )
    .into_response()
}
