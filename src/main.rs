use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tawjihi_quiz::exam::rewards;
use tawjihi_quiz::state::AppState;
use tawjihi_quiz::{config, db, handlers};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tawjihi_quiz=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let db_path = config::load_database_path();
  let pool = db::init_db(&db_path).expect("Failed to initialize database");

  {
    let conn = pool.lock().expect("Database lock failed during startup");
    db::seed_initial_data(&conn).expect("Failed to seed initial data");
  }

  let state = AppState::new(pool);

  // Countdown driver: every second, advance all running exam timers
  // and apply the outcomes of sessions forced to submit by expiry.
  {
    let state = state.clone();
    tokio::spawn(async move {
      let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
      loop {
        interval.tick().await;
        for outcome in state.sessions.tick_all() {
          tracing::info!("exam for user {} expired, submitting", outcome.user_id);
          rewards::apply(&state.pool, &state.rooms, &outcome);
        }
      }
    });
  }

  let app = handlers::router(state);

  let bind_addr = config::server_bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", config::SERVER_PORT);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
