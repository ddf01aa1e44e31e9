//! Shared application state passed to every handler.

use std::sync::Arc;

use crate::db::DbPool;
use crate::rooms::RoomRegistry;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
  pub pool: DbPool,
  pub sessions: Arc<SessionStore>,
  pub rooms: Arc<RoomRegistry>,
}

impl AppState {
  pub fn new(pool: DbPool) -> Self {
    Self {
      pool,
      sessions: Arc::new(SessionStore::new()),
      rooms: Arc::new(RoomRegistry::new()),
    }
  }
}
