//! In-memory registry of challenge rooms.
//!
//! Rooms are ephemeral: they exist while at least one participant is in
//! them and vanish when the last one leaves. The reward path leaves the
//! room automatically when a challenge exam finishes.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
pub struct RoomRegistry {
  rooms: Mutex<HashMap<String, HashSet<i64>>>,
}

impl RoomRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a participant, creating the room if needed. Returns the
  /// participant count after joining.
  pub fn join(&self, room_id: &str, user_id: i64) -> usize {
    let mut rooms = self.rooms.lock().unwrap_or_else(|e| e.into_inner());
    let members = rooms.entry(room_id.to_string()).or_default();
    members.insert(user_id);
    members.len()
  }

  /// Remove a participant; the room is dropped when it empties.
  pub fn leave(&self, room_id: &str, user_id: i64) {
    let mut rooms = self.rooms.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(members) = rooms.get_mut(room_id) {
      members.remove(&user_id);
      if members.is_empty() {
        rooms.remove(room_id);
        tracing::debug!("room {} emptied and was removed", room_id);
      }
    }
  }

  pub fn participants(&self, room_id: &str) -> Vec<i64> {
    let rooms = self.rooms.lock().unwrap_or_else(|e| e.into_inner());
    rooms
      .get(room_id)
      .map(|members| {
        let mut ids: Vec<i64> = members.iter().copied().collect();
        ids.sort_unstable();
        ids
      })
      .unwrap_or_default()
  }

  pub fn room_count(&self) -> usize {
    let rooms = self.rooms.lock().unwrap_or_else(|e| e.into_inner());
    rooms.len()
  }
}
