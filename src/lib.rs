pub mod config;
pub mod db;
pub mod domain;
pub mod exam;
pub mod handlers;
pub mod rooms;
pub mod session;
pub mod state;
