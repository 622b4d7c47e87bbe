//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence concerns so route
//! handlers can stay focused on protocol translation and session plumbing.

pub mod auth;
pub mod favorite;
pub mod game;
pub mod leaderboard;
pub mod password;
pub mod score;
pub mod session;
