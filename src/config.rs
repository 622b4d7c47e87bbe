//! Process configuration parsed from flags with environment fallbacks.
//!
//! Every flag can also be supplied through the environment variable named in
//! its `env` attribute; `main` loads a `.env` file before parsing.

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand};

use crate::state::SessionSettings;

#[derive(Parser, Debug)]
#[command(name = "gamehub", about = "Game portal backend: accounts, high scores, leaderboards, favorites")]
pub struct Config {
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind_addr: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 5)]
    pub db_max_connections: u32,

    /// Directory holding the game pages and their assets.
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    #[arg(long, env = "SESSION_TTL_DAYS", default_value_t = 30)]
    pub session_ttl_days: i32,

    /// Mark the session cookie `Secure` (serve over HTTPS only).
    #[arg(long, env = "COOKIE_SECURE", default_value_t = false, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub cookie_secure: bool,

    /// Apply pending migrations before `serve` starts listening.
    #[arg(long, env = "AUTO_MIGRATE", default_value_t = true, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub auto_migrate: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server.
    #[default]
    Serve,
    /// Apply pending schema migrations and exit.
    Migrate,
}

impl Config {
    #[must_use]
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings { ttl_days: self.session_ttl_days.max(1), cookie_secure: self.cookie_secure }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
