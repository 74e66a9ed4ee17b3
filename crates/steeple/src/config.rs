use std::env;

use chrono::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the session cookie (default: "steeple_session")
    pub session_cookie: String,
    /// Session lifetime in hours (default: 168, one week)
    pub session_ttl_hours: i64,
    /// Path to the SQLite database file (default: "steeple.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Whether to seed demo data at startup (default: true)
    pub demo_data: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SESSION_COOKIE` - Session cookie name (default: "steeple_session")
    /// - `SESSION_TTL_HOURS` - Session lifetime in hours (default: 168)
    /// - `SQLITE_PATH` - SQLite database path (default: "steeple.db")
    /// - `DEMO_DATA` - Seed demo data at startup (default: true; "false" or "0" disables)
    pub fn from_env() -> Self {
        Self {
            session_cookie: env::var("SESSION_COOKIE")
                .unwrap_or_else(|_| "steeple_session".to_string()),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(168),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "steeple.db".to_string()),
            demo_data: env::var("DEMO_DATA")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        }
    }

    /// Get the session lifetime as a chrono Duration.
    pub fn session_ttl(&self) -> Duration {
        Duration::hours(self.session_ttl_hours)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
