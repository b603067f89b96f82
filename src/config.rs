//! Configuration module for Upcheck.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the web server (default: 8080)
    pub http_port: u16,
    /// Path to the SQLite database file (default: "upcheck.db")
    pub db_path: String,
    /// Seconds between probe cycles (default: 30)
    pub cycle_interval_secs: u64,
    /// Per-probe timeout in milliseconds (default: 10000)
    pub probe_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            db_path: "upcheck.db".to_string(),
            cycle_interval_secs: 30,
            probe_timeout_ms: 10_000,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `UPCHECK_HTTP_PORT`: HTTP port (default: 8080)
    /// - `UPCHECK_DB_PATH`: Database file path (default: "upcheck.db")
    /// - `UPCHECK_CYCLE_SECS`: Seconds between probe cycles (default: 30)
    /// - `UPCHECK_PROBE_TIMEOUT_MS`: Per-probe timeout (default: 10000)
    pub fn load() -> Self {
        let mut cfg = Self::default();

        if let Ok(port_str) = env::var("UPCHECK_HTTP_PORT") {
            if let Ok(port) = port_str.parse() {
                cfg.http_port = port;
            }
        }

        if let Ok(db_path) = env::var("UPCHECK_DB_PATH") {
            cfg.db_path = db_path;
        }

        if let Ok(secs_str) = env::var("UPCHECK_CYCLE_SECS") {
            if let Ok(secs) = secs_str.parse() {
                cfg.cycle_interval_secs = secs;
            }
        }

        if let Ok(ms_str) = env::var("UPCHECK_PROBE_TIMEOUT_MS") {
            if let Ok(ms) = ms_str.parse() {
                cfg.probe_timeout_ms = ms;
            }
        }

        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.http_port, 8080);
        assert_eq!(cfg.db_path, "upcheck.db");
        assert_eq!(cfg.cycle_interval_secs, 30);
        assert_eq!(cfg.probe_timeout_ms, 10_000);
    }
}
