//! Configuration module for the Wellmind backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address the gateway binds to
    pub bind_addr: SocketAddr,
    /// Address the backend process listens on (proxy target)
    pub backend_addr: SocketAddr,
    /// Override for the supervised backend command; defaults to re-running
    /// the current executable in backend mode
    pub backend_cmd: Option<String>,
    /// Maximum backend restarts before the gateway gives up
    pub backend_restarts: u32,
    /// Per-request timeout for proxied calls
    pub proxy_timeout: Duration,
    /// Upstream AI chat endpoint; fallback responses are used when unset
    pub ai_url: Option<String>,
    /// API key for the upstream AI endpoint
    pub ai_api_key: Option<String>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("WELLMIND_DB_PATH")
            .unwrap_or_else(|_| "./data/wellmind.sqlite".to_string())
            .into();

        let bind_addr = env::var("WELLMIND_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
            .parse()
            .expect("Invalid WELLMIND_BIND_ADDR format");

        let backend_addr = env::var("WELLMIND_BACKEND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5001".to_string())
            .parse()
            .expect("Invalid WELLMIND_BACKEND_ADDR format");

        let backend_cmd = env::var("WELLMIND_BACKEND_CMD").ok();

        let backend_restarts = env::var("WELLMIND_BACKEND_RESTARTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        let proxy_timeout = env::var("WELLMIND_PROXY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let ai_url = env::var("WELLMIND_AI_URL").ok();
        let ai_api_key = env::var("WELLMIND_AI_API_KEY").ok();

        let log_level = env::var("WELLMIND_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            db_path,
            bind_addr,
            backend_addr,
            backend_cmd,
            backend_restarts,
            proxy_timeout,
            ai_url,
            ai_api_key,
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("WELLMIND_DB_PATH");
        env::remove_var("WELLMIND_BIND_ADDR");
        env::remove_var("WELLMIND_BACKEND_ADDR");
        env::remove_var("WELLMIND_BACKEND_CMD");
        env::remove_var("WELLMIND_BACKEND_RESTARTS");
        env::remove_var("WELLMIND_PROXY_TIMEOUT_SECS");
        env::remove_var("WELLMIND_AI_URL");
        env::remove_var("WELLMIND_AI_API_KEY");
        env::remove_var("WELLMIND_LOG_LEVEL");

        let config = Config::from_env();

        assert_eq!(config.db_path, PathBuf::from("./data/wellmind.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");
        assert_eq!(config.backend_addr.to_string(), "127.0.0.1:5001");
        assert!(config.backend_cmd.is_none());
        assert_eq!(config.backend_restarts, 3);
        assert_eq!(config.proxy_timeout, Duration::from_secs(30));
        assert!(config.ai_url.is_none());
        assert_eq!(config.log_level, "info");
    }
}
