/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Interval between scheduled auto-completion passes (default: hourly).
    pub auto_complete_interval_secs: u64,
    /// Local hour of day for the daily reconciliation pass (default: `2`).
    pub reconciliation_hour: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `3000`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `AUTO_COMPLETE_INTERVAL_SECS` | `3600`                  |
    /// | `RECONCILIATION_HOUR`         | `2`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let auto_complete_interval_secs: u64 = std::env::var("AUTO_COMPLETE_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("AUTO_COMPLETE_INTERVAL_SECS must be a valid u64");

        let reconciliation_hour: u32 = std::env::var("RECONCILIATION_HOUR")
            .unwrap_or_else(|_| "2".into())
            .parse()
            .expect("RECONCILIATION_HOUR must be a valid hour");
        assert!(reconciliation_hour < 24, "RECONCILIATION_HOUR must be 0-23");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            auto_complete_interval_secs,
            reconciliation_hour,
        }
    }
}
