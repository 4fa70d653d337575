use std::str::FromStr;

/// Which document store backs player and settings records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStoreKind {
    Postgres,
    Memory,
}

impl FromStr for DocumentStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "Unknown DOCUMENT_STORE '{other}' (expected postgres or memory)"
            )),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// Storage and model settings live with their crates
/// (`elfcast_cloud::StorageConfig`, `elfcast_genai::GeminiConfig`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds. Webhooks run the pipeline inline,
    /// including its retry backoff, so this is generous.
    pub request_timeout_secs: u64,
    pub document_store: DocumentStoreKind,
    /// Publish storage events on the in-process bus and dispatch the
    /// triggers from it. Disable when bucket notifications call the hooks.
    pub in_process_triggers: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `300`                   |
    /// | `DOCUMENT_STORE`       | `postgres`              |
    /// | `IN_PROCESS_TRIGGERS`  | `true`                  |
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
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let document_store: DocumentStoreKind = std::env::var("DOCUMENT_STORE")
            .unwrap_or_else(|_| "postgres".into())
            .parse()
            .unwrap_or_else(|e: String| panic!("{e}"));

        let in_process_triggers = std::env::var("IN_PROCESS_TRIGGERS")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            document_store,
            in_process_triggers,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
