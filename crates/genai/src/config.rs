use std::time::Duration;

/// Default image-capable model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Default deadline for one `generateContent` call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;

/// Default REST endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, thiserror::Error)]
pub enum GeminiConfigError {
    #[error("GEMINI_API_KEY must be set")]
    MissingApiKey,

    #[error("GEMINI_TIMEOUT_SECS must be a positive number of seconds, got '{0}'")]
    InvalidTimeout(String),
}

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Load the Gemini configuration from environment variables.
    ///
    /// | Env Var               | Default                                            |
    /// |-----------------------|----------------------------------------------------|
    /// | `GEMINI_API_KEY`      | (required)                                         |
    /// | `GEMINI_MODEL`        | `gemini-2.5-flash-image`                           |
    /// | `GEMINI_BASE_URL`     | `https://generativelanguage.googleapis.com/v1beta` |
    /// | `GEMINI_TIMEOUT_SECS` | `90`                                               |
    pub fn from_env() -> Result<Self, GeminiConfigError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(GeminiConfigError::MissingApiKey)?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        let timeout = match std::env::var("GEMINI_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self::new(api_key, model, base_url).with_timeout(timeout))
    }

    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the `generateContent` method for the configured model.
    pub fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, GeminiConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(GeminiConfigError::InvalidTimeout(raw.to_string())),
    }
}
