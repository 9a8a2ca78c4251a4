use std::env;

/// Where the image-generation backend lives. The backend is external:
/// the only contract is `POST {base_url}/generate-image`.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    /// Client-side request timeout in seconds. `None` leaves the wait
    /// bounded only by transport defaults.
    pub request_timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            base_url: None,
            request_timeout_secs: None,
        }
    }
}

impl BackendConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let base_url = env::var("BACKEND_URL").ok();
        let request_timeout_secs = env::var("BACKEND_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok());

        BackendConfig {
            base_url,
            request_timeout_secs,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: Option<BackendConfig>,
    /// How long the "copied" indicator stays lit after a copy-prompt
    /// action, in milliseconds.
    pub copy_feedback_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend: None,
            copy_feedback_ms: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let copy_feedback_ms = env::var("COPY_FEEDBACK_MS")
            .ok()
            .and_then(|s| s.parse().ok());

        Config {
            backend: Some(BackendConfig::from_env()),
            copy_feedback_ms,
        }
    }

    pub fn with_backend(mut self, config: BackendConfig) -> Self {
        self.backend = Some(config);
        self
    }

    pub fn with_copy_feedback_ms(mut self, ms: u64) -> Self {
        self.copy_feedback_ms = Some(ms);
        self
    }
}
