use std::{env, path::PathBuf, time::Duration};

use secrecy::SecretString;

/// Default pause between revealing answer feedback and moving on.
pub const DEFAULT_FEEDBACK_DELAY_MS: u64 = 1500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    File,
}

impl StoreBackend {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => StoreBackend::Memory,
            _ => StoreBackend::File,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub store_backend: StoreBackend,
    pub data_dir: PathBuf,
    pub cors_allowed_origin: String,
    pub openai_api_key: SecretString,
    pub openai_api_base: String,
    pub openai_model: String,
    pub feedback_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            store_backend: env::var("STORE_BACKEND")
                .map(|b| StoreBackend::parse(&b))
                .unwrap_or(StoreBackend::File),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            openai_api_key: SecretString::from(env::var("OPENAI_API_KEY").unwrap_or_default()),
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            feedback_delay_ms: env::var("FEEDBACK_DELAY_MS")
                .ok()
                .and_then(|d| d.parse().ok())
                .unwrap_or(DEFAULT_FEEDBACK_DELAY_MS),
        }
    }

    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }

    /// Logs a warning for settings that leave a feature unusable.
    /// The service still starts; only AI generation depends on the key.
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        if self.openai_api_key.expose_secret().trim().is_empty() {
            log::warn!("OPENAI_API_KEY is not set; question generation requests will fail");
        }

        if self.store_backend == StoreBackend::Memory {
            log::warn!("STORE_BACKEND=memory: questions and attempts are lost on shutdown");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            store_backend: StoreBackend::Memory,
            data_dir: env::temp_dir().join("mathmaster-test"),
            cors_allowed_origin: "http://localhost:5173".to_string(),
            openai_api_key: SecretString::from("test_api_key".to_string()),
            openai_api_base: "http://localhost:9999/v1".to_string(),
            openai_model: "test-model".to_string(),
            feedback_delay_ms: 10,
        }
    }
}
