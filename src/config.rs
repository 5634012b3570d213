use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";
const DEFAULT_OLLAMA_TIMEOUT_SECS: u64 = 120;

/// Process settings, read once from the environment at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub ollama_timeout: Duration,
    /// Skip TLS verification on YouTube requests (`WORKOUT_INSECURE_SSL=1`).
    pub insecure_ssl: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            ollama_timeout: Duration::from_secs(DEFAULT_OLLAMA_TIMEOUT_SECS),
            insecure_ssl: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let ollama_timeout = match var("OLLAMA_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    tracing::warn!(value = %raw, "ignoring invalid OLLAMA_TIMEOUT_SECS");
                    defaults.ollama_timeout
                }
            },
            None => defaults.ollama_timeout,
        };

        Self {
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            ollama_url: var("OLLAMA_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.ollama_url),
            ollama_model: var("OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
            ollama_timeout,
            insecure_ssl: var("WORKOUT_INSECURE_SSL").as_deref() == Some("1"),
        }
    }
}
