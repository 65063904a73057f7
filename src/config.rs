use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_RANDOM_TEMPERATURE: f32 = 1.2;

/// Settings for the generation service client.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub text_model: String,
    pub image_model: String,
    /// Sampling temperature for random-word requests.
    pub random_temperature: f32,
    /// Per-request timeout; `None` waits until the service answers.
    pub request_timeout: Option<Duration>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            random_temperature: DEFAULT_RANDOM_TEMPERATURE,
            request_timeout: None,
        }
    }
}

impl ProviderConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source; blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let api_key = get("GEMINI_API_KEY").or_else(|| get("API_KEY"));

        let random_temperature = get("ORDSKATT_RANDOM_TEMPERATURE")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.random_temperature);

        let request_timeout = get("ORDSKATT_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            api_key,
            api_base: get("ORDSKATT_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            text_model: get("ORDSKATT_TEXT_MODEL").unwrap_or(defaults.text_model),
            image_model: get("ORDSKATT_IMAGE_MODEL").unwrap_or(defaults.image_model),
            random_temperature,
            request_timeout,
        }
    }
}
