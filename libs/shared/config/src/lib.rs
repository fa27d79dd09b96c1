use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_url: String,
    pub store_api_key: String,
    pub generator_url: String,
    pub generator_api_key: String,
    pub generator_model: String,
    pub request_timeout_secs: u64,
    pub symptom_sufficiency_threshold: usize,
    pub strict_location_matching: bool,
    pub booking_max_attempts: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            store_url: env::var("STORE_URL")
                .unwrap_or_else(|_| {
                    warn!("STORE_URL not set, using empty value");
                    String::new()
                }),
            store_api_key: env::var("STORE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("STORE_API_KEY not set, using empty value");
                    String::new()
                }),
            generator_url: env::var("GENERATOR_URL")
                .unwrap_or_else(|_| {
                    warn!("GENERATOR_URL not set, using default");
                    "https://generativelanguage.googleapis.com/v1beta".to_string()
                }),
            generator_api_key: env::var("GENERATOR_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("GENERATOR_API_KEY not set, using empty value");
                    String::new()
                }),
            generator_model: env::var("GENERATOR_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 10),
            symptom_sufficiency_threshold: parse_env("SYMPTOM_SUFFICIENCY_THRESHOLD", 2),
            strict_location_matching: env::var("STRICT_LOCATION_MATCHING")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            booking_max_attempts: parse_env("BOOKING_MAX_ATTEMPTS", 5),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.store_url.is_empty() && !self.store_api_key.is_empty()
    }

    pub fn is_generator_configured(&self) -> bool {
        !self.generator_url.is_empty() && !self.generator_api_key.is_empty()
    }
}

fn parse_env<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value, using default", name);
            default
        }),
        Err(_) => default,
    }
}
